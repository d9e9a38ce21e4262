//! Core type definitions for entity columns
//!
//! Column types describe how a field is stored, decoded from rows and bound
//! as a parameter. Column definitions are declared by each entity.

// ============================================================================
// Typed Column Definitions
// ============================================================================

/// Column type definition with validation and SQL mapping
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnType {
    /// Text field (unlimited length, maps to TEXT)
    String,

    /// Integer field (maps to BIGINT for 64-bit range)
    Integer,

    /// Floating point field (maps to DOUBLE PRECISION)
    Float,

    /// `NUMERIC(precision, scale)`
    Decimal { precision: u8, scale: u8 },

    /// Boolean field (maps to BOOLEAN)
    Boolean,

    /// Timestamp field, always stored in UTC (maps to TIMESTAMP WITH TIME ZONE)
    Timestamp,

    /// UUID field (maps to UUID)
    Uuid,

    /// JSON field, stored as binary JSON (maps to JSONB)
    Json,
}

impl ColumnType {
    /// Create a Decimal type with specified precision and scale
    pub fn decimal(precision: u8, scale: u8) -> Self {
        ColumnType::Decimal { precision, scale }
    }

    /// Convert column type to PostgreSQL type string
    pub fn to_sql_type(&self) -> String {
        match self {
            ColumnType::String => "TEXT".to_string(),
            ColumnType::Integer => "BIGINT".to_string(),
            ColumnType::Float => "DOUBLE PRECISION".to_string(),
            ColumnType::Decimal { precision, scale } => {
                format!("NUMERIC({},{})", precision, scale)
            }
            ColumnType::Boolean => "BOOLEAN".to_string(),
            ColumnType::Timestamp => "TIMESTAMP WITH TIME ZONE".to_string(),
            ColumnType::Uuid => "UUID".to_string(),
            ColumnType::Json => "JSONB".to_string(),
        }
    }

    /// Validate that a JSON value is compatible with this column type
    pub fn validate_value(&self, value: &serde_json::Value) -> Result<(), String> {
        if value.is_null() {
            // Null is handled by nullable flag, not type validation
            return Ok(());
        }

        match (self, value) {
            (ColumnType::String, serde_json::Value::String(_)) => Ok(()),
            (ColumnType::Integer, serde_json::Value::Number(n)) if n.is_i64() || n.is_u64() => {
                Ok(())
            }
            (ColumnType::Float, serde_json::Value::Number(_)) => Ok(()),
            (ColumnType::Decimal { .. }, serde_json::Value::Number(_)) => Ok(()),
            // rust_decimal serializes as a string by default
            (ColumnType::Decimal { .. }, serde_json::Value::String(s)) => s
                .parse::<rust_decimal::Decimal>()
                .map(|_| ())
                .map_err(|_| format!("Cannot convert '{}' to decimal", s)),
            (ColumnType::Boolean, serde_json::Value::Bool(_)) => Ok(()),
            (ColumnType::Timestamp, serde_json::Value::String(s)) => {
                chrono::DateTime::parse_from_rfc3339(s)
                    .map(|_| ())
                    .map_err(|e| format!("Invalid timestamp format: {}", e))
            }
            (ColumnType::Uuid, serde_json::Value::String(s)) => uuid::Uuid::parse_str(s)
                .map(|_| ())
                .map_err(|e| format!("Invalid uuid: {}", e)),
            (ColumnType::Json, _) => Ok(()),
            _ => Err(format!(
                "Type mismatch: expected {:?}, got {:?}",
                self, value
            )),
        }
    }
}

/// Column definition for an entity field
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    /// Field name as declared on the entity (e.g. `ProductID`)
    pub field: String,

    /// Explicit column name; derived from the field by the naming strategy when absent
    pub column: Option<String>,

    /// Column type with validation rules
    pub column_type: ColumnType,

    /// Whether the column allows NULL values (default: true)
    pub nullable: bool,

    /// Whether the column has a UNIQUE constraint (default: false)
    pub unique: bool,

    /// Default value (SQL expression, e.g., "0", "NOW()", "'active'")
    pub default_value: Option<String>,
}

impl ColumnDefinition {
    /// Create a new column definition with a field name and type
    pub fn new(field: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            field: field.into(),
            column: None,
            column_type,
            nullable: true,
            unique: false,
            default_value: None,
        }
    }

    /// Store the field in an explicitly named column
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Set the column as non-nullable
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Set the column as unique
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Set a default value
    pub fn default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}
