//! Entities and the metadata registry
//!
//! An [`Entity`] declares its name and columns. The [`Registry`] resolves
//! table and column names once, at startup, and is then shared read-only by
//! every query built against it.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::StoreConfig;
use crate::error::{QueryError, Result};
use crate::naming::{NamingStrategy, SnakeCaseNaming};
use crate::sql::sanitize::validate_identifier;
use crate::types::{ColumnDefinition, ColumnType};

pub const ID_FIELD: &str = "ID";
pub const CREATED_AT_FIELD: &str = "CreatedAt";
pub const UPDATED_AT_FIELD: &str = "UpdatedAt";
pub const DELETED_AT_FIELD: &str = "DeletedAt";

/// Columns of the base fields, unavailable to declared fields
const BASE_COLUMNS: [&str; 4] = ["id", "created_at", "updated_at", "deleted_at"];

/// Type of the primary key every entity carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdType {
    /// `UUID` generated by the database
    Uuid,
    /// `BIGSERIAL`
    Serial,
}

impl IdType {
    fn column_type(self) -> ColumnType {
        match self {
            IdType::Uuid => ColumnType::Uuid,
            IdType::Serial => ColumnType::Integer,
        }
    }
}

/// A type mapped to a relational table
///
/// Every entity has the base fields `ID`, `CreatedAt` and `UpdatedAt`, plus
/// `DeletedAt` when soft delete is enabled. [`Entity::columns`] lists the
/// remaining fields, including foreign keys such as `ProductID`.
pub trait Entity: Send + Sync + 'static {
    /// Type name the table name is derived from
    const NAME: &'static str;

    /// Non-base columns of the entity
    fn columns() -> Vec<ColumnDefinition>;

    /// Explicit table name, bypassing the naming strategy
    fn table_name() -> Option<&'static str> {
        None
    }

    fn id_type() -> IdType {
        IdType::Uuid
    }

    /// Whether rows are marked deleted through `deleted_at` instead of removed
    fn soft_delete() -> bool {
        true
    }
}

/// A column with its resolved SQL name
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMeta {
    pub field: String,
    pub column: String,
    pub definition: ColumnDefinition,
}

/// Resolved metadata of a registered entity
#[derive(Debug, Clone)]
pub struct EntityMeta {
    pub type_id: TypeId,
    pub name: &'static str,
    pub table: String,
    pub id_type: IdType,
    pub soft_delete: bool,
    /// Base columns first, then the entity's own columns
    pub columns: Vec<ColumnMeta>,
}

impl EntityMeta {
    /// Resolved column for a field name
    pub fn column_for(&self, field: &str) -> Option<&ColumnMeta> {
        self.columns.iter().find(|c| c.field == field)
    }

    /// Column name of a field
    pub fn column_name(&self, field: &str) -> Option<&str> {
        self.column_for(field).map(|c| c.column.as_str())
    }

    /// Name of the soft-delete column, when the entity has one
    pub fn deleted_at_column(&self) -> Option<&str> {
        if !self.soft_delete {
            return None;
        }
        self.column_name(DELETED_AT_FIELD)
    }

    fn build<T: Entity>(naming: &dyn NamingStrategy) -> Result<Self> {
        let table = match T::table_name() {
            Some(table) => table.to_string(),
            None => naming.table_name(T::NAME),
        };
        validate_identifier(&table, &[]).map_err(|e| {
            QueryError::validation(format!("entity {}: {}", T::NAME, e))
        })?;

        let mut definitions = vec![
            ColumnDefinition::new(ID_FIELD, T::id_type().column_type()).not_null(),
            ColumnDefinition::new(CREATED_AT_FIELD, ColumnType::Timestamp)
                .not_null()
                .default("NOW()"),
            ColumnDefinition::new(UPDATED_AT_FIELD, ColumnType::Timestamp)
                .not_null()
                .default("NOW()"),
        ];
        if T::soft_delete() {
            definitions.push(ColumnDefinition::new(DELETED_AT_FIELD, ColumnType::Timestamp));
        }
        let base_count = definitions.len();
        definitions.extend(T::columns());

        let mut columns: Vec<ColumnMeta> = Vec::with_capacity(definitions.len());
        for (index, definition) in definitions.into_iter().enumerate() {
            if index >= base_count && definition.field == ID_FIELD {
                return Err(QueryError::validation(format!(
                    "entity {}: field '{}' is a base field and cannot be redeclared",
                    T::NAME,
                    definition.field
                )));
            }
            if columns.iter().any(|c| c.field == definition.field) {
                return Err(QueryError::validation(format!(
                    "entity {}: field '{}' is declared twice",
                    T::NAME,
                    definition.field
                )));
            }

            let column = match &definition.column {
                Some(column) => column.clone(),
                None => naming.column_name(&table, &definition.field),
            };
            let reserved: &[&str] = if index >= base_count {
                &BASE_COLUMNS
            } else {
                &[]
            };
            validate_identifier(&column, reserved).map_err(|e| {
                QueryError::validation(format!("entity {}: {}", T::NAME, e))
            })?;

            columns.push(ColumnMeta {
                field: definition.field.clone(),
                column,
                definition,
            });
        }

        Ok(Self {
            type_id: TypeId::of::<T>(),
            name: T::NAME,
            table,
            id_type: T::id_type(),
            soft_delete: T::soft_delete(),
            columns,
        })
    }
}

/// Per-entity metadata, looked up by entity type
#[derive(Debug, Clone)]
pub struct Registry {
    naming: Arc<dyn NamingStrategy>,
    entities: HashMap<TypeId, Arc<EntityMeta>>,
    /// Registration order, used by migrations
    order: Vec<TypeId>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn naming(&self) -> &dyn NamingStrategy {
        self.naming.as_ref()
    }

    /// Metadata of `T`, failing when it was never registered
    pub fn meta<T: Entity>(&self) -> Result<&EntityMeta> {
        self.meta_by_id(TypeId::of::<T>())
            .ok_or(QueryError::EntityNotRegistered(T::NAME))
    }

    pub fn meta_by_id(&self, type_id: TypeId) -> Option<&EntityMeta> {
        self.entities.get(&type_id).map(|meta| meta.as_ref())
    }

    /// Every registered entity, in registration order
    pub fn entities(&self) -> impl Iterator<Item = &EntityMeta> {
        self.order
            .iter()
            .filter_map(|type_id| self.meta_by_id(*type_id))
    }
}

type MetaBuilder = fn(&dyn NamingStrategy) -> Result<EntityMeta>;

/// Builder for Registry
pub struct RegistryBuilder {
    naming: Option<Arc<dyn NamingStrategy>>,
    pending: Vec<MetaBuilder>,
}

impl std::fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("naming", &self.naming)
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            naming: None,
            pending: Vec::new(),
        }
    }

    /// Replace the naming strategy
    ///
    /// An explicit strategy wins over the naming settings of a
    /// [`StoreConfig`] passed to [`RegistryBuilder::build_for`].
    pub fn naming(mut self, naming: impl NamingStrategy + 'static) -> Self {
        self.naming = Some(Arc::new(naming));
        self
    }

    pub fn register<T: Entity>(mut self) -> Self {
        self.pending.push(EntityMeta::build::<T>);
        self
    }

    /// Resolve every registered entity, with [`SnakeCaseNaming`] unless a
    /// strategy was set
    pub fn build(self) -> Result<Registry> {
        self.build_with(Arc::new(SnakeCaseNaming::new()))
    }

    /// Resolve every registered entity, naming tables from the prefix and
    /// singular settings of `config` unless a strategy was set
    pub fn build_for(self, config: &StoreConfig) -> Result<Registry> {
        self.build_with(Arc::new(SnakeCaseNaming::from_config(config)))
    }

    fn build_with(self, fallback: Arc<dyn NamingStrategy>) -> Result<Registry> {
        let naming = self.naming.unwrap_or(fallback);
        let mut entities = HashMap::new();
        let mut order = Vec::new();

        for build in self.pending {
            let meta = build(naming.as_ref())?;
            if entities.values().any(|m: &Arc<EntityMeta>| m.table == meta.table) {
                return Err(QueryError::validation(format!(
                    "entity {}: table '{}' is already used by another entity",
                    meta.name, meta.table
                )));
            }
            order.push(meta.type_id);
            entities.insert(meta.type_id, Arc::new(meta));
        }

        Ok(Registry {
            naming,
            entities,
            order,
        })
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Product;

    impl Entity for Product {
        const NAME: &'static str = "Product";

        fn columns() -> Vec<ColumnDefinition> {
            vec![
                ColumnDefinition::new("String", ColumnType::String).column("string_something_else"),
                ColumnDefinition::new("Int", ColumnType::Integer),
            ]
        }
    }

    struct Phone;

    impl Entity for Phone {
        const NAME: &'static str = "Phone";

        fn columns() -> Vec<ColumnDefinition> {
            vec![ColumnDefinition::new("Name", ColumnType::String)]
        }

        fn id_type() -> IdType {
            IdType::Serial
        }

        fn soft_delete() -> bool {
            false
        }
    }

    struct Duplicated;

    impl Entity for Duplicated {
        const NAME: &'static str = "Duplicated";

        fn columns() -> Vec<ColumnDefinition> {
            vec![
                ColumnDefinition::new("Name", ColumnType::String),
                ColumnDefinition::new("Name", ColumnType::Integer),
            ]
        }
    }

    #[test]
    fn test_meta_resolves_table_and_columns() {
        let registry = Registry::builder().register::<Product>().build().unwrap();
        let meta = registry.meta::<Product>().unwrap();

        assert_eq!(meta.table, "products");
        assert_eq!(meta.column_for("ID").unwrap().column, "id");
        assert_eq!(meta.column_for("Int").unwrap().column, "int");
        assert_eq!(
            meta.column_for("String").unwrap().column,
            "string_something_else"
        );
        assert_eq!(meta.deleted_at_column(), Some("deleted_at"));
    }

    #[test]
    fn test_entity_without_soft_delete() {
        let registry = Registry::builder().register::<Phone>().build().unwrap();
        let meta = registry.meta::<Phone>().unwrap();

        assert!(meta.column_for(DELETED_AT_FIELD).is_none());
        assert_eq!(meta.deleted_at_column(), None);
        assert_eq!(meta.id_type, IdType::Serial);
    }

    #[test]
    fn test_unregistered_entity() {
        let registry = Registry::builder().register::<Product>().build().unwrap();
        let err = registry.meta::<Phone>().unwrap_err();
        assert!(matches!(err, QueryError::EntityNotRegistered("Phone")));
    }

    #[test]
    fn test_duplicated_field_is_rejected() {
        let result = Registry::builder().register::<Duplicated>().build();
        assert!(matches!(result, Err(QueryError::Validation(_))));
    }

    struct Shadowing;

    impl Entity for Shadowing {
        const NAME: &'static str = "Shadowing";

        fn columns() -> Vec<ColumnDefinition> {
            vec![ColumnDefinition::new("Removed", ColumnType::Timestamp).column("deleted_at")]
        }

        fn soft_delete() -> bool {
            false
        }
    }

    #[test]
    fn test_base_column_cannot_be_declared() {
        let err = Registry::builder()
            .register::<Shadowing>()
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("reserved"));
    }

    #[test]
    fn test_entities_keep_registration_order() {
        let registry = Registry::builder()
            .register::<Phone>()
            .register::<Product>()
            .build()
            .unwrap();
        let names: Vec<_> = registry.entities().map(|m| m.name).collect();
        assert_eq!(names, vec!["Phone", "Product"]);
    }

    #[test]
    fn test_build_for_applies_config_naming() {
        let config = StoreConfig::builder("postgres://localhost/test")
            .table_prefix("app_")
            .singular_tables(true)
            .build();
        let registry = Registry::builder()
            .register::<Product>()
            .build_for(&config)
            .unwrap();
        assert_eq!(registry.meta::<Product>().unwrap().table, "app_product");
    }

    #[test]
    fn test_explicit_naming_wins_over_config() {
        let config = StoreConfig::builder("postgres://localhost/test")
            .table_prefix("app_")
            .build();
        let registry = Registry::builder()
            .naming(SnakeCaseNaming {
                table_prefix: "own_".to_string(),
                singular_tables: false,
            })
            .register::<Product>()
            .build_for(&config)
            .unwrap();
        assert_eq!(registry.meta::<Product>().unwrap().table, "own_products");
    }
}
