//! DDL generation for registered entities
//!
//! Generates PostgreSQL statements creating the table of an entity from its
//! resolved metadata.

use crate::entity::{CREATED_AT_FIELD, ColumnMeta, EntityMeta, ID_FIELD, IdType};
use crate::sql::sanitize::quote_identifier;

/// DDL generator for one entity's table
pub struct DdlGenerator<'a> {
    meta: &'a EntityMeta,
}

impl<'a> DdlGenerator<'a> {
    pub fn new(meta: &'a EntityMeta) -> Self {
        Self { meta }
    }

    /// Generate CREATE TABLE IF NOT EXISTS with the base and declared columns
    ///
    /// The id column is the primary key, generated by the database:
    /// `gen_random_uuid()` for UUID ids, a sequence for serial ones.
    pub fn generate_create_table(&self) -> String {
        let column_defs: Vec<String> = self
            .meta
            .columns
            .iter()
            .map(|column| {
                if column.field == ID_FIELD {
                    self.format_id_column(column)
                } else {
                    Self::format_column_definition(column)
                }
            })
            .collect();

        format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            quote_identifier(&self.meta.table),
            column_defs.join(", ")
        )
    }

    /// Generate DROP TABLE statement
    pub fn generate_drop_table(&self) -> String {
        format!(
            "DROP TABLE IF EXISTS {} CASCADE",
            quote_identifier(&self.meta.table)
        )
    }

    /// Index on created_at, restricted to live rows when soft delete is enabled
    pub fn generate_default_index(&self) -> String {
        let quoted_table = quote_identifier(&self.meta.table);
        let quoted_index = quote_identifier(&format!("idx_{}_default", self.meta.table));
        let created_at =
            quote_identifier(self.meta.column_name(CREATED_AT_FIELD).unwrap_or("created_at"));

        match self.meta.deleted_at_column() {
            Some(deleted_at) => format!(
                "CREATE INDEX IF NOT EXISTS {} ON {}({} DESC) WHERE {} IS NULL",
                quoted_index,
                quoted_table,
                created_at,
                quote_identifier(deleted_at)
            ),
            None => format!(
                "CREATE INDEX IF NOT EXISTS {} ON {}({} DESC)",
                quoted_index, quoted_table, created_at
            ),
        }
    }

    fn format_id_column(&self, column: &ColumnMeta) -> String {
        let id = quote_identifier(&column.column);
        match self.meta.id_type {
            IdType::Uuid => format!("{} UUID PRIMARY KEY DEFAULT gen_random_uuid()", id),
            IdType::Serial => format!("{} BIGSERIAL PRIMARY KEY", id),
        }
    }

    /// Format a single column definition for CREATE TABLE
    pub fn format_column_definition(column: &ColumnMeta) -> String {
        let definition = &column.definition;
        let mut parts = vec![
            quote_identifier(&column.column),
            definition.column_type.to_sql_type(),
        ];

        if definition.unique {
            parts.push("UNIQUE".to_string());
        }

        if !definition.nullable {
            parts.push("NOT NULL".to_string());
        }

        if let Some(default) = &definition.default_value {
            parts.push(format!("DEFAULT {}", default));
        }

        parts.join(" ")
    }
}
