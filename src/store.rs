//! EntityStore - executes condition queries against PostgreSQL
//!
//! The store owns a connection pool and the entity registry. It renders
//! queries built from conditions, runs them with sqlx and hydrates the rows
//! back into entities.

use std::any::TypeId;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

use crate::condition::{Condition, FieldCondition};
use crate::config::{Dialect, StoreConfig};
use crate::entity::{
    CREATED_AT_FIELD, DELETED_AT_FIELD, Entity, EntityMeta, ID_FIELD, Registry, RegistryBuilder,
    UPDATED_AT_FIELD,
};
use crate::error::{QueryError, Result};
use crate::field::FieldIdentifier;
use crate::hydrate::hydrate;
use crate::naming::to_snake_case;
use crate::operators::eq;
use crate::query::{Query, Statement};
use crate::sql::ddl::DdlGenerator;
use crate::sql::placeholder;
use crate::sql::sanitize::quote_identifier;
use crate::types::ColumnType;
use crate::value::{ColumnValue, PgQuery, SqlValue, bind_value};

/// Entity store over a PostgreSQL pool
///
/// Every registered entity gets its own table. Reads go through [`Query`],
/// so joins, preloads and soft-delete scoping behave the same as in
/// generated SQL.
pub struct EntityStore {
    /// Database connection pool
    pool: PgPool,
    /// Store configuration
    config: StoreConfig,
    registry: Arc<Registry>,
}

impl EntityStore {
    /// Connect to the database
    ///
    /// Tables are named from the `table_prefix` and `singular_tables` of
    /// `config`, unless `registry` was given its own naming strategy.
    /// Creates the registered tables when `auto_migrate` is enabled.
    pub async fn new(config: StoreConfig, registry: RegistryBuilder) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await
            .map_err(|e| QueryError::Connection(format!("Database connection failed: {}", e)))?;

        Self::from_pool(pool, config, registry).await
    }

    /// Create a store from an existing pool
    ///
    /// Use this when the pool is shared with other parts of the application.
    pub async fn from_pool(
        pool: PgPool,
        config: StoreConfig,
        registry: RegistryBuilder,
    ) -> Result<Self> {
        if config.dialect != Dialect::Postgres {
            return Err(QueryError::validation(format!(
                "EntityStore executes on PostgreSQL only, got {:?}",
                config.dialect
            )));
        }

        let registry = registry.build_for(&config)?;
        let store = Self {
            pool,
            config,
            registry: Arc::new(registry),
        };
        if store.config.auto_migrate {
            store.auto_migrate().await?;
        }
        Ok(store)
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    // =========================================================================
    // Migrations
    // =========================================================================

    /// Create the table and default index of every registered entity
    pub async fn auto_migrate(&self) -> Result<()> {
        for meta in self.registry.entities() {
            let ddl = DdlGenerator::new(meta);
            tracing::debug!(table = %meta.table, "creating table");

            sqlx::query(&ddl.generate_create_table())
                .execute(&self.pool)
                .await?;
            sqlx::query(&ddl.generate_default_index())
                .execute(&self.pool)
                .await?;
        }
        Ok(())
    }

    /// Drop the table of every registered entity
    pub async fn drop_tables(&self) -> Result<()> {
        let metas: Vec<&EntityMeta> = self.registry.entities().collect();
        for meta in metas.into_iter().rev() {
            tracing::debug!(table = %meta.table, "dropping table");
            sqlx::query(&DdlGenerator::new(meta).generate_drop_table())
                .execute(&self.pool)
                .await?;
        }
        Ok(())
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Insert `entity` and return the stored row
    ///
    /// Serialized fields are matched to columns by their snake_case field
    /// name. Timestamps are set by the database, the id too unless one is
    /// given. Null fields are left to the column default.
    pub async fn create<T>(&self, entity: &T) -> Result<T>
    where
        T: Entity + Serialize + DeserializeOwned,
    {
        let meta = self.registry.meta::<T>()?;
        let properties = serde_json::to_value(entity)?;
        let properties = properties
            .as_object()
            .ok_or_else(|| QueryError::validation("Entity must serialize to a JSON object"))?;

        let mut column_names = Vec::new();
        let mut params = Vec::new();

        for column in &meta.columns {
            let field = column.field.as_str();
            if field == CREATED_AT_FIELD || field == UPDATED_AT_FIELD || field == DELETED_AT_FIELD {
                continue;
            }

            let value = properties
                .get(&to_snake_case(field))
                .unwrap_or(&serde_json::Value::Null);

            if field == ID_FIELD && is_unset_id(value) {
                continue;
            }

            if let Err(e) = column.definition.column_type.validate_value(value) {
                return Err(QueryError::validation(format!(
                    "Invalid value for field '{}': {}",
                    field, e
                )));
            }

            if value.is_null() {
                if !column.definition.nullable && column.definition.default_value.is_none() {
                    return Err(QueryError::validation(format!(
                        "Required field '{}' is missing",
                        field
                    )));
                }
                continue;
            }

            column_names.push(quote_identifier(&column.column));
            params.push(json_to_sql_value(
                &column.definition.column_type,
                field,
                value,
            )?);
        }

        let placeholders = vec!["?"; params.len()].join(", ");
        let insert_sql = if column_names.is_empty() {
            format!(
                "INSERT INTO {} DEFAULT VALUES RETURNING *",
                quote_identifier(&meta.table)
            )
        } else {
            format!(
                "INSERT INTO {} ({}) VALUES ({}) RETURNING *",
                quote_identifier(&meta.table),
                column_names.join(", "),
                placeholders
            )
        };

        let (sql, params) = placeholder::render(&insert_sql, params, Dialect::Postgres)?;
        let statement = Statement {
            sql,
            params,
            preloads: Vec::new(),
        };

        let row = self.prepare(&statement).fetch_one(&self.pool).await?;
        hydrate(&row, &self.registry, meta, &[])
    }

    /// Delete the row with `id`
    ///
    /// Entities with soft delete get `deleted_at` set instead of being
    /// removed. Fails with [`QueryError::ObjectNotFound`] when no live row
    /// has that id.
    pub async fn delete<T: Entity, V: ColumnValue>(&self, id: V) -> Result<()> {
        let meta = self.registry.meta::<T>()?;
        let sql = delete_sql(meta);

        let statement = Statement {
            sql,
            params: vec![id.to_sql_value()],
            preloads: Vec::new(),
        };
        let result = self.prepare(&statement).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(QueryError::object_not_found(format!(
                "{} with id {:?}",
                T::NAME,
                statement.params[0]
            )));
        }

        Ok(())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Start a query over `T` with this store's registry
    pub fn query_builder<T: Entity>(&self, conditions: &[Condition<T>]) -> Result<Query<'_>> {
        Query::new::<T>(&self.registry, self.config.dialect, conditions)
    }

    /// Every live `T` matching `conditions`
    pub async fn query<T>(&self, conditions: &[Condition<T>]) -> Result<Vec<T>>
    where
        T: Entity + DeserializeOwned,
    {
        let query = self.query_builder(conditions)?;
        self.fetch(&query).await
    }

    /// The single `T` matching `conditions`
    ///
    /// Fails with [`QueryError::ObjectNotFound`] or
    /// [`QueryError::MoreThanOneObjectFound`].
    pub async fn query_one<T>(&self, conditions: &[Condition<T>]) -> Result<T>
    where
        T: Entity + DeserializeOwned,
    {
        let query = self.query_builder(conditions)?.limit(2);
        let mut entities: Vec<T> = self.fetch(&query).await?;

        match entities.len() {
            0 => Err(QueryError::object_not_found(T::NAME)),
            1 => Ok(entities.remove(0)),
            _ => Err(QueryError::more_than_one(T::NAME)),
        }
    }

    pub async fn get_by_id<T, V>(&self, id: V) -> Result<T>
    where
        T: Entity + DeserializeOwned,
        V: ColumnValue,
    {
        let condition = FieldCondition::new(FieldIdentifier::<T, V>::new(ID_FIELD), eq(id)?);
        self.query_one(&[condition.into()]).await
    }

    /// Number of live `T` matching `conditions`
    pub async fn count<T: Entity>(&self, conditions: &[Condition<T>]) -> Result<i64> {
        let statement = self.query_builder(conditions)?.build_count()?;
        let row = self.prepare(&statement).fetch_one(&self.pool).await?;
        Ok(row.try_get::<i64, _>(0)?)
    }

    /// Execute a query built for `T`
    pub async fn fetch<T>(&self, query: &Query<'_>) -> Result<Vec<T>>
    where
        T: Entity + DeserializeOwned,
    {
        if query.root().entity != TypeId::of::<T>() {
            return Err(QueryError::validation(format!(
                "query is over {}, not {}",
                query.root().entity_name,
                T::NAME
            )));
        }

        let meta = self.registry.meta::<T>()?;
        let statement = query.build()?;
        let rows = self.prepare(&statement).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| hydrate(row, &self.registry, meta, &statement.preloads))
            .collect()
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    fn prepare<'q>(&self, statement: &'q Statement) -> PgQuery<'q> {
        tracing::debug!(sql = %statement.sql, params = ?statement.params, "query");

        let mut query = sqlx::query(&statement.sql);
        for param in &statement.params {
            query = bind_value(query, param);
        }
        query
    }
}

/// Soft delete for entities with a `deleted_at` column, hard delete otherwise
fn delete_sql(meta: &EntityMeta) -> String {
    let table = quote_identifier(&meta.table);
    let id = quote_identifier(meta.column_name(ID_FIELD).unwrap_or("id"));

    match meta.deleted_at_column() {
        Some(deleted_at) => format!(
            "UPDATE {} SET {} = NOW(), {} = NOW() WHERE {} = $1 AND {} IS NULL",
            table,
            quote_identifier(deleted_at),
            quote_identifier(meta.column_name(UPDATED_AT_FIELD).unwrap_or("updated_at")),
            id,
            quote_identifier(deleted_at)
        ),
        None => format!("DELETE FROM {} WHERE {} = $1", table, id),
    }
}

/// An id left for the database to generate
fn is_unset_id(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::Number(n) => n.as_i64() == Some(0),
        serde_json::Value::String(s) => s.parse::<uuid::Uuid>().is_ok_and(|id| id.is_nil()),
        _ => false,
    }
}

/// Typed parameter for a serialized field
fn json_to_sql_value(
    column_type: &ColumnType,
    field: &str,
    value: &serde_json::Value,
) -> Result<SqlValue> {
    let expected = |kind: &str| QueryError::validation(format!("Field '{}' expected {}", field, kind));

    Ok(match column_type {
        ColumnType::String => SqlValue::Text(
            value
                .as_str()
                .ok_or_else(|| expected("string"))?
                .to_string(),
        ),
        ColumnType::Integer => SqlValue::Int(
            value
                .as_i64()
                .or_else(|| value.as_str().and_then(|s| s.parse::<i64>().ok()))
                .ok_or_else(|| expected("integer"))?,
        ),
        ColumnType::Float => SqlValue::Float(value.as_f64().ok_or_else(|| expected("float"))?),
        ColumnType::Decimal { .. } => {
            let decimal = match value {
                serde_json::Value::String(s) => s.parse::<rust_decimal::Decimal>().ok(),
                serde_json::Value::Number(n) => n.to_string().parse::<rust_decimal::Decimal>().ok(),
                _ => None,
            };
            SqlValue::Decimal(decimal.ok_or_else(|| expected("decimal"))?)
        }
        ColumnType::Boolean => SqlValue::Bool(value.as_bool().ok_or_else(|| expected("boolean"))?),
        ColumnType::Timestamp => {
            let timestamp_str = value.as_str().ok_or_else(|| expected("timestamp string"))?;
            let timestamp = chrono::DateTime::parse_from_rfc3339(timestamp_str)
                .map_err(|e| {
                    QueryError::validation(format!(
                        "Field '{}' has invalid timestamp: {}",
                        field, e
                    ))
                })?
                .with_timezone(&chrono::Utc);
            SqlValue::Timestamp(timestamp)
        }
        ColumnType::Uuid => SqlValue::Uuid(
            value
                .as_str()
                .and_then(|s| s.parse::<uuid::Uuid>().ok())
                .ok_or_else(|| expected("uuid"))?,
        ),
        ColumnType::Json => SqlValue::Json(value.clone()),
    })
}
