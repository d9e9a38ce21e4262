//! Configuration for EntityStore
//!
//! Provides a builder pattern for configuring the store and the naming strategy.

use crate::error::{QueryError, Result};

/// SQL dialect the generated statements target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    #[default]
    Postgres,
    MySql,
    Sqlite,
    SqlServer,
}

impl Dialect {
    /// Longest identifier the dialect accepts without truncation
    pub fn max_identifier_len(&self) -> usize {
        match self {
            Dialect::Postgres => 63,
            Dialect::MySql => 64,
            Dialect::Sqlite => usize::MAX,
            Dialect::SqlServer => 128,
        }
    }
}

/// Configuration for the entity store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// PostgreSQL database URL
    pub database_url: String,
    /// Maximum number of pooled connections
    pub max_connections: u32,
    /// Dialect used when rendering statements
    pub dialect: Dialect,
    /// Prefix prepended to every derived table name
    ///
    /// Applied by [`EntityStore`](crate::EntityStore) unless the registry
    /// was given its own naming strategy.
    pub table_prefix: String,
    /// Use singular table names (`sale` instead of `sales`)
    pub singular_tables: bool,
    /// Create the tables of every registered entity on connect
    pub auto_migrate: bool,
}

impl StoreConfig {
    /// Create a new configuration builder
    pub fn builder(database_url: impl Into<String>) -> StoreConfigBuilder {
        StoreConfigBuilder::new(database_url)
    }

    /// Read `DATABASE_URL` and the optional `DATABASE_MAX_CONNECTIONS` from the environment
    pub fn from_env() -> Result<Self> {
        let url = std::env::var("DATABASE_URL")
            .map_err(|_| QueryError::validation("DATABASE_URL is not set"))?;

        let mut builder = Self::builder(url);
        if let Ok(max) = std::env::var("DATABASE_MAX_CONNECTIONS") {
            let max = max.parse::<u32>().map_err(|e| {
                QueryError::validation(format!("DATABASE_MAX_CONNECTIONS is invalid: {}", e))
            })?;
            builder = builder.max_connections(max);
        }

        Ok(builder.build())
    }
}

/// Builder for StoreConfig
#[derive(Debug)]
pub struct StoreConfigBuilder {
    database_url: String,
    max_connections: u32,
    dialect: Dialect,
    table_prefix: String,
    singular_tables: bool,
    auto_migrate: bool,
}

impl StoreConfigBuilder {
    /// Create a new builder with the database URL
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: 10,
            dialect: Dialect::default(),
            table_prefix: String::new(),
            singular_tables: false,
            auto_migrate: false,
        }
    }

    /// Set the maximum pool size (default: 10)
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Set the dialect (default: PostgreSQL)
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Set a prefix for all table names (default: none)
    pub fn table_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_prefix = prefix.into();
        self
    }

    /// Use singular table names (default: false)
    pub fn singular_tables(mut self, enabled: bool) -> Self {
        self.singular_tables = enabled;
        self
    }

    /// Create registered tables on connect (default: false)
    pub fn auto_migrate(mut self, enabled: bool) -> Self {
        self.auto_migrate = enabled;
        self
    }

    /// Build the configuration
    pub fn build(self) -> StoreConfig {
        StoreConfig {
            database_url: self.database_url,
            max_connections: self.max_connections,
            dialect: self.dialect,
            table_prefix: self.table_prefix,
            singular_tables: self.singular_tables,
            auto_migrate: self.auto_migrate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::builder("postgres://localhost/test").build();

        assert_eq!(config.database_url, "postgres://localhost/test");
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.dialect, Dialect::Postgres);
        assert_eq!(config.table_prefix, "");
        assert!(!config.singular_tables);
        assert!(!config.auto_migrate);
    }

    #[test]
    fn test_full_custom_config() {
        let config = StoreConfig::builder(String::from("postgres://localhost/db"))
            .max_connections(2)
            .dialect(Dialect::MySql)
            .table_prefix("app_")
            .singular_tables(true)
            .auto_migrate(true)
            .build();

        assert_eq!(config.max_connections, 2);
        assert_eq!(config.dialect, Dialect::MySql);
        assert_eq!(config.table_prefix, "app_");
        assert!(config.singular_tables);
        assert!(config.auto_migrate);
    }

    #[test]
    fn test_builder_order_independence() {
        let config1 = StoreConfig::builder("postgres://localhost/test")
            .singular_tables(true)
            .table_prefix("x_")
            .build();

        let config2 = StoreConfig::builder("postgres://localhost/test")
            .table_prefix("x_")
            .singular_tables(true)
            .build();

        assert_eq!(config1.table_prefix, config2.table_prefix);
        assert_eq!(config1.singular_tables, config2.singular_tables);
    }

    #[test]
    fn test_postgres_identifier_limit() {
        assert_eq!(Dialect::Postgres.max_identifier_len(), 63);
        assert!(Dialect::Sqlite.max_identifier_len() > 1000);
    }

    #[test]
    fn test_builder_debug() {
        let builder = StoreConfig::builder("postgres://localhost/test");
        let debug_str = format!("{:?}", builder);
        assert!(debug_str.contains("StoreConfigBuilder"));
    }
}
