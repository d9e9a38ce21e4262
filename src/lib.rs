//! # condition-orm
//!
//! Compile-time checked query conditions over PostgreSQL tables.
//!
//! Entities declare their fields once. Each field becomes a typed
//! [`FieldIdentifier`], so a condition like "the sale's product has int 1"
//! is checked by the compiler: the field must belong to the entity and the
//! operator must take the field's value type. Conditions compose with
//! [`and`], [`or`] and [`not`], follow relations through joins and can
//! preload related entities into the result.
//!
//! ## Features
//!
//! - **Typed Conditions**: Field and operator types are checked at compile time
//! - **Joins Through Relations**: Belongs-to, has-one, has-many and self-referential joins
//! - **Preloading**: Related entities reached through belongs-to joins are
//!   selected in the same query and hydrated
//! - **Soft Delete**: Rows with `deleted_at` set are invisible unless asked for
//! - **Dialect Operators**: Postgres, MySQL, SQLite and SQL Server specific operators
//! - **Dynamic Operators**: Compare a column with another column of a joined table,
//!   also across nullable and non-nullable fields (`operators::multitype`)
//! - **Unchecked Operators**: Compare with values of any type (`operators::unchecked`)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use condition_orm::operators::eq;
//! use condition_orm::{
//!     ColumnDefinition, ColumnType, Condition, Entity, EntityStore, FieldCondition,
//!     FieldIdentifier, JoinCondition, Registry, StoreConfig,
//! };
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct Product {
//!     id: uuid::Uuid,
//!     int: i64,
//! }
//!
//! impl Entity for Product {
//!     const NAME: &'static str = "Product";
//!
//!     fn columns() -> Vec<ColumnDefinition> {
//!         vec![ColumnDefinition::new("Int", ColumnType::Integer).not_null()]
//!     }
//! }
//!
//! #[derive(Debug, Deserialize)]
//! struct Sale {
//!     id: uuid::Uuid,
//!     code: i64,
//! }
//!
//! impl Entity for Sale {
//!     const NAME: &'static str = "Sale";
//!
//!     fn columns() -> Vec<ColumnDefinition> {
//!         vec![
//!             ColumnDefinition::new("Code", ColumnType::Integer).not_null(),
//!             ColumnDefinition::new("ProductID", ColumnType::Uuid).not_null(),
//!         ]
//!     }
//! }
//!
//! const PRODUCT_INT: FieldIdentifier<Product, i64> = FieldIdentifier::new("Int");
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StoreConfig::builder("postgres://localhost/mydb")
//!         .table_prefix("app_")
//!         .auto_migrate(true)
//!         .build();
//!     // tables `app_products` and `app_sales`
//!     let entities = Registry::builder().register::<Product>().register::<Sale>();
//!     let store = EntityStore::new(config, entities).await?;
//!
//!     // Sales whose product has int 1
//!     let sales: Vec<Sale> = store
//!         .query(&[Condition::join(JoinCondition::<Sale, Product>::new(
//!             "Product",
//!             "ProductID",
//!             "ID",
//!             vec![FieldCondition::new(PRODUCT_INT, eq(1)?).into()],
//!         ))])
//!         .await?;
//!
//!     println!("{} sales", sales.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use condition_orm::{Dialect, StoreConfig};
//!
//! let config = StoreConfig::builder("postgres://localhost/mydb")
//!     .max_connections(10)
//!     .dialect(Dialect::Postgres) // Dialect queries are rendered for
//!     .table_prefix("app_")       // Prepended to every derived table name
//!     .singular_tables(false)     // `Product` -> `products`
//!     .auto_migrate(true)         // Create missing tables on connect
//!     .build();
//! ```
//!
//! Queries for the other dialects can be rendered with [`Query`] without a
//! connection. Execution through [`EntityStore`] is PostgreSQL only.

pub mod condition;
pub mod config;
pub mod entity;
pub mod error;
pub mod field;
pub mod hydrate;
pub mod naming;
pub mod operator;
pub mod operators;
pub mod query;
pub mod sql;
pub mod store;
pub mod types;
pub mod value;

// Re-export main types for convenience
pub use condition::{
    Condition, FieldCondition, JoinCondition, PreloadCondition, WhereCondition, and, not, or, raw,
};
pub use config::{Dialect, StoreConfig, StoreConfigBuilder};
pub use entity::{Entity, EntityMeta, IdType, Registry, RegistryBuilder};
pub use error::{QueryError, Result};
pub use field::{FieldIdentifier, FieldRef};
pub use naming::{NamingStrategy, SnakeCaseNaming};
pub use operator::Operator;
pub use query::{Order, Query, Statement};
pub use store::EntityStore;
pub use types::{ColumnDefinition, ColumnType};
pub use value::{BoolLike, ColumnValue, SqlValue, TextLike};

// Re-export SQL utilities for advanced users
pub use sql::ddl::DdlGenerator;
pub use sql::sanitize::{quote_identifier, validate_identifier};
