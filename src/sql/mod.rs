//! SQL utilities for the condition ORM
//!
//! Provides DDL generation, identifier sanitization, operator keywords and
//! placeholder rendering.

pub mod ddl;
pub mod keywords;
pub mod placeholder;
pub mod sanitize;

pub use ddl::DdlGenerator;
pub use keywords::{Connector, SqlOperator};
pub use sanitize::{POSTGRES_RESERVED_WORDS, quote_identifier, validate_identifier};
