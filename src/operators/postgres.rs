//! PostgreSQL operators
//!
//! Pattern operators that take a POSIX regular expression check it when the
//! operator is built, so a malformed pattern never reaches the database.

use regex::Regex;

use crate::error::{QueryError, Result};
use crate::operator::{Operand, Operator};
use crate::sql::keywords::SqlOperator;
use crate::value::{SqlValue, TextLike};

fn pattern<V: TextLike>(sql_operator: SqlOperator, pattern: String) -> Operator<V> {
    Operator::value(sql_operator, Operand::Value(SqlValue::Text(pattern)))
}

fn posix<V: TextLike>(sql_operator: SqlOperator, value: String) -> Result<Operator<V>> {
    Regex::new(&value).map_err(|e| QueryError::InvalidPattern {
        operator: sql_operator.as_str(),
        message: e.to_string(),
    })?;
    Ok(pattern(sql_operator, value))
}

/// Case-insensitive `LIKE`
pub fn ilike<V: TextLike>(value: impl Into<String>) -> Operator<V> {
    pattern(SqlOperator::PostgresILike, value.into())
}

/// `SIMILAR TO`, the SQL-standard regular expression match
pub fn similar_to<V: TextLike>(value: impl Into<String>) -> Operator<V> {
    pattern(SqlOperator::PostgresSimilarTo, value.into())
}

/// `~`, case-sensitive POSIX regular expression match
pub fn posix_match<V: TextLike>(value: impl Into<String>) -> Result<Operator<V>> {
    posix(SqlOperator::PostgresPosixMatch, value.into())
}

/// `~*`, case-insensitive POSIX regular expression match
pub fn posix_imatch<V: TextLike>(value: impl Into<String>) -> Result<Operator<V>> {
    posix(SqlOperator::PostgresPosixIMatch, value.into())
}
