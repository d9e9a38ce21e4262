//! Values bound to generated statements
//!
//! Operators keep their operands as [`SqlValue`], a closed set of the types
//! the store knows how to bind. [`ColumnValue`] maps typed Rust values into
//! it, so `Option::None` and `serde_json::Value::Null` both become SQL NULL.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::postgres::PgArguments;
use uuid::Uuid;

/// A parameter value in a generated statement
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    Text(String),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
    Json(serde_json::Value),
    /// Expanded into one placeholder per element when the statement is rendered
    List(Vec<SqlValue>),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }
}

/// A Rust value that can be compared against a column
pub trait ColumnValue: Clone + Send + Sync + 'static {
    fn to_sql_value(&self) -> SqlValue;
}

/// Values `IS TRUE`/`IS FALSE`/`IS UNKNOWN` apply to
pub trait BoolLike: ColumnValue {}

/// Values pattern operators (`LIKE`, `ILIKE`, `GLOB`, ...) apply to
pub trait TextLike: ColumnValue {}

impl BoolLike for bool {}
impl BoolLike for Option<bool> {}
impl TextLike for String {}
impl TextLike for &'static str {}
impl TextLike for Option<String> {}

impl ColumnValue for bool {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Bool(*self)
    }
}

macro_rules! int_column_value {
    ($($t:ty),*) => {
        $(
            impl ColumnValue for $t {
                fn to_sql_value(&self) -> SqlValue {
                    SqlValue::Int(i64::from(*self))
                }
            }
        )*
    };
}

int_column_value!(i16, i32, i64, u32);

impl ColumnValue for f32 {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Float(f64::from(*self))
    }
}

impl ColumnValue for f64 {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Float(*self)
    }
}

impl ColumnValue for String {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Text(self.clone())
    }
}

impl ColumnValue for &'static str {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Text((*self).to_string())
    }
}

impl ColumnValue for Uuid {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Uuid(*self)
    }
}

impl ColumnValue for DateTime<Utc> {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Timestamp(*self)
    }
}

impl ColumnValue for Decimal {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Decimal(*self)
    }
}

impl ColumnValue for serde_json::Value {
    fn to_sql_value(&self) -> SqlValue {
        match self {
            serde_json::Value::Null => SqlValue::Null,
            other => SqlValue::Json(other.clone()),
        }
    }
}

impl<T: ColumnValue> ColumnValue for Option<T> {
    fn to_sql_value(&self) -> SqlValue {
        match self {
            Some(value) => value.to_sql_value(),
            None => SqlValue::Null,
        }
    }
}

pub(crate) type PgQuery<'q> = sqlx::query::Query<'q, sqlx::Postgres, PgArguments>;

/// Bind one parameter to a PostgreSQL query
///
/// Lists are flattened and nulls written inline by the placeholder stage
/// before binding. A nested list still reaching this point is sent as a JSON
/// array.
pub(crate) fn bind_value<'q>(query: PgQuery<'q>, value: &SqlValue) -> PgQuery<'q> {
    match value {
        SqlValue::Null => query.bind(None::<String>),
        SqlValue::Bool(v) => query.bind(*v),
        SqlValue::Int(v) => query.bind(*v),
        SqlValue::Float(v) => query.bind(*v),
        SqlValue::Decimal(v) => query.bind(*v),
        SqlValue::Text(v) => query.bind(v.clone()),
        SqlValue::Uuid(v) => query.bind(*v),
        SqlValue::Timestamp(v) => query.bind(*v),
        SqlValue::Json(v) => query.bind(v.clone()),
        SqlValue::List(values) => query.bind(serde_json::to_value(values).unwrap_or_default()),
    }
}
