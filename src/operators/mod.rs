//! Operators shared by every dialect
//!
//! Dialect-specific sets live in [`postgres`], [`mysql`], [`sqlite`] and
//! [`sqlserver`]; [`dynamic`] compares against other fields instead of values,
//! [`multitype`] against fields of the nullable or non-nullable form of the
//! column's type. [`unchecked`] takes values of any type.
//!
//! Comparison operators refuse NULL: `col = NULL` never matches, so callers
//! must pick [`is_null`] or [`eq_or_is_null`] explicitly.

pub mod dynamic;
pub mod multitype;
pub mod mysql;
pub mod postgres;
pub mod sqlite;
pub mod sqlserver;
pub mod unchecked;

use std::any::Any;

use crate::error::{QueryError, Result};
use crate::operator::{Operand, Operator};
use crate::sql::keywords::{Connector, SqlOperator};
use crate::value::{BoolLike, ColumnValue, SqlValue, TextLike};

pub(crate) fn cant_be_null<V: ColumnValue>(
    sql_operator: SqlOperator,
    value: &V,
) -> Result<Operator<V>> {
    let value = value.to_sql_value();
    if value.is_null() {
        return Err(QueryError::ValueCantBeNull {
            operator: sql_operator.as_str(),
        });
    }
    Ok(Operator::value(sql_operator, Operand::Value(value)))
}

/// Operator whose NULL comparison is well defined; NULL is written inline
pub(crate) fn null_safe<V: ColumnValue>(sql_operator: SqlOperator, value: &V) -> Operator<V> {
    match value.to_sql_value() {
        SqlValue::Null => Operator::predicate(format!("{} NULL", sql_operator)),
        value => Operator::value(sql_operator, Operand::Value(value)),
    }
}

pub(crate) fn between_values<V: ColumnValue>(
    sql_operator: SqlOperator,
    low: &V,
    high: &V,
) -> Operator<V> {
    Operator::multivalue(
        sql_operator,
        Connector::And,
        "",
        "",
        vec![
            Operand::Value(low.to_sql_value()),
            Operand::Value(high.to_sql_value()),
        ],
    )
}

pub(crate) fn list<V: ColumnValue>(values: impl IntoIterator<Item = V>) -> SqlValue {
    SqlValue::List(values.into_iter().map(|v| v.to_sql_value()).collect())
}

// Comparison operators

/// `col = ?`
pub fn eq<V: ColumnValue>(value: V) -> Result<Operator<V>> {
    cant_be_null(SqlOperator::Eq, &value)
}

/// `col <> ?`
pub fn not_eq<V: ColumnValue>(value: V) -> Result<Operator<V>> {
    cant_be_null(SqlOperator::NotEq, &value)
}

pub fn lt<V: ColumnValue>(value: V) -> Result<Operator<V>> {
    cant_be_null(SqlOperator::Lt, &value)
}

pub fn lt_or_eq<V: ColumnValue>(value: V) -> Result<Operator<V>> {
    cant_be_null(SqlOperator::LtOrEq, &value)
}

pub fn gt<V: ColumnValue>(value: V) -> Result<Operator<V>> {
    cant_be_null(SqlOperator::Gt, &value)
}

pub fn gt_or_eq<V: ColumnValue>(value: V) -> Result<Operator<V>> {
    cant_be_null(SqlOperator::GtOrEq, &value)
}

/// `col = ?`, or `col IS NULL` when the value is absent
///
/// `value` may be a `V` or an `Option<V>`. Any other type fails with
/// [`QueryError::NotRelated`].
pub fn eq_or_is_null<V: ColumnValue, A: Any>(value: A) -> Result<Operator<V>> {
    or_null_check::<V, A>(value, SqlOperator::Eq, "IS NULL", "eq_or_is_null")
}

/// `col <> ?`, or `col IS NOT NULL` when the value is absent
pub fn not_eq_or_is_not_null<V: ColumnValue, A: Any>(value: A) -> Result<Operator<V>> {
    or_null_check::<V, A>(value, SqlOperator::NotEq, "IS NOT NULL", "not_eq_or_is_not_null")
}

fn or_null_check<V: ColumnValue, A: Any>(
    value: A,
    sql_operator: SqlOperator,
    null_predicate: &'static str,
    name: &'static str,
) -> Result<Operator<V>> {
    let any: &dyn Any = &value;

    let sql_value = if let Some(value) = any.downcast_ref::<V>() {
        value.to_sql_value()
    } else if let Some(value) = any.downcast_ref::<Option<V>>() {
        value.to_sql_value()
    } else {
        return Err(QueryError::not_related::<V, A>(name));
    };

    if sql_value.is_null() {
        Ok(Operator::predicate(null_predicate))
    } else {
        Ok(Operator::value(sql_operator, Operand::Value(sql_value)))
    }
}

// Comparison predicates

/// `col BETWEEN ? AND ?`
pub fn between<V: ColumnValue>(low: V, high: V) -> Operator<V> {
    between_values(SqlOperator::Between, &low, &high)
}

/// `col NOT BETWEEN ? AND ?`
pub fn not_between<V: ColumnValue>(low: V, high: V) -> Operator<V> {
    between_values(SqlOperator::NotBetween, &low, &high)
}

pub fn is_null<V: ColumnValue>() -> Operator<V> {
    Operator::predicate("IS NULL")
}

pub fn is_not_null<V: ColumnValue>() -> Operator<V> {
    Operator::predicate("IS NOT NULL")
}

pub fn is_true<V: BoolLike>() -> Operator<V> {
    Operator::predicate("IS TRUE")
}

pub fn is_false<V: BoolLike>() -> Operator<V> {
    Operator::predicate("IS FALSE")
}

/// Matches false and NULL
pub fn is_not_true<V: BoolLike>() -> Operator<V> {
    Operator::predicate("IS NOT TRUE")
}

/// Matches true and NULL
pub fn is_not_false<V: BoolLike>() -> Operator<V> {
    Operator::predicate("IS NOT FALSE")
}

pub fn is_unknown<V: BoolLike>() -> Operator<V> {
    Operator::predicate("IS UNKNOWN")
}

pub fn is_not_unknown<V: BoolLike>() -> Operator<V> {
    Operator::predicate("IS NOT UNKNOWN")
}

/// `col IS DISTINCT FROM ?`; NULL is a regular value here
///
/// Not supported by MySQL, use [`mysql::is_equal`] there.
pub fn is_distinct<V: ColumnValue>(value: V) -> Operator<V> {
    null_safe(SqlOperator::IsDistinct, &value)
}

pub fn is_not_distinct<V: ColumnValue>(value: V) -> Operator<V> {
    null_safe(SqlOperator::IsNotDistinct, &value)
}

// Pattern matching

/// `col LIKE ?`; chain [`Operator::escape`] to set an escape character
pub fn like<V: TextLike>(pattern: impl Into<String>) -> Operator<V> {
    Operator::value(
        SqlOperator::Like,
        Operand::Value(SqlValue::Text(pattern.into())),
    )
}

// Row and array comparisons

/// `col IN (?)`, with the list expanded into one placeholder per value
pub fn array_in<V: ColumnValue>(values: impl IntoIterator<Item = V>) -> Operator<V> {
    Operator::value(SqlOperator::ArrayIn, Operand::Value(list(values)))
}

pub fn array_not_in<V: ColumnValue>(values: impl IntoIterator<Item = V>) -> Operator<V> {
    Operator::value(SqlOperator::ArrayNotIn, Operand::Value(list(values)))
}
