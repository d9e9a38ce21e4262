//! MySQL operators and connectors

use crate::condition::WhereCondition;
use crate::entity::Entity;
use crate::operator::{Operand, Operator};
use crate::operators::null_safe;
use crate::sql::keywords::{Connector, SqlOperator};
use crate::value::{ColumnValue, SqlValue, TextLike};

/// `<=>`, equality that treats NULL as a regular value
pub fn is_equal<V: ColumnValue>(value: V) -> Operator<V> {
    null_safe(SqlOperator::MySqlIsEqual, &value)
}

/// `col REGEXP ?`
pub fn regexp<V: TextLike>(pattern: impl Into<String>) -> Operator<V> {
    Operator::value(
        SqlOperator::MySqlRegexp,
        Operand::Value(SqlValue::Text(pattern.into())),
    )
}

/// `col IN (?, ?, ...)` with one placeholder per value written directly
pub fn array_in<V: ColumnValue>(values: impl IntoIterator<Item = V>) -> Operator<V> {
    multivalue(SqlOperator::ArrayIn, values)
}

pub fn array_not_in<V: ColumnValue>(values: impl IntoIterator<Item = V>) -> Operator<V> {
    multivalue(SqlOperator::ArrayNotIn, values)
}

fn multivalue<V: ColumnValue>(
    sql_operator: SqlOperator,
    values: impl IntoIterator<Item = V>,
) -> Operator<V> {
    Operator::multivalue(
        sql_operator,
        Connector::Comma,
        "(",
        ")",
        values
            .into_iter()
            .map(|v| Operand::Value(v.to_sql_value()))
            .collect(),
    )
}

/// Logical `XOR` of the conditions
///
/// An empty list is a no-op, like `and`/`or`.
pub fn xor<T: Entity>(conditions: Vec<WhereCondition<T>>) -> WhereCondition<T> {
    WhereCondition::connection(Connector::Xor, conditions)
}
