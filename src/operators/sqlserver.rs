//! SQL Server operators

use crate::error::Result;
use crate::operator::{Operand, Operator};
use crate::operators::cant_be_null;
use crate::sql::keywords::SqlOperator;
use crate::value::ColumnValue;

/// `col = ?` accepting NULL
///
/// Only matches NULL when the session runs with `ANSI_NULLS OFF`.
pub fn eq_nullable<V: ColumnValue>(value: V) -> Operator<V> {
    Operator::value(SqlOperator::Eq, Operand::Value(value.to_sql_value()))
}

/// `col <> ?` accepting NULL, see [`eq_nullable`]
pub fn not_eq_nullable<V: ColumnValue>(value: V) -> Operator<V> {
    Operator::value(SqlOperator::NotEq, Operand::Value(value.to_sql_value()))
}

/// `col !< ?`
pub fn not_lt<V: ColumnValue>(value: V) -> Result<Operator<V>> {
    cant_be_null(SqlOperator::SqlServerNotLt, &value)
}

/// `col !> ?`
pub fn not_gt<V: ColumnValue>(value: V) -> Result<Operator<V>> {
    cant_be_null(SqlOperator::SqlServerNotGt, &value)
}
