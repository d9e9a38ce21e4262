//! Operators comparing a column against another field
//!
//! The other field may belong to any entity present in the query. When that
//! entity is joined more than once, pick the join with
//! [`Operator::select_join`].

use crate::entity::Entity;
use crate::field::FieldIdentifier;
use crate::operator::{Operand, Operator};
use crate::sql::keywords::{Connector, SqlOperator};

fn field<U: Entity, V>(sql_operator: SqlOperator, other: FieldIdentifier<U, V>) -> Operator<V> {
    Operator::value(sql_operator, Operand::Field(other.erase()))
}

pub fn eq<U: Entity, V>(other: FieldIdentifier<U, V>) -> Operator<V> {
    field(SqlOperator::Eq, other)
}

pub fn not_eq<U: Entity, V>(other: FieldIdentifier<U, V>) -> Operator<V> {
    field(SqlOperator::NotEq, other)
}

pub fn lt<U: Entity, V>(other: FieldIdentifier<U, V>) -> Operator<V> {
    field(SqlOperator::Lt, other)
}

pub fn lt_or_eq<U: Entity, V>(other: FieldIdentifier<U, V>) -> Operator<V> {
    field(SqlOperator::LtOrEq, other)
}

pub fn gt<U: Entity, V>(other: FieldIdentifier<U, V>) -> Operator<V> {
    field(SqlOperator::Gt, other)
}

pub fn gt_or_eq<U: Entity, V>(other: FieldIdentifier<U, V>) -> Operator<V> {
    field(SqlOperator::GtOrEq, other)
}

pub fn is_distinct<U: Entity, V>(other: FieldIdentifier<U, V>) -> Operator<V> {
    field(SqlOperator::IsDistinct, other)
}

pub fn is_not_distinct<U: Entity, V>(other: FieldIdentifier<U, V>) -> Operator<V> {
    field(SqlOperator::IsNotDistinct, other)
}

/// `col BETWEEN <low> AND <high>`, both bounds being fields
pub fn between<U1: Entity, U2: Entity, V>(
    low: FieldIdentifier<U1, V>,
    high: FieldIdentifier<U2, V>,
) -> Operator<V> {
    Operator::multivalue(
        SqlOperator::Between,
        Connector::And,
        "",
        "",
        vec![Operand::Field(low.erase()), Operand::Field(high.erase())],
    )
}

pub fn not_between<U1: Entity, U2: Entity, V>(
    low: FieldIdentifier<U1, V>,
    high: FieldIdentifier<U2, V>,
) -> Operator<V> {
    Operator::multivalue(
        SqlOperator::NotBetween,
        Connector::And,
        "",
        "",
        vec![Operand::Field(low.erase()), Operand::Field(high.erase())],
    )
}

/// MySQL `<=>` against another field
pub fn mysql_is_equal<U: Entity, V>(other: FieldIdentifier<U, V>) -> Operator<V> {
    field(SqlOperator::MySqlIsEqual, other)
}

/// SQL Server `!<` against another field
pub fn sqlserver_not_lt<U: Entity, V>(other: FieldIdentifier<U, V>) -> Operator<V> {
    field(SqlOperator::SqlServerNotLt, other)
}

/// SQL Server `!>` against another field
pub fn sqlserver_not_gt<U: Entity, V>(other: FieldIdentifier<U, V>) -> Operator<V> {
    field(SqlOperator::SqlServerNotGt, other)
}
