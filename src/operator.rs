//! Operators
//!
//! An [`Operator<V>`] is the right-hand side of a field condition: a
//! comparison against values of type `V`, another field, or a fixed
//! predicate such as `IS NULL`. Operators render to an SQL fragment with `?`
//! placeholders plus the values bound to them, in order.

use std::fmt;
use std::marker::PhantomData;

use crate::error::Result;
use crate::field::FieldRef;
use crate::query::Query;
use crate::sql::keywords::{Connector, SqlOperator};
use crate::value::{SqlValue, TextLike};

/// Right-hand side of one operation
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Value(SqlValue),
    /// Column of a table joined elsewhere in the query
    Field(FieldRef),
}

impl Operand {
    fn to_sql(
        &self,
        query: &Query<'_>,
        join_number: Option<usize>,
    ) -> Result<(String, Vec<SqlValue>)> {
        match self {
            Operand::Value(SqlValue::List(values)) => {
                Ok(("(?)".to_string(), vec![SqlValue::List(values.clone())]))
            }
            Operand::Value(value) => Ok(("?".to_string(), vec![value.clone()])),
            Operand::Field(field) => {
                let table = query.table_for(field.entity, field.entity_name, join_number)?;
                Ok((field.spec.column_reference(query, table), Vec::new()))
            }
        }
    }
}

/// `<keyword> <operand>`, e.g. `= ?` or `ESCAPE ?`
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub sql_operator: SqlOperator,
    pub operand: Operand,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ExpressionKind {
    /// `<col> <op1> <operand1> <op2> <operand2> ...`
    Value(Vec<Operation>),
    /// `<col> <op> <prefix><v1><connector><v2>...<suffix>`
    Multivalue {
        sql_operator: SqlOperator,
        connector: Connector,
        prefix: &'static str,
        suffix: &'static str,
        values: Vec<Operand>,
    },
    /// `<col> <predicate>`, no operand
    Predicate(String),
}

/// Untyped operator, as stored in the condition tree
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub(crate) kind: ExpressionKind,
    /// Which join of a field operand's entity to compare against
    pub(crate) join_number: Option<usize>,
}

impl Expression {
    pub(crate) fn to_sql(
        &self,
        query: &Query<'_>,
        column: &str,
    ) -> Result<(String, Vec<SqlValue>)> {
        match &self.kind {
            ExpressionKind::Value(operations) => {
                let mut sql = column.to_string();
                let mut params = Vec::new();
                for operation in operations {
                    let (operand, values) = operation.operand.to_sql(query, self.join_number)?;
                    sql.push(' ');
                    sql.push_str(operation.sql_operator.as_str());
                    sql.push(' ');
                    sql.push_str(&operand);
                    params.extend(values);
                }
                Ok((sql, params))
            }
            ExpressionKind::Multivalue {
                sql_operator,
                connector,
                prefix,
                suffix,
                values,
            } => {
                let mut parts = Vec::with_capacity(values.len());
                let mut params = Vec::new();
                for value in values {
                    let (operand, bound) = value.to_sql(query, self.join_number)?;
                    parts.push(operand);
                    params.extend(bound);
                }
                Ok((
                    format!(
                        "{} {} {}{}{}",
                        column,
                        sql_operator,
                        prefix,
                        parts.join(&connector.separator()),
                        suffix
                    ),
                    params,
                ))
            }
            ExpressionKind::Predicate(predicate) => Ok((format!("{} {}", column, predicate), Vec::new())),
        }
    }
}

/// A comparison against values of type `V`
pub struct Operator<V> {
    pub(crate) expression: Expression,
    _marker: PhantomData<fn() -> V>,
}

impl<V> Operator<V> {
    pub(crate) fn from_kind(kind: ExpressionKind) -> Self {
        Self {
            expression: Expression {
                kind,
                join_number: None,
            },
            _marker: PhantomData,
        }
    }

    pub(crate) fn value(sql_operator: SqlOperator, operand: Operand) -> Self {
        Self::from_kind(ExpressionKind::Value(vec![Operation {
            sql_operator,
            operand,
        }]))
    }

    pub(crate) fn multivalue(
        sql_operator: SqlOperator,
        connector: Connector,
        prefix: &'static str,
        suffix: &'static str,
        values: Vec<Operand>,
    ) -> Self {
        Self::from_kind(ExpressionKind::Multivalue {
            sql_operator,
            connector,
            prefix,
            suffix,
            values,
        })
    }

    pub(crate) fn predicate(predicate: impl Into<String>) -> Self {
        Self::from_kind(ExpressionKind::Predicate(predicate.into()))
    }

    /// Compare field operands against the `join_number`-th join of their entity
    ///
    /// Needed when that entity is joined more than once in the query.
    pub fn select_join(mut self, join_number: usize) -> Self {
        self.expression.join_number = Some(join_number);
        self
    }

    /// Render against `column` (already qualified with its table alias)
    pub fn to_sql(&self, query: &Query<'_>, column: &str) -> Result<(String, Vec<SqlValue>)> {
        self.expression.to_sql(query, column)
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }
}

impl<V: TextLike> Operator<V> {
    /// Add `ESCAPE '<c>'` to a pattern operator
    pub fn escape(mut self, escape: char) -> Self {
        if let ExpressionKind::Value(operations) = &mut self.expression.kind {
            operations.push(Operation {
                sql_operator: SqlOperator::Escape,
                operand: Operand::Value(SqlValue::Text(escape.to_string())),
            });
        }
        self
    }
}

impl<V> Clone for Operator<V> {
    fn clone(&self) -> Self {
        Self {
            expression: self.expression.clone(),
            _marker: PhantomData,
        }
    }
}

impl<V> fmt::Debug for Operator<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Operator").field(&self.expression).finish()
    }
}
