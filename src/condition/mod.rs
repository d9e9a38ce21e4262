//! Conditions
//!
//! A [`Condition<T>`] filters, joins from, or preloads entity `T`. Conditions
//! are immutable once built and can be shared between queries and threads.
//!
//! Where-conditions form a tree of field comparisons, connectors (`AND`,
//! `OR`, `NOT`, MySQL `XOR`) and raw SQL. The tree itself is untyped; the
//! [`WhereCondition<T>`] wrapper keeps conditions of different entities from
//! being mixed.

mod connector;
mod join;
mod preload;

pub use connector::{and, not, or};
pub use join::{JoinApply, JoinCondition};
pub use preload::PreloadCondition;

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::entity::{DELETED_AT_FIELD, Entity};
use crate::error::{QueryError, Result};
use crate::field::{FieldIdentifier, FieldSpec};
use crate::operator::{Expression, Operator};
use crate::query::{Query, Table};
use crate::sql::keywords::Connector;
use crate::sql::placeholder;
use crate::value::SqlValue;

/// Rendered in place of a nested connector with no children
const ALWAYS_TRUE: &str = "1 = 1";

/// A condition over entity `T`
pub enum Condition<T> {
    Where(WhereCondition<T>),
    Join(Arc<dyn JoinApply<T>>),
    Preload(PreloadCondition<T>),
}

impl<T: Entity> Condition<T> {
    /// Join to a related entity, applying `conditions` to it
    pub fn join<U: Entity>(join: JoinCondition<T, U>) -> Self {
        Condition::Join(Arc::new(join))
    }

    /// Select every column of the table this condition is applied to
    pub fn preload() -> Self {
        Condition::Preload(PreloadCondition::new())
    }

    pub(crate) fn apply_to(&self, query: &mut Query<'_>, table: &Table) -> Result<()> {
        match self {
            Condition::Where(condition) => {
                if condition.affects_deleted_at() {
                    query.unscope();
                }
                if let Some((sql, params)) = condition.node.to_sql(query, table)? {
                    query.add_where(sql, params);
                }
                Ok(())
            }
            Condition::Join(join) => join.apply_to(query, table),
            Condition::Preload(_) => query.add_preload(table),
        }
    }
}

impl<T> From<WhereCondition<T>> for Condition<T> {
    fn from(condition: WhereCondition<T>) -> Self {
        Condition::Where(condition)
    }
}

impl<T> Clone for Condition<T> {
    fn clone(&self) -> Self {
        match self {
            Condition::Where(condition) => Condition::Where(condition.clone()),
            Condition::Join(join) => Condition::Join(Arc::clone(join)),
            Condition::Preload(preload) => Condition::Preload(preload.clone()),
        }
    }
}

impl<T> fmt::Debug for Condition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Where(condition) => f.debug_tuple("Where").field(condition).finish(),
            Condition::Join(join) => f.debug_tuple("Join").field(join).finish(),
            Condition::Preload(_) => f.write_str("Preload"),
        }
    }
}

/// Untyped node of a where-condition tree
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum WhereNode {
    /// Every expression applied to one field, joined with `AND`
    Field {
        field: FieldSpec,
        expressions: Vec<Expression>,
    },
    Connection {
        connector: Connector,
        children: Vec<WhereNode>,
    },
    /// `NOT (<c1> AND <c2> ...)`
    Not { children: Vec<WhereNode> },
    /// SQL with `{table}` replaced by the current alias
    Raw { sql: String, values: Vec<SqlValue> },
}

impl WhereNode {
    /// SQL for this node, or `None` when it places no restriction
    pub(crate) fn to_sql(
        &self,
        query: &Query<'_>,
        table: &Table,
    ) -> Result<Option<(String, Vec<SqlValue>)>> {
        match self {
            WhereNode::Field { field, expressions } => {
                let column = field.column_reference(query, table);
                let mut parts = Vec::with_capacity(expressions.len());
                let mut params = Vec::new();
                for expression in expressions {
                    let (sql, values) = expression.to_sql(query, &column)?;
                    parts.push(sql);
                    params.extend(values);
                }
                let sql = if parts.len() == 1 {
                    parts.remove(0)
                } else {
                    format!("({})", parts.join(" AND "))
                };
                Ok(Some((sql, params)))
            }
            WhereNode::Connection {
                connector,
                children,
            } => {
                if children.is_empty() {
                    return Ok(None);
                }
                let (parts, params) = Self::children_sql(children, query, table)?;
                if parts.len() == 1 {
                    let mut parts = parts;
                    return Ok(Some((parts.remove(0), params)));
                }
                Ok(Some((
                    format!("({})", parts.join(&connector.separator())),
                    params,
                )))
            }
            WhereNode::Not { children } => {
                let (parts, params) = Self::children_sql(children, query, table)?;
                Ok(Some((format!("NOT ({})", parts.join(" AND ")), params)))
            }
            WhereNode::Raw { sql, values } => Ok(Some((
                format!("({})", sql.replace("{table}", &table.alias)),
                values.clone(),
            ))),
        }
    }

    fn children_sql(
        children: &[WhereNode],
        query: &Query<'_>,
        table: &Table,
    ) -> Result<(Vec<String>, Vec<SqlValue>)> {
        let mut parts = Vec::with_capacity(children.len());
        let mut params = Vec::new();
        for child in children {
            match child.to_sql(query, table)? {
                Some((sql, values)) => {
                    parts.push(sql);
                    params.extend(values);
                }
                None => parts.push(ALWAYS_TRUE.to_string()),
            }
        }
        Ok((parts, params))
    }

    pub(crate) fn affects_deleted_at(&self) -> bool {
        match self {
            WhereNode::Field { field, .. } => field.field == DELETED_AT_FIELD,
            WhereNode::Connection { children, .. } | WhereNode::Not { children } => {
                children.iter().any(WhereNode::affects_deleted_at)
            }
            WhereNode::Raw { .. } => false,
        }
    }
}

/// A filter over entity `T`
pub struct WhereCondition<T> {
    pub(crate) node: WhereNode,
    _marker: PhantomData<fn() -> T>,
}

impl<T> WhereCondition<T> {
    pub(crate) fn from_node(node: WhereNode) -> Self {
        Self {
            node,
            _marker: PhantomData,
        }
    }

    pub(crate) fn connection(connector: Connector, conditions: Vec<WhereCondition<T>>) -> Self {
        Self::from_node(WhereNode::Connection {
            connector,
            children: conditions.into_iter().map(|c| c.node).collect(),
        })
    }

    /// Whether the condition filters on the soft-delete column
    pub fn affects_deleted_at(&self) -> bool {
        self.node.affects_deleted_at()
    }

    /// Render against `table`; `None` means no restriction
    pub fn to_sql(
        &self,
        query: &Query<'_>,
        table: &Table,
    ) -> Result<Option<(String, Vec<SqlValue>)>> {
        self.node.to_sql(query, table)
    }
}

impl<T> Clone for WhereCondition<T> {
    fn clone(&self) -> Self {
        Self::from_node(self.node.clone())
    }
}

impl<T> fmt::Debug for WhereCondition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.node.fmt(f)
    }
}

/// Conditions on a single field
pub struct FieldCondition;

impl FieldCondition {
    /// `field <operator>`
    pub fn new<T, V>(field: FieldIdentifier<T, V>, operator: Operator<V>) -> WhereCondition<T> {
        WhereCondition::from_node(WhereNode::Field {
            field: field.spec,
            expressions: vec![operator.expression],
        })
    }

    /// Every operator applied to `field`, joined with `AND`
    ///
    /// Fails with [`QueryError::EmptyConditions`] when `operators` is empty.
    pub fn all<T: Entity, V>(
        field: FieldIdentifier<T, V>,
        operators: Vec<Operator<V>>,
    ) -> Result<WhereCondition<T>> {
        if operators.is_empty() {
            return Err(QueryError::EmptyConditions {
                connector: "AND",
                entity: T::NAME,
            });
        }
        Ok(WhereCondition::from_node(WhereNode::Field {
            field: field.spec,
            expressions: operators.into_iter().map(|o| o.expression).collect(),
        }))
    }
}

/// SQL the typed API can't express
///
/// `{table}` is replaced by the alias of the table the condition applies to;
/// `values` bind to the `?` placeholders in order.
///
/// Fails with [`QueryError::PlaceholderMismatch`] when the number of `?`
/// outside string literals differs from the number of values.
pub fn raw<T>(sql: impl Into<String>, values: Vec<SqlValue>) -> Result<WhereCondition<T>> {
    let sql = sql.into();
    let placeholders = placeholder::count_placeholders(&sql);
    if placeholders != values.len() {
        return Err(QueryError::PlaceholderMismatch {
            placeholders,
            values: values.len(),
        });
    }
    Ok(WhereCondition::from_node(WhereNode::Raw { sql, values }))
}
