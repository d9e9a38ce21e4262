//! Logical connectors
//!
//! `and`/`or` with no children place no restriction: at the top level they
//! add no `WHERE`, nested they render as `1 = 1`. `not` with no children is
//! rejected instead, since negating nothing has no meaningful SQL.

use crate::entity::Entity;
use crate::error::{QueryError, Result};
use crate::sql::keywords::Connector;

use super::{WhereCondition, WhereNode};

/// `(<c1> AND <c2> ...)`
pub fn and<T: Entity>(conditions: Vec<WhereCondition<T>>) -> WhereCondition<T> {
    WhereCondition::connection(Connector::And, conditions)
}

/// `(<c1> OR <c2> ...)`
pub fn or<T: Entity>(conditions: Vec<WhereCondition<T>>) -> WhereCondition<T> {
    WhereCondition::connection(Connector::Or, conditions)
}

/// `NOT (<c1> AND <c2> ...)`
pub fn not<T: Entity>(conditions: Vec<WhereCondition<T>>) -> Result<WhereCondition<T>> {
    if conditions.is_empty() {
        return Err(QueryError::EmptyConditions {
            connector: Connector::Not.as_str(),
            entity: T::NAME,
        });
    }

    Ok(WhereCondition::from_node(WhereNode::Not {
        children: conditions.into_iter().map(|c| c.node).collect(),
    }))
}
