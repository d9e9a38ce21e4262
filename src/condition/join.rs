use std::any::TypeId;
use std::fmt;
use std::marker::PhantomData;

use crate::entity::{Entity, ID_FIELD};
use crate::error::{QueryError, Result};
use crate::query::{JoinClause, JoinKind, Query, Table, table_alias};
use crate::sql::keywords::Connector;

use super::{Condition, WhereNode};

/// A join applied from a table of entity `T`
pub trait JoinApply<T>: Send + Sync + fmt::Debug {
    /// Join from `table`, then apply the nested conditions to the joined table
    fn apply_to(&self, query: &mut Query<'_>, table: &Table) -> Result<()>;

    /// Whether the joined entity, or anything joined from it, is preloaded
    fn has_preload(&self) -> bool;
}

/// Join from `T1` to `T2` through `relation`
///
/// The join is `<T2>.<target_field> = <T1>.<source_field>`, so either side
/// may hold the foreign key:
///
/// - belongs-to: `JoinCondition::new("Product", "ProductID", "ID", ..)` on `Sale`
/// - has-one / has-many: `JoinCondition::new("Sales", "ID", "ProductID", ..)` on `Product`
/// - self-referential: `JoinCondition::new("Boss", "BossID", "ID", ..)` on `Employee`
///
/// Only joins whose target is matched by its id can be preloaded. When the
/// target holds the foreign key the relation is a collection, one row of
/// `T1` per joined row, and a preload under it fails with
/// [`QueryError::CollectionPreload`].
pub struct JoinCondition<T1, T2> {
    relation: &'static str,
    source_field: &'static str,
    target_field: &'static str,
    conditions: Vec<Condition<T2>>,
    _marker: PhantomData<fn() -> T1>,
}

impl<T1: Entity, T2: Entity> JoinCondition<T1, T2> {
    pub fn new(
        relation: &'static str,
        source_field: &'static str,
        target_field: &'static str,
        conditions: Vec<Condition<T2>>,
    ) -> Self {
        Self {
            relation,
            source_field,
            target_field,
            conditions,
            _marker: PhantomData,
        }
    }

    pub fn relation(&self) -> &'static str {
        self.relation
    }
}

impl<T1: Entity, T2: Entity> JoinApply<T1> for JoinCondition<T1, T2> {
    fn apply_to(&self, query: &mut Query<'_>, table: &Table) -> Result<()> {
        let registry = query.registry();
        let source = registry
            .meta_by_id(table.entity)
            .ok_or(QueryError::EntityNotRegistered(T1::NAME))?;
        let target = registry.meta::<T2>()?;

        let source_column = source
            .column_for(self.source_field)
            .ok_or(QueryError::UnknownRelation {
                entity: T1::NAME,
                field: self.source_field,
            })?;
        let target_column = target
            .column_for(self.target_field)
            .ok_or(QueryError::UnknownRelation {
                entity: T2::NAME,
                field: self.target_field,
            })?;

        let alias = table_alias(&target.table, T2::NAME, self.relation, &table.alias);
        if alias.len() > query.dialect().max_identifier_len() {
            return Err(QueryError::validation(format!(
                "alias '{}' is longer than the {} characters the dialect allows",
                alias,
                query.dialect().max_identifier_len()
            )));
        }

        let mut path = table.path.clone();
        path.push(self.relation);
        let joined = Table {
            name: target.table.clone(),
            alias,
            initial: false,
            entity: TypeId::of::<T2>(),
            entity_name: T2::NAME,
            path,
        };

        let mut wheres = Vec::new();
        let mut joins = Vec::new();
        let mut preload = false;
        for condition in &self.conditions {
            match condition {
                Condition::Where(condition) => wheres.push(condition.node.clone()),
                Condition::Join(join) => {
                    preload |= join.has_preload();
                    joins.push(join);
                }
                Condition::Preload(_) => preload = true,
            }
        }

        if preload && self.target_field != ID_FIELD {
            return Err(QueryError::CollectionPreload {
                entity: T1::NAME,
                relation: self.relation,
            });
        }

        let kind = if wheres.is_empty() && preload {
            JoinKind::Left
        } else {
            JoinKind::Inner
        };

        let on = WhereNode::Connection {
            connector: Connector::And,
            children: wheres,
        };

        query.concern(&joined);
        let conditions = on.to_sql(query, &joined)?;

        let soft_delete_filter = if on.affects_deleted_at() {
            None
        } else {
            target
                .deleted_at_column()
                .map(|column| format!("{}.{} IS NULL", joined.alias, column))
        };

        query.add_join(JoinClause {
            kind,
            on: format!(
                "{}.{} = {}.{}",
                joined.alias, target_column.column, table.alias, source_column.column
            ),
            conditions: conditions.into_iter().collect(),
            soft_delete_filter,
            table: joined.clone(),
        });

        if preload {
            query.add_preload(&joined)?;
        }

        for join in joins {
            join.apply_to(query, &joined)?;
        }

        Ok(())
    }

    fn has_preload(&self) -> bool {
        self.conditions.iter().any(|condition| match condition {
            Condition::Preload(_) => true,
            Condition::Join(join) => join.has_preload(),
            Condition::Where(_) => false,
        })
    }
}

impl<T1, T2> fmt::Debug for JoinCondition<T1, T2> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoinCondition")
            .field("relation", &self.relation)
            .field("source_field", &self.source_field)
            .field("target_field", &self.target_field)
            .field("conditions", &self.conditions)
            .finish()
    }
}
