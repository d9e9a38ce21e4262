//! Query building
//!
//! A [`Query`] is created per database call. Conditions are applied to it in
//! order, each one adding joins, filters or preloaded columns, and
//! [`Query::build`] then renders one statement with its parameters.
//!
//! Every table in a query has a unique alias. The root table's alias is its
//! own name; joined tables get [`table_alias`], so the same path always
//! produces the same alias and a join seen twice is merged instead of
//! repeated.

use std::any::TypeId;
use std::collections::HashMap;

use crate::condition::Condition;
use crate::config::Dialect;
use crate::entity::{Entity, Registry};
use crate::error::{QueryError, Result};
use crate::field::FieldIdentifier;
use crate::naming::to_snake_case;
use crate::sql::placeholder;
use crate::sql::sanitize::quote_identifier;
use crate::value::SqlValue;

/// One table reference inside a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub alias: String,
    /// The root table of the query
    pub initial: bool,
    pub entity: TypeId,
    pub entity_name: &'static str,
    /// Relations followed from the root to reach this table
    pub path: Vec<&'static str>,
}

/// Alias of `target_table` joined from `source_alias` through `relation`
///
/// `<target_table>_<source_alias>` when the relation is named after the
/// target entity, `<target_table>_<relation>_<source_alias>` otherwise, so
/// two relations to the same entity (or a self join) never share an alias.
pub fn table_alias(
    target_table: &str,
    target_entity: &str,
    relation: &str,
    source_alias: &str,
) -> String {
    let relation = to_snake_case(relation);
    if relation == to_snake_case(target_entity) {
        format!("{}_{}", target_table, source_alias)
    } else {
        format!("{}_{}_{}", target_table, relation, source_alias)
    }
}

/// Alias a preloaded column is selected as
pub(crate) fn preload_column_alias(table_alias: &str, column: &str) -> String {
    format!("{}__{}", table_alias, column)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
}

impl JoinKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct JoinClause {
    pub kind: JoinKind,
    pub table: Table,
    /// `<alias>.<target key> = <source alias>.<source key>`
    pub on: String,
    pub conditions: Vec<(String, Vec<SqlValue>)>,
    pub soft_delete_filter: Option<String>,
}

impl JoinClause {
    /// Combine a second application of the same join
    fn merge(&mut self, other: JoinClause) {
        if other.kind == JoinKind::Inner {
            self.kind = JoinKind::Inner;
        }
        self.conditions.extend(other.conditions);
        if other.soft_delete_filter.is_none() {
            self.soft_delete_filter = None;
        }
    }

    fn to_sql(&self, sql: &mut String, params: &mut Vec<SqlValue>) {
        sql.push_str(&format!(
            " {} {} {} ON {}",
            self.kind.as_str(),
            self.table.name,
            self.table.alias,
            self.on
        ));
        for (condition, values) in &self.conditions {
            sql.push_str(" AND ");
            sql.push_str(condition);
            params.extend(values.iter().cloned());
        }
        if let Some(filter) = &self.soft_delete_filter {
            sql.push_str(" AND ");
            sql.push_str(filter);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    fn as_str(&self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

/// A joined table whose columns are selected for hydration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preloaded {
    pub alias: String,
    pub entity: TypeId,
    pub path: Vec<&'static str>,
}

/// A rendered statement, ready to be executed
#[derive(Debug, Clone)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<SqlValue>,
    pub preloads: Vec<Preloaded>,
}

/// Query over the root entity, built from conditions
#[derive(Debug)]
pub struct Query<'r> {
    registry: &'r Registry,
    dialect: Dialect,
    root: Table,
    root_soft_delete: Option<String>,
    selects: Vec<String>,
    preloads: Vec<Preloaded>,
    joins: Vec<JoinClause>,
    join_index: HashMap<String, usize>,
    wheres: Vec<(String, Vec<SqlValue>)>,
    unscoped: bool,
    concerned: HashMap<TypeId, Vec<Table>>,
    order: Vec<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl<'r> Query<'r> {
    /// Seed the root table of `T` and apply `conditions` in order
    pub fn new<T: Entity>(
        registry: &'r Registry,
        dialect: Dialect,
        conditions: &[Condition<T>],
    ) -> Result<Self> {
        let meta = registry.meta::<T>()?;
        let root = Table {
            name: meta.table.clone(),
            alias: meta.table.clone(),
            initial: true,
            entity: TypeId::of::<T>(),
            entity_name: T::NAME,
            path: Vec::new(),
        };

        let mut query = Self {
            registry,
            dialect,
            root_soft_delete: meta
                .deleted_at_column()
                .map(|column| format!("{}.{} IS NULL", root.alias, column)),
            selects: vec![format!("{}.*", root.alias)],
            preloads: Vec::new(),
            joins: Vec::new(),
            join_index: HashMap::new(),
            wheres: Vec::new(),
            unscoped: false,
            concerned: HashMap::new(),
            order: Vec::new(),
            limit: None,
            offset: None,
            root: root.clone(),
        };
        query.concern(&root);

        for condition in conditions {
            condition.apply_to(&mut query, &root)?;
        }

        Ok(query)
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn root(&self) -> &Table {
        &self.root
    }

    /// Table of `entity` in this query
    ///
    /// When the entity is joined more than once `join_number` picks which
    /// one, in the order the joins were applied.
    pub fn table_for(
        &self,
        entity: TypeId,
        entity_name: &'static str,
        join_number: Option<usize>,
    ) -> Result<&Table> {
        let tables = self
            .concerned
            .get(&entity)
            .ok_or(QueryError::FieldModelNotConcerned(entity_name))?;

        match join_number {
            Some(number) => tables.get(number).ok_or_else(|| {
                QueryError::validation(format!(
                    "{} is joined {} times, join {} does not exist",
                    entity_name,
                    tables.len(),
                    number
                ))
            }),
            None if tables.len() == 1 => Ok(&tables[0]),
            None => Err(QueryError::JoinMustBeSelected(entity_name)),
        }
    }

    /// Remove the root's default `deleted_at IS NULL` filter
    pub fn unscoped(mut self) -> Self {
        self.unscope();
        self
    }

    pub fn order_by<T: Entity, V>(self, field: FieldIdentifier<T, V>, order: Order) -> Result<Self> {
        self.order_by_join(field, None, order)
    }

    /// Order by a field of an entity joined more than once
    pub fn order_by_join<T: Entity, V>(
        mut self,
        field: FieldIdentifier<T, V>,
        join_number: Option<usize>,
        order: Order,
    ) -> Result<Self> {
        let table = self.table_for(TypeId::of::<T>(), T::NAME, join_number)?;
        let column = field.spec.column_reference(&self, table);
        self.order.push(format!("{} {}", column, order.as_str()));
        Ok(self)
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub(crate) fn unscope(&mut self) {
        self.unscoped = true;
    }

    pub(crate) fn add_where(&mut self, sql: String, params: Vec<SqlValue>) {
        self.wheres.push((sql, params));
    }

    /// Make `table` visible to field lookups; tables already known are skipped
    pub(crate) fn concern(&mut self, table: &Table) {
        let tables = self.concerned.entry(table.entity).or_default();
        if !tables.iter().any(|t| t.alias == table.alias) {
            tables.push(table.clone());
        }
    }

    pub(crate) fn add_join(&mut self, join: JoinClause) {
        match self.join_index.get(&join.table.alias) {
            Some(&index) => {
                tracing::trace!(alias = %join.table.alias, "reusing join");
                self.joins[index].merge(join);
            }
            None => {
                self.join_index
                    .insert(join.table.alias.clone(), self.joins.len());
                self.joins.push(join);
            }
        }
    }

    /// Select every column of `table` under its preload alias
    pub(crate) fn add_preload(&mut self, table: &Table) -> Result<()> {
        if table.initial || self.preloads.iter().any(|p| p.alias == table.alias) {
            return Ok(());
        }

        let meta = self
            .registry
            .meta_by_id(table.entity)
            .ok_or(QueryError::EntityNotRegistered(table.entity_name))?;

        for column in &meta.columns {
            let alias = preload_column_alias(&table.alias, &column.column);
            if alias.len() > self.dialect.max_identifier_len() {
                return Err(QueryError::validation(format!(
                    "preload alias '{}' is longer than the {} characters the dialect allows",
                    alias,
                    self.dialect.max_identifier_len()
                )));
            }
            self.selects.push(format!(
                "{}.{} AS {}",
                table.alias,
                column.column,
                quote_identifier(&alias)
            ));
        }

        self.preloads.push(Preloaded {
            alias: table.alias.clone(),
            entity: table.entity,
            path: table.path.clone(),
        });
        Ok(())
    }

    fn from_clause(&self, params: &mut Vec<SqlValue>) -> String {
        let mut sql = format!(" FROM {}", self.root.name);
        for join in &self.joins {
            join.to_sql(&mut sql, params);
        }

        let mut filters: Vec<&str> = Vec::new();
        if !self.unscoped {
            if let Some(filter) = &self.root_soft_delete {
                filters.push(filter);
            }
        }
        for (condition, values) in &self.wheres {
            filters.push(condition);
            params.extend(values.iter().cloned());
        }
        if !filters.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&filters.join(" AND "));
        }

        sql
    }

    fn pagination(&self, sql: &mut String, params: &mut Vec<SqlValue>) {
        if self.dialect == Dialect::SqlServer {
            if self.limit.is_none() && self.offset.is_none() {
                return;
            }
            if self.order.is_empty() {
                sql.push_str(" ORDER BY (SELECT NULL)");
            }
            sql.push_str(" OFFSET ? ROWS");
            params.push(SqlValue::Int(self.offset.unwrap_or(0)));
            if let Some(limit) = self.limit {
                sql.push_str(" FETCH NEXT ? ROWS ONLY");
                params.push(SqlValue::Int(limit));
            }
            return;
        }

        match (self.limit, self.offset) {
            (Some(limit), _) => {
                sql.push_str(" LIMIT ?");
                params.push(SqlValue::Int(limit));
            }
            // MySQL and SQLite only accept OFFSET after a LIMIT
            (None, Some(_)) if self.dialect == Dialect::MySql => {
                sql.push_str(" LIMIT 18446744073709551615");
            }
            (None, Some(_)) if self.dialect == Dialect::Sqlite => sql.push_str(" LIMIT -1"),
            (None, _) => {}
        }
        if let Some(offset) = self.offset {
            sql.push_str(" OFFSET ?");
            params.push(SqlValue::Int(offset));
        }
    }

    /// Render the select statement
    pub fn build(&self) -> Result<Statement> {
        let mut params = Vec::new();
        let mut sql = format!("SELECT {}", self.selects.join(", "));
        sql.push_str(&self.from_clause(&mut params));

        if !self.order.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order.join(", "));
        }
        self.pagination(&mut sql, &mut params);

        let (sql, params) = placeholder::render(&sql, params, self.dialect)?;
        Ok(Statement {
            sql,
            params,
            preloads: self.preloads.clone(),
        })
    }

    /// Render `SELECT COUNT(*)` over the same joins and filters
    pub fn build_count(&self) -> Result<Statement> {
        let mut params = Vec::new();
        let mut sql = String::from("SELECT COUNT(*)");
        sql.push_str(&self.from_clause(&mut params));

        let (sql, params) = placeholder::render(&sql, params, self.dialect)?;
        Ok(Statement {
            sql,
            params,
            preloads: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::FieldCondition;
    use crate::entity::IdType;
    use crate::operators::eq;
    use crate::types::{ColumnDefinition, ColumnType};

    struct Product;

    impl Entity for Product {
        const NAME: &'static str = "Product";

        fn columns() -> Vec<ColumnDefinition> {
            vec![ColumnDefinition::new("Int", ColumnType::Integer)]
        }
    }

    struct Phone;

    impl Entity for Phone {
        const NAME: &'static str = "Phone";

        fn columns() -> Vec<ColumnDefinition> {
            Vec::new()
        }

        fn id_type() -> IdType {
            IdType::Serial
        }

        fn soft_delete() -> bool {
            false
        }
    }

    const INT: FieldIdentifier<Product, i64> = FieldIdentifier::new("Int");

    fn registry() -> Registry {
        Registry::builder()
            .register::<Product>()
            .register::<Phone>()
            .build()
            .unwrap()
    }

    #[test]
    fn test_table_alias() {
        assert_eq!(
            table_alias("products", "Product", "Product", "sales"),
            "products_sales"
        );
        assert_eq!(
            table_alias("employees", "Employee", "Boss", "employees"),
            "employees_boss_employees"
        );
        assert_eq!(
            table_alias("companies", "Company", "Company", "sellers_sales"),
            "companies_sellers_sales"
        );
    }

    #[test]
    fn test_root_is_scoped_to_live_rows() {
        let registry = registry();
        let statement = Query::new::<Product>(&registry, Dialect::Postgres, &[])
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            statement.sql,
            "SELECT products.* FROM products WHERE products.deleted_at IS NULL"
        );
        assert!(statement.params.is_empty());
    }

    #[test]
    fn test_unscoped_and_no_soft_delete() {
        let registry = registry();
        let statement = Query::new::<Product>(&registry, Dialect::Postgres, &[])
            .unwrap()
            .unscoped()
            .build()
            .unwrap();
        assert_eq!(statement.sql, "SELECT products.* FROM products");

        let statement = Query::new::<Phone>(&registry, Dialect::Postgres, &[])
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(statement.sql, "SELECT phones.* FROM phones");
    }

    #[test]
    fn test_where_order_and_pagination() {
        let registry = registry();
        let conditions: Vec<Condition<Product>> =
            vec![FieldCondition::new(INT, eq(3i64).unwrap()).into()];
        let statement = Query::new::<Product>(&registry, Dialect::Postgres, &conditions)
            .unwrap()
            .order_by(INT, Order::Desc)
            .unwrap()
            .limit(10)
            .offset(20)
            .build()
            .unwrap();

        assert_eq!(
            statement.sql,
            "SELECT products.* FROM products WHERE products.deleted_at IS NULL AND products.int = $1 ORDER BY products.int DESC LIMIT $2 OFFSET $3"
        );
        assert_eq!(
            statement.params,
            vec![SqlValue::Int(3), SqlValue::Int(10), SqlValue::Int(20)]
        );
    }

    #[test]
    fn test_sqlserver_pagination() {
        let registry = registry();
        let statement = Query::new::<Phone>(&registry, Dialect::SqlServer, &[])
            .unwrap()
            .limit(5)
            .build()
            .unwrap();
        assert_eq!(
            statement.sql,
            "SELECT phones.* FROM phones ORDER BY (SELECT NULL) OFFSET @p1 ROWS FETCH NEXT @p2 ROWS ONLY"
        );
        assert_eq!(statement.params, vec![SqlValue::Int(0), SqlValue::Int(5)]);
    }

    #[test]
    fn test_offset_without_limit() {
        let registry = registry();
        let statement = Query::new::<Phone>(&registry, Dialect::Sqlite, &[])
            .unwrap()
            .offset(3)
            .build()
            .unwrap();
        assert_eq!(statement.sql, "SELECT phones.* FROM phones LIMIT -1 OFFSET ?");
    }

    #[test]
    fn test_count() {
        let registry = registry();
        let conditions: Vec<Condition<Product>> =
            vec![FieldCondition::new(INT, eq(3i64).unwrap()).into()];
        let statement = Query::new::<Product>(&registry, Dialect::Postgres, &conditions)
            .unwrap()
            .limit(1)
            .build_count()
            .unwrap();
        assert_eq!(
            statement.sql,
            "SELECT COUNT(*) FROM products WHERE products.deleted_at IS NULL AND products.int = $1"
        );
    }

    #[test]
    fn test_table_for_unconcerned_entity() {
        let registry = registry();
        let query = Query::new::<Product>(&registry, Dialect::Postgres, &[]).unwrap();
        let err = query
            .table_for(TypeId::of::<Phone>(), "Phone", None)
            .unwrap_err();
        assert!(matches!(err, QueryError::FieldModelNotConcerned("Phone")));
        assert!(query.table_for(TypeId::of::<Product>(), "Product", None).is_ok());
    }
}
