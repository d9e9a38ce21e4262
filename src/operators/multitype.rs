//! Operators comparing a column with a field of a related type
//!
//! [`dynamic`](super::dynamic) operators need both fields to hold the same
//! type. These accept a field holding the nullable or non-nullable form of
//! the column's type, so an `i64` column can be compared with an
//! `Option<i64>` field and the other way around.
//!
//! Unrelated types are still rejected when the condition is compiled:
//!
//! ```compile_fail
//! use condition_orm::operators::multitype;
//! use condition_orm::{FieldIdentifier, Operator};
//! # use condition_orm::{ColumnDefinition, Entity};
//! # struct Product;
//! # impl Entity for Product {
//! #     const NAME: &'static str = "Product";
//! #     fn columns() -> Vec<ColumnDefinition> { Vec::new() }
//! # }
//!
//! const STRING: FieldIdentifier<Product, String> = FieldIdentifier::new("String");
//! let operator: Operator<i64> = multitype::eq(STRING);
//! ```

use crate::entity::Entity;
use crate::field::FieldIdentifier;
use crate::operator::{Operand, Operator};
use crate::sql::keywords::{Connector, SqlOperator};
use crate::value::ColumnValue;

/// Field types a column of type `V` can be compared with: `V` itself, its
/// nullable form, or, for a nullable `V`, the type it wraps
pub trait ComparableTo<V> {}

impl<V: ColumnValue> ComparableTo<V> for V {}
impl<V: ColumnValue> ComparableTo<V> for Option<V> {}
impl<V: ColumnValue> ComparableTo<Option<V>> for V {}

fn field<U: Entity, V, W: ComparableTo<V>>(
    sql_operator: SqlOperator,
    other: FieldIdentifier<U, W>,
) -> Operator<V> {
    Operator::value(sql_operator, Operand::Field(other.erase()))
}

fn range<U1: Entity, U2: Entity, V, W1: ComparableTo<V>, W2: ComparableTo<V>>(
    sql_operator: SqlOperator,
    low: FieldIdentifier<U1, W1>,
    high: FieldIdentifier<U2, W2>,
) -> Operator<V> {
    Operator::multivalue(
        sql_operator,
        Connector::And,
        "",
        "",
        vec![Operand::Field(low.erase()), Operand::Field(high.erase())],
    )
}

pub fn eq<U: Entity, V, W: ComparableTo<V>>(other: FieldIdentifier<U, W>) -> Operator<V> {
    field(SqlOperator::Eq, other)
}

pub fn not_eq<U: Entity, V, W: ComparableTo<V>>(other: FieldIdentifier<U, W>) -> Operator<V> {
    field(SqlOperator::NotEq, other)
}

pub fn lt<U: Entity, V, W: ComparableTo<V>>(other: FieldIdentifier<U, W>) -> Operator<V> {
    field(SqlOperator::Lt, other)
}

pub fn lt_or_eq<U: Entity, V, W: ComparableTo<V>>(other: FieldIdentifier<U, W>) -> Operator<V> {
    field(SqlOperator::LtOrEq, other)
}

pub fn gt<U: Entity, V, W: ComparableTo<V>>(other: FieldIdentifier<U, W>) -> Operator<V> {
    field(SqlOperator::Gt, other)
}

pub fn gt_or_eq<U: Entity, V, W: ComparableTo<V>>(other: FieldIdentifier<U, W>) -> Operator<V> {
    field(SqlOperator::GtOrEq, other)
}

/// `col IS DISTINCT FROM <field>`, true when exactly one side is NULL
pub fn is_distinct<U: Entity, V, W: ComparableTo<V>>(other: FieldIdentifier<U, W>) -> Operator<V> {
    field(SqlOperator::IsDistinct, other)
}

pub fn is_not_distinct<U: Entity, V, W: ComparableTo<V>>(
    other: FieldIdentifier<U, W>,
) -> Operator<V> {
    field(SqlOperator::IsNotDistinct, other)
}

/// `col BETWEEN <low> AND <high>`; each bound may be nullable or not
pub fn between<U1: Entity, U2: Entity, V, W1: ComparableTo<V>, W2: ComparableTo<V>>(
    low: FieldIdentifier<U1, W1>,
    high: FieldIdentifier<U2, W2>,
) -> Operator<V> {
    range(SqlOperator::Between, low, high)
}

pub fn not_between<U1: Entity, U2: Entity, V, W1: ComparableTo<V>, W2: ComparableTo<V>>(
    low: FieldIdentifier<U1, W1>,
    high: FieldIdentifier<U2, W2>,
) -> Operator<V> {
    range(SqlOperator::NotBetween, low, high)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Dialect;
    use crate::entity::Registry;
    use crate::query::Query;
    use crate::types::{ColumnDefinition, ColumnType};

    struct Product;

    impl Entity for Product {
        const NAME: &'static str = "Product";

        fn columns() -> Vec<ColumnDefinition> {
            vec![
                ColumnDefinition::new("Int", ColumnType::Integer),
                ColumnDefinition::new("IntPointer", ColumnType::Integer),
            ]
        }
    }

    const INT: FieldIdentifier<Product, i64> = FieldIdentifier::new("Int");
    const INT_POINTER: FieldIdentifier<Product, Option<i64>> = FieldIdentifier::new("IntPointer");

    fn render<V>(operator: &Operator<V>) -> String {
        let registry = Registry::builder().register::<Product>().build().unwrap();
        let query = Query::new::<Product>(&registry, Dialect::Postgres, &[]).unwrap();
        let (sql, params) = operator.to_sql(&query, "products.int").unwrap();
        assert!(params.is_empty());
        sql
    }

    #[test]
    fn test_non_nullable_column_with_nullable_field() {
        let operator: Operator<i64> = eq(INT_POINTER);
        assert_eq!(render(&operator), "products.int = products.int_pointer");
    }

    #[test]
    fn test_nullable_column_with_non_nullable_field() {
        let operator: Operator<Option<i64>> = gt_or_eq(INT);
        assert_eq!(render(&operator), "products.int >= products.int");
    }

    #[test]
    fn test_same_type() {
        let operator: Operator<Option<i64>> = is_distinct(INT_POINTER);
        assert_eq!(
            render(&operator),
            "products.int IS DISTINCT FROM products.int_pointer"
        );
    }

    #[test]
    fn test_between_mixed_bounds() {
        let operator: Operator<i64> = between(INT, INT_POINTER);
        assert_eq!(
            render(&operator),
            "products.int BETWEEN products.int AND products.int_pointer"
        );
    }
}
