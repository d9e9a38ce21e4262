//! Operators comparing a column with a value of any type
//!
//! The value type is not checked against the column's type, so the database
//! decides whether the comparison is valid: on PostgreSQL a float against a
//! `BIGINT` column is compared as float, a UUID against it fails when the
//! statement executes.

use crate::error::{QueryError, Result};
use crate::operator::{Operand, Operator};
use crate::sql::keywords::{Connector, SqlOperator};
use crate::value::{ColumnValue, SqlValue};

use super::list;

fn compare<V, A: ColumnValue>(sql_operator: SqlOperator, value: A) -> Result<Operator<V>> {
    match value.to_sql_value() {
        SqlValue::Null => Err(QueryError::ValueCantBeNull {
            operator: sql_operator.as_str(),
        }),
        value => Ok(Operator::value(sql_operator, Operand::Value(value))),
    }
}

fn null_safe<V, A: ColumnValue>(sql_operator: SqlOperator, value: A) -> Operator<V> {
    match value.to_sql_value() {
        SqlValue::Null => Operator::predicate(format!("{} NULL", sql_operator)),
        value => Operator::value(sql_operator, Operand::Value(value)),
    }
}

fn range<V, A: ColumnValue, B: ColumnValue>(
    sql_operator: SqlOperator,
    low: A,
    high: B,
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

pub fn eq<V, A: ColumnValue>(value: A) -> Result<Operator<V>> {
    compare(SqlOperator::Eq, value)
}

pub fn not_eq<V, A: ColumnValue>(value: A) -> Result<Operator<V>> {
    compare(SqlOperator::NotEq, value)
}

pub fn lt<V, A: ColumnValue>(value: A) -> Result<Operator<V>> {
    compare(SqlOperator::Lt, value)
}

pub fn lt_or_eq<V, A: ColumnValue>(value: A) -> Result<Operator<V>> {
    compare(SqlOperator::LtOrEq, value)
}

pub fn gt<V, A: ColumnValue>(value: A) -> Result<Operator<V>> {
    compare(SqlOperator::Gt, value)
}

pub fn gt_or_eq<V, A: ColumnValue>(value: A) -> Result<Operator<V>> {
    compare(SqlOperator::GtOrEq, value)
}

pub fn is_distinct<V, A: ColumnValue>(value: A) -> Operator<V> {
    null_safe(SqlOperator::IsDistinct, value)
}

pub fn is_not_distinct<V, A: ColumnValue>(value: A) -> Operator<V> {
    null_safe(SqlOperator::IsNotDistinct, value)
}

pub fn between<V, A: ColumnValue, B: ColumnValue>(low: A, high: B) -> Operator<V> {
    range(SqlOperator::Between, low, high)
}

pub fn not_between<V, A: ColumnValue, B: ColumnValue>(low: A, high: B) -> Operator<V> {
    range(SqlOperator::NotBetween, low, high)
}

pub fn array_in<V, A: ColumnValue>(values: impl IntoIterator<Item = A>) -> Operator<V> {
    Operator::value(SqlOperator::ArrayIn, Operand::Value(list(values)))
}

pub fn array_not_in<V, A: ColumnValue>(values: impl IntoIterator<Item = A>) -> Operator<V> {
    Operator::value(SqlOperator::ArrayNotIn, Operand::Value(list(values)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Dialect;
    use crate::entity::{Entity, Registry};
    use crate::query::Query;
    use crate::types::ColumnDefinition;

    struct Product;

    impl Entity for Product {
        const NAME: &'static str = "Product";

        fn columns() -> Vec<ColumnDefinition> {
            Vec::new()
        }
    }

    fn render<V>(operator: &Operator<V>) -> (String, Vec<SqlValue>) {
        let registry = Registry::builder().register::<Product>().build().unwrap();
        let query = Query::new::<Product>(&registry, Dialect::Postgres, &[]).unwrap();
        operator.to_sql(&query, "products.int").unwrap()
    }

    #[test]
    fn test_value_of_another_type() {
        let operator: Operator<i64> = eq("1").unwrap();
        let (sql, params) = render(&operator);
        assert_eq!(sql, "products.int = ?");
        assert_eq!(params, vec![SqlValue::Text("1".to_string())]);
    }

    #[test]
    fn test_null_is_rejected() {
        let err = lt::<i64, _>(None::<String>).unwrap_err();
        assert!(matches!(err, QueryError::ValueCantBeNull { operator: "<" }));

        let (sql, params) = render(&is_not_distinct::<i64, _>(None::<String>));
        assert_eq!(sql, "products.int IS NOT DISTINCT FROM NULL");
        assert!(params.is_empty());
    }

    #[test]
    fn test_between_mixed_types() {
        let (sql, params) = render(&between::<i64, _, _>("1", 5.5f64));
        assert_eq!(sql, "products.int BETWEEN ? AND ?");
        assert_eq!(
            params,
            vec![SqlValue::Text("1".to_string()), SqlValue::Float(5.5)]
        );
    }

    #[test]
    fn test_array_in_other_type() {
        let (sql, params) = render(&array_in::<i64, _>(["1", "2"]));
        assert_eq!(sql, "products.int IN (?)");
        assert_eq!(
            params,
            vec![SqlValue::List(vec![
                SqlValue::Text("1".to_string()),
                SqlValue::Text("2".to_string())
            ])]
        );
    }
}
