//! Error types for query building and entity store operations

use thiserror::Error;

/// Errors that can occur while building or executing a query
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("value to be compared can't be null; operator: {operator}")]
    ValueCantBeNull { operator: &'static str },

    #[error("value type not related with T; operator: {operator}, type: {value_type}, T: {expected}")]
    NotRelated {
        operator: &'static str,
        value_type: &'static str,
        expected: &'static str,
    },

    #[error("condition must have at least one inner condition; connector: {connector}; model: {entity}")]
    EmptyConditions {
        connector: &'static str,
        entity: &'static str,
    },

    #[error("invalid pattern for operator {operator}: {message}")]
    InvalidPattern {
        operator: &'static str,
        message: String,
    },

    #[error("field's model is not concerned by the query (not joined); model: {0}")]
    FieldModelNotConcerned(&'static str),

    #[error("field's model is joined more than once, select which one you want to use with select_join; model: {0}")]
    JoinMustBeSelected(&'static str),

    #[error("entity not registered: {0}")]
    EntityNotRegistered(&'static str),

    #[error("{entity} has no field named {field} to join through")]
    UnknownRelation {
        entity: &'static str,
        field: &'static str,
    },

    #[error("{entity}.{relation} is a collection and can't be preloaded through a join")]
    CollectionPreload {
        entity: &'static str,
        relation: &'static str,
    },

    #[error("sql has {placeholders} placeholders but {values} values were given")]
    PlaceholderMismatch { placeholders: usize, values: usize },

    #[error("no object exists that meets the requested conditions: {0}")]
    ObjectNotFound(String),

    #[error("found more than one object that meets the requested conditions: {0}")]
    MoreThanOneObjectFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl QueryError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn object_not_found(msg: impl Into<String>) -> Self {
        Self::ObjectNotFound(msg.into())
    }

    pub fn more_than_one(msg: impl Into<String>) -> Self {
        Self::MoreThanOneObjectFound(msg.into())
    }

    pub(crate) fn not_related<V, A>(operator: &'static str) -> Self {
        Self::NotRelated {
            operator,
            value_type: std::any::type_name::<A>(),
            expected: std::any::type_name::<V>(),
        }
    }
}

pub type Result<T> = std::result::Result<T, QueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_cant_be_null_message() {
        let err = QueryError::ValueCantBeNull { operator: "=" };
        assert_eq!(
            err.to_string(),
            "value to be compared can't be null; operator: ="
        );
    }

    #[test]
    fn test_not_related_names_both_types() {
        let err = QueryError::not_related::<i64, String>("eq_or_is_null");
        let message = err.to_string();
        assert!(message.contains("i64"));
        assert!(message.contains("String"));
        assert!(message.contains("eq_or_is_null"));
    }
}
