//! SQL operator and connector keywords

use std::fmt;

/// Comparison operators emitted between a column and its operand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlOperator {
    Eq,
    NotEq,
    Lt,
    LtOrEq,
    Gt,
    GtOrEq,
    Between,
    NotBetween,
    IsDistinct,
    IsNotDistinct,
    Like,
    Escape,
    ArrayIn,
    ArrayNotIn,
    MySqlIsEqual,
    MySqlRegexp,
    PostgresILike,
    PostgresSimilarTo,
    PostgresPosixMatch,
    PostgresPosixIMatch,
    SqliteGlob,
    SqlServerNotLt,
    SqlServerNotGt,
}

impl SqlOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            SqlOperator::Eq => "=",
            SqlOperator::NotEq => "<>",
            SqlOperator::Lt => "<",
            SqlOperator::LtOrEq => "<=",
            SqlOperator::Gt => ">",
            SqlOperator::GtOrEq => ">=",
            SqlOperator::Between => "BETWEEN",
            SqlOperator::NotBetween => "NOT BETWEEN",
            SqlOperator::IsDistinct => "IS DISTINCT FROM",
            SqlOperator::IsNotDistinct => "IS NOT DISTINCT FROM",
            SqlOperator::Like => "LIKE",
            SqlOperator::Escape => "ESCAPE",
            SqlOperator::ArrayIn => "IN",
            SqlOperator::ArrayNotIn => "NOT IN",
            SqlOperator::MySqlIsEqual => "<=>",
            SqlOperator::MySqlRegexp => "REGEXP",
            SqlOperator::PostgresILike => "ILIKE",
            SqlOperator::PostgresSimilarTo => "SIMILAR TO",
            SqlOperator::PostgresPosixMatch => "~",
            SqlOperator::PostgresPosixIMatch => "~*",
            SqlOperator::SqliteGlob => "GLOB",
            SqlOperator::SqlServerNotLt => "!<",
            SqlOperator::SqlServerNotGt => "!>",
        }
    }
}

impl fmt::Display for SqlOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keywords that combine conditions or values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    And,
    Or,
    Not,
    Comma,
    /// MySQL only
    Xor,
}

impl Connector {
    pub fn as_str(&self) -> &'static str {
        match self {
            Connector::And => "AND",
            Connector::Or => "OR",
            Connector::Not => "NOT",
            Connector::Comma => ",",
            Connector::Xor => "XOR",
        }
    }

    /// Separator placed between joined elements
    pub(crate) fn separator(&self) -> String {
        match self {
            Connector::Comma => ", ".to_string(),
            other => format!(" {} ", other.as_str()),
        }
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separator() {
        assert_eq!(Connector::And.separator(), " AND ");
        assert_eq!(Connector::Comma.separator(), ", ");
        assert_eq!(Connector::Xor.separator(), " XOR ");
    }

    #[test]
    fn test_dialect_operators() {
        assert_eq!(SqlOperator::MySqlIsEqual.to_string(), "<=>");
        assert_eq!(SqlOperator::PostgresPosixIMatch.to_string(), "~*");
        assert_eq!(SqlOperator::SqlServerNotGt.to_string(), "!>");
    }
}
