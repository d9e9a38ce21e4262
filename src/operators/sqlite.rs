//! SQLite operators

use regex::Regex;

use crate::error::{QueryError, Result};
use crate::operator::{Operand, Operator};
use crate::sql::keywords::SqlOperator;
use crate::value::{SqlValue, TextLike};

/// `GLOB`, case-sensitive Unix-style wildcard match
///
/// The pattern is translated to a regular expression to check that its
/// character classes are well formed.
pub fn glob<V: TextLike>(pattern: impl Into<String>) -> Result<Operator<V>> {
    let pattern = pattern.into();
    Regex::new(&glob_to_regex(&pattern)).map_err(|e| QueryError::InvalidPattern {
        operator: SqlOperator::SqliteGlob.as_str(),
        message: e.to_string(),
    })?;

    Ok(Operator::value(
        SqlOperator::SqliteGlob,
        Operand::Value(SqlValue::Text(pattern)),
    ))
}

fn glob_to_regex(pattern: &str) -> String {
    let mut out = String::from("^");
    let mut in_class = false;

    for c in pattern.chars() {
        match c {
            '[' if !in_class => {
                in_class = true;
                out.push('[');
            }
            ']' if in_class => {
                in_class = false;
                out.push(']');
            }
            '^' if in_class => out.push('^'),
            '-' if in_class => out.push('-'),
            '*' if !in_class => out.push_str(".*"),
            '?' if !in_class => out.push('.'),
            _ => out.push_str(&regex::escape(&c.to_string())),
        }
    }

    if in_class {
        // leave the class open so compilation reports it
        out.push('[');
    }
    out.push('$');
    out
}
