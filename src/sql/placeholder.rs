//! Placeholder rendering
//!
//! Fragments are written with `?` placeholders. Once a statement is complete
//! they are rewritten into the dialect's parameter syntax, and list parameters
//! are expanded into one placeholder per element.

use crate::config::Dialect;
use crate::error::{QueryError, Result};
use crate::value::SqlValue;

/// Rewrite `?` placeholders for `dialect`, returning the final SQL and the
/// flattened parameter list
///
/// `?` inside single-quoted string literals is left untouched. An empty list
/// renders as `NULL`, so `IN (?)` becomes `IN (NULL)` and matches nothing.
/// On PostgreSQL a null parameter is written inline as `NULL`: a bound null
/// carries a type, which the server then refuses to compare with columns of
/// any other type.
///
/// Fails with [`QueryError::PlaceholderMismatch`] unless every parameter
/// fills exactly one placeholder.
pub fn render(
    sql: &str,
    params: Vec<SqlValue>,
    dialect: Dialect,
) -> Result<(String, Vec<SqlValue>)> {
    let given = params.len();
    let mut out = String::with_capacity(sql.len() + given * 2);
    let mut flat = Vec::with_capacity(given);
    let mut params = params.into_iter();
    let mut in_string = false;

    for c in sql.chars() {
        match c {
            '\'' => {
                in_string = !in_string;
                out.push(c);
            }
            '?' if !in_string => match params.next() {
                Some(SqlValue::List(values)) => {
                    if values.is_empty() {
                        out.push_str("NULL");
                    }
                    for (i, value) in values.into_iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        if value.is_null() && dialect == Dialect::Postgres {
                            out.push_str("NULL");
                            continue;
                        }
                        flat.push(value);
                        push_placeholder(&mut out, dialect, flat.len());
                    }
                }
                Some(SqlValue::Null) if dialect == Dialect::Postgres => out.push_str("NULL"),
                Some(value) => {
                    flat.push(value);
                    push_placeholder(&mut out, dialect, flat.len());
                }
                None => {
                    return Err(QueryError::PlaceholderMismatch {
                        placeholders: count_placeholders(sql),
                        values: given,
                    });
                }
            },
            _ => out.push(c),
        }
    }

    if params.next().is_some() {
        return Err(QueryError::PlaceholderMismatch {
            placeholders: count_placeholders(sql),
            values: given,
        });
    }

    Ok((out, flat))
}

/// Number of `?` placeholders outside single-quoted string literals
pub fn count_placeholders(sql: &str) -> usize {
    let mut in_string = false;
    let mut count = 0;
    for c in sql.chars() {
        match c {
            '\'' => in_string = !in_string,
            '?' if !in_string => count += 1,
            _ => {}
        }
    }
    count
}

fn push_placeholder(out: &mut String, dialect: Dialect, index: usize) {
    match dialect {
        Dialect::Postgres => {
            out.push('$');
            out.push_str(&index.to_string());
        }
        Dialect::MySql | Dialect::Sqlite => out.push('?'),
        Dialect::SqlServer => {
            out.push_str("@p");
            out.push_str(&index.to_string());
        }
    }
}
