//! Row hydration
//!
//! A fetched row is flat: the root entity's own columns, followed by the
//! `<alias>__<column>` columns of every preloaded relation. Hydration rebuilds
//! the nested shape as JSON, keyed by snake_case field and relation names,
//! and lets serde deserialize the entity from it.

use serde::de::DeserializeOwned;
use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::entity::{EntityMeta, Registry};
use crate::error::{QueryError, Result};
use crate::naming::to_snake_case;
use crate::query::{Preloaded, preload_column_alias};
use crate::types::ColumnType;

/// Decode `row` into `T`
pub fn hydrate<T: DeserializeOwned>(
    row: &PgRow,
    registry: &Registry,
    root: &EntityMeta,
    preloads: &[Preloaded],
) -> Result<T> {
    let value = row_to_value(row, registry, root, preloads)?;
    Ok(serde_json::from_value(value)?)
}

/// Nested JSON object for `row`
///
/// A relation whose columns are all NULL (a LEFT JOIN that matched nothing)
/// becomes `null`.
pub fn row_to_value(
    row: &PgRow,
    registry: &Registry,
    root: &EntityMeta,
    preloads: &[Preloaded],
) -> Result<serde_json::Value> {
    let mut object = serde_json::Map::new();
    for column in &root.columns {
        object.insert(
            to_snake_case(&column.field),
            extract_column_value(row, &column.column, &column.definition.column_type)?,
        );
    }
    let mut value = serde_json::Value::Object(object);

    let mut preloads: Vec<&Preloaded> = preloads.iter().collect();
    preloads.sort_by_key(|p| p.path.len());

    for preload in preloads {
        let meta = registry.meta_by_id(preload.entity).ok_or_else(|| {
            QueryError::validation(format!(
                "preloaded table {} is not registered",
                preload.alias
            ))
        })?;

        let mut related = serde_json::Map::new();
        let mut all_null = true;
        for column in &meta.columns {
            let v = extract_column_value(
                row,
                &preload_column_alias(&preload.alias, &column.column),
                &column.definition.column_type,
            )?;
            all_null &= v.is_null();
            related.insert(to_snake_case(&column.field), v);
        }
        let related = if all_null {
            serde_json::Value::Null
        } else {
            serde_json::Value::Object(related)
        };

        insert_at_path(&mut value, &preload.path, related);
    }

    Ok(value)
}

/// Set `value` at `path` under `root`; a missing parent drops it
fn insert_at_path(root: &mut serde_json::Value, path: &[&'static str], value: serde_json::Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };

    let mut current = root;
    for relation in parents {
        match current.get_mut(to_snake_case(relation)) {
            Some(next) if next.is_object() => current = next,
            _ => return,
        }
    }

    if let Some(object) = current.as_object_mut() {
        object.insert(to_snake_case(last), value);
    }
}

fn extract_column_value(
    row: &PgRow,
    name: &str,
    column_type: &ColumnType,
) -> Result<serde_json::Value> {
    let value = match column_type {
        ColumnType::String => row
            .try_get::<Option<String>, _>(name)?
            .map(serde_json::Value::String),
        ColumnType::Integer => row
            .try_get::<Option<i64>, _>(name)?
            .map(|v| serde_json::Value::Number(serde_json::Number::from(v))),
        ColumnType::Float => row
            .try_get::<Option<f64>, _>(name)?
            .and_then(serde_json::Number::from_f64)
            .map(serde_json::Value::Number),
        ColumnType::Decimal { .. } => row
            .try_get::<Option<rust_decimal::Decimal>, _>(name)?
            .map(serde_json::to_value)
            .transpose()?,
        ColumnType::Boolean => row
            .try_get::<Option<bool>, _>(name)?
            .map(serde_json::Value::Bool),
        ColumnType::Timestamp => row
            .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(name)?
            .map(|v| serde_json::Value::String(v.to_rfc3339())),
        ColumnType::Uuid => row
            .try_get::<Option<uuid::Uuid>, _>(name)?
            .map(|v| serde_json::Value::String(v.to_string())),
        ColumnType::Json => row.try_get::<Option<serde_json::Value>, _>(name)?,
    };

    Ok(value.unwrap_or(serde_json::Value::Null))
}
