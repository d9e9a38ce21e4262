//! Field identifiers
//!
//! A [`FieldIdentifier`] names one field of an entity and carries the value
//! type its operators must use. Generated code declares them as constants:
//!
//! ```rust
//! use condition_orm::FieldIdentifier;
//! # struct Product;
//!
//! pub const PRODUCT_INT: FieldIdentifier<Product, i64> = FieldIdentifier::new("Int");
//! ```

use std::any::TypeId;
use std::fmt;
use std::marker::PhantomData;

use crate::entity::Entity;
use crate::query::{Query, Table};

/// Untyped part of a field identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub field: &'static str,
    /// Column name override, bypassing the registry
    pub column: Option<&'static str>,
    /// Prepended to the resolved column name (embedded structs)
    pub column_prefix: Option<&'static str>,
}

impl FieldSpec {
    /// Column name inside `table`, without the alias
    ///
    /// Resolution order: explicit override, registry metadata, naming strategy.
    pub(crate) fn column_name(&self, query: &Query<'_>, table: &Table) -> String {
        let column = match self.column {
            Some(column) => column.to_string(),
            None => query
                .registry()
                .meta_by_id(table.entity)
                .and_then(|meta| meta.column_for(self.field))
                .map(|c| c.column.clone())
                .unwrap_or_else(|| query.registry().naming().column_name(&table.name, self.field)),
        };

        match self.column_prefix {
            Some(prefix) => format!("{}{}", prefix, column),
            None => column,
        }
    }

    /// `<alias>.<column>`
    pub(crate) fn column_reference(&self, query: &Query<'_>, table: &Table) -> String {
        format!("{}.{}", table.alias, self.column_name(query, table))
    }
}

/// Identifies field `field` of entity `T`, holding values of type `V`
pub struct FieldIdentifier<T, V> {
    pub spec: FieldSpec,
    _marker: PhantomData<fn() -> (T, V)>,
}

impl<T, V> FieldIdentifier<T, V> {
    pub const fn new(field: &'static str) -> Self {
        Self {
            spec: FieldSpec {
                field,
                column: None,
                column_prefix: None,
            },
            _marker: PhantomData,
        }
    }

    pub const fn with_column(mut self, column: &'static str) -> Self {
        self.spec.column = Some(column);
        self
    }

    pub const fn with_prefix(mut self, prefix: &'static str) -> Self {
        self.spec.column_prefix = Some(prefix);
        self
    }

    pub fn field(&self) -> &'static str {
        self.spec.field
    }
}

impl<T: Entity, V> FieldIdentifier<T, V> {
    /// Drop the value type, keeping the owning entity as data
    pub fn erase(&self) -> FieldRef {
        FieldRef {
            entity: TypeId::of::<T>(),
            entity_name: T::NAME,
            spec: self.spec,
        }
    }
}

impl<T, V> Clone for FieldIdentifier<T, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, V> Copy for FieldIdentifier<T, V> {}

impl<T, V> fmt::Debug for FieldIdentifier<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldIdentifier")
            .field("field", &self.spec.field)
            .field("column", &self.spec.column)
            .field("column_prefix", &self.spec.column_prefix)
            .finish()
    }
}

/// A field of any entity, used as the right-hand side of dynamic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRef {
    pub entity: TypeId,
    pub entity_name: &'static str,
    pub spec: FieldSpec,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Product;

    impl Entity for Product {
        const NAME: &'static str = "Product";

        fn columns() -> Vec<crate::types::ColumnDefinition> {
            Vec::new()
        }
    }

    const INT: FieldIdentifier<Product, i64> = FieldIdentifier::new("Int");

    #[test]
    fn test_const_builders() {
        const OVERRIDDEN: FieldIdentifier<Product, String> =
            FieldIdentifier::new("String").with_column("string_something_else");
        assert_eq!(OVERRIDDEN.spec.column, Some("string_something_else"));
        assert_eq!(INT.field(), "Int");
    }

    #[test]
    fn test_erase_keeps_entity() {
        let erased = INT.with_prefix("embedded_").erase();
        assert_eq!(erased.entity, TypeId::of::<Product>());
        assert_eq!(erased.entity_name, "Product");
        assert_eq!(erased.spec.column_prefix, Some("embedded_"));
    }
}
