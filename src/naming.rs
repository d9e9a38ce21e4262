//! Table and column name derivation
//!
//! Entity and field names are written the way they appear in Rust type and
//! field declarations (`SaleItem`, `ProductID`). The naming strategy turns
//! them into SQL identifiers, so identifier conventions can be swapped without
//! touching any condition logic.

use crate::config::StoreConfig;

/// Derives SQL identifiers from entity and field names
pub trait NamingStrategy: Send + Sync + std::fmt::Debug {
    /// Table name for an entity, e.g. `SaleItem` -> `sale_items`
    fn table_name(&self, entity: &str) -> String;

    /// Column name for a field of the given table, e.g. `ProductID` -> `product_id`
    fn column_name(&self, table: &str, field: &str) -> String;
}

/// Default strategy: snake_case columns and pluralized snake_case tables
#[derive(Debug, Clone, Default)]
pub struct SnakeCaseNaming {
    pub table_prefix: String,
    pub singular_tables: bool,
}

impl SnakeCaseNaming {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self {
            table_prefix: config.table_prefix.clone(),
            singular_tables: config.singular_tables,
        }
    }
}

impl NamingStrategy for SnakeCaseNaming {
    fn table_name(&self, entity: &str) -> String {
        let snake = to_snake_case(entity);
        let name = if self.singular_tables {
            snake
        } else {
            pluralize(&snake)
        };
        format!("{}{}", self.table_prefix, name)
    }

    fn column_name(&self, _table: &str, field: &str) -> String {
        to_snake_case(field)
    }
}

/// Convert a type or field name to snake_case, keeping acronyms together
///
/// `ProductID` -> `product_id`, `HTTPServer` -> `http_server`, `ID` -> `id`
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                let prev = chars[i - 1];
                let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
                if prev != '_'
                    && (prev.is_lowercase()
                        || prev.is_ascii_digit()
                        || (prev.is_uppercase() && next_is_lower))
                {
                    out.push('_');
                }
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }

    out
}

fn pluralize(word: &str) -> String {
    if word.ends_with("ss")
        || word.ends_with('x')
        || word.ends_with('z')
        || word.ends_with("ch")
        || word.ends_with("sh")
    {
        return format!("{}es", word);
    }

    if let Some(stem) = word.strip_suffix('y') {
        let before = stem.chars().last();
        if before.is_some_and(|c| !"aeiou".contains(c)) {
            return format!("{}ies", stem);
        }
    }

    if word.ends_with('s') {
        return word.to_string();
    }

    format!("{}s", word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case_simple() {
        assert_eq!(to_snake_case("Sale"), "sale");
        assert_eq!(to_snake_case("CreatedAt"), "created_at");
        assert_eq!(to_snake_case("already_snake"), "already_snake");
    }

    #[test]
    fn test_snake_case_acronyms() {
        assert_eq!(to_snake_case("ID"), "id");
        assert_eq!(to_snake_case("ProductID"), "product_id");
        assert_eq!(to_snake_case("HTTPServer"), "http_server");
        assert_eq!(to_snake_case("Float2"), "float2");
    }

    #[test]
    fn test_table_names_are_plural() {
        let naming = SnakeCaseNaming::new();
        assert_eq!(naming.table_name("Sale"), "sales");
        assert_eq!(naming.table_name("Company"), "companies");
        assert_eq!(naming.table_name("City"), "cities");
        assert_eq!(naming.table_name("Employee"), "employees");
        assert_eq!(naming.table_name("Box"), "boxes");
        assert_eq!(naming.table_name("Key"), "keys");
    }

    #[test]
    fn test_table_prefix_and_singular() {
        let naming = SnakeCaseNaming {
            table_prefix: "app_".to_string(),
            singular_tables: true,
        };
        assert_eq!(naming.table_name("SaleItem"), "app_sale_item");
    }

    #[test]
    fn test_column_name() {
        let naming = SnakeCaseNaming::new();
        assert_eq!(naming.column_name("sales", "SellerID"), "seller_id");
        assert_eq!(naming.column_name("sales", "DeletedAt"), "deleted_at");
    }
}
