//! Entities shared by the integration tests
//!
//! `conditions` mirrors what a code generator writes for each entity: one
//! typed field identifier and one helper per field, plus one join helper per
//! relation.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use condition_orm::{
    ColumnDefinition, ColumnType, Entity, IdType, Registry, RegistryBuilder, SnakeCaseNaming,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub string: String,
    pub int: i64,
    pub int_pointer: Option<i64>,
    pub float: f64,
    pub bool: bool,
    pub null_bool: Option<bool>,
}

impl Entity for Product {
    const NAME: &'static str = "Product";

    fn columns() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new("String", ColumnType::String)
                .column("string_something_else")
                .not_null()
                .default("''"),
            ColumnDefinition::new("Int", ColumnType::Integer)
                .not_null()
                .default("0"),
            ColumnDefinition::new("IntPointer", ColumnType::Integer),
            ColumnDefinition::new("Float", ColumnType::Float)
                .not_null()
                .default("0"),
            ColumnDefinition::new("Bool", ColumnType::Boolean)
                .not_null()
                .default("FALSE"),
            ColumnDefinition::new("NullBool", ColumnType::Boolean),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub name: String,
}

impl Entity for Company {
    const NAME: &'static str = "Company";

    fn columns() -> Vec<ColumnDefinition> {
        vec![ColumnDefinition::new("Name", ColumnType::String).not_null()]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Seller {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub name: String,
    pub company_id: Option<Uuid>,
    #[serde(default, skip_serializing)]
    pub company: Option<Company>,
}

impl Entity for Seller {
    const NAME: &'static str = "Seller";

    fn columns() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new("Name", ColumnType::String).not_null(),
            ColumnDefinition::new("CompanyID", ColumnType::Uuid),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub code: i64,
    pub description: String,
    pub product_id: Uuid,
    pub seller_id: Option<Uuid>,
    #[serde(default, skip_serializing)]
    pub product: Option<Product>,
    #[serde(default, skip_serializing)]
    pub seller: Option<Seller>,
}

impl Entity for Sale {
    const NAME: &'static str = "Sale";

    fn columns() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new("Code", ColumnType::Integer).not_null(),
            ColumnDefinition::new("Description", ColumnType::String)
                .not_null()
                .default("''"),
            ColumnDefinition::new("ProductID", ColumnType::Uuid).not_null(),
            ColumnDefinition::new("SellerID", ColumnType::Uuid),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub name: String,
    pub boss_id: Option<Uuid>,
    #[serde(default, skip_serializing)]
    pub boss: Option<Box<Employee>>,
}

impl Entity for Employee {
    const NAME: &'static str = "Employee";

    fn columns() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new("Name", ColumnType::String).not_null(),
            ColumnDefinition::new("BossID", ColumnType::Uuid),
        ]
    }
}

/// Serial ids and no soft delete
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Phone {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
}

impl Entity for Phone {
    const NAME: &'static str = "Phone";

    fn columns() -> Vec<ColumnDefinition> {
        vec![ColumnDefinition::new("Name", ColumnType::String).not_null()]
    }

    fn id_type() -> IdType {
        IdType::Serial
    }

    fn soft_delete() -> bool {
        false
    }
}

/// Every test entity, in dependency order
pub fn entities() -> RegistryBuilder {
    Registry::builder()
        .register::<Product>()
        .register::<Company>()
        .register::<Seller>()
        .register::<Sale>()
        .register::<Employee>()
        .register::<Phone>()
}

/// Registry with every test entity, tables prefixed with `prefix`
pub fn registry(prefix: &str) -> Registry {
    entities()
        .naming(SnakeCaseNaming {
            table_prefix: prefix.to_string(),
            singular_tables: false,
        })
        .build()
        .expect("test entities register")
}

pub mod conditions {
    pub mod product {
        use chrono::{DateTime, Utc};
        use condition_orm::{
            Condition, FieldCondition, FieldIdentifier, JoinCondition, Operator, WhereCondition,
        };
        use uuid::Uuid;

        use super::super::{Product, Sale};

        pub const ID: FieldIdentifier<Product, Uuid> = FieldIdentifier::new("ID");
        pub const DELETED_AT: FieldIdentifier<Product, Option<DateTime<Utc>>> =
            FieldIdentifier::new("DeletedAt");
        pub const STRING: FieldIdentifier<Product, String> = FieldIdentifier::new("String");
        pub const INT: FieldIdentifier<Product, i64> = FieldIdentifier::new("Int");
        pub const INT_POINTER: FieldIdentifier<Product, Option<i64>> =
            FieldIdentifier::new("IntPointer");
        pub const FLOAT: FieldIdentifier<Product, f64> = FieldIdentifier::new("Float");
        pub const BOOL: FieldIdentifier<Product, bool> = FieldIdentifier::new("Bool");
        pub const NULL_BOOL: FieldIdentifier<Product, Option<bool>> =
            FieldIdentifier::new("NullBool");

        pub fn id(operator: Operator<Uuid>) -> WhereCondition<Product> {
            FieldCondition::new(ID, operator)
        }

        pub fn deleted_at(operator: Operator<Option<DateTime<Utc>>>) -> WhereCondition<Product> {
            FieldCondition::new(DELETED_AT, operator)
        }

        pub fn string(operator: Operator<String>) -> WhereCondition<Product> {
            FieldCondition::new(STRING, operator)
        }

        pub fn int(operator: Operator<i64>) -> WhereCondition<Product> {
            FieldCondition::new(INT, operator)
        }

        pub fn int_pointer(operator: Operator<Option<i64>>) -> WhereCondition<Product> {
            FieldCondition::new(INT_POINTER, operator)
        }

        pub fn float(operator: Operator<f64>) -> WhereCondition<Product> {
            FieldCondition::new(FLOAT, operator)
        }

        pub fn bool(operator: Operator<bool>) -> WhereCondition<Product> {
            FieldCondition::new(BOOL, operator)
        }

        pub fn null_bool(operator: Operator<Option<bool>>) -> WhereCondition<Product> {
            FieldCondition::new(NULL_BOOL, operator)
        }

        pub fn sales(conditions: Vec<Condition<Sale>>) -> Condition<Product> {
            Condition::join(JoinCondition::new("Sales", "ID", "ProductID", conditions))
        }
    }

    pub mod company {
        use condition_orm::{FieldCondition, FieldIdentifier, Operator, WhereCondition};

        use super::super::Company;

        pub const NAME: FieldIdentifier<Company, String> = FieldIdentifier::new("Name");

        pub fn name(operator: Operator<String>) -> WhereCondition<Company> {
            FieldCondition::new(NAME, operator)
        }
    }

    pub mod seller {
        use condition_orm::{
            Condition, FieldCondition, FieldIdentifier, JoinCondition, Operator, WhereCondition,
        };
        use uuid::Uuid;

        use super::super::{Company, Seller};

        pub const NAME: FieldIdentifier<Seller, String> = FieldIdentifier::new("Name");
        pub const COMPANY_ID: FieldIdentifier<Seller, Option<Uuid>> =
            FieldIdentifier::new("CompanyID");

        pub fn name(operator: Operator<String>) -> WhereCondition<Seller> {
            FieldCondition::new(NAME, operator)
        }

        pub fn company(conditions: Vec<Condition<Company>>) -> Condition<Seller> {
            Condition::join(JoinCondition::new("Company", "CompanyID", "ID", conditions))
        }
    }

    pub mod sale {
        use condition_orm::{
            Condition, FieldCondition, FieldIdentifier, JoinCondition, Operator, WhereCondition,
        };

        use super::super::{Product, Sale, Seller};

        pub const CODE: FieldIdentifier<Sale, i64> = FieldIdentifier::new("Code");
        pub const DESCRIPTION: FieldIdentifier<Sale, String> = FieldIdentifier::new("Description");

        pub fn code(operator: Operator<i64>) -> WhereCondition<Sale> {
            FieldCondition::new(CODE, operator)
        }

        pub fn description(operator: Operator<String>) -> WhereCondition<Sale> {
            FieldCondition::new(DESCRIPTION, operator)
        }

        pub fn product(conditions: Vec<Condition<Product>>) -> Condition<Sale> {
            Condition::join(JoinCondition::new("Product", "ProductID", "ID", conditions))
        }

        pub fn seller(conditions: Vec<Condition<Seller>>) -> Condition<Sale> {
            Condition::join(JoinCondition::new("Seller", "SellerID", "ID", conditions))
        }
    }

    pub mod employee {
        use condition_orm::{
            Condition, FieldCondition, FieldIdentifier, JoinCondition, Operator, WhereCondition,
        };

        use super::super::Employee;

        pub const NAME: FieldIdentifier<Employee, String> = FieldIdentifier::new("Name");

        pub fn name(operator: Operator<String>) -> WhereCondition<Employee> {
            FieldCondition::new(NAME, operator)
        }

        pub fn boss(conditions: Vec<Condition<Employee>>) -> Condition<Employee> {
            Condition::join(JoinCondition::new("Boss", "BossID", "ID", conditions))
        }
    }

    pub mod phone {
        use condition_orm::{FieldCondition, FieldIdentifier, Operator, WhereCondition};

        use super::super::Phone;

        pub const NAME: FieldIdentifier<Phone, String> = FieldIdentifier::new("Name");

        pub fn name(operator: Operator<String>) -> WhereCondition<Phone> {
            FieldCondition::new(NAME, operator)
        }
    }
}
