use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{bank_atm, bank_office, employee, user, user_bank};

/// The root aggregate of the banking domain.
///
/// The four `num_*` columns are denormalized counters. They are never written
/// directly by callers; the services adjust them in the same transaction as
/// the child row they count.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "banks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Natural key used by users, payment accounts and credit accounts.
    #[sea_orm(unique)]
    pub name: String,
    pub num_offices: i32,
    pub num_atms: i32,
    pub num_employees: i32,
    pub num_clients: i32,
    /// Rating in `[0, 100]`.
    pub rating: i32,
    /// Money held by the bank, in `[0, 1_000_000]`.
    pub total_money: i64,
    /// Yearly interest rate in percent, in `[0, 20]`, two decimal places.
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub interest_rate: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "bank_office::Entity")]
    BankOffice,
    #[sea_orm(has_many = "bank_atm::Entity")]
    BankAtm,
    #[sea_orm(has_many = "employee::Entity")]
    Employee,
    #[sea_orm(has_many = "user_bank::Entity")]
    UserBank,
}

impl Related<bank_office::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BankOffice.def()
    }
}

impl Related<bank_atm::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BankAtm.def()
    }
}

impl Related<employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

// Clients reach a bank through the `user_banks` association table.
impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        user_bank::Relation::User.def()
    }
    fn via() -> Option<RelationDef> {
        Some(user_bank::Relation::Bank.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
