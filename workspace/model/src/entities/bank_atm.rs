use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{bank, bank_office, employee};

/// An ATM installed in one of the bank's offices.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "atms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// Copied from the office at installation time.
    pub address: String,
    pub status: String,
    pub bank_id: i32,
    pub bank_office_id: i32,
    /// The employee servicing this ATM. Cleared when the employee is removed.
    pub employee_id: Option<i32>,
    pub dispense_money: bool,
    pub accept_money: bool,
    /// Snapshot of the bank's `total_money` at installation time.
    pub money_in_atm: i64,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub maintenance_cost: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "bank::Entity",
        from = "Column::BankId",
        to = "bank::Column::Id",
        on_delete = "Cascade"
    )]
    Bank,
    #[sea_orm(
        belongs_to = "bank_office::Entity",
        from = "Column::BankOfficeId",
        to = "bank_office::Column::Id",
        on_delete = "Cascade"
    )]
    BankOffice,
    #[sea_orm(
        belongs_to = "employee::Entity",
        from = "Column::EmployeeId",
        to = "employee::Column::Id",
        on_delete = "SetNull"
    )]
    Employee,
}

impl Related<bank::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bank.def()
    }
}

impl Related<bank_office::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BankOffice.def()
    }
}

impl Related<employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
