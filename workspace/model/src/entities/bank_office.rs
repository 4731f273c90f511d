use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{bank, bank_atm, employee};

/// A physical branch of a bank.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bank_offices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub address: String,
    pub status: String,
    pub can_place_atm: bool,
    /// Number of ATMs installed in this office.
    pub num_atms: i32,
    pub can_provide_credit: bool,
    pub dispense_money: bool,
    pub accept_money: bool,
    /// Seeded from the owning bank's `total_money` when the office is opened.
    pub money_in_office: i64,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub rent_cost: Decimal,
    pub bank_id: i32,
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
    #[sea_orm(has_many = "bank_atm::Entity")]
    BankAtm,
    #[sea_orm(has_many = "employee::Entity")]
    Employee,
}

impl Related<bank::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bank.def()
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

impl ActiveModelBehavior for ActiveModel {}
