use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{bank, bank_office};

/// A person employed by a bank, optionally attached to one of its offices.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub full_name: String,
    pub birth_date: NaiveDate,
    pub position: String,
    pub bank_id: i32,
    pub works_remotely: bool,
    /// Set to NULL by the store when the office is closed.
    pub bank_office_id: Option<i32>,
    pub can_provide_credit: bool,
    #[sea_orm(column_type = "Decimal(Some((9, 2)))")]
    pub salary: Decimal,
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
        on_delete = "SetNull"
    )]
    BankOffice,
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

impl ActiveModelBehavior for ActiveModel {}
