use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{bank, credit_account, payment_account, user_bank};

/// A client of one or more banks.
/// `(full_name, birth_date)` is unique.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub full_name: String,
    pub birth_date: NaiveDate,
    pub job: Option<String>,
    /// At most 10 000.
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub monthly_income: Decimal,
    /// Derived from `monthly_income`, in `[100, 1000]`.
    pub credit_rating: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "user_bank::Entity")]
    UserBank,
    #[sea_orm(has_many = "payment_account::Entity")]
    PaymentAccount,
    #[sea_orm(has_many = "credit_account::Entity")]
    CreditAccount,
}

impl Related<bank::Entity> for Entity {
    fn to() -> RelationDef {
        user_bank::Relation::Bank.def()
    }
    fn via() -> Option<RelationDef> {
        Some(user_bank::Relation::User.def().rev())
    }
}

impl Related<payment_account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentAccount.def()
    }
}

impl Related<credit_account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreditAccount.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
