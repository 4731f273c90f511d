use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{employee, payment_account, user};

/// A loan issued to a user.
///
/// `interest_rate` is copied from the bank when the loan is originated and
/// does not follow later changes of the bank's rate.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "credit_accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub bank_name: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub loan_duration_months: i32,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub loan_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub monthly_payment: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub interest_rate: Decimal,
    /// The employee who issued the loan.
    pub employee_id: i32,
    pub payment_account_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "user::Entity",
        from = "Column::UserId",
        to = "user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "employee::Entity",
        from = "Column::EmployeeId",
        to = "employee::Column::Id"
    )]
    Employee,
    #[sea_orm(
        belongs_to = "payment_account::Entity",
        from = "Column::PaymentAccountId",
        to = "payment_account::Column::Id"
    )]
    PaymentAccount,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl Related<payment_account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentAccount.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
