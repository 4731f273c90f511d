//! Credit accounts.
//!
//! A loan is issued by an employee of the lending bank and paid out through
//! one of the borrower's payment accounts. It carries the bank's interest
//! rate as of the day it was issued.

use chrono::NaiveDate;
use model::entities::{credit_account, employee, payment_account, user};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, ServiceError};
use crate::store::{fetch, find_bank_by_name};

/// Input for [`CreditAccountService::create`]. The interest rate is taken
/// from the bank.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewCreditAccount {
    pub user_id: i32,
    pub bank_name: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub loan_duration_months: i32,
    pub loan_amount: Decimal,
    pub monthly_payment: Decimal,
    pub employee_id: i32,
    pub payment_account_id: i32,
}

/// Changeable loan terms. The rate, the parties and the bank are fixed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreditAccountUpdate {
    pub end_date: Option<Option<NaiveDate>>,
    pub loan_duration_months: Option<i32>,
    pub loan_amount: Option<Decimal>,
    pub monthly_payment: Option<Decimal>,
}

#[derive(Clone, Debug)]
pub struct CreditAccountService {
    db: DatabaseConnection,
}

impl CreditAccountService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Issues a loan at the named bank's current interest rate.
    #[instrument(skip(self))]
    pub async fn create(&self, new: NewCreditAccount) -> Result<credit_account::Model> {
        let txn = self.db.begin().await?;
        let borrower = fetch::<user::Entity, _>(&txn, "User", new.user_id).await?;
        let lender = find_bank_by_name(&txn, &new.bank_name).await?;

        let officer = fetch::<employee::Entity, _>(&txn, "Employee", new.employee_id).await?;
        if officer.bank_id != lender.id {
            return Err(ServiceError::Validation(format!(
                "employee {} does not work for {}",
                officer.id, lender.name
            )));
        }
        let account =
            fetch::<payment_account::Entity, _>(&txn, "PaymentAccount", new.payment_account_id).await?;
        if account.user_id != borrower.id {
            return Err(ServiceError::Validation(format!(
                "payment account {} does not belong to user {}",
                account.id, borrower.id
            )));
        }
        debug!(bank = %lender.name, rate = %lender.interest_rate, "Snapshotting interest rate");

        let loan = credit_account::ActiveModel {
            user_id: Set(borrower.id),
            bank_name: Set(lender.name),
            start_date: Set(new.start_date),
            end_date: Set(new.end_date),
            loan_duration_months: Set(new.loan_duration_months),
            loan_amount: Set(new.loan_amount),
            monthly_payment: Set(new.monthly_payment),
            interest_rate: Set(lender.interest_rate),
            employee_id: Set(officer.id),
            payment_account_id: Set(account.id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        info!(
            credit_account_id = loan.id,
            user_id = borrower.id,
            interest_rate = %loan.interest_rate,
            "Credit account opened"
        );
        Ok(loan)
    }

    pub async fn read(&self, id: i32) -> Result<credit_account::Model> {
        fetch::<credit_account::Entity, _>(&self.db, "CreditAccount", id).await
    }

    pub async fn list(&self) -> Result<Vec<credit_account::Model>> {
        Ok(credit_account::Entity::find()
            .order_by_asc(credit_account::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn list_by_user(&self, user_id: i32) -> Result<Vec<credit_account::Model>> {
        Ok(credit_account::Entity::find()
            .filter(credit_account::Column::UserId.eq(user_id))
            .order_by_asc(credit_account::Column::Id)
            .all(&self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn update(&self, id: i32, changes: CreditAccountUpdate) -> Result<credit_account::Model> {
        let current = self.read(id).await?;
        let mut active: credit_account::ActiveModel = current.into();

        if let Some(end_date) = changes.end_date {
            active.end_date = Set(end_date);
        }
        if let Some(loan_duration_months) = changes.loan_duration_months {
            active.loan_duration_months = Set(loan_duration_months);
        }
        if let Some(loan_amount) = changes.loan_amount {
            active.loan_amount = Set(loan_amount);
        }
        if let Some(monthly_payment) = changes.monthly_payment {
            active.monthly_payment = Set(monthly_payment);
        }

        if !active.is_changed() {
            debug!(credit_account_id = id, "Empty credit account update");
            return self.read(id).await;
        }
        let updated = active.update(&self.db).await?;
        info!(credit_account_id = id, "Credit account updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<()> {
        let result = credit_account::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            warn!(credit_account_id = id, "Credit account not found for deletion");
            return Err(ServiceError::not_found("CreditAccount", id));
        }
        info!(credit_account_id = id, "Credit account closed");
        Ok(())
    }
}
