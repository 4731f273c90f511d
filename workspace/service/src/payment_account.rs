//! Payment accounts: a user's money held at a named bank.

use model::entities::{payment_account, user};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::error::{Result, ServiceError};
use crate::store::{fetch, find_bank_by_name};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewPaymentAccount {
    pub user_id: i32,
    pub bank_name: String,
    /// Opening balance, zero when absent.
    #[serde(default)]
    pub balance: Option<Decimal>,
}

#[derive(Clone, Debug)]
pub struct PaymentAccountService {
    db: DatabaseConnection,
}

impl PaymentAccountService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Opens an account for an existing user at an existing bank.
    #[instrument(skip(self))]
    pub async fn create(&self, new: NewPaymentAccount) -> Result<payment_account::Model> {
        let txn = self.db.begin().await?;
        let owner = fetch::<user::Entity, _>(&txn, "User", new.user_id).await?;
        let bank = find_bank_by_name(&txn, &new.bank_name).await?;

        let account = payment_account::ActiveModel {
            user_id: Set(owner.id),
            bank_name: Set(bank.name),
            balance: Set(new.balance.unwrap_or(Decimal::ZERO)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        info!(account_id = account.id, user_id = owner.id, "Payment account opened");
        Ok(account)
    }

    pub async fn read(&self, id: i32) -> Result<payment_account::Model> {
        fetch::<payment_account::Entity, _>(&self.db, "PaymentAccount", id).await
    }

    pub async fn list(&self) -> Result<Vec<payment_account::Model>> {
        Ok(payment_account::Entity::find()
            .order_by_asc(payment_account::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn list_by_user(&self, user_id: i32) -> Result<Vec<payment_account::Model>> {
        Ok(payment_account::Entity::find()
            .filter(payment_account::Column::UserId.eq(user_id))
            .order_by_asc(payment_account::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Sets the balance. A negative balance is refused by the store.
    #[instrument(skip(self))]
    pub async fn update_balance(&self, id: i32, balance: Decimal) -> Result<payment_account::Model> {
        let mut active: payment_account::ActiveModel = self.read(id).await?.into();
        active.balance = Set(balance);
        let updated = active.update(&self.db).await?;
        info!(account_id = id, %balance, "Payment account balance set");
        Ok(updated)
    }

    /// Closes the account. Accounts that still fund a loan cannot be closed.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<()> {
        let result = payment_account::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            warn!(account_id = id, "Payment account not found for deletion");
            return Err(ServiceError::not_found("PaymentAccount", id));
        }
        info!(account_id = id, "Payment account closed");
        Ok(())
    }
}
