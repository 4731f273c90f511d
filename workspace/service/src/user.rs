//! Users and their bank memberships.
//!
//! A user's credit rating is derived from their monthly income and kept in
//! step with it. Memberships live in `user_banks`; callers refer to banks by
//! name and every bank a user joins or leaves has its `num_clients` moved in
//! the same transaction.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use common::credit_rating_for;
use model::entities::{bank, credit_account, payment_account, user, user_bank};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, ServiceError};
use crate::store::{adjust_bank_counter, fetch, find_bank_by_name};

/// Input for [`UserService::create`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewUser {
    pub full_name: String,
    pub birth_date: NaiveDate,
    pub job: Option<String>,
    pub monthly_income: Decimal,
    /// Names of the banks the user is a client of. Repeats are ignored.
    #[serde(default)]
    pub banks: Vec<String>,
}

/// Changeable user fields. The credit rating follows `monthly_income`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserUpdate {
    pub full_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub job: Option<Option<String>>,
    pub monthly_income: Option<Decimal>,
}

/// A user together with their banks and accounts.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub user: user::Model,
    pub banks: Vec<bank::Model>,
    pub payment_accounts: Vec<payment_account::Model>,
    pub credit_accounts: Vec<credit_account::Model>,
}

#[derive(Clone, Debug)]
pub struct UserService {
    db: DatabaseConnection,
}

/// Resolves bank names to banks, dropping repeats and keeping first-seen
/// order. An unknown name fails the whole lookup.
async fn resolve_banks<C: ConnectionTrait>(conn: &C, names: &[String]) -> Result<Vec<bank::Model>> {
    let mut seen = BTreeSet::new();
    let mut banks = Vec::with_capacity(names.len());
    for name in names {
        if !seen.insert(name.as_str()) {
            continue;
        }
        banks.push(find_bank_by_name(conn, name).await?);
    }
    Ok(banks)
}

async fn link<C: ConnectionTrait>(conn: &C, user_id: i32, bank_id: i32) -> Result<()> {
    user_bank::Entity::insert(user_bank::ActiveModel {
        user_id: Set(user_id),
        bank_id: Set(bank_id),
    })
    .exec_without_returning(conn)
    .await?;
    adjust_bank_counter(conn, bank_id, bank::Column::NumClients, 1).await
}

async fn linked_bank_ids<C: ConnectionTrait>(conn: &C, user_id: i32) -> Result<BTreeSet<i32>> {
    Ok(user_bank::Entity::find()
        .filter(user_bank::Column::UserId.eq(user_id))
        .all(conn)
        .await?
        .into_iter()
        .map(|membership| membership.bank_id)
        .collect())
}

impl UserService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a user as a client of the named banks.
    ///
    /// Fails with [`ServiceError::Validation`] when the income cannot give a
    /// rating in `[100, 1000]`, and with [`ServiceError::UnknownBank`] when a
    /// name matches no bank. Nothing is written in either case.
    #[instrument(skip(self))]
    pub async fn create(&self, new: NewUser) -> Result<user::Model> {
        let credit_rating = credit_rating_for(new.monthly_income)?;

        let txn = self.db.begin().await?;
        let banks = resolve_banks(&txn, &new.banks).await?;

        let created = user::ActiveModel {
            full_name: Set(new.full_name),
            birth_date: Set(new.birth_date),
            job: Set(new.job),
            monthly_income: Set(new.monthly_income),
            credit_rating: Set(credit_rating),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for bank in &banks {
            link(&txn, created.id, bank.id).await?;
        }
        txn.commit().await?;

        info!(
            user_id = created.id,
            credit_rating,
            banks = banks.len(),
            "User registered"
        );
        Ok(created)
    }

    pub async fn read(&self, id: i32) -> Result<user::Model> {
        fetch::<user::Entity, _>(&self.db, "User", id).await
    }

    pub async fn list(&self) -> Result<Vec<user::Model>> {
        Ok(user::Entity::find()
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn update(&self, id: i32, changes: UserUpdate) -> Result<user::Model> {
        let current = self.read(id).await?;
        let mut active: user::ActiveModel = current.into();

        if let Some(full_name) = changes.full_name {
            active.full_name = Set(full_name);
        }
        if let Some(birth_date) = changes.birth_date {
            active.birth_date = Set(birth_date);
        }
        if let Some(job) = changes.job {
            active.job = Set(job);
        }
        if let Some(monthly_income) = changes.monthly_income {
            active.credit_rating = Set(credit_rating_for(monthly_income)?);
            active.monthly_income = Set(monthly_income);
        }

        if !active.is_changed() {
            debug!(user_id = id, "Empty user update");
            return self.read(id).await;
        }
        let updated = active.update(&self.db).await?;
        info!(user_id = id, credit_rating = updated.credit_rating, "User updated");
        Ok(updated)
    }

    /// Replaces the user's banks with the named ones.
    ///
    /// Banks the user leaves lose a client, banks they join gain one, banks in
    /// both lists are untouched. Returns the new memberships.
    #[instrument(skip(self))]
    pub async fn set_banks(&self, user_id: i32, names: Vec<String>) -> Result<Vec<bank::Model>> {
        let txn = self.db.begin().await?;
        fetch::<user::Entity, _>(&txn, "User", user_id).await?;

        let wanted = resolve_banks(&txn, &names).await?;
        let wanted_ids: BTreeSet<i32> = wanted.iter().map(|bank| bank.id).collect();
        let current_ids = linked_bank_ids(&txn, user_id).await?;

        let leaving: Vec<i32> = current_ids.difference(&wanted_ids).copied().collect();
        if !leaving.is_empty() {
            user_bank::Entity::delete_many()
                .filter(user_bank::Column::UserId.eq(user_id))
                .filter(user_bank::Column::BankId.is_in(leaving.clone()))
                .exec(&txn)
                .await?;
            for bank_id in &leaving {
                adjust_bank_counter(&txn, *bank_id, bank::Column::NumClients, -1).await?;
            }
        }

        let mut joined = 0;
        for bank_id in wanted_ids.difference(&current_ids) {
            link(&txn, user_id, *bank_id).await?;
            joined += 1;
        }
        txn.commit().await?;

        info!(user_id, joined, left = leaving.len(), "User banks replaced");
        let mut banks = wanted;
        banks.sort_by_key(|bank| bank.id);
        Ok(banks)
    }

    /// Banks the user is a client of, by id.
    pub async fn banks_of(&self, user_id: i32) -> Result<Vec<bank::Model>> {
        let client = self.read(user_id).await?;
        Ok(client
            .find_related(bank::Entity)
            .order_by_asc(bank::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Deletes the user and takes them off every bank's client count.
    ///
    /// Payment accounts go with the user. A user with open credit accounts
    /// cannot be deleted.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<()> {
        let txn = self.db.begin().await?;
        let client = match user::Entity::find_by_id(id).one(&txn).await? {
            Some(client) => client,
            None => {
                warn!(user_id = id, "User not found for deletion");
                return Err(ServiceError::not_found("User", id));
            }
        };

        let bank_ids = linked_bank_ids(&txn, id).await?;
        for bank_id in &bank_ids {
            adjust_bank_counter(&txn, *bank_id, bank::Column::NumClients, -1).await?;
        }
        client.delete(&txn).await?;
        txn.commit().await?;

        info!(user_id = id, banks = bank_ids.len(), "User deleted");
        Ok(())
    }

    /// Collects the user's banks and accounts.
    #[instrument(skip(self))]
    pub async fn get_all_info_about_user(&self, id: i32) -> Result<UserInfo> {
        let client = self.read(id).await?;

        let banks = client
            .find_related(bank::Entity)
            .order_by_asc(bank::Column::Id)
            .all(&self.db)
            .await?;
        let payment_accounts = client
            .find_related(payment_account::Entity)
            .order_by_asc(payment_account::Column::Id)
            .all(&self.db)
            .await?;
        let credit_accounts = client
            .find_related(credit_account::Entity)
            .order_by_asc(credit_account::Column::Id)
            .all(&self.db)
            .await?;

        debug!(
            user_id = id,
            banks = banks.len(),
            payment_accounts = payment_accounts.len(),
            credit_accounts = credit_accounts.len(),
            "Collected user info"
        );

        Ok(UserInfo {
            user: client,
            banks,
            payment_accounts,
            credit_accounts,
        })
    }
}
