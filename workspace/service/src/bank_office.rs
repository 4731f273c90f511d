//! Bank offices.
//!
//! An office starts with the owning bank's money and no ATMs. Creating or
//! deleting one moves the bank's `num_offices` counter in the same
//! transaction.

use model::entities::{bank, bank_office};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, ServiceError};
use crate::store::{adjust_bank_counter, fetch, release_office_atms};

/// Input for [`BankOfficeService::create`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewBankOffice {
    pub name: String,
    pub address: String,
    pub status: String,
    pub can_place_atm: bool,
    pub can_provide_credit: bool,
    pub dispense_money: bool,
    pub accept_money: bool,
    pub rent_cost: Decimal,
    pub bank_id: i32,
}

/// Changeable office fields. The bank and the ATM counter are fixed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BankOfficeUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub status: Option<String>,
    pub can_place_atm: Option<bool>,
    pub can_provide_credit: Option<bool>,
    pub dispense_money: Option<bool>,
    pub accept_money: Option<bool>,
    pub money_in_office: Option<i64>,
    pub rent_cost: Option<Decimal>,
}

#[derive(Clone, Debug)]
pub struct BankOfficeService {
    db: DatabaseConnection,
}

impl BankOfficeService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Opens an office holding the bank's current `total_money`.
    #[instrument(skip(self))]
    pub async fn create(&self, new: NewBankOffice) -> Result<bank_office::Model> {
        let txn = self.db.begin().await?;
        let owner = fetch::<bank::Entity, _>(&txn, "Bank", new.bank_id).await?;

        let office = bank_office::ActiveModel {
            name: Set(new.name),
            address: Set(new.address),
            status: Set(new.status),
            can_place_atm: Set(new.can_place_atm),
            num_atms: Set(0),
            can_provide_credit: Set(new.can_provide_credit),
            dispense_money: Set(new.dispense_money),
            accept_money: Set(new.accept_money),
            money_in_office: Set(owner.total_money),
            rent_cost: Set(new.rent_cost),
            bank_id: Set(owner.id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        adjust_bank_counter(&txn, owner.id, bank::Column::NumOffices, 1).await?;
        txn.commit().await?;

        info!(office_id = office.id, bank_id = owner.id, "Bank office created");
        Ok(office)
    }

    pub async fn read(&self, id: i32) -> Result<bank_office::Model> {
        fetch::<bank_office::Entity, _>(&self.db, "BankOffice", id).await
    }

    pub async fn list(&self) -> Result<Vec<bank_office::Model>> {
        Ok(bank_office::Entity::find()
            .order_by_asc(bank_office::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn list_by_bank(&self, bank_id: i32) -> Result<Vec<bank_office::Model>> {
        Ok(bank_office::Entity::find()
            .filter(bank_office::Column::BankId.eq(bank_id))
            .order_by_asc(bank_office::Column::Id)
            .all(&self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn update(&self, id: i32, changes: BankOfficeUpdate) -> Result<bank_office::Model> {
        let current = self.read(id).await?;
        let mut active: bank_office::ActiveModel = current.into();

        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(address) = changes.address {
            active.address = Set(address);
        }
        if let Some(status) = changes.status {
            active.status = Set(status);
        }
        if let Some(can_place_atm) = changes.can_place_atm {
            active.can_place_atm = Set(can_place_atm);
        }
        if let Some(can_provide_credit) = changes.can_provide_credit {
            active.can_provide_credit = Set(can_provide_credit);
        }
        if let Some(dispense_money) = changes.dispense_money {
            active.dispense_money = Set(dispense_money);
        }
        if let Some(accept_money) = changes.accept_money {
            active.accept_money = Set(accept_money);
        }
        if let Some(money_in_office) = changes.money_in_office {
            active.money_in_office = Set(money_in_office);
        }
        if let Some(rent_cost) = changes.rent_cost {
            active.rent_cost = Set(rent_cost);
        }

        if !active.is_changed() {
            debug!(office_id = id, "Empty office update");
            return self.read(id).await;
        }
        let updated = active.update(&self.db).await?;
        info!(office_id = id, "Bank office updated");
        Ok(updated)
    }

    /// Closes an office. Its ATMs are removed by the store, so the bank loses
    /// the office and every ATM it held.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<()> {
        let txn = self.db.begin().await?;
        // Hold the office row so no ATM can be installed in it meanwhile.
        let office = match bank_office::Entity::find_by_id(id).lock_exclusive().one(&txn).await? {
            Some(office) => office,
            None => {
                warn!(office_id = id, "Bank office not found for deletion");
                return Err(ServiceError::not_found("BankOffice", id));
            }
        };

        let bank_id = office.bank_id;
        adjust_bank_counter(&txn, bank_id, bank::Column::NumOffices, -1).await?;
        release_office_atms(&txn, bank_id, office.id).await?;
        office.delete(&txn).await?;
        txn.commit().await?;

        info!(office_id = id, bank_id, "Bank office deleted");
        Ok(())
    }
}
