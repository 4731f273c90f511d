//! ATMs.
//!
//! An ATM lives in an office of its bank. It copies the office address and
//! takes a one-time snapshot of the bank's money when installed; later
//! changes to either do not reach it. Installing and removing an ATM moves
//! both the bank's and the office's ATM counters.

use model::entities::{bank, bank_atm, bank_office, employee};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, ServiceError};
use crate::store::{adjust_bank_counter, adjust_office_atms, fetch};

/// Input for [`BankAtmService::create`]. Address and money are taken from
/// the office and the bank.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewBankAtm {
    pub name: String,
    pub status: String,
    pub bank_id: i32,
    pub bank_office_id: i32,
    pub employee_id: Option<i32>,
    pub dispense_money: bool,
    pub accept_money: bool,
    pub maintenance_cost: Decimal,
}

/// Changeable ATM fields.
///
/// `employee_id: Some(None)` unassigns the employee.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BankAtmUpdate {
    pub name: Option<String>,
    pub status: Option<String>,
    pub employee_id: Option<Option<i32>>,
    pub dispense_money: Option<bool>,
    pub accept_money: Option<bool>,
    pub maintenance_cost: Option<Decimal>,
}

#[derive(Clone, Debug)]
pub struct BankAtmService {
    db: DatabaseConnection,
}

/// Fails unless `employee_id` names an employee of `bank_id`.
async fn check_employee<C: ConnectionTrait>(conn: &C, bank_id: i32, employee_id: i32) -> Result<()> {
    let staff = fetch::<employee::Entity, _>(conn, "Employee", employee_id).await?;
    if staff.bank_id != bank_id {
        return Err(ServiceError::Validation(format!(
            "employee {employee_id} works for bank {}, not bank {bank_id}",
            staff.bank_id
        )));
    }
    Ok(())
}

impl BankAtmService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Installs an ATM in an office of the given bank.
    #[instrument(skip(self))]
    pub async fn create(&self, new: NewBankAtm) -> Result<bank_atm::Model> {
        let txn = self.db.begin().await?;
        let owner = fetch::<bank::Entity, _>(&txn, "Bank", new.bank_id).await?;
        let office = fetch::<bank_office::Entity, _>(&txn, "BankOffice", new.bank_office_id).await?;
        if office.bank_id != owner.id {
            return Err(ServiceError::Validation(format!(
                "office {} belongs to bank {}, not bank {}",
                office.id, office.bank_id, owner.id
            )));
        }
        if let Some(employee_id) = new.employee_id {
            check_employee(&txn, owner.id, employee_id).await?;
        }

        let atm = bank_atm::ActiveModel {
            name: Set(new.name),
            address: Set(office.address.clone()),
            status: Set(new.status),
            bank_id: Set(owner.id),
            bank_office_id: Set(office.id),
            employee_id: Set(new.employee_id),
            dispense_money: Set(new.dispense_money),
            accept_money: Set(new.accept_money),
            money_in_atm: Set(owner.total_money),
            maintenance_cost: Set(new.maintenance_cost),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        adjust_bank_counter(&txn, owner.id, bank::Column::NumAtms, 1).await?;
        adjust_office_atms(&txn, office.id, 1).await?;
        txn.commit().await?;

        info!(
            atm_id = atm.id,
            bank_id = owner.id,
            office_id = office.id,
            money_in_atm = atm.money_in_atm,
            "ATM installed"
        );
        Ok(atm)
    }

    pub async fn read(&self, id: i32) -> Result<bank_atm::Model> {
        fetch::<bank_atm::Entity, _>(&self.db, "BankAtm", id).await
    }

    pub async fn list(&self) -> Result<Vec<bank_atm::Model>> {
        Ok(bank_atm::Entity::find()
            .order_by_asc(bank_atm::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn list_by_office(&self, office_id: i32) -> Result<Vec<bank_atm::Model>> {
        Ok(bank_atm::Entity::find()
            .filter(bank_atm::Column::BankOfficeId.eq(office_id))
            .order_by_asc(bank_atm::Column::Id)
            .all(&self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn update(&self, id: i32, changes: BankAtmUpdate) -> Result<bank_atm::Model> {
        let current = self.read(id).await?;
        if let Some(Some(employee_id)) = changes.employee_id {
            check_employee(&self.db, current.bank_id, employee_id).await?;
        }

        let mut active: bank_atm::ActiveModel = current.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(status) = changes.status {
            active.status = Set(status);
        }
        if let Some(employee_id) = changes.employee_id {
            active.employee_id = Set(employee_id);
        }
        if let Some(dispense_money) = changes.dispense_money {
            active.dispense_money = Set(dispense_money);
        }
        if let Some(accept_money) = changes.accept_money {
            active.accept_money = Set(accept_money);
        }
        if let Some(maintenance_cost) = changes.maintenance_cost {
            active.maintenance_cost = Set(maintenance_cost);
        }

        if !active.is_changed() {
            debug!(atm_id = id, "Empty ATM update");
            return self.read(id).await;
        }
        let updated = active.update(&self.db).await?;
        info!(atm_id = id, "ATM updated");
        Ok(updated)
    }

    /// Removes an ATM and releases it from both counters.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<()> {
        let txn = self.db.begin().await?;
        let atm = match bank_atm::Entity::find_by_id(id).one(&txn).await? {
            Some(atm) => atm,
            None => {
                warn!(atm_id = id, "ATM not found for deletion");
                return Err(ServiceError::not_found("BankAtm", id));
            }
        };

        adjust_bank_counter(&txn, atm.bank_id, bank::Column::NumAtms, -1).await?;
        adjust_office_atms(&txn, atm.bank_office_id, -1).await?;
        atm.delete(&txn).await?;
        txn.commit().await?;

        info!(atm_id = id, "ATM removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::BankUpdate;
    use crate::bank_office::BankOfficeUpdate;
    use crate::testing::{self, setup_services};

    fn new_atm(bank_id: i32, bank_office_id: i32, employee_id: Option<i32>) -> NewBankAtm {
        NewBankAtm {
            name: "Cash point".to_string(),
            status: "working".to_string(),
            bank_id,
            bank_office_id,
            employee_id,
            dispense_money: true,
            accept_money: true,
            maintenance_cost: Decimal::new(2500, 2),
        }
    }

    #[tokio::test]
    async fn test_create_copies_address_and_snapshots_money() {
        let services = setup_services().await;
        let bank = testing::bank(&services, "Sberbank").await;
        let office = testing::office(&services, bank.id).await;

        let atm = services.atms.create(new_atm(bank.id, office.id, None)).await.unwrap();

        assert_eq!(atm.address, office.address);
        assert_eq!(atm.money_in_atm, bank.total_money);
        assert_eq!(atm.employee_id, None);
        assert_eq!(services.banks.read(bank.id).await.unwrap().num_atms, 1);
        assert_eq!(services.offices.read(office.id).await.unwrap().num_atms, 1);

        services
            .banks
            .update(
                bank.id,
                BankUpdate {
                    total_money: Some(1),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        services
            .offices
            .update(
                office.id,
                BankOfficeUpdate {
                    address: Some("Moved".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let atm = services.atms.read(atm.id).await.unwrap();
        assert_eq!(atm.money_in_atm, bank.total_money);
        assert_eq!(atm.address, office.address);
    }

    #[tokio::test]
    async fn test_office_of_another_bank_is_rejected() {
        let services = setup_services().await;
        let sber = testing::bank(&services, "Sberbank").await;
        let other = testing::bank(&services, "Other").await;
        let foreign_office = testing::office(&services, other.id).await;

        let err = services
            .atms
            .create(new_atm(sber.id, foreign_office.id, None))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(services.atms.list().await.unwrap().is_empty());
        assert_eq!(services.banks.read(sber.id).await.unwrap().num_atms, 0);
        assert_eq!(services.offices.read(foreign_office.id).await.unwrap().num_atms, 0);
    }

    #[tokio::test]
    async fn test_missing_office_or_employee_is_not_found() {
        let services = setup_services().await;
        let bank = testing::bank(&services, "Sberbank").await;
        let office = testing::office(&services, bank.id).await;

        let err = services.atms.create(new_atm(bank.id, 77, None)).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "BankOffice", id: 77 }));

        let err = services
            .atms
            .create(new_atm(bank.id, office.id, Some(88)))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "Employee", id: 88 }));
        assert_eq!(services.banks.read(bank.id).await.unwrap().num_atms, 0);
    }

    #[tokio::test]
    async fn test_delete_releases_both_counters() {
        let services = setup_services().await;
        let bank = testing::bank(&services, "Sberbank").await;
        let office = testing::office(&services, bank.id).await;
        let first = services.atms.create(new_atm(bank.id, office.id, None)).await.unwrap();
        services.atms.create(new_atm(bank.id, office.id, None)).await.unwrap();

        services.atms.delete(first.id).await.unwrap();

        assert_eq!(services.banks.read(bank.id).await.unwrap().num_atms, 1);
        assert_eq!(services.offices.read(office.id).await.unwrap().num_atms, 1);
        assert_eq!(services.atms.list_by_office(office.id).await.unwrap().len(), 1);
        assert!(services.atms.delete(first.id).await.unwrap_err().is_not_found());
        assert_eq!(services.banks.read(bank.id).await.unwrap().num_atms, 1);
    }

    #[tokio::test]
    async fn test_employee_assignment_and_removal() {
        let services = setup_services().await;
        let bank = testing::bank(&services, "Sberbank").await;
        let office = testing::office(&services, bank.id).await;
        let technician = testing::employee(&services, bank.id, Some(office.id)).await;
        let atm = services.atms.create(new_atm(bank.id, office.id, None)).await.unwrap();

        let assigned = services
            .atms
            .update(
                atm.id,
                BankAtmUpdate {
                    employee_id: Some(Some(technician.id)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(assigned.employee_id, Some(technician.id));

        services.employees.delete(technician.id).await.unwrap();
        let orphaned = services.atms.read(atm.id).await.unwrap();
        assert_eq!(orphaned.employee_id, None);
    }

    #[tokio::test]
    async fn test_employee_of_another_bank_cannot_be_assigned() {
        let services = setup_services().await;
        let sber = testing::bank(&services, "Sberbank").await;
        let other = testing::bank(&services, "Other").await;
        let office = testing::office(&services, sber.id).await;
        let stranger = testing::employee(&services, other.id, None).await;
        let atm = services.atms.create(new_atm(sber.id, office.id, None)).await.unwrap();

        let err = services
            .atms
            .update(
                atm.id,
                BankAtmUpdate {
                    employee_id: Some(Some(stranger.id)),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(services.atms.read(atm.id).await.unwrap(), atm);
    }
}
