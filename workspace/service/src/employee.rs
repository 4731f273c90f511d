//! Bank employees.
//!
//! An employee belongs to a bank and optionally works from one of its
//! offices. When that office closes the employee stays on staff with no
//! office.

use chrono::NaiveDate;
use model::entities::{bank, bank_office, employee};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, ServiceError};
use crate::store::{adjust_bank_counter, fetch};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewEmployee {
    pub full_name: String,
    pub birth_date: NaiveDate,
    pub position: String,
    pub bank_id: i32,
    pub works_remotely: bool,
    pub bank_office_id: Option<i32>,
    pub can_provide_credit: bool,
    pub salary: Decimal,
}

/// Changeable employee fields.
///
/// `bank_office_id: Some(None)` detaches the employee from any office.
/// Moving to another bank is not supported.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeUpdate {
    pub full_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub position: Option<String>,
    pub works_remotely: Option<bool>,
    pub bank_office_id: Option<Option<i32>>,
    pub can_provide_credit: Option<bool>,
    pub salary: Option<Decimal>,
}

#[derive(Clone, Debug)]
pub struct EmployeeService {
    db: DatabaseConnection,
}

/// Fails unless `office_id` names an office of `bank_id`.
async fn check_office<C: ConnectionTrait>(conn: &C, bank_id: i32, office_id: i32) -> Result<()> {
    let office = fetch::<bank_office::Entity, _>(conn, "BankOffice", office_id).await?;
    if office.bank_id != bank_id {
        return Err(ServiceError::Validation(format!(
            "office {office_id} belongs to bank {}, not bank {bank_id}",
            office.bank_id
        )));
    }
    Ok(())
}

impl EmployeeService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Hires an employee and counts them on the bank.
    #[instrument(skip(self))]
    pub async fn create(&self, new: NewEmployee) -> Result<employee::Model> {
        let txn = self.db.begin().await?;
        let owner = fetch::<bank::Entity, _>(&txn, "Bank", new.bank_id).await?;
        if let Some(office_id) = new.bank_office_id {
            check_office(&txn, owner.id, office_id).await?;
        }

        let hired = employee::ActiveModel {
            full_name: Set(new.full_name),
            birth_date: Set(new.birth_date),
            position: Set(new.position),
            bank_id: Set(owner.id),
            works_remotely: Set(new.works_remotely),
            bank_office_id: Set(new.bank_office_id),
            can_provide_credit: Set(new.can_provide_credit),
            salary: Set(new.salary),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        adjust_bank_counter(&txn, owner.id, bank::Column::NumEmployees, 1).await?;
        txn.commit().await?;

        info!(employee_id = hired.id, bank_id = owner.id, "Employee hired");
        Ok(hired)
    }

    pub async fn read(&self, id: i32) -> Result<employee::Model> {
        fetch::<employee::Entity, _>(&self.db, "Employee", id).await
    }

    pub async fn list(&self) -> Result<Vec<employee::Model>> {
        Ok(employee::Entity::find()
            .order_by_asc(employee::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn list_by_bank(&self, bank_id: i32) -> Result<Vec<employee::Model>> {
        Ok(employee::Entity::find()
            .filter(employee::Column::BankId.eq(bank_id))
            .order_by_asc(employee::Column::Id)
            .all(&self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn update(&self, id: i32, changes: EmployeeUpdate) -> Result<employee::Model> {
        let current = self.read(id).await?;
        if let Some(Some(office_id)) = changes.bank_office_id {
            check_office(&self.db, current.bank_id, office_id).await?;
        }

        let mut active: employee::ActiveModel = current.into();
        if let Some(full_name) = changes.full_name {
            active.full_name = Set(full_name);
        }
        if let Some(birth_date) = changes.birth_date {
            active.birth_date = Set(birth_date);
        }
        if let Some(position) = changes.position {
            active.position = Set(position);
        }
        if let Some(works_remotely) = changes.works_remotely {
            active.works_remotely = Set(works_remotely);
        }
        if let Some(bank_office_id) = changes.bank_office_id {
            active.bank_office_id = Set(bank_office_id);
        }
        if let Some(can_provide_credit) = changes.can_provide_credit {
            active.can_provide_credit = Set(can_provide_credit);
        }
        if let Some(salary) = changes.salary {
            active.salary = Set(salary);
        }

        if !active.is_changed() {
            debug!(employee_id = id, "Empty employee update");
            return self.read(id).await;
        }
        let updated = active.update(&self.db).await?;
        info!(employee_id = id, "Employee updated");
        Ok(updated)
    }

    /// Dismisses an employee. ATMs they serviced lose their technician; an
    /// employee who still backs a credit account cannot be removed.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<()> {
        let txn = self.db.begin().await?;
        let staff = match employee::Entity::find_by_id(id).one(&txn).await? {
            Some(staff) => staff,
            None => {
                warn!(employee_id = id, "Employee not found for deletion");
                return Err(ServiceError::not_found("Employee", id));
            }
        };

        adjust_bank_counter(&txn, staff.bank_id, bank::Column::NumEmployees, -1).await?;
        staff.delete(&txn).await?;
        txn.commit().await?;

        info!(employee_id = id, "Employee dismissed");
        Ok(())
    }
}
