//! Banks: the root aggregate.
//!
//! Creating a bank samples its rating, money and interest rate. The counters
//! start at zero and are maintained by the child services. Deleting a bank
//! relies on the store's cascades to remove its offices, ATMs, employees and
//! client associations.

use common::BankProfile;
use model::entities::{bank, bank_atm, bank_office, credit_account, employee, payment_account, user};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, ServiceError};
use crate::store::fetch;

/// Fields of a bank that may be changed after creation.
///
/// Counters are absent on purpose: they only move together with the rows
/// they count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BankUpdate {
    pub name: Option<String>,
    pub rating: Option<i32>,
    pub total_money: Option<i64>,
    pub interest_rate: Option<Decimal>,
}

impl BankUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.rating.is_none()
            && self.total_money.is_none()
            && self.interest_rate.is_none()
    }
}

/// Everything attached to one bank.
#[derive(Debug, Clone, Serialize)]
pub struct BankInfo {
    pub bank: bank::Model,
    pub offices: Vec<bank_office::Model>,
    pub atms: Vec<bank_atm::Model>,
    pub employees: Vec<employee::Model>,
    pub users: Vec<user::Model>,
}

#[derive(Clone, Debug)]
pub struct BankService {
    db: DatabaseConnection,
}

impl BankService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Founds a bank with a randomly generated profile.
    #[instrument(skip(self))]
    pub async fn create(&self, name: &str) -> Result<bank::Model> {
        let profile = BankProfile::generate(&mut rand::thread_rng());
        self.create_with_profile(name, profile).await
    }

    /// Founds a bank with the given profile. All counters start at zero.
    #[instrument(skip(self))]
    pub async fn create_with_profile(&self, name: &str, profile: BankProfile) -> Result<bank::Model> {
        let created = bank::ActiveModel {
            name: Set(name.to_string()),
            num_offices: Set(0),
            num_atms: Set(0),
            num_employees: Set(0),
            num_clients: Set(0),
            rating: Set(profile.rating),
            total_money: Set(profile.total_money),
            interest_rate: Set(profile.interest_rate),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!(
            bank_id = created.id,
            rating = created.rating,
            total_money = created.total_money,
            interest_rate = %created.interest_rate,
            "Bank created"
        );
        Ok(created)
    }

    pub async fn read(&self, id: i32) -> Result<bank::Model> {
        fetch::<bank::Entity, _>(&self.db, "Bank", id).await
    }

    pub async fn find_by_name(&self, name: &str) -> Result<bank::Model> {
        crate::store::find_bank_by_name(&self.db, name).await
    }

    pub async fn list(&self) -> Result<Vec<bank::Model>> {
        Ok(bank::Entity::find()
            .order_by_asc(bank::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Applies a partial update.
    ///
    /// Renaming a bank also renames it on every payment and credit account
    /// that refers to it by name, in the same transaction.
    #[instrument(skip(self))]
    pub async fn update(&self, id: i32, changes: BankUpdate) -> Result<bank::Model> {
        let txn = self.db.begin().await?;
        let current = fetch::<bank::Entity, _>(&txn, "Bank", id).await?;
        if changes.is_empty() {
            debug!(bank_id = id, "Empty bank update");
            return Ok(current);
        }

        let old_name = current.name.clone();
        let mut active: bank::ActiveModel = current.into();
        if let Some(name) = changes.name.clone() {
            active.name = Set(name);
        }
        if let Some(rating) = changes.rating {
            active.rating = Set(rating);
        }
        if let Some(total_money) = changes.total_money {
            active.total_money = Set(total_money);
        }
        if let Some(interest_rate) = changes.interest_rate {
            active.interest_rate = Set(interest_rate);
        }
        let updated = active.update(&txn).await?;

        if updated.name != old_name {
            let payments = payment_account::Entity::update_many()
                .col_expr(payment_account::Column::BankName, Expr::value(updated.name.clone()))
                .filter(payment_account::Column::BankName.eq(old_name.as_str()))
                .exec(&txn)
                .await?;
            let credits = credit_account::Entity::update_many()
                .col_expr(credit_account::Column::BankName, Expr::value(updated.name.clone()))
                .filter(credit_account::Column::BankName.eq(old_name.as_str()))
                .exec(&txn)
                .await?;
            debug!(
                payment_accounts = payments.rows_affected,
                credit_accounts = credits.rows_affected,
                "Propagated bank rename"
            );
        }

        txn.commit().await?;
        info!(bank_id = id, "Bank updated");
        Ok(updated)
    }

    /// Deletes the bank. Offices, ATMs, employees and client links go with it.
    ///
    /// Accounts refer to their bank by name, so they are closed here in the
    /// same transaction: every payment account at the bank, every loan issued
    /// by it, and every loan paid out through one of those payment accounts.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<()> {
        let txn = self.db.begin().await?;
        let doomed = match bank::Entity::find_by_id(id).one(&txn).await? {
            Some(doomed) => doomed,
            None => {
                warn!(bank_id = id, "Bank not found for deletion");
                return Err(ServiceError::not_found("Bank", id));
            }
        };

        let account_ids: Vec<i32> = payment_account::Entity::find()
            .filter(payment_account::Column::BankName.eq(doomed.name.as_str()))
            .all(&txn)
            .await?
            .into_iter()
            .map(|account| account.id)
            .collect();

        let loans = credit_account::Entity::delete_many()
            .filter(
                Condition::any()
                    .add(credit_account::Column::BankName.eq(doomed.name.as_str()))
                    .add(credit_account::Column::PaymentAccountId.is_in(account_ids.clone())),
            )
            .exec(&txn)
            .await?;
        let accounts = payment_account::Entity::delete_many()
            .filter(payment_account::Column::Id.is_in(account_ids))
            .exec(&txn)
            .await?;

        doomed.delete(&txn).await?;
        txn.commit().await?;

        info!(
            bank_id = id,
            payment_accounts = accounts.rows_affected,
            credit_accounts = loans.rows_affected,
            "Bank deleted"
        );
        Ok(())
    }

    /// Collects the offices, ATMs, employees and clients of a bank.
    #[instrument(skip(self))]
    pub async fn get_all_info_about_bank(&self, id: i32) -> Result<BankInfo> {
        let bank = self.read(id).await?;

        let offices = bank
            .find_related(bank_office::Entity)
            .order_by_asc(bank_office::Column::Id)
            .all(&self.db)
            .await?;
        let atms = bank
            .find_related(bank_atm::Entity)
            .order_by_asc(bank_atm::Column::Id)
            .all(&self.db)
            .await?;
        let employees = bank
            .find_related(employee::Entity)
            .order_by_asc(employee::Column::Id)
            .all(&self.db)
            .await?;
        let users = bank
            .find_related(user::Entity)
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await?;

        debug!(
            bank_id = id,
            offices = offices.len(),
            atms = atms.len(),
            employees = employees.len(),
            users = users.len(),
            "Collected bank info"
        );

        Ok(BankInfo {
            bank,
            offices,
            atms,
            employees,
            users,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, profile, setup_services};

    #[tokio::test]
    async fn test_create_stores_profile_with_zero_counters() {
        let services = setup_services().await;

        let bank = services
            .banks
            .create_with_profile("Sberbank", profile(85, 250_000, Decimal::new(612, 2)))
            .await
            .unwrap();

        assert!(bank.id > 0);
        assert_eq!(bank.name, "Sberbank");
        assert_eq!(bank.rating, 85);
        assert_eq!(bank.total_money, 250_000);
        assert_eq!(bank.interest_rate, Decimal::new(612, 2));
        assert_eq!(
            (bank.num_offices, bank.num_atms, bank.num_employees, bank.num_clients),
            (0, 0, 0, 0)
        );

        let read = services.banks.read(bank.id).await.unwrap();
        assert_eq!(read, bank);
    }

    #[tokio::test]
    async fn test_random_create_respects_ranges() {
        let services = setup_services().await;

        for index in 0..20 {
            let bank = services.banks.create(&format!("Bank {index}")).await.unwrap();
            assert!((0..=100).contains(&bank.rating));
            assert!((0..=1_000_000).contains(&bank.total_money));
            assert!(bank.interest_rate >= Decimal::ZERO);
            assert!(bank.interest_rate <= Decimal::from(20));
            if bank.rating > 80 {
                assert!(bank.interest_rate <= Decimal::from(10));
            }
        }
        assert_eq!(services.banks.list().await.unwrap().len(), 20);
    }

    #[tokio::test]
    async fn test_duplicate_name_is_a_constraint_violation() {
        let services = setup_services().await;
        testing::bank(&services, "Sberbank").await;

        let err = services
            .banks
            .create_with_profile("Sberbank", profile(10, 10, Decimal::ONE))
            .await
            .unwrap_err();
        assert!(err.is_constraint_violation(), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn test_out_of_range_profile_is_rejected() {
        let services = setup_services().await;

        let err = services
            .banks
            .create_with_profile("Overflow", profile(50, 2_000_000, Decimal::ONE))
            .await
            .unwrap_err();
        assert!(err.is_constraint_violation(), "unexpected error: {err}");
        assert!(services.banks.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_bank_is_not_found() {
        let services = setup_services().await;

        assert!(matches!(
            services.banks.read(42).await,
            Err(ServiceError::NotFound { entity: "Bank", id: 42 })
        ));
        assert!(services.banks.delete(42).await.unwrap_err().is_not_found());
        assert!(services
            .banks
            .update(42, BankUpdate::default())
            .await
            .unwrap_err()
            .is_not_found());
        assert!(services.banks.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_partial_update_changes_only_given_fields() {
        let services = setup_services().await;
        let bank = testing::bank(&services, "Sberbank").await;

        let updated = services
            .banks
            .update(
                bank.id,
                BankUpdate {
                    total_money: Some(999),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.total_money, 999);
        assert_eq!(updated.name, bank.name);
        assert_eq!(updated.rating, bank.rating);
        assert_eq!(updated.interest_rate, bank.interest_rate);
    }

    #[tokio::test]
    async fn test_invalid_update_leaves_row_untouched() {
        let services = setup_services().await;
        let bank = testing::bank(&services, "Sberbank").await;

        let err = services
            .banks
            .update(
                bank.id,
                BankUpdate {
                    interest_rate: Some(Decimal::from(25)),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(err.is_constraint_violation(), "unexpected error: {err}");
        assert_eq!(services.banks.read(bank.id).await.unwrap(), bank);
    }

    #[tokio::test]
    async fn test_rename_propagates_to_accounts() {
        let services = setup_services().await;
        let bank = testing::bank(&services, "Sberbank").await;
        let client = testing::user(&services, "Ivan Petrov", &["Sberbank"]).await;
        let account = services
            .payment_accounts
            .create(crate::payment_account::NewPaymentAccount {
                user_id: client.id,
                bank_name: "Sberbank".to_string(),
                balance: None,
            })
            .await
            .unwrap();

        services
            .banks
            .update(
                bank.id,
                BankUpdate {
                    name: Some("SberBank PJSC".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let account = services.payment_accounts.read(account.id).await.unwrap();
        assert_eq!(account.bank_name, "SberBank PJSC");
        let banks = services.users.banks_of(client.id).await.unwrap();
        assert_eq!(banks[0].name, "SberBank PJSC");
    }

    #[tokio::test]
    async fn test_all_info_collects_children_and_clients() {
        let services = setup_services().await;
        let sber = testing::bank(&services, "Sberbank").await;
        let other = testing::bank(&services, "Other").await;

        let office = testing::office(&services, sber.id).await;
        testing::office(&services, other.id).await;
        let teller = testing::employee(&services, sber.id, Some(office.id)).await;
        services
            .atms
            .create(crate::bank_atm::NewBankAtm {
                name: "Ya".to_string(),
                status: "working".to_string(),
                bank_id: sber.id,
                bank_office_id: office.id,
                employee_id: Some(teller.id),
                dispense_money: true,
                accept_money: true,
                maintenance_cost: Decimal::new(110, 1),
            })
            .await
            .unwrap();
        let client = testing::user(&services, "Ivan Petrov", &["Sberbank"]).await;
        testing::user(&services, "Olga Ivanova", &["Other"]).await;

        let info = services.banks.get_all_info_about_bank(sber.id).await.unwrap();

        assert_eq!(info.bank.num_offices, 1);
        assert_eq!(info.offices, vec![services.offices.read(office.id).await.unwrap()]);
        assert_eq!(info.atms.len(), 1);
        assert_eq!(info.employees, vec![teller]);
        assert_eq!(info.users, vec![client]);
    }

    #[tokio::test]
    async fn test_all_info_for_missing_bank_is_not_found() {
        let services = setup_services().await;
        let err = services.banks.get_all_info_about_bank(7).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "Bank", id: 7 }));
    }

    fn loan(
        user_id: i32,
        bank_name: &str,
        employee_id: i32,
        payment_account_id: i32,
    ) -> crate::credit_account::NewCreditAccount {
        crate::credit_account::NewCreditAccount {
            user_id,
            bank_name: bank_name.to_string(),
            start_date: chrono::NaiveDate::from_ymd_opt(2023, 3, 22).unwrap(),
            end_date: None,
            loan_duration_months: 12,
            loan_amount: Decimal::from(50_000),
            monthly_payment: Decimal::from(4_500),
            employee_id,
            payment_account_id,
        }
    }

    async fn open_account(services: &crate::Services, user_id: i32, bank_name: &str) -> payment_account::Model {
        services
            .payment_accounts
            .create(crate::payment_account::NewPaymentAccount {
                user_id,
                bank_name: bank_name.to_string(),
                balance: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_delete_closes_accounts_naming_the_bank() {
        let services = setup_services().await;
        let sber = testing::bank(&services, "Sberbank").await;
        let officer = testing::employee(&services, sber.id, None).await;
        let client = testing::user(&services, "Ivan Petrov", &["Sberbank"]).await;
        let account = open_account(&services, client.id, "Sberbank").await;
        let issued = services
            .credit_accounts
            .create(loan(client.id, "Sberbank", officer.id, account.id))
            .await
            .unwrap();

        services.banks.delete(sber.id).await.unwrap();

        assert!(services.payment_accounts.read(account.id).await.unwrap_err().is_not_found());
        assert!(services.credit_accounts.read(issued.id).await.unwrap_err().is_not_found());
        assert!(services.employees.read(officer.id).await.unwrap_err().is_not_found());

        // A new bank under the old name starts without any accounts.
        testing::bank(&services, "Sberbank").await;
        let info = services.users.get_all_info_about_user(client.id).await.unwrap();
        assert!(info.payment_accounts.is_empty());
        assert!(info.credit_accounts.is_empty());
        assert!(info.banks.is_empty());
    }

    #[tokio::test]
    async fn test_delete_spares_other_banks_accounts() {
        let services = setup_services().await;
        let sber = testing::bank(&services, "Sberbank").await;
        let other = testing::bank(&services, "Other").await;
        let other_officer = testing::employee(&services, other.id, None).await;
        let client = testing::user(&services, "Ivan Petrov", &["Sberbank", "Other"]).await;
        let sber_account = open_account(&services, client.id, "Sberbank").await;
        let other_account = open_account(&services, client.id, "Other").await;

        // Issued by the other bank, paid out through the doomed bank's account.
        let routed = services
            .credit_accounts
            .create(loan(client.id, "Other", other_officer.id, sber_account.id))
            .await
            .unwrap();
        let kept = services
            .credit_accounts
            .create(loan(client.id, "Other", other_officer.id, other_account.id))
            .await
            .unwrap();

        services.banks.delete(sber.id).await.unwrap();

        assert!(services.credit_accounts.read(routed.id).await.unwrap_err().is_not_found());
        assert_eq!(services.credit_accounts.read(kept.id).await.unwrap(), kept);
        assert_eq!(services.payment_accounts.read(other_account.id).await.unwrap(), other_account);
        assert_eq!(services.banks.read(other.id).await.unwrap().num_clients, 1);
    }
}
