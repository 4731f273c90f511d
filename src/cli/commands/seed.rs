use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use service::{
    NewBankAtm, NewBankOffice, NewCreditAccount, NewEmployee, NewPaymentAccount, NewUser, Services,
};
use tracing::info;

use super::initdb::{connect, migrate};

/// Bank counters after seeding.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SeedSummary {
    pub bank_id: i32,
    pub num_offices: i32,
    pub num_atms: i32,
    pub num_employees: i32,
    pub num_clients: i32,
}

/// Runs migrations, fills the sample data and prints the bank's counters.
pub async fn seed(database_url: &str, bank_name: &str, fresh: bool) -> Result<()> {
    let db = connect(database_url).await?;
    migrate(&db, fresh).await?;

    let summary = seed_database(db, bank_name).await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .with_context(|| format!("invalid date {year}-{month}-{day}"))
}

pub async fn seed_database(db: DatabaseConnection, bank_name: &str) -> Result<SeedSummary> {
    let services = Services::new(db);

    let bank = services
        .banks
        .create(bank_name)
        .await
        .with_context(|| format!("failed to create bank '{bank_name}'"))?;

    let mut offices = Vec::new();
    for _ in 0..2 {
        offices.push(
            services
                .offices
                .create(NewBankOffice {
                    name: "office".to_string(),
                    address: "ul. Pushkina, dom Kolotushkina".to_string(),
                    status: "working".to_string(),
                    can_place_atm: true,
                    can_provide_credit: true,
                    dispense_money: true,
                    accept_money: true,
                    rent_cost: Decimal::new(100, 1),
                    bank_id: bank.id,
                })
                .await?,
        );
    }
    let main_office = offices[0].id;

    let mut employees = Vec::new();
    for _ in 0..2 {
        employees.push(
            services
                .employees
                .create(NewEmployee {
                    full_name: "Anna Smirnova".to_string(),
                    birth_date: date(1990, 3, 22)?,
                    position: "credit officer".to_string(),
                    bank_id: bank.id,
                    works_remotely: true,
                    bank_office_id: Some(main_office),
                    can_provide_credit: true,
                    salary: Decimal::from(10_000),
                })
                .await?,
        );
    }
    let officer = employees[0].id;

    for _ in 0..2 {
        services
            .atms
            .create(NewBankAtm {
                name: "Ya".to_string(),
                status: "working".to_string(),
                bank_id: bank.id,
                bank_office_id: main_office,
                employee_id: Some(officer),
                dispense_money: true,
                accept_money: true,
                maintenance_cost: Decimal::new(110, 1),
            })
            .await?;
    }

    let client = services
        .users
        .create(NewUser {
            full_name: "Ivan Petrov".to_string(),
            birth_date: date(1995, 3, 22)?,
            job: Some("engineer".to_string()),
            monthly_income: Decimal::from(7_500),
            banks: vec![bank.name.clone()],
        })
        .await?;

    let mut accounts = Vec::new();
    for _ in 0..2 {
        accounts.push(
            services
                .payment_accounts
                .create(NewPaymentAccount {
                    user_id: client.id,
                    bank_name: bank.name.clone(),
                    balance: None,
                })
                .await?,
        );
    }

    for account in &accounts {
        services
            .credit_accounts
            .create(NewCreditAccount {
                user_id: client.id,
                bank_name: bank.name.clone(),
                start_date: date(2023, 3, 22)?,
                end_date: Some(date(2024, 1, 22)?),
                loan_duration_months: 10,
                loan_amount: Decimal::from(1_000_000),
                monthly_payment: Decimal::from(100_000),
                employee_id: officer,
                payment_account_id: account.id,
            })
            .await?;
    }

    let bank = services.banks.read(bank.id).await?;
    info!(bank_id = bank.id, "Sample data created");

    Ok(SeedSummary {
        bank_id: bank.id,
        num_offices: bank.num_offices,
        num_atms: bank.num_atms,
        num_employees: bank.num_employees,
        num_clients: bank.num_clients,
    })
}
