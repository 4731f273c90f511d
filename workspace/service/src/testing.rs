//! Fixtures for the service unit tests.

use chrono::NaiveDate;
use common::BankProfile;
use migration::{Migrator, MigratorTrait};
use model::entities::{bank, bank_office, employee, user};
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection};

use crate::bank_office::NewBankOffice;
use crate::employee::NewEmployee;
use crate::user::NewUser;
use crate::Services;

/// Create an in-memory SQLite database with the schema applied
pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    db.execute_unprepared("PRAGMA foreign_keys = ON;")
        .await
        .expect("Failed to enable foreign keys");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

pub async fn setup_services() -> Services {
    Services::new(setup_db().await)
}

pub fn profile(rating: i32, total_money: i64, interest_rate: Decimal) -> BankProfile {
    BankProfile {
        rating,
        total_money,
        interest_rate,
    }
}

pub async fn bank(services: &Services, name: &str) -> bank::Model {
    services
        .banks
        .create_with_profile(name, profile(75, 500_000, Decimal::new(735, 2)))
        .await
        .expect("Failed to create bank")
}

pub fn new_office(bank_id: i32, address: &str) -> NewBankOffice {
    NewBankOffice {
        name: "office".to_string(),
        address: address.to_string(),
        status: "working".to_string(),
        can_place_atm: true,
        can_provide_credit: true,
        dispense_money: true,
        accept_money: true,
        rent_cost: Decimal::new(100, 1),
        bank_id,
    }
}

pub async fn office(services: &Services, bank_id: i32) -> bank_office::Model {
    services
        .offices
        .create(new_office(bank_id, "ul. Pushkina, dom Kolotushkina"))
        .await
        .expect("Failed to create office")
}

pub fn new_employee(bank_id: i32, bank_office_id: Option<i32>) -> NewEmployee {
    NewEmployee {
        full_name: "Anna Smirnova".to_string(),
        birth_date: NaiveDate::from_ymd_opt(1988, 3, 22).unwrap(),
        position: "teller".to_string(),
        bank_id,
        works_remotely: false,
        bank_office_id,
        can_provide_credit: true,
        salary: Decimal::new(10_000, 0),
    }
}

pub async fn employee(services: &Services, bank_id: i32, bank_office_id: Option<i32>) -> employee::Model {
    services
        .employees
        .create(new_employee(bank_id, bank_office_id))
        .await
        .expect("Failed to create employee")
}

pub fn new_user(full_name: &str, banks: &[&str]) -> NewUser {
    NewUser {
        full_name: full_name.to_string(),
        birth_date: NaiveDate::from_ymd_opt(1990, 1, 15).unwrap(),
        job: Some("engineer".to_string()),
        monthly_income: Decimal::new(7500, 0),
        banks: banks.iter().map(|name| name.to_string()).collect(),
    }
}

pub async fn user(services: &Services, full_name: &str, banks: &[&str]) -> user::Model {
    services
        .users
        .create(new_user(full_name, banks))
        .await
        .expect("Failed to create user")
}
