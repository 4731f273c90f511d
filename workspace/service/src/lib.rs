//! Repository-style services for the banking domain.
//!
//! One service per table. Every operation that touches more than one row
//! runs in a single transaction so the bank and office counters always match
//! the rows they count.

pub mod bank;
pub mod bank_atm;
pub mod bank_office;
pub mod credit_account;
pub mod employee;
pub mod error;
pub mod payment_account;
pub mod user;

mod store;

#[cfg(test)]
mod testing;

use sea_orm::DatabaseConnection;

pub use bank::{BankInfo, BankService, BankUpdate};
pub use bank_atm::{BankAtmService, BankAtmUpdate, NewBankAtm};
pub use bank_office::{BankOfficeService, BankOfficeUpdate, NewBankOffice};
pub use credit_account::{CreditAccountService, CreditAccountUpdate, NewCreditAccount};
pub use employee::{EmployeeService, EmployeeUpdate, NewEmployee};
pub use error::{Result, ServiceError};
pub use payment_account::{NewPaymentAccount, PaymentAccountService};
pub use user::{NewUser, UserInfo, UserService, UserUpdate};

/// All services sharing one connection pool.
#[derive(Clone, Debug)]
pub struct Services {
    pub banks: BankService,
    pub offices: BankOfficeService,
    pub atms: BankAtmService,
    pub employees: EmployeeService,
    pub users: UserService,
    pub payment_accounts: PaymentAccountService,
    pub credit_accounts: CreditAccountService,
}

impl Services {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            banks: BankService::new(db.clone()),
            offices: BankOfficeService::new(db.clone()),
            atms: BankAtmService::new(db.clone()),
            employees: EmployeeService::new(db.clone()),
            users: UserService::new(db.clone()),
            payment_accounts: PaymentAccountService::new(db.clone()),
            credit_accounts: CreditAccountService::new(db),
        }
    }
}
