//! SeaORM entity definitions for the banking domain.
//!
//! `bank` is the root aggregate. Offices, ATMs and employees belong to a bank
//! and are removed with it. Users are linked to banks through `user_bank`,
//! and own their payment and credit accounts.

pub mod bank;
pub mod bank_atm;
pub mod bank_office;
pub mod credit_account;
pub mod employee;
pub mod payment_account;
pub mod user;
pub mod user_bank;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::bank::Entity as Bank;
    pub use super::bank_atm::Entity as BankAtm;
    pub use super::bank_office::Entity as BankOffice;
    pub use super::credit_account::Entity as CreditAccount;
    pub use super::employee::Entity as Employee;
    pub use super::payment_account::Entity as PaymentAccount;
    pub use super::user::Entity as User;
    pub use super::user_bank::Entity as UserBank;
}
