//! Domain rules shared by the services and the CLI.
//! Nothing in here touches the database, so every rule can be checked in
//! isolation.

mod credit;
mod rates;

pub use credit::{
    credit_rating, credit_rating_for, validate_monthly_income, IncomeError, MAX_CREDIT_RATING,
    MAX_MONTHLY_INCOME, MIN_CREDIT_RATING,
};
pub use rates::{
    rating_multiplier, sample_base_rate, tiered_interest_rate, BankProfile, MAX_INTEREST_RATE,
    MAX_RATING, MAX_TOTAL_MONEY,
};
