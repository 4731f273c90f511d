//! Credit rating of a user, derived from their monthly income.

use rust_decimal::prelude::*;
use thiserror::Error;

/// Highest monthly income a user may declare (inclusive).
pub const MAX_MONTHLY_INCOME: i64 = 10_000;

pub const MIN_CREDIT_RATING: i32 = 100;
pub const MAX_CREDIT_RATING: i32 = 1000;

/// Reasons a monthly income cannot produce a valid credit rating.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IncomeError {
    /// A zero or negative income would yield a rating below 100.
    #[error("monthly income must be positive, got {0}")]
    NotPositive(Decimal),
    #[error("monthly income must not exceed 10000, got {0}")]
    AboveLimit(Decimal),
}

/// `ceil(monthly_income / 1000) * 100`.
///
/// This is the raw step function. It is not clamped: an income of 0 gives 0,
/// which the store rejects. Use [`credit_rating_for`] to validate first.
pub fn credit_rating(monthly_income: Decimal) -> i32 {
    let steps = (monthly_income / Decimal::from(1000)).ceil();
    (steps * Decimal::from(100)).to_i32().unwrap_or(i32::MAX)
}

pub fn validate_monthly_income(monthly_income: Decimal) -> Result<(), IncomeError> {
    if monthly_income <= Decimal::ZERO {
        return Err(IncomeError::NotPositive(monthly_income));
    }
    if monthly_income > Decimal::from(MAX_MONTHLY_INCOME) {
        return Err(IncomeError::AboveLimit(monthly_income));
    }
    Ok(())
}

/// Validates the income and returns its credit rating, always in
/// `[MIN_CREDIT_RATING, MAX_CREDIT_RATING]`.
pub fn credit_rating_for(monthly_income: Decimal) -> Result<i32, IncomeError> {
    validate_monthly_income(monthly_income)?;
    Ok(credit_rating(monthly_income))
}
