use common::IncomeError;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use tracing::{debug, error};

/// Error types for the banking services
#[derive(Error, Debug)]
pub enum ServiceError {
    /// A row looked up by primary key does not exist
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    /// A bank looked up by name does not exist
    #[error("Bank named '{0}' not found")]
    UnknownBank(String),

    /// The store rejected the statement (check, unique or foreign key)
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// The input was rejected before reaching the store
    #[error("Validation error: {0}")]
    Validation(String),

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(DbErr),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        ServiceError::NotFound { entity, id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::NotFound { .. } | ServiceError::UnknownBank(_))
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, ServiceError::ConstraintViolation(_))
    }
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(message)) => {
                debug!(%message, "Unique constraint violated");
                ServiceError::ConstraintViolation(message)
            }
            Some(SqlErr::ForeignKeyConstraintViolation(message)) => {
                debug!(%message, "Foreign key constraint violated");
                ServiceError::ConstraintViolation(message)
            }
            _ => {
                // Check constraints are not classified by sql_err, both SQLite
                // and Postgres mention them by name in the message.
                let message = err.to_string();
                if message.to_lowercase().contains("check constraint") {
                    debug!(%message, "Check constraint violated");
                    ServiceError::ConstraintViolation(message)
                } else {
                    error!(?err, "Database error");
                    ServiceError::Database(err)
                }
            }
        }
    }
}

impl From<IncomeError> for ServiceError {
    fn from(err: IncomeError) -> Self {
        ServiceError::Validation(err.to_string())
    }
}

/// Type alias for Result with ServiceError
pub type Result<T> = std::result::Result<T, ServiceError>;
