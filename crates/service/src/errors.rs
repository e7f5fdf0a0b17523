use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unique constraint violated: {0}")]
    Conflict(String),
    #[error("foreign key constraint violated: {0}")]
    ForeignKey(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("internal error: {0}")]
    Internal(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

/// Classify driver errors by the native constraint signal; the message
/// check covers drivers that do not surface an error code.
impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => ServiceError::Conflict(msg),
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => ServiceError::ForeignKey(msg),
            _ => {
                let msg = err.to_string();
                if msg.contains("UNIQUE constraint failed") {
                    ServiceError::Conflict(msg)
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    ServiceError::ForeignKey(msg)
                } else {
                    ServiceError::Db(msg)
                }
            }
        }
    }
}
