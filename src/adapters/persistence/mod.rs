use sqlx::{PgPool, error::ErrorKind};

use crate::app_error::AppError;

pub mod payment;
pub mod subscription;
pub mod user;

#[derive(Clone)]
pub struct PostgresPersistence {
    pool: PgPool,
}

impl PostgresPersistence {
    pub fn new(pool: PgPool) -> Self {
        PostgresPersistence { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => AppError::NotFound,
            sqlx::Error::Database(db_err) => match db_err.kind() {
                ErrorKind::UniqueViolation => {
                    AppError::persistence("A record with this value already exists")
                }
                ErrorKind::ForeignKeyViolation => {
                    AppError::persistence("Referenced record not found")
                }
                ErrorKind::NotNullViolation => AppError::persistence("Required field is missing"),
                _ => {
                    // Log the actual error for debugging, but don't expose details
                    tracing::error!(error = ?err, "Database error");
                    AppError::persistence("Database operation failed")
                }
            },
            _ => {
                tracing::error!(error = ?err, "Database error");
                AppError::persistence("Database operation failed")
            }
        }
    }
}
