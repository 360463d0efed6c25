use rusqlite::ErrorCode;
use thiserror::Error;

use shared_models::records::RecordId;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: RecordId },

    #[error("Constraint violated: {0}")]
    ConstraintViolation(String),

    #[error("Invalid stored value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Database task failed: {0}")]
    Task(String),
}

impl DatabaseError {
    pub fn not_found(entity: &'static str, id: RecordId) -> Self {
        DatabaseError::NotFound { entity, id }
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, DatabaseError::ConstraintViolation(_))
    }
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            // Foreign key, UNIQUE, CHECK and trigger RAISE(ABORT) all land here.
            rusqlite::Error::SqliteFailure(failure, message)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                DatabaseError::ConstraintViolation(
                    message.unwrap_or_else(|| failure.to_string()),
                )
            }
            other => DatabaseError::Sqlite(other),
        }
    }
}
