use serde::Deserialize;
use thiserror::Error;

use shared_database::DatabaseError;
use shared_models::error::AppError;
use shared_models::records::RecordId;

#[derive(Debug, Default, Deserialize)]
pub struct PatientSearchQuery {
    /// Case-insensitive substring of the patient name.
    pub name: Option<String>,
}

#[derive(Error, Debug)]
pub enum PatientError {
    #[error("Patient {0} not found")]
    NotFound(RecordId),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Storage failure: {0}")]
    Storage(#[from] DatabaseError),
}

impl From<rusqlite::Error> for PatientError {
    fn from(err: rusqlite::Error) -> Self {
        PatientError::Storage(DatabaseError::from(err))
    }
}

impl From<PatientError> for AppError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::NotFound(_) => AppError::NotFound(err.to_string()),
            PatientError::ValidationError(msg) => AppError::ValidationError(msg),
            PatientError::Storage(e) => AppError::Database(e.to_string()),
        }
    }
}
