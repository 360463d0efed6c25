use thiserror::Error;

use shared_database::DatabaseError;
use shared_models::error::AppError;
use shared_models::records::RecordId;

#[derive(Error, Debug)]
pub enum DoctorError {
    #[error("Doctor {0} not found")]
    NotFound(RecordId),

    #[error("Department {0} not found")]
    DepartmentNotFound(RecordId),

    #[error("Nurse {0} not found")]
    NurseNotFound(RecordId),

    #[error("Department '{0}' already exists")]
    DuplicateDepartment(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Storage failure: {0}")]
    Storage(#[from] DatabaseError),
}

impl From<rusqlite::Error> for DoctorError {
    fn from(err: rusqlite::Error) -> Self {
        DoctorError::Storage(DatabaseError::from(err))
    }
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::NotFound(_) | DoctorError::DepartmentNotFound(_) | DoctorError::NurseNotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            DoctorError::DuplicateDepartment(_) => AppError::Conflict(err.to_string()),
            DoctorError::ValidationError(msg) => AppError::ValidationError(msg),
            DoctorError::Storage(e) => AppError::Database(e.to_string()),
        }
    }
}
