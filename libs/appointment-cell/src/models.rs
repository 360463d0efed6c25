use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::DatabaseError;
use shared_models::records::RecordId;

pub const CONFLICT_REASON: &str = "conflicting appointment exists";

// ==============================================================================
// SCHEDULING OUTCOMES
// ==============================================================================

/// Result of a create or edit attempt. A conflict is an expected outcome
/// and is not reported through `AppointmentError`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SchedulingOutcome {
    Reserved { appointment_id: RecordId },
    Conflict(SchedulingConflict),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchedulingConflict {
    pub reason: String,
    pub conflicting_appointment_ids: Vec<RecordId>,
}

impl SchedulingConflict {
    pub fn new(conflicting_appointment_ids: Vec<RecordId>) -> Self {
        Self {
            reason: CONFLICT_REASON.to_string(),
            conflicting_appointment_ids,
        }
    }
}

// ==============================================================================
// QUERY MODELS
// ==============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct AppointmentListQuery {
    pub doctor_id: Option<RecordId>,
    pub patient_id: Option<RecordId>,
}

#[derive(Debug, Deserialize)]
pub struct ConflictCheckQuery {
    pub doctor_id: RecordId,
    pub from_time: NaiveDateTime,
    pub to_time: NaiveDateTime,
    pub exclude_appointment_id: Option<RecordId>,
}

#[derive(Debug, Serialize)]
pub struct ConflictCheckResponse {
    pub has_conflict: bool,
    pub conflicting_appointment_ids: Vec<RecordId>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug)]
pub enum AppointmentError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Appointment {0} not found")]
    NotFound(RecordId),

    #[error("Storage failure: {0}")]
    Storage(#[from] DatabaseError),
}

impl From<rusqlite::Error> for AppointmentError {
    fn from(err: rusqlite::Error) -> Self {
        AppointmentError::Storage(DatabaseError::from(err))
    }
}

/// Failures of the prescription and diagnostic leaf operations.
#[derive(Error, Debug)]
pub enum ClinicalRecordError {
    #[error("Appointment {0} not found")]
    AppointmentNotFound(RecordId),

    #[error("Appointment {0} has no prescription")]
    PrescriptionNotFound(RecordId),

    #[error("Appointment {0} already has a prescription")]
    PrescriptionExists(RecordId),

    #[error("Diagnostic {0} not found")]
    DiagnosticNotFound(RecordId),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Storage failure: {0}")]
    Storage(#[from] DatabaseError),
}

impl From<rusqlite::Error> for ClinicalRecordError {
    fn from(err: rusqlite::Error) -> Self {
        ClinicalRecordError::Storage(DatabaseError::from(err))
    }
}
