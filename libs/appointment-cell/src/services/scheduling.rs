use chrono::NaiveDateTime;
use rusqlite::{Connection, TransactionBehavior};
use tracing::{debug, info, warn};

use shared_config::{AppConfig, BoundaryPolicy};
use shared_database::repository::appointment;
use shared_database::Database;
use shared_models::records::{Appointment, AppointmentDetails, RecordId};

use crate::models::{
    AppointmentError, AppointmentListQuery, ConflictCheckQuery, ConflictCheckResponse,
    SchedulingConflict, SchedulingOutcome,
};
use crate::services::conflict::find_conflicts;

pub fn validate_interval(from_time: NaiveDateTime, to_time: NaiveDateTime) -> Result<(), AppointmentError> {
    if from_time >= to_time {
        return Err(AppointmentError::ValidationError(format!(
            "from_time ({}) must be earlier than to_time ({})",
            from_time, to_time
        )));
    }
    Ok(())
}

/// Create (`excluding_appointment_id = None`) or edit an appointment after
/// checking the doctor's bookings for overlaps.
///
/// The scan and the single write share one `BEGIN IMMEDIATE` transaction, so
/// the write lock is held from before the scan until commit. A concurrent
/// booking for the same doctor waits on the busy handler and then sees this
/// one. On conflict nothing is written and the conflict is returned as a value.
pub fn validate_and_reserve(
    conn: &mut Connection,
    details: &AppointmentDetails,
    excluding_appointment_id: Option<RecordId>,
    policy: BoundaryPolicy,
) -> Result<SchedulingOutcome, AppointmentError> {
    validate_interval(details.from_time, details.to_time)?;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    if let Some(id) = excluding_appointment_id {
        if appointment::get_appointment(&tx, id)?.is_none() {
            return Err(AppointmentError::NotFound(id));
        }
    }

    let existing = appointment::list_doctor_appointments(&tx, details.doctor_id, excluding_appointment_id)?;
    debug!(
        "Scanning {} appointments of doctor {} for [{}, {}] ({} boundaries)",
        existing.len(),
        details.doctor_id,
        details.from_time,
        details.to_time,
        policy
    );

    let conflicting = find_conflicts(&existing, details.from_time, details.to_time, policy);
    if !conflicting.is_empty() {
        warn!(
            doctor_id = details.doctor_id,
            conflicting = ?conflicting,
            "Rejected booking that overlaps existing appointments"
        );
        // Dropping the transaction rolls it back.
        return Ok(SchedulingOutcome::Conflict(SchedulingConflict::new(conflicting)));
    }

    let appointment_id = match excluding_appointment_id {
        Some(id) => {
            appointment::update_appointment(&tx, id, details)?;
            id
        }
        None => appointment::insert_appointment(&tx, details)?,
    };
    tx.commit()?;

    info!(
        appointment_id,
        doctor_id = details.doctor_id,
        patient_id = details.patient_id,
        edited = excluding_appointment_id.is_some(),
        "Appointment reserved"
    );
    Ok(SchedulingOutcome::Reserved { appointment_id })
}

/// Read-only version of the overlap scan.
pub fn check_conflicts(
    conn: &Connection,
    doctor_id: RecordId,
    from_time: NaiveDateTime,
    to_time: NaiveDateTime,
    excluding_appointment_id: Option<RecordId>,
    policy: BoundaryPolicy,
) -> Result<Vec<RecordId>, AppointmentError> {
    validate_interval(from_time, to_time)?;
    let existing = appointment::list_doctor_appointments(conn, doctor_id, excluding_appointment_id)?;
    Ok(find_conflicts(&existing, from_time, to_time, policy))
}

pub struct AppointmentSchedulingService {
    database: Database,
    policy: BoundaryPolicy,
}

impl AppointmentSchedulingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            database: Database::new(config),
            policy: config.boundary_policy,
        }
    }

    pub async fn book_appointment(
        &self,
        details: AppointmentDetails,
    ) -> Result<SchedulingOutcome, AppointmentError> {
        let policy = self.policy;
        self.database
            .run(move |conn| validate_and_reserve(conn, &details, None, policy))
            .await
    }

    pub async fn reschedule_appointment(
        &self,
        appointment_id: RecordId,
        details: AppointmentDetails,
    ) -> Result<SchedulingOutcome, AppointmentError> {
        let policy = self.policy;
        self.database
            .run(move |conn| validate_and_reserve(conn, &details, Some(appointment_id), policy))
            .await
    }

    pub async fn get_appointment(&self, appointment_id: RecordId) -> Result<Appointment, AppointmentError> {
        self.database
            .run(move |conn| {
                appointment::get_appointment(conn, appointment_id)?
                    .ok_or(AppointmentError::NotFound(appointment_id))
            })
            .await
    }

    pub async fn list_appointments(
        &self,
        query: AppointmentListQuery,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        self.database
            .run(move |conn| {
                let appointments = match (query.doctor_id, query.patient_id) {
                    (Some(doctor_id), patient_id) => {
                        let mut appointments = appointment::list_doctor_appointments(conn, doctor_id, None)?;
                        if let Some(patient_id) = patient_id {
                            appointments.retain(|a| a.patient_id == patient_id);
                        }
                        appointments
                    }
                    (None, Some(patient_id)) => appointment::list_patient_appointments(conn, patient_id)?,
                    (None, None) => appointment::list_appointments(conn)?,
                };
                Ok(appointments)
            })
            .await
    }

    pub async fn check_conflicts(
        &self,
        query: ConflictCheckQuery,
    ) -> Result<ConflictCheckResponse, AppointmentError> {
        let policy = self.policy;
        self.database
            .run(move |conn| {
                let conflicting = check_conflicts(
                    conn,
                    query.doctor_id,
                    query.from_time,
                    query.to_time,
                    query.exclude_appointment_id,
                    policy,
                )?;
                Ok(ConflictCheckResponse {
                    has_conflict: !conflicting.is_empty(),
                    conflicting_appointment_ids: conflicting,
                })
            })
            .await
    }
}
