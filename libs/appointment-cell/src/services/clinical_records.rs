use rusqlite::{Connection, TransactionBehavior};
use tracing::info;

use shared_config::AppConfig;
use shared_database::repository::{appointment, diagnostic, prescription};
use shared_database::Database;
use shared_models::records::{Diagnostic, DiagnosticDetails, Prescription, PrescriptionDetails, RecordId};

use crate::models::ClinicalRecordError;

fn require_appointment(conn: &Connection, appointment_id: RecordId) -> Result<(), ClinicalRecordError> {
    if appointment::get_appointment(conn, appointment_id)?.is_none() {
        return Err(ClinicalRecordError::AppointmentNotFound(appointment_id));
    }
    Ok(())
}

pub fn add_prescription(
    conn: &mut Connection,
    appointment_id: RecordId,
    details: &PrescriptionDetails,
) -> Result<Prescription, ClinicalRecordError> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    require_appointment(&tx, appointment_id)?;
    if prescription::get_prescription_for_appointment(&tx, appointment_id)?.is_some() {
        return Err(ClinicalRecordError::PrescriptionExists(appointment_id));
    }

    let id = prescription::insert_prescription(&tx, appointment_id, details)?;
    tx.commit()?;

    info!(prescription_id = id, appointment_id, "Prescription added");
    Ok(Prescription {
        id,
        appointment_id,
        notes: details.notes.clone(),
    })
}

pub fn add_diagnostic(
    conn: &mut Connection,
    appointment_id: RecordId,
    details: &DiagnosticDetails,
) -> Result<Diagnostic, ClinicalRecordError> {
    if details.test_name.trim().is_empty() {
        return Err(ClinicalRecordError::ValidationError("test_name is required".to_string()));
    }

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    require_appointment(&tx, appointment_id)?;
    let id = diagnostic::insert_diagnostic(&tx, appointment_id, details)?;
    tx.commit()?;

    info!(diagnostic_id = id, appointment_id, "Diagnostic added");
    Ok(Diagnostic {
        id,
        appointment_id,
        test_name: details.test_name.clone(),
        test_report: details.test_report.clone(),
    })
}

pub struct ClinicalRecordService {
    database: Database,
}

impl ClinicalRecordService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            database: Database::new(config),
        }
    }

    pub async fn add_prescription(
        &self,
        appointment_id: RecordId,
        details: PrescriptionDetails,
    ) -> Result<Prescription, ClinicalRecordError> {
        self.database
            .run(move |conn| add_prescription(conn, appointment_id, &details))
            .await
    }

    pub async fn get_prescription(&self, appointment_id: RecordId) -> Result<Prescription, ClinicalRecordError> {
        self.database
            .run(move |conn| {
                require_appointment(conn, appointment_id)?;
                prescription::get_prescription_for_appointment(conn, appointment_id)?
                    .ok_or(ClinicalRecordError::PrescriptionNotFound(appointment_id))
            })
            .await
    }

    pub async fn delete_prescription(&self, appointment_id: RecordId) -> Result<(), ClinicalRecordError> {
        self.database
            .run(move |conn| {
                match prescription::delete_prescription_for_appointment(conn, appointment_id)? {
                    0 => Err(ClinicalRecordError::PrescriptionNotFound(appointment_id)),
                    _ => {
                        info!(appointment_id, "Prescription deleted");
                        Ok(())
                    }
                }
            })
            .await
    }

    pub async fn add_diagnostic(
        &self,
        appointment_id: RecordId,
        details: DiagnosticDetails,
    ) -> Result<Diagnostic, ClinicalRecordError> {
        self.database
            .run(move |conn| add_diagnostic(conn, appointment_id, &details))
            .await
    }

    pub async fn list_diagnostics(&self, appointment_id: RecordId) -> Result<Vec<Diagnostic>, ClinicalRecordError> {
        self.database
            .run(move |conn| {
                require_appointment(conn, appointment_id)?;
                Ok(diagnostic::list_diagnostics_for_appointment(conn, appointment_id)?)
            })
            .await
    }

    pub async fn delete_diagnostic(&self, diagnostic_id: RecordId) -> Result<(), ClinicalRecordError> {
        self.database
            .run(move |conn| match diagnostic::delete_diagnostic(conn, diagnostic_id)? {
                0 => Err(ClinicalRecordError::DiagnosticNotFound(diagnostic_id)),
                _ => {
                    info!(diagnostic_id, "Diagnostic deleted");
                    Ok(())
                }
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use shared_database::open_memory_database;
    use shared_utils::test_utils::{at, seed_appointment, seed_department, seed_doctor, seed_patient};

    fn booked(conn: &Connection) -> RecordId {
        let dept = seed_department(conn, "General");
        let doctor = seed_doctor(conn, dept, "Dr. Who");
        let patient = seed_patient(conn, "Pat");
        seed_appointment(conn, doctor, patient, at(9, 0), at(9, 30))
    }

    #[test]
    fn second_prescription_for_an_appointment_is_rejected() {
        let mut conn = open_memory_database().unwrap();
        let appointment_id = booked(&conn);
        let details = PrescriptionDetails { notes: Some("Rest".into()) };

        let first = add_prescription(&mut conn, appointment_id, &details).unwrap();
        assert_eq!(first.appointment_id, appointment_id);
        assert_matches!(
            add_prescription(&mut conn, appointment_id, &details),
            Err(ClinicalRecordError::PrescriptionExists(id)) if id == appointment_id
        );
    }

    #[test]
    fn diagnostics_require_an_existing_appointment() {
        let mut conn = open_memory_database().unwrap();
        let details = DiagnosticDetails {
            test_name: "CBC".into(),
            test_report: None,
        };
        assert_matches!(
            add_diagnostic(&mut conn, 77, &details),
            Err(ClinicalRecordError::AppointmentNotFound(77))
        );

        let appointment_id = booked(&conn);
        add_diagnostic(&mut conn, appointment_id, &details).unwrap();
        add_diagnostic(&mut conn, appointment_id, &details).unwrap();
        assert_eq!(
            diagnostic::list_diagnostics_for_appointment(&conn, appointment_id).unwrap().len(),
            2
        );
    }

    #[test]
    fn blank_test_name_is_a_validation_error() {
        let mut conn = open_memory_database().unwrap();
        let appointment_id = booked(&conn);
        let details = DiagnosticDetails {
            test_name: "  ".into(),
            test_report: None,
        };
        assert_matches!(
            add_diagnostic(&mut conn, appointment_id, &details),
            Err(ClinicalRecordError::ValidationError(_))
        );
    }
}
