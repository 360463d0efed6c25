use rusqlite::{Connection, TransactionBehavior};
use tracing::info;

use shared_config::AppConfig;
use shared_database::repository::{doctor, nurse};
use shared_database::Database;
use shared_models::records::{Nurse, NurseDetails, RecordId};
use shared_utils::validation::validate_contact;

use crate::models::DoctorError;

fn validate_nurse(conn: &Connection, details: &NurseDetails) -> Result<(), DoctorError> {
    validate_contact(&details.name, &details.phone, &details.email).map_err(DoctorError::ValidationError)?;
    if let Some(doctor_id) = details.doctor_id {
        if doctor::address_id_for_doctor(conn, doctor_id)?.is_none() {
            return Err(DoctorError::ValidationError(format!(
                "Supervising doctor {} does not exist",
                doctor_id
            )));
        }
    }
    Ok(())
}

pub fn create_nurse(conn: &mut Connection, details: &NurseDetails) -> Result<Nurse, DoctorError> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    validate_nurse(&tx, details)?;
    let id = nurse::insert_nurse(&tx, details)?;
    let created = nurse::get_nurse(&tx, id)?.ok_or(DoctorError::NurseNotFound(id))?;
    tx.commit()?;

    info!(nurse_id = id, "Nurse created");
    Ok(created)
}

pub fn update_nurse(conn: &mut Connection, id: RecordId, details: &NurseDetails) -> Result<Nurse, DoctorError> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    validate_nurse(&tx, details)?;
    if nurse::update_nurse(&tx, id, details)? == 0 {
        return Err(DoctorError::NurseNotFound(id));
    }
    let updated = nurse::get_nurse(&tx, id)?.ok_or(DoctorError::NurseNotFound(id))?;
    tx.commit()?;

    info!(nurse_id = id, "Nurse updated");
    Ok(updated)
}

/// Nurses are leaves: the row and its address go, nothing else.
pub fn delete_nurse(conn: &mut Connection, id: RecordId) -> Result<(), DoctorError> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    if nurse::delete_nurse(&tx, id)? == 0 {
        return Err(DoctorError::NurseNotFound(id));
    }
    tx.commit()?;

    info!(nurse_id = id, "Nurse deleted");
    Ok(())
}

pub struct NurseService {
    database: Database,
}

impl NurseService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            database: Database::new(config),
        }
    }

    pub async fn list_nurses(&self) -> Result<Vec<Nurse>, DoctorError> {
        self.database.run(|conn| Ok(nurse::list_nurses(conn)?)).await
    }

    pub async fn get_nurse(&self, id: RecordId) -> Result<Nurse, DoctorError> {
        self.database
            .run(move |conn| nurse::get_nurse(conn, id)?.ok_or(DoctorError::NurseNotFound(id)))
            .await
    }

    pub async fn create_nurse(&self, details: NurseDetails) -> Result<Nurse, DoctorError> {
        self.database.run(move |conn| create_nurse(conn, &details)).await
    }

    pub async fn update_nurse(&self, id: RecordId, details: NurseDetails) -> Result<Nurse, DoctorError> {
        self.database.run(move |conn| update_nurse(conn, id, &details)).await
    }

    pub async fn delete_nurse(&self, id: RecordId) -> Result<(), DoctorError> {
        self.database.run(move |conn| delete_nurse(conn, id)).await
    }
}
