use rusqlite::{Connection, TransactionBehavior};
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::repository::{department, doctor};
use shared_database::Database;
use shared_models::records::{Doctor, DoctorDetails, RecordId};
use shared_utils::validation::{require_text, validate_contact};

use crate::models::DoctorError;

pub fn validate_doctor(details: &DoctorDetails) -> Result<(), DoctorError> {
    validate_contact(&details.name, &details.phone, &details.email).map_err(DoctorError::ValidationError)?;
    require_text("degree", &details.degree).map_err(DoctorError::ValidationError)?;
    Ok(())
}

fn require_department(conn: &Connection, department_id: RecordId) -> Result<(), DoctorError> {
    if department::get_department(conn, department_id)?.is_none() {
        return Err(DoctorError::DepartmentNotFound(department_id));
    }
    Ok(())
}

/// Insert the doctor and its address as one unit.
pub fn create_doctor(conn: &mut Connection, details: &DoctorDetails) -> Result<Doctor, DoctorError> {
    validate_doctor(details)?;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    require_department(&tx, details.department_id)?;
    let id = doctor::insert_doctor(&tx, details)?;
    let created = doctor::get_doctor(&tx, id)?.ok_or(DoctorError::NotFound(id))?;
    tx.commit()?;

    info!(doctor_id = id, department_id = details.department_id, "Doctor created");
    Ok(created)
}

pub fn update_doctor(conn: &mut Connection, id: RecordId, details: &DoctorDetails) -> Result<Doctor, DoctorError> {
    validate_doctor(details)?;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    require_department(&tx, details.department_id)?;
    if doctor::update_doctor(&tx, id, details)? == 0 {
        return Err(DoctorError::NotFound(id));
    }
    let updated = doctor::get_doctor(&tx, id)?.ok_or(DoctorError::NotFound(id))?;
    tx.commit()?;

    info!(doctor_id = id, "Doctor updated");
    Ok(updated)
}

pub struct DoctorService {
    database: Database,
}

impl DoctorService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            database: Database::new(config),
        }
    }

    pub async fn list_doctors(&self) -> Result<Vec<Doctor>, DoctorError> {
        debug!("Listing doctors");
        self.database.run(|conn| Ok(doctor::list_doctors(conn)?)).await
    }

    pub async fn get_doctor(&self, id: RecordId) -> Result<Doctor, DoctorError> {
        self.database
            .run(move |conn| doctor::get_doctor(conn, id)?.ok_or(DoctorError::NotFound(id)))
            .await
    }

    pub async fn create_doctor(&self, details: DoctorDetails) -> Result<Doctor, DoctorError> {
        self.database
            .run(move |conn| create_doctor(conn, &details))
            .await
    }

    pub async fn update_doctor(&self, id: RecordId, details: DoctorDetails) -> Result<Doctor, DoctorError> {
        self.database
            .run(move |conn| update_doctor(conn, id, &details))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use shared_database::open_memory_database;
    use shared_utils::test_utils::{doctor_details, seed_department};

    #[test]
    fn unknown_department_is_not_found_and_leaves_no_address() {
        let mut conn = open_memory_database().unwrap();
        assert_matches!(
            create_doctor(&mut conn, &doctor_details(8, "Dr. Stray")),
            Err(DoctorError::DepartmentNotFound(8))
        );

        let addresses: i64 = conn
            .query_row("SELECT COUNT(*) FROM addresses", [], |row| row.get(0))
            .unwrap();
        assert_eq!(addresses, 0);
    }

    #[test]
    fn invalid_email_is_a_validation_error() {
        let mut conn = open_memory_database().unwrap();
        let dept = seed_department(&conn, "General");
        let mut details = doctor_details(dept, "Dr. Typo");
        details.email = "typo.clinic".into();

        assert_matches!(create_doctor(&mut conn, &details), Err(DoctorError::ValidationError(_)));
    }

    #[test]
    fn update_moves_doctor_between_departments() {
        let mut conn = open_memory_database().unwrap();
        let general = seed_department(&conn, "General");
        let surgery = seed_department(&conn, "Surgery");
        let created = create_doctor(&mut conn, &doctor_details(general, "Dr. Move")).unwrap();

        let updated = update_doctor(&mut conn, created.id, &doctor_details(surgery, "Dr. Move")).unwrap();
        assert_eq!(updated.department_id, surgery);
        assert_eq!(updated.address.id, created.address.id);
        assert_matches!(
            update_doctor(&mut conn, created.id + 10, &doctor_details(surgery, "Dr. Nobody")),
            Err(DoctorError::NotFound(_))
        );
    }
}
