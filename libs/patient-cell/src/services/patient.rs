use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, TransactionBehavior};
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::repository::patient;
use shared_database::Database;
use shared_models::records::{Patient, PatientDetails, RecordId};
use shared_utils::validation::validate_contact;

use crate::models::{PatientError, PatientSearchQuery};

pub fn validate_patient(details: &PatientDetails, today: NaiveDate) -> Result<(), PatientError> {
    validate_contact(&details.name, &details.phone, &details.email).map_err(PatientError::ValidationError)?;
    if details.dob > today {
        return Err(PatientError::ValidationError(format!(
            "Date of birth {} is in the future",
            details.dob
        )));
    }
    Ok(())
}

pub fn create_patient(conn: &mut Connection, details: &PatientDetails) -> Result<Patient, PatientError> {
    validate_patient(details, Utc::now().date_naive())?;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let id = patient::insert_patient(&tx, details)?;
    let created = patient::get_patient(&tx, id)?.ok_or(PatientError::NotFound(id))?;
    tx.commit()?;

    info!(patient_id = id, "Patient created");
    Ok(created)
}

pub fn update_patient(conn: &mut Connection, id: RecordId, details: &PatientDetails) -> Result<Patient, PatientError> {
    validate_patient(details, Utc::now().date_naive())?;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    if patient::update_patient(&tx, id, details)? == 0 {
        return Err(PatientError::NotFound(id));
    }
    let updated = patient::get_patient(&tx, id)?.ok_or(PatientError::NotFound(id))?;
    tx.commit()?;

    info!(patient_id = id, "Patient updated");
    Ok(updated)
}

pub fn search_patients(conn: &Connection, query: &PatientSearchQuery) -> Result<Vec<Patient>, PatientError> {
    let mut patients = patient::list_patients(conn)?;
    if let Some(name) = query.name.as_deref().map(str::to_lowercase) {
        patients.retain(|p| p.name.to_lowercase().contains(&name));
    }
    debug!("Patient search matched {} records", patients.len());
    Ok(patients)
}

pub struct PatientService {
    database: Database,
}

impl PatientService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            database: Database::new(config),
        }
    }

    pub async fn create_patient(&self, details: PatientDetails) -> Result<Patient, PatientError> {
        self.database.run(move |conn| create_patient(conn, &details)).await
    }

    pub async fn get_patient(&self, id: RecordId) -> Result<Patient, PatientError> {
        self.database
            .run(move |conn| patient::get_patient(conn, id)?.ok_or(PatientError::NotFound(id)))
            .await
    }

    pub async fn update_patient(&self, id: RecordId, details: PatientDetails) -> Result<Patient, PatientError> {
        self.database.run(move |conn| update_patient(conn, id, &details)).await
    }

    pub async fn search_patients(&self, query: PatientSearchQuery) -> Result<Vec<Patient>, PatientError> {
        self.database.run(move |conn| search_patients(conn, &query)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use shared_database::open_memory_database;
    use shared_utils::test_utils::{address_details, patient_details};

    #[test]
    fn future_date_of_birth_is_rejected() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let mut details = patient_details("Pat");
        details.dob = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();

        assert_matches!(validate_patient(&details, today), Err(PatientError::ValidationError(_)));
    }

    #[test]
    fn update_replaces_fields_and_address() {
        let mut conn = open_memory_database().unwrap();
        let created = create_patient(&mut conn, &patient_details("Pat")).unwrap();

        let mut edited = patient_details("Patricia");
        edited.address = address_details("9 New Rd");
        let updated = update_patient(&mut conn, created.id, &edited).unwrap();
        assert_eq!(updated.name, "Patricia");
        assert_eq!(updated.address.street, "9 New Rd");
        assert_eq!(updated.address.id, created.address.id);

        assert_matches!(
            update_patient(&mut conn, created.id + 1, &edited),
            Err(PatientError::NotFound(_))
        );
    }

    #[test]
    fn search_matches_name_substrings() {
        let mut conn = open_memory_database().unwrap();
        create_patient(&mut conn, &patient_details("Ada Lovelace")).unwrap();
        create_patient(&mut conn, &patient_details("Alan Turing")).unwrap();

        let query = PatientSearchQuery { name: Some("love".into()) };
        let found = search_patients(&conn, &query).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Ada Lovelace");
        assert_eq!(search_patients(&conn, &PatientSearchQuery::default()).unwrap().len(), 2);
    }
}
