use std::sync::Arc;

use axum::{body::Body, http::Request, response::Response};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use serde_json::Value;
use tempfile::TempDir;

use shared_config::{AppConfig, BoundaryPolicy};
use shared_database::repository::{appointment, department, doctor, nurse, patient};
use shared_database::Database;
use shared_models::records::{
    AddressDetails, AppointmentDetails, DepartmentDetails, DoctorCategory, DoctorDetails,
    NurseDetails, PatientDetails, RecordId,
};

pub struct TestConfig {
    pub boundary_policy: BoundaryPolicy,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            boundary_policy: BoundaryPolicy::Closed,
        }
    }
}

impl TestConfig {
    pub fn half_open() -> Self {
        Self {
            boundary_policy: BoundaryPolicy::HalfOpen,
        }
    }

    /// Build an `AppConfig` pointing at `dir/clinic.db`.
    pub fn to_app_config(&self, dir: &TempDir) -> AppConfig {
        AppConfig {
            database_path: dir.path().join("clinic.db"),
            boundary_policy: self.boundary_policy,
            ..AppConfig::default()
        }
    }
}

/// A migrated database file in a temporary directory, removed on drop.
pub struct TestDatabase {
    _dir: TempDir,
    pub config: Arc<AppConfig>,
    pub database: Database,
}

impl TestDatabase {
    pub fn new() -> Self {
        Self::with_config(TestConfig::default())
    }

    pub fn with_config(test_config: TestConfig) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config = test_config.to_app_config(&dir);
        let database = Database::new(&config);
        database.migrate().expect("migrate test database");
        Self {
            _dir: dir,
            config: Arc::new(config),
            database,
        }
    }

    pub fn connection(&self) -> Connection {
        self.database.open().expect("open test database")
    }

    pub fn count(&self, table: &str) -> i64 {
        self.connection()
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .expect("count rows")
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

/// 2024-05-01 at `hour:minute`.
pub fn at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .and_then(|day| day.and_hms_opt(hour, minute, 0))
        .expect("valid test time")
}

pub fn address_details(street: &str) -> AddressDetails {
    AddressDetails {
        street: street.to_string(),
        county: "Cook".to_string(),
        city: "Chicago".to_string(),
        state: "IL".to_string(),
        country: "USA".to_string(),
        zipcode: "60601".to_string(),
    }
}

pub fn doctor_details(department_id: RecordId, name: &str) -> DoctorDetails {
    DoctorDetails {
        name: name.to_string(),
        phone: "555-0100".to_string(),
        email: "doctor@clinic.test".to_string(),
        department_id,
        category: DoctorCategory::Medicine,
        experience: 10,
        degree: "MD".to_string(),
        address: address_details("1 Doctor Way"),
    }
}

pub fn patient_details(name: &str) -> PatientDetails {
    PatientDetails {
        name: name.to_string(),
        phone: "555-0200".to_string(),
        email: "patient@clinic.test".to_string(),
        dob: NaiveDate::from_ymd_opt(1985, 3, 14).expect("valid dob"),
        address: address_details("2 Patient Ave"),
    }
}

pub fn nurse_details(name: &str, doctor_id: Option<RecordId>) -> NurseDetails {
    NurseDetails {
        name: name.to_string(),
        phone: "555-0300".to_string(),
        email: "nurse@clinic.test".to_string(),
        doctor_id,
        address: address_details("3 Nurse St"),
    }
}

pub fn appointment_details(
    doctor_id: RecordId,
    patient_id: RecordId,
    from_time: NaiveDateTime,
    to_time: NaiveDateTime,
) -> AppointmentDetails {
    AppointmentDetails {
        doctor_id,
        patient_id,
        from_time,
        to_time,
        notes: None,
    }
}

pub fn seed_department(conn: &Connection, name: &str) -> RecordId {
    department::insert_department(conn, &DepartmentDetails { name: name.to_string() })
        .expect("seed department")
}

pub fn seed_doctor(conn: &Connection, department_id: RecordId, name: &str) -> RecordId {
    doctor::insert_doctor(conn, &doctor_details(department_id, name)).expect("seed doctor")
}

pub fn seed_patient(conn: &Connection, name: &str) -> RecordId {
    patient::insert_patient(conn, &patient_details(name)).expect("seed patient")
}

pub fn seed_nurse(conn: &Connection, name: &str, doctor_id: Option<RecordId>) -> RecordId {
    nurse::insert_nurse(conn, &nurse_details(name, doctor_id)).expect("seed nurse")
}

/// Insert an appointment directly, without the overlap check.
pub fn seed_appointment(
    conn: &Connection,
    doctor_id: RecordId,
    patient_id: RecordId,
    from_time: NaiveDateTime,
    to_time: NaiveDateTime,
) -> RecordId {
    appointment::insert_appointment(conn, &appointment_details(doctor_id, patient_id, from_time, to_time))
        .expect("seed appointment")
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("build request")
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("build request")
}

pub async fn response_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&body).expect("response body is json")
}
