use rusqlite::Connection;
use tracing::info;

use shared_config::AppConfig;
use shared_database::repository::{department, doctor};
use shared_database::{Database, DatabaseError};
use shared_models::records::{Department, DepartmentDetails, Doctor, RecordId};
use shared_utils::validation::require_text;

use crate::models::DoctorError;

fn unique_name(name: &str) -> impl FnOnce(DatabaseError) -> DoctorError + '_ {
    move |e| {
        if e.is_constraint_violation() {
            DoctorError::DuplicateDepartment(name.to_string())
        } else {
            DoctorError::Storage(e)
        }
    }
}

pub fn create_department(conn: &Connection, details: &DepartmentDetails) -> Result<Department, DoctorError> {
    require_text("name", &details.name).map_err(DoctorError::ValidationError)?;

    let id = department::insert_department(conn, details).map_err(unique_name(&details.name))?;
    info!(department_id = id, "Department created");
    Ok(Department {
        id,
        name: details.name.clone(),
    })
}

pub fn update_department(
    conn: &Connection,
    id: RecordId,
    details: &DepartmentDetails,
) -> Result<Department, DoctorError> {
    require_text("name", &details.name).map_err(DoctorError::ValidationError)?;

    match department::update_department(conn, id, details).map_err(unique_name(&details.name))? {
        0 => Err(DoctorError::DepartmentNotFound(id)),
        _ => Ok(Department {
            id,
            name: details.name.clone(),
        }),
    }
}

pub struct DepartmentService {
    database: Database,
}

impl DepartmentService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            database: Database::new(config),
        }
    }

    pub async fn list_departments(&self) -> Result<Vec<Department>, DoctorError> {
        self.database
            .run(|conn| Ok(department::list_departments(conn)?))
            .await
    }

    pub async fn get_department(&self, id: RecordId) -> Result<Department, DoctorError> {
        self.database
            .run(move |conn| department::get_department(conn, id)?.ok_or(DoctorError::DepartmentNotFound(id)))
            .await
    }

    pub async fn create_department(&self, details: DepartmentDetails) -> Result<Department, DoctorError> {
        self.database
            .run(move |conn| create_department(conn, &details))
            .await
    }

    pub async fn update_department(
        &self,
        id: RecordId,
        details: DepartmentDetails,
    ) -> Result<Department, DoctorError> {
        self.database
            .run(move |conn| update_department(conn, id, &details))
            .await
    }

    pub async fn list_department_doctors(&self, id: RecordId) -> Result<Vec<Doctor>, DoctorError> {
        self.database
            .run(move |conn| {
                if department::get_department(conn, id)?.is_none() {
                    return Err(DoctorError::DepartmentNotFound(id));
                }
                Ok(doctor::list_doctors_by_department(conn, id)?)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use shared_database::open_memory_database;

    #[test]
    fn duplicate_names_are_reported_as_duplicates() {
        let conn = open_memory_database().unwrap();
        let details = DepartmentDetails { name: "Cardiology".into() };
        create_department(&conn, &details).unwrap();

        assert_matches!(
            create_department(&conn, &details),
            Err(DoctorError::DuplicateDepartment(name)) if name == "Cardiology"
        );
    }

    #[test]
    fn blank_names_are_rejected() {
        let conn = open_memory_database().unwrap();
        assert_matches!(
            create_department(&conn, &DepartmentDetails { name: " ".into() }),
            Err(DoctorError::ValidationError(_))
        );
    }

    #[test]
    fn renaming_a_missing_department_is_not_found() {
        let conn = open_memory_database().unwrap();
        assert_matches!(
            update_department(&conn, 3, &DepartmentDetails { name: "Oncology".into() }),
            Err(DoctorError::DepartmentNotFound(3))
        );
    }
}
