use rusqlite::{params, Connection, OptionalExtension, Row};

use shared_models::records::{Doctor, DoctorCategory, DoctorDetails, RecordId};

use super::address::{self, address_from_row, ADDRESS_COLUMNS};
use super::{collect_ids, invalid_text};
use crate::DatabaseError;

const DOCTOR_COLUMNS: &str =
    "d.id, d.name, d.phone, d.email, d.department_id, d.category, d.experience, d.degree";

fn select_doctors(filter: &str) -> String {
    format!(
        "SELECT {DOCTOR_COLUMNS}, {ADDRESS_COLUMNS}
         FROM doctors d JOIN addresses a ON a.id = d.address_id
         {filter}"
    )
}

/// Insert the owned address and then the doctor row. Run inside a
/// transaction so a rejected doctor row does not strand its address.
pub fn insert_doctor(conn: &Connection, doctor: &DoctorDetails) -> Result<RecordId, DatabaseError> {
    let address_id = address::insert_address(conn, &doctor.address)?;
    conn.execute(
        "INSERT INTO doctors (name, phone, email, department_id, category, experience, degree, address_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            doctor.name,
            doctor.phone,
            doctor.email,
            doctor.department_id,
            doctor.category.as_str(),
            doctor.experience,
            doctor.degree,
            address_id,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_doctor(conn: &Connection, id: RecordId) -> Result<Option<Doctor>, DatabaseError> {
    let doctor = conn
        .query_row(&select_doctors("WHERE d.id = ?1"), params![id], doctor_from_row)
        .optional()?;
    Ok(doctor)
}

pub fn list_doctors(conn: &Connection) -> Result<Vec<Doctor>, DatabaseError> {
    let mut stmt = conn.prepare(&select_doctors("ORDER BY d.name, d.id"))?;
    let doctors = stmt
        .query_map([], doctor_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(doctors)
}

pub fn list_doctors_by_department(
    conn: &Connection,
    department_id: RecordId,
) -> Result<Vec<Doctor>, DatabaseError> {
    let mut stmt = conn.prepare(&select_doctors("WHERE d.department_id = ?1 ORDER BY d.name, d.id"))?;
    let doctors = stmt
        .query_map(params![department_id], doctor_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(doctors)
}

pub fn doctor_ids_for_department(
    conn: &Connection,
    department_id: RecordId,
) -> Result<Vec<RecordId>, DatabaseError> {
    collect_ids(
        conn,
        "SELECT id FROM doctors WHERE department_id = ?1 ORDER BY id",
        department_id,
    )
}

pub fn address_id_for_doctor(conn: &Connection, id: RecordId) -> Result<Option<RecordId>, DatabaseError> {
    let address_id = conn
        .query_row(
            "SELECT address_id FROM doctors WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(address_id)
}

/// Replace every mutable field, including the owned address.
/// Returns 0 when the doctor does not exist.
pub fn update_doctor(
    conn: &Connection,
    id: RecordId,
    doctor: &DoctorDetails,
) -> Result<usize, DatabaseError> {
    let updated = conn.execute(
        "UPDATE doctors
         SET name = ?1, phone = ?2, email = ?3, department_id = ?4,
             category = ?5, experience = ?6, degree = ?7
         WHERE id = ?8",
        params![
            doctor.name,
            doctor.phone,
            doctor.email,
            doctor.department_id,
            doctor.category.as_str(),
            doctor.experience,
            doctor.degree,
            id,
        ],
    )?;
    if updated == 0 {
        return Ok(0);
    }

    if let Some(address_id) = address_id_for_doctor(conn, id)? {
        address::update_address(conn, address_id, &doctor.address)?;
    }
    Ok(updated)
}

pub fn delete_doctor(conn: &Connection, id: RecordId) -> Result<usize, DatabaseError> {
    Ok(conn.execute("DELETE FROM doctors WHERE id = ?1", params![id])?)
}

fn doctor_from_row(row: &Row<'_>) -> rusqlite::Result<Doctor> {
    let category: String = row.get(5)?;
    let category = category
        .parse::<DoctorCategory>()
        .map_err(|message| invalid_text(5, message))?;

    Ok(Doctor {
        id: row.get(0)?,
        name: row.get(1)?,
        phone: row.get(2)?,
        email: row.get(3)?,
        department_id: row.get(4)?,
        category,
        experience: row.get(6)?,
        degree: row.get(7)?,
        address: address_from_row(row, 8)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::open_memory_database;
    use crate::repository::department::insert_department;
    use shared_models::records::{AddressDetails, DepartmentDetails};

    fn address(street: &str) -> AddressDetails {
        AddressDetails {
            street: street.into(),
            county: "Cook".into(),
            city: "Chicago".into(),
            state: "IL".into(),
            country: "USA".into(),
            zipcode: "60601".into(),
        }
    }

    fn details(department_id: RecordId) -> DoctorDetails {
        DoctorDetails {
            name: "Dr. Grey".into(),
            phone: "555-0100".into(),
            email: "grey@clinic.test".into(),
            department_id,
            category: DoctorCategory::Surgery,
            experience: 12,
            degree: "MD".into(),
            address: address("1 Lake Shore Dr"),
        }
    }

    #[test]
    fn doctor_round_trips_with_address() {
        let conn = open_memory_database().unwrap();
        let dept = insert_department(&conn, &DepartmentDetails { name: "Surgery".into() }).unwrap();
        let id = insert_doctor(&conn, &details(dept)).unwrap();

        let doctor = get_doctor(&conn, id).unwrap().unwrap();
        assert_eq!(doctor.name, "Dr. Grey");
        assert_eq!(doctor.category, DoctorCategory::Surgery);
        assert_eq!(doctor.address.details(), address("1 Lake Shore Dr"));
    }

    #[test]
    fn update_replaces_address_fields() {
        let conn = open_memory_database().unwrap();
        let dept = insert_department(&conn, &DepartmentDetails { name: "Surgery".into() }).unwrap();
        let id = insert_doctor(&conn, &details(dept)).unwrap();

        let mut edited = details(dept);
        edited.experience = 13;
        edited.address = address("2 Wacker Dr");
        assert_eq!(update_doctor(&conn, id, &edited).unwrap(), 1);

        let doctor = get_doctor(&conn, id).unwrap().unwrap();
        assert_eq!(doctor.experience, 13);
        assert_eq!(doctor.address.street, "2 Wacker Dr");
        assert_eq!(update_doctor(&conn, id + 1, &edited).unwrap(), 0);
    }

    #[test]
    fn unknown_department_is_a_constraint_violation() {
        let conn = open_memory_database().unwrap();
        let err = insert_doctor(&conn, &details(999)).unwrap_err();
        assert!(err.is_constraint_violation(), "got {err:?}");
    }

    #[test]
    fn department_listing_filters_by_department() {
        let conn = open_memory_database().unwrap();
        let surgery = insert_department(&conn, &DepartmentDetails { name: "Surgery".into() }).unwrap();
        let radiology = insert_department(&conn, &DepartmentDetails { name: "Radiology".into() }).unwrap();
        let first = insert_doctor(&conn, &details(surgery)).unwrap();
        insert_doctor(&conn, &details(radiology)).unwrap();

        let ids: Vec<RecordId> = list_doctors_by_department(&conn, surgery)
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec![first]);
        assert_eq!(doctor_ids_for_department(&conn, surgery).unwrap(), vec![first]);
        assert_eq!(list_doctors(&conn).unwrap().len(), 2);
    }
}
