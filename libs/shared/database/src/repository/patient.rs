use rusqlite::{params, Connection, OptionalExtension, Row};

use shared_models::records::{Patient, PatientDetails, RecordId};

use super::address::{self, address_from_row, ADDRESS_COLUMNS};
use crate::DatabaseError;

fn select_patients(filter: &str) -> String {
    format!(
        "SELECT p.id, p.name, p.phone, p.email, p.dob, {ADDRESS_COLUMNS}
         FROM patients p JOIN addresses a ON a.id = p.address_id
         {filter}"
    )
}

/// Insert the owned address and then the patient row.
pub fn insert_patient(conn: &Connection, patient: &PatientDetails) -> Result<RecordId, DatabaseError> {
    let address_id = address::insert_address(conn, &patient.address)?;
    conn.execute(
        "INSERT INTO patients (name, phone, email, dob, address_id)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![patient.name, patient.phone, patient.email, patient.dob, address_id],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_patient(conn: &Connection, id: RecordId) -> Result<Option<Patient>, DatabaseError> {
    let patient = conn
        .query_row(&select_patients("WHERE p.id = ?1"), params![id], patient_from_row)
        .optional()?;
    Ok(patient)
}

pub fn list_patients(conn: &Connection) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(&select_patients("ORDER BY p.name, p.id"))?;
    let patients = stmt
        .query_map([], patient_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(patients)
}

pub fn address_id_for_patient(conn: &Connection, id: RecordId) -> Result<Option<RecordId>, DatabaseError> {
    let address_id = conn
        .query_row(
            "SELECT address_id FROM patients WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(address_id)
}

pub fn update_patient(
    conn: &Connection,
    id: RecordId,
    patient: &PatientDetails,
) -> Result<usize, DatabaseError> {
    let updated = conn.execute(
        "UPDATE patients SET name = ?1, phone = ?2, email = ?3, dob = ?4 WHERE id = ?5",
        params![patient.name, patient.phone, patient.email, patient.dob, id],
    )?;
    if updated == 0 {
        return Ok(0);
    }

    if let Some(address_id) = address_id_for_patient(conn, id)? {
        address::update_address(conn, address_id, &patient.address)?;
    }
    Ok(updated)
}

pub fn delete_patient(conn: &Connection, id: RecordId) -> Result<usize, DatabaseError> {
    Ok(conn.execute("DELETE FROM patients WHERE id = ?1", params![id])?)
}

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        name: row.get(1)?,
        phone: row.get(2)?,
        email: row.get(3)?,
        dob: row.get(4)?,
        address: address_from_row(row, 5)?,
    })
}
