use rusqlite::{params, Connection, OptionalExtension, Row};

use shared_models::records::{Nurse, NurseDetails, RecordId};

use super::address::{self, address_from_row, ADDRESS_COLUMNS};
use crate::DatabaseError;

fn select_nurses(filter: &str) -> String {
    format!(
        "SELECT n.id, n.name, n.phone, n.email, n.doctor_id, {ADDRESS_COLUMNS}
         FROM nurses n JOIN addresses a ON a.id = n.address_id
         {filter}"
    )
}

pub fn insert_nurse(conn: &Connection, nurse: &NurseDetails) -> Result<RecordId, DatabaseError> {
    let address_id = address::insert_address(conn, &nurse.address)?;
    conn.execute(
        "INSERT INTO nurses (name, phone, email, doctor_id, address_id)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![nurse.name, nurse.phone, nurse.email, nurse.doctor_id, address_id],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_nurse(conn: &Connection, id: RecordId) -> Result<Option<Nurse>, DatabaseError> {
    let nurse = conn
        .query_row(&select_nurses("WHERE n.id = ?1"), params![id], nurse_from_row)
        .optional()?;
    Ok(nurse)
}

pub fn list_nurses(conn: &Connection) -> Result<Vec<Nurse>, DatabaseError> {
    let mut stmt = conn.prepare(&select_nurses("ORDER BY n.name, n.id"))?;
    let nurses = stmt
        .query_map([], nurse_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(nurses)
}

pub fn list_nurses_for_doctor(conn: &Connection, doctor_id: RecordId) -> Result<Vec<Nurse>, DatabaseError> {
    let mut stmt = conn.prepare(&select_nurses("WHERE n.doctor_id = ?1 ORDER BY n.name, n.id"))?;
    let nurses = stmt
        .query_map(params![doctor_id], nurse_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(nurses)
}

pub fn update_nurse(conn: &Connection, id: RecordId, nurse: &NurseDetails) -> Result<usize, DatabaseError> {
    let updated = conn.execute(
        "UPDATE nurses SET name = ?1, phone = ?2, email = ?3, doctor_id = ?4 WHERE id = ?5",
        params![nurse.name, nurse.phone, nurse.email, nurse.doctor_id, id],
    )?;
    if updated == 0 {
        return Ok(0);
    }

    let address_id: RecordId = conn.query_row(
        "SELECT address_id FROM nurses WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )?;
    address::update_address(conn, address_id, &nurse.address)?;
    Ok(updated)
}

/// Clear the supervising doctor of every nurse assigned to `doctor_id`.
pub fn detach_nurses_from_doctor(conn: &Connection, doctor_id: RecordId) -> Result<usize, DatabaseError> {
    Ok(conn.execute(
        "UPDATE nurses SET doctor_id = NULL WHERE doctor_id = ?1",
        params![doctor_id],
    )?)
}

/// Delete the nurse row and then its address. Returns 0 when the nurse does not exist.
pub fn delete_nurse(conn: &Connection, id: RecordId) -> Result<usize, DatabaseError> {
    let address_id: Option<RecordId> = conn
        .query_row(
            "SELECT address_id FROM nurses WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()?;
    let Some(address_id) = address_id else {
        return Ok(0);
    };

    let deleted = conn.execute("DELETE FROM nurses WHERE id = ?1", params![id])?;
    address::delete_address(conn, address_id)?;
    Ok(deleted)
}

fn nurse_from_row(row: &Row<'_>) -> rusqlite::Result<Nurse> {
    Ok(Nurse {
        id: row.get(0)?,
        name: row.get(1)?,
        phone: row.get(2)?,
        email: row.get(3)?,
        doctor_id: row.get(4)?,
        address: address_from_row(row, 5)?,
    })
}
