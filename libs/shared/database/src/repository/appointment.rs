use rusqlite::{params, Connection, OptionalExtension, Row};

use shared_models::records::{Appointment, AppointmentDetails, RecordId};

use super::collect_ids;
use crate::DatabaseError;

const APPOINTMENT_COLUMNS: &str = "id, doctor_id, patient_id, from_time, to_time, notes";

pub fn insert_appointment(
    conn: &Connection,
    appointment: &AppointmentDetails,
) -> Result<RecordId, DatabaseError> {
    conn.execute(
        "INSERT INTO appointments (doctor_id, patient_id, from_time, to_time, notes)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            appointment.doctor_id,
            appointment.patient_id,
            appointment.from_time,
            appointment.to_time,
            appointment.notes,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_appointment(conn: &Connection, id: RecordId) -> Result<Option<Appointment>, DatabaseError> {
    let appointment = conn
        .query_row(
            &format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?1"),
            params![id],
            appointment_from_row,
        )
        .optional()?;
    Ok(appointment)
}

pub fn list_appointments(conn: &Connection) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments ORDER BY from_time, id"
    ))?;
    let appointments = stmt
        .query_map([], appointment_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(appointments)
}

/// Every booking held by `doctor_id`, optionally leaving one appointment out.
pub fn list_doctor_appointments(
    conn: &Connection,
    doctor_id: RecordId,
    excluding_appointment_id: Option<RecordId>,
) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments
         WHERE doctor_id = ?1 AND (?2 IS NULL OR id <> ?2)
         ORDER BY from_time, id"
    ))?;
    let appointments = stmt
        .query_map(params![doctor_id, excluding_appointment_id], appointment_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(appointments)
}

pub fn list_patient_appointments(
    conn: &Connection,
    patient_id: RecordId,
) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE patient_id = ?1 ORDER BY from_time, id"
    ))?;
    let appointments = stmt
        .query_map(params![patient_id], appointment_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(appointments)
}

pub fn appointment_ids_for_doctor(conn: &Connection, doctor_id: RecordId) -> Result<Vec<RecordId>, DatabaseError> {
    collect_ids(
        conn,
        "SELECT id FROM appointments WHERE doctor_id = ?1 ORDER BY id",
        doctor_id,
    )
}

pub fn appointment_ids_for_patient(conn: &Connection, patient_id: RecordId) -> Result<Vec<RecordId>, DatabaseError> {
    collect_ids(
        conn,
        "SELECT id FROM appointments WHERE patient_id = ?1 ORDER BY id",
        patient_id,
    )
}

/// Full replace of doctor, patient, interval and notes.
pub fn update_appointment(
    conn: &Connection,
    id: RecordId,
    appointment: &AppointmentDetails,
) -> Result<usize, DatabaseError> {
    Ok(conn.execute(
        "UPDATE appointments
         SET doctor_id = ?1, patient_id = ?2, from_time = ?3, to_time = ?4, notes = ?5
         WHERE id = ?6",
        params![
            appointment.doctor_id,
            appointment.patient_id,
            appointment.from_time,
            appointment.to_time,
            appointment.notes,
            id,
        ],
    )?)
}

pub fn delete_appointment(conn: &Connection, id: RecordId) -> Result<usize, DatabaseError> {
    Ok(conn.execute("DELETE FROM appointments WHERE id = ?1", params![id])?)
}

fn appointment_from_row(row: &Row<'_>) -> rusqlite::Result<Appointment> {
    Ok(Appointment {
        id: row.get(0)?,
        doctor_id: row.get(1)?,
        patient_id: row.get(2)?,
        from_time: row.get(3)?,
        to_time: row.get(4)?,
        notes: row.get(5)?,
    })
}
