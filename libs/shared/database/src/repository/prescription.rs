use rusqlite::{params, Connection, OptionalExtension};

use shared_models::records::{Prescription, PrescriptionDetails, RecordId};

use crate::DatabaseError;

/// At most one prescription exists per appointment; a second insert is a
/// constraint violation.
pub fn insert_prescription(
    conn: &Connection,
    appointment_id: RecordId,
    prescription: &PrescriptionDetails,
) -> Result<RecordId, DatabaseError> {
    conn.execute(
        "INSERT INTO prescriptions (appointment_id, notes) VALUES (?1, ?2)",
        params![appointment_id, prescription.notes],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_prescription_for_appointment(
    conn: &Connection,
    appointment_id: RecordId,
) -> Result<Option<Prescription>, DatabaseError> {
    let prescription = conn
        .query_row(
            "SELECT id, appointment_id, notes FROM prescriptions WHERE appointment_id = ?1",
            params![appointment_id],
            |row| {
                Ok(Prescription {
                    id: row.get(0)?,
                    appointment_id: row.get(1)?,
                    notes: row.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(prescription)
}

pub fn delete_prescription_for_appointment(
    conn: &Connection,
    appointment_id: RecordId,
) -> Result<usize, DatabaseError> {
    Ok(conn.execute(
        "DELETE FROM prescriptions WHERE appointment_id = ?1",
        params![appointment_id],
    )?)
}
