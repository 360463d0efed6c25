use rusqlite::{params, Connection, OptionalExtension, Row};

use shared_models::records::{Diagnostic, DiagnosticDetails, RecordId};

use crate::DatabaseError;

pub fn insert_diagnostic(
    conn: &Connection,
    appointment_id: RecordId,
    diagnostic: &DiagnosticDetails,
) -> Result<RecordId, DatabaseError> {
    conn.execute(
        "INSERT INTO diagnostics (appointment_id, test_name, test_report) VALUES (?1, ?2, ?3)",
        params![appointment_id, diagnostic.test_name, diagnostic.test_report],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_diagnostic(conn: &Connection, id: RecordId) -> Result<Option<Diagnostic>, DatabaseError> {
    let diagnostic = conn
        .query_row(
            "SELECT id, appointment_id, test_name, test_report FROM diagnostics WHERE id = ?1",
            params![id],
            diagnostic_from_row,
        )
        .optional()?;
    Ok(diagnostic)
}

pub fn list_diagnostics_for_appointment(
    conn: &Connection,
    appointment_id: RecordId,
) -> Result<Vec<Diagnostic>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, appointment_id, test_name, test_report FROM diagnostics
         WHERE appointment_id = ?1 ORDER BY id",
    )?;
    let diagnostics = stmt
        .query_map(params![appointment_id], diagnostic_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(diagnostics)
}

pub fn delete_diagnostic(conn: &Connection, id: RecordId) -> Result<usize, DatabaseError> {
    Ok(conn.execute("DELETE FROM diagnostics WHERE id = ?1", params![id])?)
}

pub fn delete_diagnostics_for_appointment(
    conn: &Connection,
    appointment_id: RecordId,
) -> Result<usize, DatabaseError> {
    Ok(conn.execute(
        "DELETE FROM diagnostics WHERE appointment_id = ?1",
        params![appointment_id],
    )?)
}

fn diagnostic_from_row(row: &Row<'_>) -> rusqlite::Result<Diagnostic> {
    Ok(Diagnostic {
        id: row.get(0)?,
        appointment_id: row.get(1)?,
        test_name: row.get(2)?,
        test_report: row.get(3)?,
    })
}
