//! Row-level access per table. Every function takes a plain `&Connection`, so
//! callers decide the transaction boundary (a `Transaction` derefs to one).
//! Updates and deletes return affected-row counts.

pub mod address;
pub mod appointment;
pub mod department;
pub mod diagnostic;
pub mod doctor;
pub mod nurse;
pub mod patient;
pub mod prescription;

use rusqlite::{params, Connection};

use shared_models::records::RecordId;

use crate::DatabaseError;

/// Collect the single id column returned by `sql` for one bound parameter.
pub(crate) fn collect_ids(
    conn: &Connection,
    sql: &str,
    key: RecordId,
) -> Result<Vec<RecordId>, DatabaseError> {
    let mut stmt = conn.prepare(sql)?;
    let ids = stmt
        .query_map(params![key], |row| row.get::<_, RecordId>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ids)
}

pub(crate) fn invalid_text(column: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        column,
        rusqlite::types::Type::Text,
        message.into(),
    )
}
