use rusqlite::{params, Connection, OptionalExtension, Row};

use shared_models::records::{Address, AddressDetails, RecordId};

use crate::DatabaseError;

/// Column list matching [`address_from_row`], for joins aliased as `a`.
pub(crate) const ADDRESS_COLUMNS: &str = "a.id, a.street, a.county, a.city, a.state, a.country, a.zipcode";

pub fn insert_address(conn: &Connection, address: &AddressDetails) -> Result<RecordId, DatabaseError> {
    conn.execute(
        "INSERT INTO addresses (street, county, city, state, country, zipcode)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            address.street,
            address.county,
            address.city,
            address.state,
            address.country,
            address.zipcode,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_address(conn: &Connection, id: RecordId) -> Result<Option<Address>, DatabaseError> {
    let address = conn
        .query_row(
            &format!("SELECT {ADDRESS_COLUMNS} FROM addresses a WHERE a.id = ?1"),
            params![id],
            |row| address_from_row(row, 0),
        )
        .optional()?;
    Ok(address)
}

pub fn update_address(
    conn: &Connection,
    id: RecordId,
    address: &AddressDetails,
) -> Result<usize, DatabaseError> {
    let updated = conn.execute(
        "UPDATE addresses
         SET street = ?1, county = ?2, city = ?3, state = ?4, country = ?5, zipcode = ?6
         WHERE id = ?7",
        params![
            address.street,
            address.county,
            address.city,
            address.state,
            address.country,
            address.zipcode,
            id,
        ],
    )?;
    Ok(updated)
}

pub fn delete_address(conn: &Connection, id: RecordId) -> Result<usize, DatabaseError> {
    Ok(conn.execute("DELETE FROM addresses WHERE id = ?1", params![id])?)
}

/// Read an address whose seven columns start at `offset`.
pub(crate) fn address_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Address> {
    Ok(Address {
        id: row.get(offset)?,
        street: row.get(offset + 1)?,
        county: row.get(offset + 2)?,
        city: row.get(offset + 3)?,
        state: row.get(offset + 4)?,
        country: row.get(offset + 5)?,
        zipcode: row.get(offset + 6)?,
    })
}
