use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::Connection;
use tracing::{debug, info};

use shared_config::AppConfig;

use crate::DatabaseError;

const MIGRATIONS: &[(i64, &str)] = &[(1, include_str!("../migrations/001_initial.sql"))];

/// Handle to the clinic database file.
///
/// Holds no open connection. Every operation opens its own connection, so a
/// request never shares session state with another one.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
    busy_timeout: Duration,
}

impl Database {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            path: config.database_path.clone(),
            busy_timeout: config.database_busy_timeout,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a configured connection. Concurrent writers wait up to the busy
    /// timeout for the write lock instead of failing immediately.
    pub fn open(&self) -> Result<Connection, DatabaseError> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(self.busy_timeout)?;
        configure_pragmas(&conn)?;
        let journal_mode: String =
            conn.query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))?;
        debug!(
            "Opened database connection to {} (journal_mode={})",
            self.path.display(),
            journal_mode
        );
        Ok(conn)
    }

    pub fn migrate(&self) -> Result<(), DatabaseError> {
        let conn = self.open()?;
        run_migrations(&conn)
    }

    /// Run a synchronous storage operation on the blocking pool with a fresh connection.
    pub async fn run<T, E, F>(&self, operation: F) -> Result<T, E>
    where
        F: FnOnce(&mut Connection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<DatabaseError> + Send + 'static,
    {
        let database = self.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = database.open()?;
            operation(&mut conn)
        })
        .await
        .map_err(|e| E::from(DatabaseError::Task(e.to_string())))?
    }
}

/// Open an in-memory database with the full schema (for testing).
pub fn open_memory_database() -> Result<Connection, DatabaseError> {
    let conn = Connection::open_in_memory()?;
    configure_pragmas(&conn)?;
    run_migrations(&conn)?;
    Ok(conn)
}

fn configure_pragmas(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    Ok(())
}

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current_version = get_current_version(conn);

    for &(version, sql) in MIGRATIONS {
        if version > current_version {
            info!("Running migration v{version}");
            conn.execute_batch(sql).map_err(|e| DatabaseError::MigrationFailed {
                version,
                reason: e.to_string(),
            })?;
        }
    }

    Ok(())
}

/// Current schema version, 0 before the first migration.
fn get_current_version(conn: &Connection) -> i64 {
    conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
        row.get::<_, Option<i64>>(0)
    })
    .ok()
    .flatten()
    .unwrap_or(0)
}

pub fn count_tables(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get::<_, i64>(0),
    )?;
    Ok(count)
}
