//! Product store handle over one SQLite database.
//!
//! # Responsibility
//! - Open file or in-memory stores and keep their primary connection.
//! - Hand out background connections against the same database for batch
//!   work that must not run on the primary connection.
//!
//! # Invariants
//! - Every connection returned has `foreign_keys=ON` and migrations applied.
//! - An in-memory store stays alive exactly as long as its `Store` value;
//!   background connections opened from it observe the same data.

use super::migrations::apply_migrations;
use super::DbResult;
use log::{error, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use uuid::Uuid;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Persistence handle wrapping one SQLite database.
///
/// Interactive mutations go through [`Store::connection`]; the batch import
/// path opens a short-lived second connection via
/// [`Store::background_connection`].
#[derive(Debug)]
pub struct Store {
    conn: Connection,
    location: StoreLocation,
}

#[derive(Debug, Clone)]
enum StoreLocation {
    File(PathBuf),
    // Shared-cache URI, unique per store so separate in-memory stores do
    // not see each other's data.
    Memory(String),
}

impl StoreLocation {
    fn mode(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory(_) => "memory",
        }
    }
}

impl Store {
    /// Opens a file-backed store and applies all pending migrations.
    ///
    /// # Side effects
    /// - Emits `store_open` logging events with duration and status.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Self::open_at(StoreLocation::File(path.as_ref().to_path_buf()))
    }

    /// Opens an in-memory store and applies all pending migrations.
    ///
    /// The database is named with a fresh unique identifier and opened in
    /// shared-cache mode, so [`Store::background_connection`] reaches the
    /// same data. Dropping the store drops the database.
    pub fn open_in_memory() -> DbResult<Self> {
        let uri = format!("file:restock-{}?mode=memory&cache=shared", Uuid::new_v4());
        Self::open_at(StoreLocation::Memory(uri))
    }

    fn open_at(location: StoreLocation) -> DbResult<Self> {
        let mode = location.mode();
        let started_at = Instant::now();
        info!("event=store_open module=db status=start mode={mode}");

        match open_connection(&location) {
            Ok(conn) => {
                info!(
                    "event=store_open module=db status=ok mode={mode} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(Self { conn, location })
            }
            Err(err) => {
                error!(
                    "event=store_open module=db status=error mode={mode} duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }

    /// Returns the primary connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Opens a second, fully bootstrapped connection to the same database.
    ///
    /// Intended for one-off background work such as the batch import; the
    /// connection is independent and may be moved to another thread.
    pub fn background_connection(&self) -> DbResult<Connection> {
        let started_at = Instant::now();
        match open_connection(&self.location) {
            Ok(conn) => {
                info!(
                    "event=store_open module=db status=ok mode=background duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(conn)
            }
            Err(err) => {
                error!(
                    "event=store_open module=db status=error mode=background duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }
}

fn open_connection(location: &StoreLocation) -> DbResult<Connection> {
    let mut conn = match location {
        StoreLocation::File(path) => Connection::open(path)?,
        StoreLocation::Memory(uri) => Connection::open(uri)?,
    };
    bootstrap_connection(&mut conn)?;
    Ok(conn)
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)?;
    Ok(())
}
