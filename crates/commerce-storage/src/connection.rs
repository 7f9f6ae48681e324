//! `DatabaseManager` — read/write connection routing.
//!
//! Single write connection behind a mutex (SQLite allows one writer at
//! a time; serializing in-process avoids SQLITE_BUSY churn). Reads open
//! a fresh read-only connection per call — request handling is
//! infrequent enough that connection-per-call is acceptable, and WAL
//! mode lets readers proceed while a write is in flight. In-memory
//! databases are per-connection, so there reads fall back to the write
//! connection.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rusqlite::{Connection, OpenFlags};

use commerce_core::errors::StorageError;

use crate::migrations::initialize_db;

/// Owns the write connection and hands out read access.
/// No code outside this crate should touch a raw `&Connection`.
pub struct DatabaseManager {
    path: Option<PathBuf>,
    writer: Mutex<Connection>,
}

impl DatabaseManager {
    /// Open a file-backed database at the given path.
    /// Runs migrations and applies pragmas.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;
        initialize_db(&conn)?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            writer: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;
        initialize_db(&conn)?;
        Ok(Self {
            path: None,
            writer: Mutex::new(conn),
        })
    }

    /// Database file path (None for in-memory).
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Run `f` with exclusive write access.
    pub fn with_writer<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&mut Connection) -> Result<T, StorageError>,
    {
        let mut conn = self.writer.lock().map_err(|_| StorageError::SqliteError {
            message: "write connection lock poisoned".to_string(),
        })?;
        f(&mut conn)
    }

    /// Run `f` with read access.
    pub fn with_reader<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        match &self.path {
            Some(path) => {
                let conn = self.open_readonly(path)?;
                f(&conn)
            }
            // In-memory databases are invisible to other connections
            None => {
                let conn = self.writer.lock().map_err(|_| StorageError::SqliteError {
                    message: "write connection lock poisoned".to_string(),
                })?;
                f(&conn)
            }
        }
    }

    fn open_readonly(&self, path: &Path) -> Result<Connection, StorageError> {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY).map_err(
            |e| StorageError::SqliteError {
                message: e.to_string(),
            },
        )?;
        conn.execute_batch("PRAGMA busy_timeout = 5000;")
            .map_err(|e| StorageError::SqliteError {
                message: e.to_string(),
            })?;
        Ok(conn)
    }
}
