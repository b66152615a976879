//! Storage layer for presentdeck.
//!
//! This module provides `SQLite`-based persistent storage for the two record
//! collections, `presentations` and `assets`, both keyed by a string id.
//! Record operations live on the [`Records`] trait, implemented by [`Store`]
//! for single statements and by [`StoreTransaction`] for atomic multi-step
//! updates.

pub mod migrations;
mod records;
pub mod schema;

use std::path::{Path, PathBuf};

use rusqlite::{Connection, Transaction};
use tracing::{debug, info};

use crate::error::{Error, Result};

pub use records::Records;

/// Path reported for in-memory stores.
const MEMORY_PATH: &str = ":memory:";

/// Persistent store for presentations and their assets.
///
/// Holds the only connection to the database. Open it once at startup and
/// pass it to whatever needs it.
#[derive(Debug)]
pub struct Store {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Store {
    /// Open or create a store at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// The collections are created the first time a database is opened.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreUnavailable`] if the database cannot be opened, or
    /// another error if schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::StoreUnavailable {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")
            .map_err(|source| Error::StoreUnavailable {
                path: path.clone(),
                source,
            })?;

        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::StoreUnavailable {
            path: PathBuf::from(MEMORY_PATH),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(MEMORY_PATH),
            conn,
        })
    }

    /// Close the store, reporting any error the database raises on close.
    ///
    /// Dropping the store also closes it; this only makes failures visible.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection could not be closed cleanly.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, err)| Error::from(err))?;
        debug!("Closed database at {}", self.path.display());
        Ok(())
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether this store lives only in memory.
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str() == MEMORY_PATH
    }

    /// Get the schema version recorded in the database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn schema_version(&self) -> Result<i32> {
        migrations::get_schema_version(&self.conn)
    }

    /// Begin a transaction spanning both collections.
    ///
    /// Nothing written through the transaction is visible after it is
    /// dropped unless [`StoreTransaction::commit`] was called.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started.
    pub fn transaction(&self) -> Result<StoreTransaction<'_>> {
        let tx = self.conn.unchecked_transaction()?;
        Ok(StoreTransaction { tx })
    }

    /// Get store statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let count = |sql: &str| -> Result<i64> {
            Ok(self.conn.query_row(sql, [], |row| row.get(0))?)
        };

        let presentations = count("SELECT COUNT(*) FROM presentations")?;
        let asset_bundles = count("SELECT COUNT(*) FROM assets")?;
        let flagged = count("SELECT COUNT(*) FROM presentations WHERE has_assets != 0")?;

        let db_size_bytes = if self.is_in_memory() {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            presentations,
            asset_bundles,
            flagged,
            db_size_bytes,
        })
    }
}

impl Records for Store {
    fn connection(&self) -> &Connection {
        &self.conn
    }
}

/// An open transaction over both collections.
///
/// Rolls back on drop unless committed.
#[derive(Debug)]
pub struct StoreTransaction<'a> {
    tx: Transaction<'a>,
}

impl StoreTransaction<'_> {
    /// Commit every write made through this transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails; nothing is written in that case.
    pub fn commit(self) -> Result<()> {
        self.tx.commit()?;
        Ok(())
    }
}

impl Records for StoreTransaction<'_> {
    fn connection(&self) -> &Connection {
        &self.tx
    }
}

/// Statistics about the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    /// Number of presentation records.
    pub presentations: i64,
    /// Number of asset records.
    pub asset_bundles: i64,
    /// Number of presentations flagged as having assets.
    pub flagged: i64,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}
