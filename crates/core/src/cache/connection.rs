//! SQLite connection management.
//!
//! Opens the database, applies pragmas (WAL mode), and creates the
//! `kv_entries` table. The schema version lives in `PRAGMA user_version`;
//! a file stamped with a newer version is refused rather than rewritten.

use crate::Error;
use std::path::Path;
use tokio_rusqlite::Connection;

const PRAGMAS: &str = "PRAGMA journal_mode=WAL;
     PRAGMA synchronous=NORMAL;
     PRAGMA temp_store=MEMORY;";

const SCHEMA: &str = include_str!("../../schema/kv_entries.sql");

/// Version stamped into `user_version` once `SCHEMA` is applied.
pub(crate) const SCHEMA_VERSION: i64 = 1;

/// SQLite-backed key-value cache handle.
///
/// Wraps a tokio-rusqlite Connection that runs statements on a background
/// thread. Cloning shares the same connection.
#[derive(Clone, Debug)]
pub struct CacheDb {
    pub(crate) conn: Connection,
}

impl CacheDb {
    /// Open a database at the specified path, creating it if missing.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let conn = Connection::open(path).await.map_err(Error::from)?;
        tracing::info!(path = %path.display(), "opened cache database");
        Self::init(conn).await
    }

    /// Open an in-memory database, used by tests and the CLI's dry runs.
    pub async fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory().await.map_err(Error::from)?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self, Error> {
        conn.call(|conn| -> Result<(), Error> {
            conn.execute_batch(PRAGMAS)?;

            let found: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
            if found > SCHEMA_VERSION {
                return Err(Error::UnsupportedSchema { found, supported: SCHEMA_VERSION });
            }
            if found < SCHEMA_VERSION {
                tracing::debug!(from = found, to = SCHEMA_VERSION, "creating cache schema");
                conn.execute_batch(SCHEMA)?;
                conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
            }
            Ok(())
        })
        .await
        .map_err(Error::from)?;

        Ok(Self { conn })
    }

    /// Close the underlying connection, flushing the WAL.
    pub async fn close(self) -> Result<(), Error> {
        self.conn.close().await.map_err(Error::from)
    }
}
