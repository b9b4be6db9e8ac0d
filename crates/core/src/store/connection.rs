//! Database connection management with pragma configuration.
//!
//! This module handles opening the SQLite database, applying pragmas for
//! concurrent access (WAL mode), and ensuring the contacts table exists.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::schema;
use crate::Error;
use tokio_rusqlite::Connection;

const PRAGMAS: &str = "PRAGMA journal_mode=WAL;
     PRAGMA synchronous=NORMAL;
     PRAGMA temp_store=MEMORY;";

/// SQLite-backed contact store.
///
/// Wraps a tokio-rusqlite Connection that runs database operations
/// on a background thread. Clones share the same connection.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pub(crate) conn: Connection,
    closed: Arc<AtomicBool>,
}

impl SqliteStore {
    pub(crate) const NAME: &'static str = "SQLite3";

    /// Open a database at the specified path.
    ///
    /// Creates the file if it doesn't exist, applies pragmas, and creates
    /// the contacts table if needed.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "opening contact database");
        let conn = Connection::open(path).await.map_err(|e| Error::Database(e.into()))?;
        Self::init(conn).await
    }

    /// Open an in-memory database for testing.
    pub async fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| Error::Database(e.into()))?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self, Error> {
        conn.call(|conn| {
            conn.execute_batch(PRAGMAS)?;
            Ok(())
        })
        .await
        .map_err(Error::Database)?;

        schema::ensure(&conn).await?;

        Ok(Self { conn, closed: Arc::new(AtomicBool::new(false)) })
    }

    /// Whether `close_connection` has already run.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Close the underlying connection. Later calls are no-ops.
    pub async fn close_connection(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Err(e) = self.conn.clone().close().await {
            tracing::warn!(error = %e, "failed to close contact database cleanly");
        } else {
            tracing::debug!("contact database closed");
        }
    }
}
