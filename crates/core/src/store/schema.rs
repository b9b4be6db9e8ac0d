//! Contacts table creation.
//!
//! The schema is a single idempotent batch; it is applied on every open.

use crate::Error;
use tokio_rusqlite::Connection;

const CONTACTS_SCHEMA: &str = include_str!("../../sql/contacts.sql");

/// Ensure the contacts table exists.
///
/// # Errors
///
/// Returns `Error::SchemaFailed` if the batch fails to execute.
pub async fn ensure(conn: &Connection) -> Result<(), Error> {
    tracing::debug!("ensuring contacts table exists");
    conn.call(|conn| -> Result<(), Error> {
        conn.execute_batch(CONTACTS_SCHEMA)
            .map_err(|e| Error::SchemaFailed(e.to_string()))
    })
    .await
    .map_err(Error::from)
}
