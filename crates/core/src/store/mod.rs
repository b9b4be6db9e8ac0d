//! Contact storage.
//!
//! The rest of the system depends on the [`ContactStore`] interface, not on
//! a concrete backend. [`SqliteStore`] is the single implementation; the
//! search cache wraps any store and implements the same interface.
//!
//! Store methods never return errors to their callers. Every failure is
//! logged and turned into the sentinel documented on each method.

pub mod connection;
pub mod contacts;
pub mod query;
pub mod schema;

use async_trait::async_trait;

use crate::{Contact, ContactUpdate, Error};

pub use connection::SqliteStore;
pub use query::SearchQuery;

/// Capability interface for contact backends.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Friendly backend name for log lines.
    fn name(&self) -> &str;

    /// Insert a new contact.
    ///
    /// Returns `false` if the email or phone number already exists, or on
    /// any storage fault.
    async fn add_entry(&self, contact: Contact) -> bool;

    /// Delete the contact keyed by `email`.
    ///
    /// Returns the number of rows deleted (`Some(0)` when nothing matched),
    /// or `None` on a storage fault.
    async fn remove_entry(&self, email: &str) -> Option<u64>;

    /// Apply a partial update to the contact keyed by `email`.
    ///
    /// Returns the number of rows updated, or `None` on a fault (including a
    /// uniqueness violation by one of the new values).
    async fn update_entry(&self, email: &str, update: ContactUpdate) -> Option<u64>;

    /// Search by name substring and/or exact email.
    ///
    /// Returns `None` when both criteria are empty, or on a storage fault.
    async fn search_entry(&self, name: Option<&str>, email: Option<&str>) -> Option<Vec<Contact>>;

    /// Release the backend. Safe to call more than once.
    async fn close(&self);
}

/// Log a failed store operation at the level its kind calls for.
pub(crate) fn log_failure(backend: &str, operation: &str, err: &Error) {
    if err.is_uniqueness_violation() {
        tracing::warn!(backend, operation, error = %err, "rejected duplicate contact");
    } else {
        tracing::error!(backend, operation, error = %err, "storage operation failed");
    }
}
