//! Contact CRUD operations.
//!
//! The fallible `*_contact(s)` methods run one transaction per call on the
//! connection thread. The [`ContactStore`] implementation wraps them and
//! converts every error into a sentinel value plus a log line.

use async_trait::async_trait;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite::{self, params_from_iter};

use super::connection::SqliteStore;
use super::query::{SearchQuery, update_statement};
use super::{ContactStore, log_failure};
use crate::{Contact, ContactUpdate, Error};

impl SqliteStore {
    /// Insert a new contact row.
    ///
    /// # Errors
    ///
    /// Returns `Error::UniquenessViolation` when the email or phone number is
    /// already stored, `Error::Database` for any other failure.
    pub async fn insert_contact(&self, contact: Contact) -> Result<(), Error> {
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                tx.execute(
                    "INSERT INTO contacts (email, contact_name, contact_number) VALUES (?1, ?2, ?3)",
                    params![contact.email, contact.name, contact.phone_number],
                )?;
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Delete the row keyed by `email`, returning the number of rows removed.
    pub async fn delete_contact(&self, email: &str) -> Result<u64, Error> {
        let email = email.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let tx = conn.transaction()?;
                let count = tx.execute("DELETE FROM contacts WHERE email = ?1", params![email])?;
                tx.commit()?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Apply a partial update, returning the number of rows changed.
    ///
    /// An update with no present fields touches nothing and returns 0.
    pub async fn update_contact(&self, email: &str, update: &ContactUpdate) -> Result<u64, Error> {
        let Some(statement) = update_statement(email, update) else {
            tracing::debug!(email, "update carries no fields; nothing to write");
            return Ok(0);
        };

        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let tx = conn.transaction()?;
                let count = tx.execute(&statement.sql, params_from_iter(statement.params.iter()))?;
                tx.commit()?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Find contacts matching the query, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` when both criteria are absent.
    pub async fn find_contacts(&self, query: &SearchQuery) -> Result<Vec<Contact>, Error> {
        let statement = query
            .to_statement()
            .ok_or_else(|| Error::InvalidInput("name or email is required".to_string()))?;

        self.conn
            .call(move |conn| -> Result<Vec<Contact>, Error> {
                let tx = conn.transaction()?;
                let contacts = {
                    let mut stmt = tx.prepare(&statement.sql)?;
                    let rows = stmt.query_map(params_from_iter(statement.params.iter()), |row| Ok(decode_row(row)))?;

                    let mut contacts = Vec::new();
                    for row in rows {
                        match row? {
                            Some(contact) => contacts.push(contact),
                            None => tracing::warn!("skipping malformed contact row"),
                        }
                    }
                    contacts
                };
                tx.commit()?;
                Ok(contacts)
            })
            .await
            .map_err(Error::from)
    }
}

/// Decode `(email, name, number)`; `None` if any column is missing or not text.
fn decode_row(row: &rusqlite::Row<'_>) -> Option<Contact> {
    let email: String = row.get(0).ok()?;
    let name: String = row.get(1).ok()?;
    let phone_number: String = row.get(2).ok()?;
    Some(Contact { name, email, phone_number })
}

#[async_trait]
impl ContactStore for SqliteStore {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn add_entry(&self, contact: Contact) -> bool {
        match self.insert_contact(contact).await {
            Ok(()) => true,
            Err(e) => {
                log_failure(self.name(), "add_entry", &e);
                false
            }
        }
    }

    async fn remove_entry(&self, email: &str) -> Option<u64> {
        self.delete_contact(email)
            .await
            .inspect_err(|e| log_failure(self.name(), "remove_entry", e))
            .ok()
    }

    async fn update_entry(&self, email: &str, update: ContactUpdate) -> Option<u64> {
        self.update_contact(email, &update)
            .await
            .inspect_err(|e| log_failure(self.name(), "update_entry", e))
            .ok()
    }

    async fn search_entry(&self, name: Option<&str>, email: Option<&str>) -> Option<Vec<Contact>> {
        let query = SearchQuery::new(name, email);
        if query.is_absent() {
            return None;
        }
        self.find_contacts(&query)
            .await
            .inspect_err(|e| log_failure(self.name(), "search_entry", e))
            .ok()
    }

    async fn close(&self) {
        self.close_connection().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ann() -> Contact {
        Contact::new("Ann", "a@x.com", "111")
    }

    async fn store_with(contacts: &[Contact]) -> SqliteStore {
        let store = SqliteStore::open_in_memory().await.unwrap();
        for contact in contacts {
            assert!(store.add_entry(contact.clone()).await);
        }
        store
    }

    async fn row_count(store: &SqliteStore) -> i64 {
        store
            .conn
            .call(|conn| conn.query_row("SELECT COUNT(*) FROM contacts", [], |row| row.get(0)))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_example_lifecycle() {
        let store = SqliteStore::open_in_memory().await.unwrap();

        assert!(store.add_entry(ann()).await);
        assert_eq!(store.search_entry(None, Some("a@x.com")).await, Some(vec![ann()]));
        assert!(!store.add_entry(ann()).await);
        assert_eq!(store.remove_entry("a@x.com").await, Some(1));
        assert_eq!(store.remove_entry("a@x.com").await, Some(0));
    }

    #[tokio::test]
    async fn test_duplicate_email_leaves_one_row() {
        let store = store_with(&[ann()]).await;

        let err = store
            .insert_contact(Contact::new("Other", "a@x.com", "999"))
            .await
            .unwrap_err();
        assert!(err.is_uniqueness_violation());
        assert_eq!(row_count(&store).await, 1);

        let found = store.search_entry(None, Some("a@x.com")).await.unwrap();
        assert_eq!(found, vec![ann()]);
    }

    #[tokio::test]
    async fn test_duplicate_phone_rejected() {
        let store = store_with(&[ann()]).await;
        assert!(!store.add_entry(Contact::new("Bob", "b@x.com", "111")).await);
        assert_eq!(row_count(&store).await, 1);
    }

    #[tokio::test]
    async fn test_empty_phone_is_unique_too() {
        let store = store_with(&[Contact::new("Ann", "a@x.com", "")]).await;
        let err = store
            .insert_contact(Contact::new("Bob", "b@x.com", ""))
            .await
            .unwrap_err();
        assert!(err.is_uniqueness_violation());
    }

    #[tokio::test]
    async fn test_delete_nonexistent_returns_zero() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        assert_eq!(store.remove_entry("nobody@x.com").await, Some(0));
    }

    #[tokio::test]
    async fn test_update_name_only() {
        let store = store_with(&[ann()]).await;

        let updated = store
            .update_entry("a@x.com", ContactUpdate::default().with_name("Annie"))
            .await;
        assert_eq!(updated, Some(1));

        let found = store.search_entry(None, Some("a@x.com")).await.unwrap();
        assert_eq!(found, vec![Contact::new("Annie", "a@x.com", "111")]);
    }

    #[tokio::test]
    async fn test_update_email_rekeys_row() {
        let store = store_with(&[ann()]).await;

        let updated = store
            .update_entry("a@x.com", ContactUpdate::default().with_email("ann@x.com").with_phone_number("222"))
            .await;
        assert_eq!(updated, Some(1));

        assert_eq!(store.search_entry(None, Some("a@x.com")).await, Some(vec![]));
        assert_eq!(
            store.search_entry(None, Some("ann@x.com")).await,
            Some(vec![Contact::new("Ann", "ann@x.com", "222")])
        );
    }

    #[tokio::test]
    async fn test_update_missing_row_returns_zero() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        let updated = store
            .update_entry("nobody@x.com", ContactUpdate::default().with_name("X"))
            .await;
        assert_eq!(updated, Some(0));
    }

    #[tokio::test]
    async fn test_update_without_fields_is_noop() {
        let store = store_with(&[ann()]).await;
        assert_eq!(store.update_entry("a@x.com", ContactUpdate::default()).await, Some(0));
        assert_eq!(store.search_entry(None, Some("a@x.com")).await, Some(vec![ann()]));
    }

    #[tokio::test]
    async fn test_update_into_existing_phone_fails() {
        let bob = Contact::new("Bob", "b@x.com", "222");
        let store = store_with(&[ann(), bob.clone()]).await;

        let err = store
            .update_contact("b@x.com", &ContactUpdate::default().with_phone_number("111"))
            .await
            .unwrap_err();
        assert!(err.is_uniqueness_violation());

        assert_eq!(
            store
                .update_entry("b@x.com", ContactUpdate::default().with_email("a@x.com"))
                .await,
            None
        );
        assert_eq!(store.search_entry(None, Some("b@x.com")).await, Some(vec![bob]));
    }

    #[tokio::test]
    async fn test_search_both_empty_is_absent() {
        let store = store_with(&[ann()]).await;
        assert_eq!(store.search_entry(None, None).await, None);
        assert_eq!(store.search_entry(Some(""), Some("")).await, None);
    }

    #[tokio::test]
    async fn test_search_no_match_is_empty() {
        let store = store_with(&[ann()]).await;
        assert_eq!(store.search_entry(None, Some("nobody@x.com")).await, Some(vec![]));
    }

    #[tokio::test]
    async fn test_search_name_is_case_sensitive_substring() {
        let store = store_with(&[
            ann(),
            Contact::new("Joanna", "j@x.com", "222"),
            Contact::new("ANNE", "e@x.com", "333"),
        ])
        .await;

        let found = store.search_entry(Some("nn"), None).await.unwrap();
        assert_eq!(found, vec![ann(), Contact::new("Joanna", "j@x.com", "222")]);

        let found = store.search_entry(Some("ANN"), None).await.unwrap();
        assert_eq!(found, vec![Contact::new("ANNE", "e@x.com", "333")]);
    }

    #[tokio::test]
    async fn test_search_name_wildcards_are_literal() {
        let store = store_with(&[ann(), Contact::new("100% Real", "r@x.com", "222")]).await;
        let found = store.search_entry(Some("%"), None).await.unwrap();
        assert_eq!(found, vec![Contact::new("100% Real", "r@x.com", "222")]);
    }

    #[tokio::test]
    async fn test_search_email_and_name() {
        let store = store_with(&[ann(), Contact::new("Bob", "b@x.com", "222")]).await;

        assert_eq!(store.search_entry(Some("An"), Some("a@x.com")).await, Some(vec![ann()]));
        assert_eq!(store.search_entry(Some("Bob"), Some("a@x.com")).await, Some(vec![]));
    }

    #[tokio::test]
    async fn test_search_skips_undecodable_rows() {
        let store = store_with(&[ann()]).await;
        // Name stored as a BLOB ("Anna" in bytes); instr() still matches it as text.
        store
            .conn
            .call(|conn| {
                conn.execute(
                    "INSERT INTO contacts (email, contact_name, contact_number) VALUES ('n@x.com', X'416E6E61', '222')",
                    [],
                )
            })
            .await
            .unwrap();
        assert_eq!(row_count(&store).await, 2);

        assert_eq!(store.search_entry(Some("Ann"), None).await, Some(vec![ann()]));
        assert_eq!(store.find_contacts(&SearchQuery::new(None, Some("n@x.com"))).await.unwrap(), vec![]);
    }

    #[tokio::test]
    async fn test_find_contacts_requires_criteria() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        let result = store.find_contacts(&SearchQuery::default()).await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_operations_after_close_fail_with_sentinels() {
        let store = store_with(&[ann()]).await;
        store.close().await;
        store.close().await;

        assert!(!store.add_entry(Contact::new("Bob", "b@x.com", "222")).await);
        assert_eq!(store.remove_entry("a@x.com").await, None);
        assert_eq!(
            store
                .update_entry("a@x.com", ContactUpdate::default().with_name("X"))
                .await,
            None
        );
        assert_eq!(store.search_entry(None, Some("a@x.com")).await, None);
    }

    #[tokio::test]
    async fn test_data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contacts.db");

        let store = SqliteStore::open(&path).await.unwrap();
        assert!(store.add_entry(ann()).await);
        store.close().await;

        let store = SqliteStore::open(&path).await.unwrap();
        assert_eq!(store.search_entry(Some("Ann"), None).await, Some(vec![ann()]));
        store.close().await;
    }

    #[tokio::test]
    async fn test_concurrent_inserts() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .add_entry(Contact::new(format!("User {i}"), format!("u{i}@x.com"), format!("{i}")))
                    .await
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap());
        }
        assert_eq!(row_count(&store).await, 16);
    }
}
