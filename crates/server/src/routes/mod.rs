//! Contact route handlers.
//!
//! Each handler validates its JSON body, calls the shared store, and maps
//! the store's sentinel results onto HTTP responses.

pub mod add;
pub mod delete;
pub mod search;
pub mod update;

/// Treat a missing field and an empty string the same way.
pub(crate) fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
