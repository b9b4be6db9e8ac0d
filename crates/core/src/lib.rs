//! Core types and shared functionality for the contact book.
//!
//! This crate provides:
//! - The `Contact` value object and its serialization forms
//! - The `ContactStore` interface with a SQLite backend
//! - A TTL + LRU search cache in front of any store
//! - Unified error types and layered configuration

pub mod cache;
pub mod config;
pub mod contact;
pub mod error;
pub mod store;

pub use cache::{CachedStore, SearchCache};
pub use config::AppConfig;
pub use contact::{Contact, ContactUpdate};
pub use error::Error;
pub use store::{ContactStore, SearchQuery, SqliteStore};
