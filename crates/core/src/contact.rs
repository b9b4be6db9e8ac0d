//! The contact value object.
//!
//! A `Contact` is built fresh for every create or update request and moved
//! by value into the store. It has two serialization forms: a pretty JSON
//! string with sorted keys, and a flat string map for embedding in larger
//! responses.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

/// A single contact record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    /// Display name of the contact.
    pub name: String,
    /// Email address. Unique across the store and used as its key.
    pub email: String,
    /// Phone number. Unique across the store.
    pub phone_number: String,
}

impl Contact {
    pub fn new(name: impl Into<String>, email: impl Into<String>, phone_number: impl Into<String>) -> Self {
        Self { name: name.into(), email: email.into(), phone_number: phone_number.into() }
    }

    /// Map form: attribute name to value, keys in lexicographic order.
    pub fn encode(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("email".to_string(), self.email.clone()),
            ("name".to_string(), self.name.clone()),
            ("phone_number".to_string(), self.phone_number.clone()),
        ])
    }

    /// Pretty form: JSON with sorted keys, indented by `indent` spaces per level.
    ///
    /// An indent of zero produces compact single-line JSON.
    pub fn stringify(&self, indent: usize) -> String {
        let map = self.encode();
        if indent == 0 {
            return serde_json::to_string(&map).unwrap_or_default();
        }

        let pad = " ".repeat(indent);
        let mut out = Vec::new();
        let mut ser = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(pad.as_bytes()));
        if map.serialize(&mut ser).is_err() {
            return String::new();
        }
        String::from_utf8(out).unwrap_or_default()
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stringify(0))
    }
}

/// A partial update: only present, non-empty fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactUpdate {
    pub email: Option<String>,
    pub name: Option<String>,
    pub phone_number: Option<String>,
}

impl ContactUpdate {
    /// Build an update from raw request fields, treating empty strings as absent.
    pub fn from_fields(name: Option<String>, email: Option<String>, phone_number: Option<String>) -> Self {
        Self { email: non_empty(email), name: non_empty(name), phone_number: non_empty(phone_number) }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = non_empty(Some(email.into()));
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = non_empty(Some(name.into()));
        self
    }

    pub fn with_phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = non_empty(Some(phone_number.into()));
        self
    }

    /// True when no field would be written.
    pub fn is_empty(&self) -> bool {
        present(&self.email).is_none() && present(&self.name).is_none() && present(&self.phone_number).is_none()
    }
}

pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
