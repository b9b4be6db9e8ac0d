//! Dynamic SQL construction for partial updates and conditional searches.
//!
//! Statements only ever contain column names from a fixed list; every
//! caller-supplied value is bound as a parameter.

use crate::contact::{ContactUpdate, non_empty, present};

pub(crate) const TABLE: &str = "contacts";
pub(crate) const COLUMN_EMAIL: &str = "email";
pub(crate) const COLUMN_NAME: &str = "contact_name";
pub(crate) const COLUMN_NUMBER: &str = "contact_number";

/// A SQL statement together with its positional parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlStatement {
    pub sql: String,
    pub params: Vec<String>,
}

/// Normalized search criteria. Empty strings are treated as absent.
///
/// Doubles as the search cache key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SearchQuery {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl SearchQuery {
    pub fn new(name: Option<&str>, email: Option<&str>) -> Self {
        Self { name: non_empty(name.map(str::to_string)), email: non_empty(email.map(str::to_string)) }
    }

    /// True when neither criterion is present.
    pub fn is_absent(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }

    /// Build the SELECT for these criteria, or `None` when both are absent.
    ///
    /// - name only: case-sensitive substring match on the name column
    /// - email only: exact match on the email column
    /// - both: exact email and substring name
    pub fn to_statement(&self) -> Option<SqlStatement> {
        let mut clauses = Vec::new();
        let mut params = Vec::new();

        if let Some(email) = present(&self.email) {
            params.push(email.to_string());
            clauses.push(format!("{COLUMN_EMAIL} = ?{}", params.len()));
        }
        if let Some(name) = present(&self.name) {
            // instr() is byte-wise and case-sensitive, unlike LIKE.
            params.push(name.to_string());
            clauses.push(format!("instr({COLUMN_NAME}, ?{}) > 0", params.len()));
        }

        if clauses.is_empty() {
            return None;
        }

        let sql = format!(
            "SELECT {COLUMN_EMAIL}, {COLUMN_NAME}, {COLUMN_NUMBER} FROM {TABLE} WHERE {} ORDER BY rowid",
            clauses.join(" AND ")
        );
        Some(SqlStatement { sql, params })
    }
}

/// Build the UPDATE for a partial update of the row keyed by `email`.
///
/// Fields are visited in the fixed order email, name, phone number and only
/// non-empty ones are included. Returns `None` when nothing would be written.
pub fn update_statement(email: &str, update: &ContactUpdate) -> Option<SqlStatement> {
    if update.is_empty() {
        return None;
    }

    let candidates = [
        (COLUMN_EMAIL, present(&update.email)),
        (COLUMN_NAME, present(&update.name)),
        (COLUMN_NUMBER, present(&update.phone_number)),
    ];

    let mut assignments = Vec::new();
    let mut params = Vec::new();
    for (column, value) in candidates {
        if let Some(value) = value {
            params.push(value.to_string());
            assignments.push(format!("{column} = ?{}", params.len()));
        }
    }

    params.push(email.to_string());
    let sql = format!("UPDATE {TABLE} SET {} WHERE {COLUMN_EMAIL} = ?{}", assignments.join(", "), params.len());
    Some(SqlStatement { sql, params })
}
