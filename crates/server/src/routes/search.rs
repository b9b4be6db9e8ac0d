//! `GET /search`: find contacts by name substring and/or email.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Deserialize;

use super::required;
use crate::error::ApiError;
use crate::handler::AppState;

/// Body of a search request. At least one field must be non-empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Search contacts, returning each match in map form.
pub async fn search_contact(
    State(state): State<AppState>, payload: Result<Json<SearchContactRequest>, JsonRejection>,
) -> Result<Json<Vec<BTreeMap<String, String>>>, ApiError> {
    let Json(req) = payload?;
    let name = required(req.name);
    let email = required(req.email);
    if name.is_none() && email.is_none() {
        return Err(ApiError::MalformedRequest);
    }

    let contacts = state
        .store
        .search_entry(name.as_deref(), email.as_deref())
        .await
        .ok_or(ApiError::Internal("internal error"))?;

    tracing::debug!(matches = contacts.len(), "searched contacts");
    Ok(Json(contacts.iter().map(|c| c.encode()).collect()))
}
