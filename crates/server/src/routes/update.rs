//! `POST /update`: partially update a contact.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use contactbook_core::ContactUpdate;
use serde::Deserialize;
use serde_json::{Value, json};

use super::required;
use crate::error::ApiError;
use crate::handler::AppState;

/// Body of an update request. Only non-empty `new_*` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateContactRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub new_name: Option<String>,
    #[serde(default)]
    pub new_email: Option<String>,
    #[serde(default)]
    pub new_phone: Option<String>,
}

/// Apply a partial update to the contact identified by `email`.
pub async fn edit_contact(
    State(state): State<AppState>, payload: Result<Json<UpdateContactRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = payload?;
    let email = required(req.email).ok_or(ApiError::MalformedRequest)?;
    let update = ContactUpdate::from_fields(req.new_name, req.new_email, req.new_phone);

    let updated = state
        .store
        .update_entry(&email, update)
        .await
        .ok_or(ApiError::Internal("internal error"))?;

    tracing::info!(updated, "modified contact");
    Ok(Json(json!({ "result": "contact modified successfully", "updated": updated })))
}
