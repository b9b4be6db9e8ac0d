//! `DELETE /delete`: remove a contact by email.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Deserialize;
use serde_json::{Value, json};

use super::required;
use crate::error::ApiError;
use crate::handler::AppState;

/// Body of a delete request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteContactRequest {
    #[serde(default)]
    pub email: Option<String>,
}

/// Delete the contact with the given email.
///
/// Deleting an email that is not stored succeeds with a count of zero.
pub async fn remove_contact(
    State(state): State<AppState>, payload: Result<Json<DeleteContactRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = payload?;
    let email = required(req.email).ok_or(ApiError::MalformedRequest)?;

    let deleted = state
        .store
        .remove_entry(&email)
        .await
        .ok_or(ApiError::Internal("internal error occurred"))?;

    tracing::info!(deleted, "removed contact");
    Ok(Json(json!({ "result": "deleted contact successfully", "deleted": deleted })))
}
