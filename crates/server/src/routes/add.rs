//! `POST /post`: create a contact.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::header,
    response::IntoResponse,
};
use contactbook_core::Contact;
use serde::Deserialize;

use super::required;
use crate::error::ApiError;
use crate::handler::AppState;

/// Body of an add request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Add a new contact, echoing it back in compact JSON on success.
pub async fn add_contact(
    State(state): State<AppState>, payload: Result<Json<AddContactRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;

    let (Some(name), Some(email)) = (required(req.name), required(req.email)) else {
        return Err(ApiError::MalformedRequest);
    };
    let contact = Contact::new(name, email, req.phone.unwrap_or_default());
    let body = contact.stringify(0);

    if !state.store.add_entry(contact).await {
        return Err(ApiError::Internal("failure occurred"));
    }

    tracing::info!("added contact");
    Ok(([(header::CONTENT_TYPE, "application/json")], body))
}
