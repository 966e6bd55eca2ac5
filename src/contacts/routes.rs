//! REST endpoints for the contact form.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use serde_json::json;
use tracing::{debug, error};

use super::model::ContactPayload;
use super::repository::ContactRepository;
use crate::error::{ContactError, ValidationError};

/// Shared state for contact routes.
#[derive(Clone)]
pub struct ContactRouteState {
    pub repository: ContactRepository,
}

/// Build the contact REST routes.
pub fn contact_routes(repository: ContactRepository) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/send/mail", post(create_contact))
        .route("/contacts", get(list_contacts))
        .route("/update/contact/{id}", put(update_contact))
        .route("/delete/contact/{id}", delete(delete_contact))
        .with_state(ContactRouteState { repository })
}

// ── Errors ──────────────────────────────────────────────────────────────

/// A failed contact operation, rendered as `{"message", "error"}`.
#[derive(Debug)]
pub struct ApiError {
    /// What the caller was trying to do.
    context: &'static str,
    error: ContactError,
}

impl ApiError {
    fn new(context: &'static str) -> impl FnOnce(ContactError) -> Self {
        move |error| Self { context, error }
    }

    pub fn status(&self) -> StatusCode {
        match self.error {
            ContactError::Validation(_) => StatusCode::BAD_REQUEST,
            ContactError::NotFound { .. } => StatusCode::NOT_FOUND,
            ContactError::StorageUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self.error {
            ContactError::NotFound { .. } => "Contact not found",
            _ => self.context,
        };

        if status.is_server_error() {
            error!(status = status.as_u16(), context = self.context, "Request failed");
        } else {
            debug!(status = status.as_u16(), error = %self.error, "Request rejected");
        }

        (
            status,
            Json(json!({
                "message": message,
                "error": self.error.to_string(),
            })),
        )
            .into_response()
    }
}

/// Turn a body that is not a contact-shaped JSON object into a validation failure.
fn read_payload(body: Result<Json<ContactPayload>, JsonRejection>) -> Result<ContactPayload, ContactError> {
    body.map(|Json(payload)| payload)
        .map_err(|rejection| ValidationError::MalformedBody(rejection.body_text()).into())
}

// ── Handlers ────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "contact-store"
    }))
}

/// POST /send/mail
async fn create_contact(
    State(state): State<ContactRouteState>,
    body: Result<Json<ContactPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = read_payload(body).map_err(ApiError::new("Error sending message"))?;
    let contact = state
        .repository
        .create(payload)
        .await
        .map_err(ApiError::new("Error sending message"))?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Message sent successfully!",
            "createdContact": contact,
        })),
    ))
}

/// GET /contacts
async fn list_contacts(State(state): State<ContactRouteState>) -> Result<impl IntoResponse, ApiError> {
    let contacts = state
        .repository
        .list()
        .await
        .map_err(ApiError::new("Error fetching contacts"))?;
    Ok(Json(contacts))
}

/// PUT /update/contact/{id}
async fn update_contact(
    State(state): State<ContactRouteState>,
    Path(id): Path<String>,
    body: Result<Json<ContactPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = read_payload(body).map_err(ApiError::new("Error updating contact"))?;
    let contact = state
        .repository
        .update_by_id(&id, payload)
        .await
        .map_err(ApiError::new("Error updating contact"))?;
    Ok(Json(json!({
        "message": "Contact updated successfully!",
        "updatedContact": contact,
    })))
}

/// DELETE /delete/contact/{id}
async fn delete_contact(
    State(state): State<ContactRouteState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let contact = state
        .repository
        .delete_by_id(&id)
        .await
        .map_err(ApiError::new("Error deleting contact"))?;
    Ok(Json(json!({
        "message": "Contact deleted successfully!",
        "deletedContact": contact,
    })))
}
