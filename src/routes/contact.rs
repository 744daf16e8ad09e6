//! Contact message route handlers
//!
//! Create, paginated list, fetch and delete for contact form submissions.

use crate::error::{not_found_error, ApiResult, AppError};
use crate::models::{
    ContactCreatedResponse, ContactDetailResponse, ContactPageResponse, CreateContactRequest,
    MessageResponse, PageQuery,
};
use crate::routes::{AppJson, AppQuery};
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{debug, info};
use uuid::Uuid;

const NOT_FOUND_MESSAGE: &str = "Contact message not found";

/// Classify the id before the store sees it: malformed ids are client errors
fn parse_contact_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::BadRequest("Invalid contact message id".to_string()))
}

/// Submit a contact message
pub async fn create_contact(
    State(state): State<SharedState>,
    AppJson(payload): AppJson<CreateContactRequest>,
) -> ApiResult<(StatusCode, Json<ContactCreatedResponse>)> {
    let message = payload.into_message()?;
    debug!("Storing contact message from {}", message.email);

    let contact = state
        .contacts
        .insert_one(&message)
        .await?
        .ok_or_else(|| AppError::Internal("Contact message was not stored".to_string()))?;

    info!("Contact message created (id: {})", contact.id);

    Ok((
        StatusCode::CREATED,
        Json(ContactCreatedResponse {
            success: true,
            message: "Contact message sent successfully".to_string(),
            contact,
        }),
    ))
}

/// List contact messages, newest first.
///
/// The page and the total come from two separate store calls, so under
/// concurrent writes `total` may not match the page that was returned.
pub async fn list_contacts(
    State(state): State<SharedState>,
    AppQuery(query): AppQuery<PageQuery>,
) -> ApiResult<Json<ContactPageResponse>> {
    let page = query.parse()?;
    debug!("Listing contact messages: page {} (limit {})", page.page, page.limit);

    let messages = state.contacts.find_page(page.skip(), page.limit).await?;
    let total = state.contacts.count_documents().await?;

    Ok(Json(ContactPageResponse {
        success: true,
        messages,
        total_pages: page.total_pages(total),
        current_page: page.page,
        total,
    }))
}

/// Get a single contact message
pub async fn get_contact(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ContactDetailResponse>> {
    let id = parse_contact_id(&id)?;
    debug!("Getting contact message: {}", id);

    let message = state
        .contacts
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found_error(NOT_FOUND_MESSAGE))?;

    Ok(Json(ContactDetailResponse {
        success: true,
        message,
    }))
}

/// Delete a contact message
pub async fn delete_contact(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_contact_id(&id)?;

    state
        .contacts
        .find_by_id_and_delete(id)
        .await?
        .ok_or_else(|| not_found_error(NOT_FOUND_MESSAGE))?;

    info!("Contact message deleted (id: {})", id);

    Ok(Json(MessageResponse::new(
        "Contact message deleted successfully",
    )))
}
