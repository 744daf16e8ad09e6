//! Inquiry form route handler

use crate::error::{validation_error, ApiResult};
use crate::models::{CreateInquiryRequest, InquiryCreatedResponse};
use crate::routes::AppJson;
use crate::state::SharedState;
use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

/// Submit an inquiry. All five fields must be present and non-empty.
pub async fn create_inquiry(
    State(state): State<SharedState>,
    AppJson(payload): AppJson<CreateInquiryRequest>,
) -> ApiResult<(StatusCode, Json<InquiryCreatedResponse>)> {
    let inquiry = payload.into_message()?;

    let record = state
        .inquiries
        .insert_one(&inquiry)
        .await?
        .ok_or_else(|| validation_error("Invalid message data"))?;

    info!("Inquiry created (id: {})", record.id);

    Ok((
        StatusCode::CREATED,
        Json(InquiryCreatedResponse {
            id: record.id,
            inquiry: record.data,
        }),
    ))
}
