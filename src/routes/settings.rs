//! Site settings route handlers
//!
//! The settings are one document under a fixed key. Reading creates it with
//! default values when it does not exist yet; updating patches the fields
//! sent in the request.

use crate::error::{ApiResult, AppError};
use crate::models::{
    get_or_create_update, site_settings_filter, SettingsValue, SuccessResponse,
    UpdateSettingsRequest,
};
use crate::routes::AppJson;
use crate::state::SharedState;
use axum::{extract::State, Json};
use tracing::{debug, info};

/// Get the site settings, creating the defaults on first access
pub async fn get_settings(
    State(state): State<SharedState>,
) -> ApiResult<Json<SuccessResponse<SettingsValue>>> {
    let settings = state
        .site_settings
        .find_one_and_update(&site_settings_filter(), &get_or_create_update()?, true)
        .await?
        .ok_or_else(|| AppError::Internal("Site settings upsert returned nothing".to_string()))?;

    debug!("Site settings read (id: {})", settings.id);

    Ok(Json(SuccessResponse::data_only(settings.data.value)))
}

/// Update the site settings; fields left out of the body keep their value
pub async fn update_settings(
    State(state): State<SharedState>,
    AppJson(payload): AppJson<UpdateSettingsRequest>,
) -> ApiResult<Json<SuccessResponse<SettingsValue>>> {
    let update = payload.to_update()?;
    debug!("Updating site settings ({} fields)", update.set.len());

    let settings = state
        .site_settings
        .find_one_and_update(&site_settings_filter(), &update, true)
        .await?
        .ok_or_else(|| AppError::Internal("Site settings upsert returned nothing".to_string()))?;

    info!("Site settings updated");

    Ok(Json(SuccessResponse::with_data(
        "Settings updated successfully",
        settings.data.value,
    )))
}
