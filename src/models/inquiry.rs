//! Inquiry form messages

use crate::db::CollectionSpec;
use crate::error::{validation_error, AppError};
use crate::models::MISSING_FIELDS_MESSAGE;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

pub const MESSAGES: CollectionSpec = CollectionSpec {
    name: "messages",
    unique_keys: &[],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryMessage {
    pub full_name: String,
    pub email: String,
    pub contact_number: String,
    pub subject: String,
    pub message: String,
}

/// Request to submit an inquiry; every field is required
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInquiryRequest {
    #[serde(default, deserialize_with = "crate::models::scalar_string")]
    #[validate(required, length(min = 1))]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "crate::models::scalar_string")]
    #[validate(required, length(min = 1))]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "crate::models::scalar_string")]
    #[validate(required, length(min = 1))]
    pub contact_number: Option<String>,
    #[serde(default, deserialize_with = "crate::models::scalar_string")]
    #[validate(required, length(min = 1))]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "crate::models::scalar_string")]
    #[validate(required, length(min = 1))]
    pub message: Option<String>,
}

impl CreateInquiryRequest {
    pub fn into_message(self) -> Result<InquiryMessage, AppError> {
        self.validate()
            .map_err(|_| validation_error(MISSING_FIELDS_MESSAGE))?;

        Ok(InquiryMessage {
            full_name: self.full_name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            contact_number: self.contact_number.unwrap_or_default(),
            subject: self.subject.unwrap_or_default(),
            message: self.message.unwrap_or_default(),
        })
    }
}

/// The stored inquiry echoed back with its id
#[derive(Debug, Serialize)]
pub struct InquiryCreatedResponse {
    pub id: Uuid,
    #[serde(flatten)]
    pub inquiry: InquiryMessage,
}
