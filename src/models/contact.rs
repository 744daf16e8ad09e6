//! Contact form messages

use crate::db::{CollectionSpec, Record};
use crate::error::{validation_error, AppError};
use crate::models::MISSING_FIELDS_MESSAGE;
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const CONTACTS: CollectionSpec = CollectionSpec {
    name: "contacts",
    unique_keys: &[],
};

/// A message submitted through the website's contact form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub subject: String,
    pub full_name: String,
    pub email: String,
    pub message: String,
    pub contact_number: String,
}

/// Request to submit a contact message
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactRequest {
    #[serde(default, deserialize_with = "crate::models::scalar_string")]
    #[validate(required, length(min = 1))]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "crate::models::scalar_string")]
    #[validate(required, length(min = 1))]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "crate::models::scalar_string")]
    #[validate(required, length(min = 1))]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "crate::models::scalar_string")]
    #[validate(required, length(min = 1))]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "crate::models::scalar_string")]
    #[validate(required, length(min = 1))]
    pub contact_number: Option<String>,
}

impl CreateContactRequest {
    /// Check that every field is present, then build the record to store
    pub fn into_message(self) -> Result<ContactMessage, AppError> {
        self.validate()
            .map_err(|_| validation_error(MISSING_FIELDS_MESSAGE))?;

        Ok(ContactMessage {
            subject: self.subject.unwrap_or_default(),
            full_name: self.full_name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            message: self.message.unwrap_or_default(),
            contact_number: self.contact_number.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ContactCreatedResponse {
    pub success: bool,
    pub message: String,
    pub contact: Record<ContactMessage>,
}

/// One page of contact messages, newest first
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPageResponse {
    pub success: bool,
    pub messages: Vec<Record<ContactMessage>>,
    pub total_pages: u64,
    pub current_page: u64,
    pub total: u64,
}

/// A single contact message; the record travels in the `message` field
#[derive(Debug, Serialize)]
pub struct ContactDetailResponse {
    pub success: bool,
    pub message: Record<ContactMessage>,
}
