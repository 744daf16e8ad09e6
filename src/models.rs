//! Data models and DTOs (Data Transfer Objects)
//!
//! Contains the stored record types, request/response structures and the
//! collection each record type lives in.

pub mod admin;
pub mod contact;
pub mod inquiry;
pub mod pagination;
pub mod settings;

// Re-export commonly used types
pub use admin::*;
pub use contact::*;
pub use inquiry::*;
pub use pagination::*;
pub use settings::*;

use crate::db::CollectionSpec;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Every collection the application stores documents in
pub const COLLECTIONS: &[CollectionSpec] = &[CONTACTS, MESSAGES, SITE_SETTINGS, ADMINS];

/// Message shown when a required form field is missing or empty
pub const MISSING_FIELDS_MESSAGE: &str = "Please fill in all fields";

/// Form field that may arrive as a JSON string, number or boolean.
/// Scalars are kept as their text; `null` or a missing field stays `None`.
pub(crate) fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(_) => Err(de::Error::custom("expected a string or number")),
    }
}

/// Generic success response
#[derive(Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }

    pub fn data_only(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }
}

/// Message-only response (no data)
#[derive(Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
