//! Site-wide settings
//!
//! A single document keyed by [`SITE_SETTINGS_KEY`] holds the contact
//! details shown in the site header and footer.

use crate::db::{CollectionSpec, Filter, StoreError, Update};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SITE_SETTINGS: CollectionSpec = CollectionSpec {
    name: "sitesettings",
    unique_keys: &["key"],
};

pub const SITE_SETTINGS_KEY: &str = "site_settings";

pub const DEFAULT_PHONE_NUMBER: &str = "+92 335 9424716";
pub const DEFAULT_EMAIL: &str = "rafahiyahfoundation@gmail.com";
pub const DEFAULT_ADDRESS: &str = "Pakistan";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright_text: Option<String>,
}

impl SettingsValue {
    /// Values written the first time the settings are read; no copyright text
    pub fn defaults() -> Self {
        Self {
            phone_number: Some(DEFAULT_PHONE_NUMBER.to_string()),
            email: Some(DEFAULT_EMAIL.to_string()),
            address: Some(DEFAULT_ADDRESS.to_string()),
            copyright_text: None,
        }
    }
}

/// The stored settings document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSettings {
    pub key: String,
    #[serde(default)]
    pub value: SettingsValue,
}

pub fn site_settings_filter() -> Filter {
    Filter::eq("key", SITE_SETTINGS_KEY)
}

/// Update that creates the settings with defaults when they are missing
/// and leaves an existing document untouched.
pub fn get_or_create_update() -> Result<Update, StoreError> {
    Ok(Update::default().set_on_insert("value", serde_json::to_value(SettingsValue::defaults())?))
}

/// Partial settings change; only the fields present are written
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateSettingsRequest {
    #[serde(default, deserialize_with = "crate::models::scalar_string")]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "crate::models::scalar_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "crate::models::scalar_string")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "crate::models::scalar_string")]
    pub copyright_text: Option<String>,
}

impl UpdateSettingsRequest {
    /// Build the store update. Absent (or null) fields keep their value; a
    /// missing document is seeded with the defaults before the patch.
    pub fn to_update(&self) -> Result<Update, StoreError> {
        let fields = [
            ("phoneNumber", &self.phone_number),
            ("email", &self.email),
            ("address", &self.address),
            ("copyrightText", &self.copyright_text),
        ];

        Ok(fields
            .into_iter()
            .filter_map(|(name, value)| value.as_ref().map(|v| (name, v)))
            .fold(get_or_create_update()?, |update, (name, value)| {
                update.set(format!("value.{}", name), Value::String(value.clone()))
            }))
    }
}
