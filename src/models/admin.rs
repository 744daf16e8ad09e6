//! Administrative accounts

use crate::db::CollectionSpec;
use serde::{Deserialize, Serialize};

pub const ADMINS: CollectionSpec = CollectionSpec {
    name: "admins",
    unique_keys: &["username"],
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminAccount {
    pub username: String,
    /// bcrypt hash, never the plain credential
    pub password: String,
    pub role: String,
}
