//! Administrative account bootstrap
//!
//! Seeds the single admin account on first run. Re-running while the
//! account exists is a no-op.

use crate::db::{Collection, Filter};
use crate::error::AppError;
use crate::models::AdminAccount;
use bcrypt::{hash, DEFAULT_COST};
use tracing::{debug, info};
use uuid::Uuid;

pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Created(Uuid),
    AlreadyExists,
}

/// Hash a password using bcrypt
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Create the admin account unless one with `username` already exists
pub async fn seed_admin(
    admins: &Collection<AdminAccount>,
    username: &str,
    password: &str,
) -> Result<SeedOutcome, AppError> {
    if admins
        .find_one(&Filter::eq("username", username))
        .await?
        .is_some()
    {
        info!("Admin account '{}' already exists, nothing to do", username);
        return Ok(SeedOutcome::AlreadyExists);
    }

    debug!("Hashing credential for '{}'", username);
    let account = AdminAccount {
        username: username.to_string(),
        password: hash_password(password)?,
        role: ADMIN_ROLE.to_string(),
    };

    // A concurrent run may have inserted the same username in the meantime
    match admins.insert_one(&account).await? {
        Some(record) => {
            info!("✅ Admin account '{}' created (id: {})", username, record.id);
            Ok(SeedOutcome::Created(record.id))
        }
        None => Ok(SeedOutcome::AlreadyExists),
    }
}
