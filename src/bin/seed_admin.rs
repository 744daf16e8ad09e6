//! Seed the administrative account
//!
//! Reads `ADMIN_USERNAME` (default `admin`) and `ADMIN_PASSWORD`, hashes the
//! credential and stores the account unless it already exists.

use foundation_api::admin::{seed_admin, SeedOutcome};
use foundation_api::config::Settings;
use foundation_api::db::{open_store, Collection};
use foundation_api::init_tracing;
use foundation_api::models::{AdminAccount, ADMINS};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let settings = Settings::load()?;
    let password = settings.admin_password()?;

    let store = open_store(&settings).await?;
    let admins: Collection<AdminAccount> = Collection::new(store, ADMINS.name);

    let username = &settings.admin.username;
    match seed_admin(&admins, username, password).await? {
        SeedOutcome::Created(id) => info!("Admin '{}' seeded (id: {})", username, id),
        SeedOutcome::AlreadyExists => info!("Admin '{}' already present, exiting", username),
    }

    Ok(())
}
