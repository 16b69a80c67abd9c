use crate::api::admins::create_admin;
use crate::config::AppConfig;
use crate::db::store::JsonStore;
use crate::error::AppError;

/// What happened during first-run admin seeding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Admins already exist; configuration was ignored.
    AlreadySeeded,
    /// No admins and no bootstrap credentials: the dashboard is unreachable
    /// until one is added with `betteh-admin add-admin`.
    NoCredentials,
    Seeded { username: String },
}

/// Seed exactly one admin from configuration if none exist yet.
pub async fn seed_admin(store: &JsonStore, config: &AppConfig) -> Result<SeedOutcome, AppError> {
    let data = store.load().await?;
    if !data.admins.is_empty() {
        tracing::info!("{} admin account(s) present, skipping bootstrap", data.admins.len());
        return Ok(SeedOutcome::AlreadySeeded);
    }

    let Some((username, password)) = config.bootstrap_admin() else {
        tracing::warn!(
            "No admin accounts exist and no bootstrap credentials are configured; \
             run `betteh-admin add-admin` to create one"
        );
        return Ok(SeedOutcome::NoCredentials);
    };

    let admin = create_admin(store, username, password).await?;
    tracing::info!("Seeded bootstrap admin '{}'", admin.username);
    Ok(SeedOutcome::Seeded {
        username: admin.username,
    })
}
