//! Back-office command-line entry point.
//!
//! ```text
//! storefront-admin [stats|submissions|migrate]
//! ```
//!
//! `stats` (default) loads both collections and prints their statistics as
//! JSON. `submissions` prints requests held in the local store. `migrate`
//! applies the Postgres schema.

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront_admin::{CustomSolutionsController, MutationOutcome, TemplatesController};
use storefront_db::client::Access;
use storefront_db::config::StoreConfig;
use storefront_db::local_submissions::get_stored_custom_solutions;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront_admin=debug,storefront_db=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = StoreConfig::from_env().context("Invalid store configuration")?;
    tracing::info!(backend = ?config.backend, "Loaded store configuration");

    let command = std::env::args().nth(1).unwrap_or_else(|| "stats".into());
    match command.as_str() {
        "stats" => print_stats(&config).await,
        "submissions" => print_submissions(&config),
        "migrate" => migrate(&config).await,
        other => anyhow::bail!("unknown command '{other}' (expected stats, submissions or migrate)"),
    }
}

async fn print_stats(config: &StoreConfig) -> anyhow::Result<()> {
    let client = config.connect().await.context("Failed to build store client")?;

    let mut templates = TemplatesController::new(Arc::clone(&client), Access::Admin);
    if let MutationOutcome::Failure(kind) = templates.load().await {
        anyhow::bail!("Failed to load templates: {kind}");
    }

    let mut requests = CustomSolutionsController::new(client);
    if let MutationOutcome::Failure(kind) = requests.load().await {
        anyhow::bail!("Failed to load custom solution requests: {kind}");
    }

    let report = json!({
        "templates": templates.stats(),
        "customSolutions": requests.stats(Utc::now()),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn print_submissions(config: &StoreConfig) -> anyhow::Result<()> {
    let store = config.open_local_store();
    let submissions = get_stored_custom_solutions(&store);
    tracing::info!(
        path = %config.local_store_path.display(),
        count = submissions.len(),
        "Read local submissions"
    );
    println!("{}", serde_json::to_string_pretty(&submissions)?);
    Ok(())
}

async fn migrate(config: &StoreConfig) -> anyhow::Result<()> {
    let url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set to run migrations")?;
    let pool = storefront_db::create_pool(url)
        .await
        .context("Failed to connect to database")?;
    storefront_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");
    Ok(())
}
