//! Inserts the sample items into the configured store

use inventory_web::{config::Settings, store, telemetry};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut settings = Settings::load()?;
    telemetry::init_tracing(&settings.logging)?;

    // Seeding is done explicitly below
    settings.storage.seed_on_start = false;
    let items = store::open_store(&settings.storage).await?;

    let report = store::seed::seed_items(items.as_ref()).await?;
    info!(
        inserted = report.inserted.len(),
        skipped = report.skipped.len(),
        backend = %items.backend(),
        path = %settings.storage.path,
        "Seeding finished"
    );

    Ok(())
}
