//! Sample data for a fresh inventory

use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::store::{ItemData, ItemStore};

/// Outcome of a seeding run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: Vec<String>,
    pub skipped: Vec<String>,
}

/// The fixed sample records
pub fn sample_items() -> Vec<ItemData> {
    vec![
        ItemData::new("Laptop", "Dell XPS 13, 16GB RAM, 512GB SSD", 10),
        ItemData::new("Monitor", "24-inch Full HD Monitor", 15),
        ItemData::new("Keyboard", "Mechanical Keyboard, RGB", 25),
        ItemData::new("Mouse", "Wireless Mouse", 30),
        ItemData::new("Webcam", "HD USB Webcam", 12),
    ]
}

/// Insert the sample records, skipping names that already exist
///
/// Running it twice leaves the store unchanged the second time.
pub async fn seed_items(store: &dyn ItemStore) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    for data in sample_items() {
        let name = data.name.clone();
        match store.create(data).await {
            Ok(_) => {
                info!(name = %name, "Inserted sample item");
                report.inserted.push(name);
            }
            Err(AppError::DuplicateName(_)) => {
                info!(name = %name, "Skipped sample item (already exists)");
                report.skipped.push(name);
            }
            Err(e) => {
                warn!(name = %name, error = %e, "Failed to insert sample item");
                return Err(e);
            }
        }
    }

    Ok(report)
}
