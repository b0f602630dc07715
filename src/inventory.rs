// src/inventory.rs

use tracing::{info, instrument, warn};

use crate::config::Config;
use crate::failure::{self, ClassifiedFailure};
use crate::fetch::GridFetcher;
use crate::process;
use crate::schema::VehicleRecord;

/// Load the current vehicle list.
///
/// Required settings are checked before `fetcher` is touched; any fetch failure
/// comes back classified and already logged.
#[instrument(level = "info", skip_all, fields(range = %config.range))]
pub async fn load_vehicles<F: GridFetcher>(
    config: &Config,
    fetcher: &F,
) -> Result<Vec<VehicleRecord>, ClassifiedFailure> {
    let access = config.access().map_err(failure::missing_config)?;

    let grid = fetcher
        .fetch_grid(&access)
        .await
        .map_err(|e| failure::classify_failure(&e, config))?;

    if grid.is_empty() {
        warn!("no data found in sheet");
        return Ok(Vec::new());
    }

    let census = process::census(&grid);
    let records = process::map_all(&grid);
    info!(
        rows = grid.len(),
        records = records.len(),
        date_markers = census.date_markers,
        section_headers = census.section_headers,
        empty = census.empty,
        "sheet normalized"
    );
    Ok(records)
}

/// Records with both a vehicle number and a product; the rest are not shown.
pub fn listable(records: &[VehicleRecord]) -> impl Iterator<Item = &VehicleRecord> {
    records.iter().filter(|r| r.is_listable())
}

/// Listable records whose vehicle number or product contains `query`, ignoring case.
pub fn search<'a>(records: &'a [VehicleRecord], query: &str) -> Vec<&'a VehicleRecord> {
    let needle = query.to_lowercase();
    listable(records)
        .filter(|r| {
            r.vno.to_lowercase().contains(&needle) || r.product.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Look up a listable record by id.
pub fn find_listed(records: &[VehicleRecord], id: u32) -> Option<&VehicleRecord> {
    listable(records).find(|r| r.id == id)
}
