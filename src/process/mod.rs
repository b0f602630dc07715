// src/process/mod.rs
pub mod classify;
pub mod mapper;

pub use classify::{classify_row, RowKind};
pub use mapper::map_row;

use tracing::{debug, trace, warn};

use crate::schema::{VehicleRecord, VEHICLE_SCHEMA};

/// Per-kind row counts for one grid.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RowCensus {
    pub data: usize,
    pub date_markers: usize,
    pub section_headers: usize,
    pub empty: usize,
}

impl RowCensus {
    pub fn kept(&self) -> usize {
        self.data
    }

    pub fn dropped(&self) -> usize {
        self.date_markers + self.section_headers + self.empty
    }
}

/// Count every row of `grid` by kind.
pub fn census<S: AsRef<str>>(grid: &[Vec<S>]) -> RowCensus {
    let mut census = RowCensus::default();
    for row in grid {
        match classify_row(row) {
            RowKind::Data => census.data += 1,
            RowKind::DateMarker => census.date_markers += 1,
            RowKind::SectionHeader => census.section_headers += 1,
            RowKind::Empty => census.empty += 1,
        }
    }
    census
}

/// Id for the record after `count` kept rows. A spreadsheet holds at most
/// 10 million cells, so real sheets never get near the `u32` limit.
fn next_id(count: usize) -> Option<u32> {
    u32::try_from(count).ok()?.checked_add(1)
}

/// Turn a raw sheet grid into vehicle records.
///
/// - Rows that are not data (empty, date markers, section banners) are skipped.
/// - Each kept row becomes exactly one record, in sheet order.
/// - Ids count kept rows only, starting at 1, so they are dense but not sheet row numbers.
#[tracing::instrument(level = "debug", skip(grid), fields(rows = grid.len()))]
pub fn map_all<S: AsRef<str>>(grid: &[Vec<S>]) -> Vec<VehicleRecord> {
    let mut records = Vec::with_capacity(grid.len());
    for (row_no, row) in grid.iter().enumerate() {
        let kind = classify_row(row);
        if !kind.is_data() {
            trace!(row_no, ?kind, "skipping row");
            continue;
        }
        let Some(id) = next_id(records.len()) else {
            warn!(row_no, "record ids exhausted, ignoring remaining rows");
            break;
        };
        records.push(map_row(&VEHICLE_SCHEMA, row, id));
    }
    debug!(records = records.len(), "mapped grid");
    records
}
