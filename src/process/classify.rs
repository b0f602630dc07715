// src/process/classify.rs

use once_cell::sync::Lazy;
use regex::Regex;

/// `DD-MM-YYYY` on its own, used in the sheet to start a new day's block.
static DATE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{2}-[0-9]{2}-[0-9]{4}$").expect("date marker regex"));

/// Upper-case group banners such as `L AND T` or `M & M`.
static SECTION_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z\s&]+$").expect("section header regex"));

/// What a single sheet row turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKind {
    Data,
    DateMarker,
    SectionHeader,
    Empty,
}

impl RowKind {
    /// Only data rows become records.
    pub fn is_data(&self) -> bool {
        matches!(self, RowKind::Data)
    }
}

/// Classify one raw row. Only single-cell rows can be markers or banners.
pub fn classify_row<S: AsRef<str>>(row: &[S]) -> RowKind {
    match row {
        [] => RowKind::Empty,
        [only] if DATE_MARKER.is_match(only.as_ref()) => RowKind::DateMarker,
        [only] if SECTION_HEADER.is_match(only.as_ref()) => RowKind::SectionHeader,
        _ => RowKind::Data,
    }
}
