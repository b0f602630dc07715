// src/fetch/mod.rs

use std::future::Future;

use anyhow::Result;

use crate::config::SheetAccess;

pub mod auth;
pub mod sheets;

pub use sheets::SheetsClient;

/// Raw sheet contents: rows of cell text, rows may be ragged.
pub type Grid = Vec<Vec<String>>;

/// Source of the raw sheet grid.
///
/// An empty sheet is `Ok(vec![])`; errors should carry the upstream message text
/// so the failure classifier can recognise them.
pub trait GridFetcher {
    fn fetch_grid(&self, access: &SheetAccess<'_>) -> impl Future<Output = Result<Grid>> + Send;
}
