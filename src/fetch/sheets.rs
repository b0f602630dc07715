// src/fetch/sheets.rs

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument};
use url::Url;

use super::auth::{self, AccessToken};
use super::{Grid, GridFetcher};
use crate::config::SheetAccess;

pub const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// `spreadsheets.values.get` response. `values` is left out entirely for an empty range.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange {
    #[serde(default)]
    range: Option<String>,
    #[serde(default)]
    values: Option<Vec<Vec<Cell>>>,
}

/// A cell as the API may render it, depending on the value render option.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Cell {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Empty,
}

impl Cell {
    fn into_string(self) -> String {
        match self {
            Cell::Text(s) => s,
            Cell::Int(i) => i.to_string(),
            Cell::Float(f) => f.to_string(),
            Cell::Bool(true) => "TRUE".to_string(),
            Cell::Bool(false) => "FALSE".to_string(),
            Cell::Empty => String::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

/// Google Sheets reader authenticated as a service account.
#[derive(Debug, Clone)]
pub struct SheetsClient {
    http: Client,
    token_uri: String,
    api_base: String,
}

impl SheetsClient {
    pub fn new() -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("building HTTP client")?;
        Ok(Self::with_endpoints(http, auth::TOKEN_URI, SHEETS_API_BASE))
    }

    pub fn with_endpoints(
        http: Client,
        token_uri: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Self {
        Self {
            http,
            token_uri: token_uri.into(),
            api_base: api_base.into(),
        }
    }

    pub async fn authorize(&self, client_email: &str, private_key: &str) -> Result<AccessToken> {
        auth::authorize(&self.http, &self.token_uri, client_email, private_key).await
    }

    /// `<api_base>/<sheet_id>/values/<range>`, with each part escaped as a path segment.
    pub fn values_url(&self, sheet_id: &str, range: &str) -> Result<Url> {
        let mut url = Url::parse(&self.api_base)
            .with_context(|| format!("parsing sheets api base {:?}", self.api_base))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("sheets api base {:?} cannot take a path", self.api_base))?
            .pop_if_empty()
            .push(sheet_id)
            .push("values")
            .push(range);
        Ok(url)
    }

    /// Read `range` from the sheet as a grid of cell text.
    #[instrument(level = "debug", skip(self, token))]
    pub async fn fetch_values(&self, token: &AccessToken, sheet_id: &str, range: &str) -> Result<Grid> {
        let url = self.values_url(sheet_id, range)?;
        let resp = self
            .http
            .get(url)
            .bearer_auth(&token.access_token)
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .context("requesting sheet values")?;
        let status = resp.status();
        let body = resp.text().await.context("reading sheet values response")?;
        if !status.is_success() {
            return Err(anyhow!(describe_api_error(status.as_u16(), &body)));
        }

        let value_range: ValueRange =
            serde_json::from_str(&body).context("decoding sheet values response")?;
        let grid: Grid = value_range
            .values
            .unwrap_or_default()
            .into_iter()
            .map(|row| row.into_iter().map(Cell::into_string).collect())
            .collect();

        debug!(range = ?value_range.range, rows = grid.len(), "fetched sheet values");
        Ok(grid)
    }
}

impl GridFetcher for SheetsClient {
    async fn fetch_grid(&self, access: &SheetAccess<'_>) -> Result<Grid> {
        let token = self.authorize(access.client_email, access.private_key).await?;
        let grid = self
            .fetch_values(&token, access.sheet_id, access.range)
            .await?;
        info!(sheet_id = access.sheet_id, rows = grid.len(), "sheet fetched");
        Ok(grid)
    }
}

/// Google API errors look like
/// `{"error":{"code":404,"message":"Requested entity was not found.","status":"NOT_FOUND"}}`.
fn describe_api_error(status: u16, body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(ApiErrorBody { error }) if !error.message.is_empty() => {
            let code = if error.code == 0 { status } else { error.code };
            if error.status.is_empty() {
                format!("{} ({})", error.message, code)
            } else {
                format!("{} ({} {})", error.message, code, error.status)
            }
        }
        _ => format!("sheets api returned {}: {}", status, body.trim()),
    }
}
