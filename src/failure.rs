// src/failure.rs

use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::config::{Config, ConfigField};

/// What went wrong while loading the sheet, as far as a caller needs to know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FailureCategory {
    MissingConfig(ConfigField),
    AccessNotGranted,
    CredentialsInvalid,
    ResourceNotFound,
    PermissionDenied,
    Unknown,
}

impl FailureCategory {
    pub fn status(&self) -> u16 {
        match self {
            FailureCategory::MissingConfig(_) => 500,
            FailureCategory::AccessNotGranted => 401,
            FailureCategory::CredentialsInvalid => 401,
            FailureCategory::ResourceNotFound => 404,
            FailureCategory::PermissionDenied => 403,
            FailureCategory::Unknown => 500,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            FailureCategory::MissingConfig(_) => "MISSING_CONFIG",
            FailureCategory::AccessNotGranted => "ACCESS_NOT_GRANTED",
            FailureCategory::CredentialsInvalid => "CREDENTIALS_INVALID",
            FailureCategory::ResourceNotFound => "RESOURCE_NOT_FOUND",
            FailureCategory::PermissionDenied => "PERMISSION_DENIED",
            FailureCategory::Unknown => "UNKNOWN",
        }
    }

    /// Manual steps that usually fix this failure.
    pub fn remediation_steps(&self) -> &'static [&'static str] {
        match self {
            FailureCategory::MissingConfig(_) => &[
                "Copy the service account's client_email, private_key and the sheet id into .env.local",
                "Restart the process so the new values are picked up",
            ],
            FailureCategory::AccessNotGranted | FailureCategory::PermissionDenied => &[
                "Open the Google Sheet",
                "Click 'Share'",
                "Add the service account email",
                "Give it EDITOR permissions",
            ],
            FailureCategory::CredentialsInvalid => &[
                "Go to Google Cloud Console",
                "Create a NEW key for the service account",
                "Update GOOGLE_PRIVATE_KEY in .env.local with the new key",
            ],
            FailureCategory::ResourceNotFound => &[
                "Check GOOGLE_SHEET_ID against the id in the sheet's URL",
                "Make sure the sheet is shared with the service account",
            ],
            FailureCategory::Unknown => &[],
        }
    }
}

/// Map a failure message onto a category. First match wins; all tests are
/// case-insensitive substring checks.
pub fn categorize(message: &str) -> FailureCategory {
    let lower = message.to_lowercase();
    let has = |needle: &str| lower.contains(needle);

    if has("unregistered callers") {
        FailureCategory::AccessNotGranted
    } else if has("invalid credentials") || has("invalid_grant") {
        FailureCategory::CredentialsInvalid
    } else if has("not found") || has("404") {
        FailureCategory::ResourceNotFound
    } else if has("permission") {
        FailureCategory::PermissionDenied
    } else {
        FailureCategory::Unknown
    }
}

/// A categorized failure, ready to be sent back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ClassifiedFailure {
    pub category: FailureCategory,
    pub status: u16,
    pub message: String,
    pub details: String,
}

/// Wire form of a failure.
#[derive(Debug, Serialize)]
pub struct FailureBody<'a> {
    pub error: &'a str,
    pub details: &'a str,
}

impl ClassifiedFailure {
    pub fn body(&self) -> FailureBody<'_> {
        FailureBody {
            error: &self.message,
            details: &self.details,
        }
    }
}

/// Classify a fetch failure, using the whole context chain as the message.
pub fn classify_failure(err: &anyhow::Error, config: &Config) -> ClassifiedFailure {
    let details = format!("{:#}", err);
    let failure = classify_message(&details, config);
    error!(
        code = failure.category.code(),
        status = failure.status,
        message = %failure.message,
        "sheet request failed"
    );
    error!("full error: {:?}", err);
    failure
}

/// Build the user-facing failure for `details` without logging.
pub fn classify_message(details: &str, config: &Config) -> ClassifiedFailure {
    let category = categorize(details);
    let email = config.client_email.as_deref().unwrap_or_default();
    let sheet_id = config.sheet_id.as_deref().unwrap_or_default();

    let message = match category {
        FailureCategory::AccessNotGranted => format!(
            "Authentication Error: Service account is not added to the Google Sheet as EDITOR. Please share the sheet with: {}",
            email
        ),
        FailureCategory::CredentialsInvalid => {
            "Authentication failed: Private key may be invalid or expired. Regenerate service account key."
                .to_string()
        }
        FailureCategory::ResourceNotFound => format!(
            "Google Sheet not found. Sheet ID: {}. Verify GOOGLE_SHEET_ID is correct and the service account has access.",
            sheet_id
        ),
        FailureCategory::PermissionDenied => {
            "Permission denied: Service account email must be added as EDITOR to the spreadsheet."
                .to_string()
        }
        FailureCategory::MissingConfig(_) | FailureCategory::Unknown => {
            if details.is_empty() {
                "Failed to fetch data".to_string()
            } else {
                details.to_string()
            }
        }
    };

    ClassifiedFailure {
        category,
        status: category.status(),
        message,
        details: details.to_string(),
    }
}

/// Failure for a required setting that was never provided.
pub fn missing_config(field: ConfigField) -> ClassifiedFailure {
    let message = format!("{} is not set", field.env_var());
    let category = FailureCategory::MissingConfig(field);
    error!(code = category.code(), %message, "configuration incomplete");
    ClassifiedFailure {
        category,
        status: category.status(),
        details: message.clone(),
        message,
    }
}
