//! Walk through the service-account login step by step and print the first
//! few cells of the sheet, or what to fix when a step fails.

use std::process::ExitCode;

use anyhow::Result;
use chrono::Utc;
use sheetfleet::{
    config::{self, Config},
    failure::{self, ClassifiedFailure, FailureCategory},
    fetch::{auth, SheetsClient},
    logging,
};

const SAMPLE_RANGE: &str = "Sheet1!A1:D10";

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let env_files = config::load_dotenv()?;
    logging::init();

    println!("Testing Google Sheets API authentication...");
    for path in &env_files {
        println!("   (loaded {})", path.display());
    }

    let range = std::env::args().nth(1).unwrap_or_else(|| SAMPLE_RANGE.to_string());
    let config = Config::from_env();

    match check_access(&config, &range).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(failure) => {
            eprintln!("\nERROR [{}]: {}", failure.category.code(), failure.message);
            if failure.details != failure.message {
                eprintln!("   details: {}", failure.details);
            }
            let steps = failure.category.remediation_steps();
            if !steps.is_empty() {
                eprintln!("\nFIX:");
                for (i, step) in steps.iter().enumerate() {
                    eprintln!("   {}. {}", i + 1, step);
                }
            }
            if matches!(
                failure.category,
                FailureCategory::AccessNotGranted | FailureCategory::PermissionDenied
            ) {
                if let Some(email) = &config.client_email {
                    eprintln!("   service account: {}", email);
                }
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn check_access(config: &Config, range: &str) -> Result<(), ClassifiedFailure> {
    let classify = |e: anyhow::Error| failure::classify_failure(&e, config);

    println!("\n1) Checking environment variables...");
    let access = config.access().map_err(failure::missing_config)?;
    println!("   all set");
    println!("   Email: {}", access.client_email);
    println!("   Sheet ID: {}", access.sheet_id);

    println!("\n2) Parsing private key...");
    auth::signed_assertion(
        access.client_email,
        access.private_key,
        auth::TOKEN_URI,
        Utc::now().timestamp(),
    )
    .map_err(classify)?;
    println!("   private key parsed, JWT signed");

    println!("\n3) Authorizing service account...");
    let client = SheetsClient::new().map_err(classify)?;
    let token = client
        .authorize(access.client_email, access.private_key)
        .await
        .map_err(classify)?;
    println!("   authorized, token valid for {}s", token.expires_in);

    println!("\n4) Fetching {}...", range);
    let grid = client
        .fetch_values(&token, access.sheet_id, range)
        .await
        .map_err(classify)?;
    println!("   fetched {} rows\n", grid.len());
    match serde_json::to_string_pretty(&grid) {
        Ok(json) => println!("{}", json),
        Err(e) => println!("{:?} ({})", grid, e),
    }
    Ok(())
}
