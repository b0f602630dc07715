// src/fetch/auth.rs

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

pub const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
pub const SHEETS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
/// Google caps service-account assertions at one hour.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

/// Bearer token handed back by the OAuth token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default)]
    pub token_type: String,
}

#[derive(Debug, Deserialize)]
struct TokenError {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Sign the RS256 JWT that the service account presents to `audience`.
pub fn signed_assertion(
    client_email: &str,
    private_key: &str,
    audience: &str,
    issued_at: i64,
) -> Result<String> {
    let key = EncodingKey::from_rsa_pem(private_key.as_bytes())
        .context("Invalid credentials: private key is not a PEM encoded RSA key")?;
    let claims = Claims {
        iss: client_email,
        scope: SHEETS_READONLY_SCOPE,
        aud: audience,
        iat: issued_at,
        exp: issued_at + ASSERTION_LIFETIME_SECS,
    };
    encode(&Header::new(Algorithm::RS256), &claims, &key).context("signing service account JWT")
}

/// Exchange a freshly signed assertion for an access token.
#[instrument(level = "debug", skip(client, private_key))]
pub async fn authorize(
    client: &Client,
    token_uri: &str,
    client_email: &str,
    private_key: &str,
) -> Result<AccessToken> {
    let assertion = signed_assertion(client_email, private_key, token_uri, Utc::now().timestamp())?;

    let resp = client
        .post(token_uri)
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
        .send()
        .await
        .map_err(reqwest::Error::without_url)
        .context("requesting access token")?;
    let status = resp.status();
    let body = resp.text().await.context("reading token response")?;
    if !status.is_success() {
        return Err(anyhow!(describe_token_error(status.as_u16(), &body)));
    }

    let token: AccessToken = serde_json::from_str(&body).context("decoding token response")?;
    debug!(expires_in = token.expires_in, "service account authorized");
    Ok(token)
}

/// OAuth errors look like `{"error":"invalid_grant","error_description":"..."}`.
fn describe_token_error(status: u16, body: &str) -> String {
    match serde_json::from_str::<TokenError>(body) {
        Ok(TokenError {
            error,
            error_description: Some(desc),
        }) => format!("{}: {}", error, desc),
        Ok(TokenError { error, .. }) => error,
        Err(_) => format!("token endpoint returned {}: {}", status, body.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure::{categorize, FailureCategory};
    use jsonwebtoken::{decode, DecodingKey, Validation};
    use serde_json::Value;

    const TEST_KEY: &str = include_str!("../../testdata/test_service_account.pem");
    const TEST_PUBLIC_KEY: &str = include_str!("../../testdata/test_service_account.pub.pem");

    #[test]
    fn assertion_carries_service_account_claims() -> Result<()> {
        let now = Utc::now().timestamp();
        let jwt = signed_assertion("svc@proj.iam.gserviceaccount.com", TEST_KEY, TOKEN_URI, now)?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[TOKEN_URI]);
        let data = decode::<Value>(
            &jwt,
            &DecodingKey::from_rsa_pem(TEST_PUBLIC_KEY.as_bytes())?,
            &validation,
        )?;

        assert_eq!(data.claims["iss"], "svc@proj.iam.gserviceaccount.com");
        assert_eq!(data.claims["scope"], SHEETS_READONLY_SCOPE);
        assert_eq!(data.claims["iat"], now);
        assert_eq!(data.claims["exp"], now + ASSERTION_LIFETIME_SECS);
        Ok(())
    }

    #[test]
    fn garbage_key_reads_as_bad_credentials() {
        let err = signed_assertion("svc@x", "not a key", TOKEN_URI, 0).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.starts_with("Invalid credentials"), "{message}");
        assert_eq!(categorize(&message), FailureCategory::CredentialsInvalid);
    }

    #[test]
    fn token_error_descriptions() {
        assert_eq!(
            describe_token_error(
                400,
                r#"{"error":"invalid_grant","error_description":"Invalid JWT Signature."}"#
            ),
            "invalid_grant: Invalid JWT Signature."
        );
        assert_eq!(
            describe_token_error(401, r#"{"error":"unauthorized_client"}"#),
            "unauthorized_client"
        );
        assert_eq!(
            describe_token_error(502, "Bad Gateway\n"),
            "token endpoint returned 502: Bad Gateway"
        );
    }
}
