//! Service-account authentication for the Sheets API
//!
//! OAuth 2.0 JWT bearer flow: sign an RS256 assertion with the service
//! account key, exchange it for an access token, and reuse the token until
//! shortly before it expires.

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::{StoreError, StoreResult};

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Refresh this long before the reported expiry
const REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

struct CachedToken {
    value: String,
    expires_at: i64,
}

pub struct ServiceAccountAuth {
    client_email: String,
    key: EncodingKey,
    token_url: String,
    client: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl std::fmt::Debug for ServiceAccountAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountAuth")
            .field("client_email", &self.client_email)
            .field("token_url", &self.token_url)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountAuth {
    /// `private_key` is the PEM from the service-account JSON. Escaped `\n`
    /// sequences (as found in env files) are expanded.
    pub fn new(client_email: &str, private_key: &str, client: reqwest::Client) -> StoreResult<Self> {
        let pem = private_key.replace("\\n", "\n");
        let key = EncodingKey::from_rsa_pem(pem.as_bytes())
            .map_err(|e| StoreError::Auth(format!("invalid service account key: {e}")))?;

        Ok(Self {
            client_email: client_email.to_string(),
            key,
            token_url: TOKEN_URL.to_string(),
            client,
            cached: Mutex::new(None),
        })
    }

    /// Override the token endpoint
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// A valid access token, fetching a new one when the cache is stale
    pub async fn access_token(&self) -> StoreResult<String> {
        let mut cached = self.cached.lock().await;
        let now = chrono::Utc::now().timestamp();

        if let Some(token) = cached.as_ref()
            && token.expires_at - REFRESH_MARGIN_SECS > now
        {
            return Ok(token.value.clone());
        }

        let fresh = self.request_token(now).await?;
        let value = fresh.access_token.clone();
        *cached = Some(CachedToken {
            value: fresh.access_token,
            expires_at: now + fresh.expires_in,
        });
        tracing::debug!(client_email = %self.client_email, expires_in = fresh.expires_in, "Obtained Sheets access token");
        Ok(value)
    }

    fn assertion(&self, now: i64) -> StoreResult<String> {
        let claims = Claims {
            iss: &self.client_email,
            scope: SHEETS_SCOPE,
            aud: TOKEN_URL,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };
        encode(&Header::new(Algorithm::RS256), &claims, &self.key)
            .map_err(|e| StoreError::Auth(format!("failed to sign assertion: {e}")))
    }

    async fn request_token(&self, now: i64) -> StoreResult<TokenResponse> {
        let assertion = self.assertion(now)?;
        let resp = self
            .client
            .post(&self.token_url)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::Auth(format!("token endpoint returned {status}: {body}")));
        }

        Ok(resp.json().await?)
    }
}
