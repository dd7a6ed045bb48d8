//! Authentication models

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Refresh margin kept before a token's expiry
const REFRESH_BUFFER_MINUTES: i64 = 5;

/// Bearer token issued by the OAuth client-credentials grant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    /// The bearer token string
    pub token: String,

    /// Token expiration time
    #[serde(rename = "expiresAt")]
    pub expires_at: DateTime<Utc>,

    /// When the token was obtained, if known
    #[serde(rename = "issuedAt", default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Whether the token should be replaced before the next request.
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        needs_refresh(self.expires_at, self.issued_at, now)
    }
}

/// Expiry check shared by the client and the on-disk token cache.
///
/// The five-minute margin shrinks to a tenth of the lifetime for tokens
/// issued with less than fifty minutes to live.
pub fn needs_refresh(
    expires_at: DateTime<Utc>,
    issued_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    let full = Duration::minutes(REFRESH_BUFFER_MINUTES);
    let buffer = match issued_at {
        Some(issued_at) => full.min((expires_at - issued_at) / 10),
        None => full,
    };
    expires_at - buffer < now
}

/// Raw token endpoint response
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,

    /// Lifetime in seconds
    #[serde(default)]
    pub expires_in: Option<i64>,

    /// Error description returned instead of a token
    #[serde(default)]
    pub message: Option<String>,
}
