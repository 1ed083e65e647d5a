pub mod cache;
pub mod client;
pub mod error;

pub use cache::SessionCache;
pub use client::{AuthClient, SignUpOutcome};
pub use error::SessionError;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated user as the backend reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
}

/// An issued session: the bearer token the data API expects, plus the
/// identity it was issued to. Serialized as-is into the session cache file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub user: Identity,
}

impl Session {
    /// Margin applied when judging expiry, so a token that would die
    /// mid-request already counts as expired.
    const EXPIRY_LEEWAY_SECS: i64 = 30;

    pub fn is_expired(&self) -> bool {
        Utc::now() + Duration::seconds(Self::EXPIRY_LEEWAY_SECS) >= self.expires_at
    }
}
