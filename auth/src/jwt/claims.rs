use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Session lifetime. Tokens expire one hour after issuance.
pub const SESSION_TTL_HOURS: i64 = 1;

/// Claims carried by a session token.
///
/// Deliberately minimal: the subject identifier plus issuance and expiry
/// timestamps. Tokens are self-contained; nothing is persisted server-side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (identity record id)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create session claims for a subject, expiring [`SESSION_TTL_HOURS`]
    /// from now.
    pub fn session(subject: impl ToString) -> Self {
        let now = Utc::now();
        let expiration = now + Duration::hours(SESSION_TTL_HOURS);

        Self {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Check if the claims are expired at the given timestamp.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}
