use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A signed-in identity as reported by the identity provider.
///
/// The flow only observes sessions; it never creates or mutates one.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Provider-assigned user ID.
    pub uid: String,
    pub email: String,
    #[serde(default)]
    pub email_verified: bool,
    pub id_token: String,
    pub refresh_token: String,
    /// When `id_token` stops being accepted by the provider.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Returns `true` if the ID token has expired at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

// Tokens are credentials; keep them out of logs and panic messages.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("uid", &self.uid)
            .field("email", &self.email)
            .field("email_verified", &self.email_verified)
            .field("id_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
