use chrono::TimeDelta;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// Session token payload.
///
/// Carries the user identity (`sub`, `name`, `email`) plus the RFC 7519
/// timing claims. `exp` is always present: session tokens never outlive
/// their window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Display name of the user at issuance time
    pub name: String,

    /// Email of the user at issuance time
    pub email: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a user, expiring `expiration_hours` from now.
    ///
    /// # Arguments
    /// * `user_id` - Unique user identifier
    /// * `name` - User display name
    /// * `email` - User email address
    /// * `expiration_hours` - Hours until token expires
    ///
    /// # Errors
    /// * `InvalidExpiration` - The expiry falls outside the representable time range
    pub fn for_user(
        user_id: impl ToString,
        name: impl Into<String>,
        email: impl Into<String>,
        expiration_hours: i64,
    ) -> Result<Self, JwtError> {
        let now = Utc::now();
        let expiration = TimeDelta::try_hours(expiration_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or(JwtError::InvalidExpiration(expiration_hours))?;

        Ok(Self {
            sub: user_id.to_string(),
            name: name.into(),
            email: email.into(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        })
    }

    /// Override the expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = exp;
        self
    }
}
