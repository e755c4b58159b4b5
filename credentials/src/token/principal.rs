use chrono::DateTime;
use chrono::Utc;

/// Authenticated identity.
///
/// Produced by a successful login or by a verified token. `expires` is only
/// set on principals decoded from tokens that carry an expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub name: String,
    pub expires: Option<DateTime<Utc>>,
}

impl Principal {
    /// Create a principal without an expiry.
    pub fn new(username: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            name: name.into(),
            expires: None,
        }
    }

    /// Check whether the principal's expiry has been reached at `now`.
    ///
    /// A principal without an expiry never expires. Reaching the expiry
    /// instant exactly counts as expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires.map_or(false, |expires| expires <= now)
    }
}
