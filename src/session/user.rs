use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An authenticated user's standing with the backend: access token plus
/// expiry. Persisted by the host application under the `current-user`
/// settings key; the validator only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub username: String,
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl AuthUser {
    pub fn new(username: &str, access_token: &str, expires_at: DateTime<Utc>) -> Self {
        Self {
            username: username.to_string(),
            access_token: access_token.to_string(),
            expires_at,
        }
    }

    /// A token is expired once its expiry is no longer strictly in the future.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    pub fn has_token(&self) -> bool {
        !self.access_token.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_expiry_boundary() {
        let future = AuthUser::new("alice", "tok", Utc::now() + Duration::minutes(10));
        assert!(!future.is_expired());

        let past = AuthUser::new("alice", "tok", Utc::now() - Duration::seconds(1));
        assert!(past.is_expired());
    }

    #[test]
    fn test_empty_token_detected() {
        let user = AuthUser::new("alice", "", Utc::now() + Duration::minutes(10));
        assert!(!user.has_token());
    }
}
