//! Authentication context injected into the backend client.
//!
//! The session itself (login, token refresh, persistence) lives outside this
//! crate. The client only needs to know who the current user is and which
//! bearer token to attach, and it asks through [`AuthContext`] instead of
//! reading any global state.

use std::fmt;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
}

/// Source of the current user and their credentials.
pub trait AuthContext: Send + Sync {
    fn current_user(&self) -> Option<CurrentUser>;

    fn bearer_token(&self) -> Option<&SecretString>;
}

/// A fixed session, typically built from configuration.
#[derive(Default)]
pub struct StaticSession {
    user: Option<CurrentUser>,
    token: Option<SecretString>,
}

impl StaticSession {
    pub fn new(user: Option<CurrentUser>, token: Option<String>) -> Self {
        Self {
            user,
            token: token.filter(|t| !t.is_empty()).map(SecretString::from),
        }
    }

    /// A session with no user and no token.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        let user = config.auth.user_id.map(|id| CurrentUser {
            id,
            username: config.auth.username.clone(),
        });
        Self::new(user, config.auth_token())
    }
}

impl AuthContext for StaticSession {
    fn current_user(&self) -> Option<CurrentUser> {
        self.user.clone()
    }

    fn bearer_token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }
}

impl fmt::Debug for StaticSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticSession")
            .field("user", &self.user)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_empty_token_is_no_token() {
        let session = StaticSession::new(None, Some(String::new()));
        assert!(session.bearer_token().is_none());
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = StaticSession::new(
            Some(CurrentUser {
                id: 3,
                username: Some("ola".to_string()),
            }),
            Some("jwt-secret".to_string()),
        );
        let debug = format!("{session:?}");
        assert!(!debug.contains("jwt-secret"));
        assert!(debug.contains("[REDACTED]"));
        assert_eq!(
            session.bearer_token().map(|t| t.expose_secret().to_string()),
            Some("jwt-secret".to_string())
        );
        assert_eq!(session.current_user().map(|u| u.id), Some(3));
    }

    #[test]
    fn test_anonymous() {
        let session = StaticSession::anonymous();
        assert!(session.current_user().is_none());
        assert!(session.bearer_token().is_none());
    }
}
