//! Auth configuration and shared state.

use anyhow::Result;
use secrecy::SecretString;
use std::collections::HashMap;
use tokio::sync::Mutex;

use super::tokens::SessionTokenService;

/// Reset tokens expire 15 minutes after a successful code verification.
pub(super) const RESET_TOKEN_TTL_SECONDS: i64 = 15 * 60;

#[derive(Debug)]
pub struct AuthConfig {
    jwt_key: SecretString,
    jwt_issuer: String,
    jwt_audience: String,
}

impl AuthConfig {
    #[must_use]
    pub fn new(jwt_key: SecretString, jwt_issuer: String, jwt_audience: String) -> Self {
        Self {
            jwt_key,
            jwt_issuer,
            jwt_audience,
        }
    }
}

/// Shared auth state: the token service and the advisory logout cache.
pub struct AuthState {
    tokens: SessionTokenService,
    // Best-effort map of identity -> last issued jti. Logout clears it, but
    // the stateless token stays valid until its embedded expiry; nothing
    // authoritative reads this map.
    sessions: Mutex<HashMap<String, String>>,
}

impl AuthState {
    /// # Errors
    /// Returns an error if the signing key, issuer, or audience is empty.
    pub fn new(config: AuthConfig) -> Result<Self> {
        let tokens = SessionTokenService::new(
            &config.jwt_key,
            config.jwt_issuer,
            config.jwt_audience,
        )?;

        Ok(Self {
            tokens,
            sessions: Mutex::new(HashMap::new()),
        })
    }

    #[must_use]
    pub fn tokens(&self) -> &SessionTokenService {
        &self.tokens
    }

    /// Record the latest issued token id for an identity (advisory only).
    pub async fn remember_session(&self, email: &str, jti: &str) {
        let mut sessions = self.sessions.lock().await;
        sessions.insert(email.to_string(), jti.to_string());
    }

    /// Drop the advisory cache entry; idempotent.
    pub async fn forget_session(&self, email: &str) {
        let mut sessions = self.sessions.lock().await;
        sessions.remove(email);
    }

    #[cfg(test)]
    pub(super) async fn session_jti(&self, email: &str) -> Option<String> {
        let sessions = self.sessions.lock().await;
        sessions.get(email).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AuthState {
        let config = AuthConfig::new(
            SecretString::from("test-signing-key"),
            "vouch.dev".to_string(),
            "vouch-clients".to_string(),
        );
        AuthState::new(config).expect("state")
    }

    #[tokio::test]
    async fn advisory_cache_remembers_and_forgets() {
        let state = state();
        state.remember_session("alice@example.com", "jti-1").await;
        assert_eq!(
            state.session_jti("alice@example.com").await.as_deref(),
            Some("jti-1")
        );

        state.remember_session("alice@example.com", "jti-2").await;
        assert_eq!(
            state.session_jti("alice@example.com").await.as_deref(),
            Some("jti-2")
        );

        state.forget_session("alice@example.com").await;
        assert_eq!(state.session_jti("alice@example.com").await, None);

        // Forgetting an absent entry is a no-op.
        state.forget_session("alice@example.com").await;
    }

    #[test]
    fn empty_signing_key_fails_fast() {
        let config = AuthConfig::new(
            SecretString::from(""),
            "vouch.dev".to_string(),
            "vouch-clients".to_string(),
        );
        assert!(AuthState::new(config).is_err());
    }
}
