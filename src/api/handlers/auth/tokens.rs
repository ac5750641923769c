//! Stateless session tokens.
//!
//! Tokens are JWTs signed with a symmetric key (HS256) carrying the subject
//! email, a unique `jti` for log correlation, and a 30-minute absolute
//! expiry. Validation checks signature, issuer, audience, and expiry with
//! zero leeway. There is no refresh mechanism; expiry forces re-login.

use anyhow::{anyhow, Context, Result};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use ulid::Ulid;

/// Session lifetime in seconds.
pub const SESSION_TTL_SECONDS: u64 = 30 * 60;

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject identity (normalized email).
    pub sub: String,
    /// Unique token id, for log correlation rather than revocation.
    pub jti: String,
    pub iss: String,
    pub aud: String,
    pub exp: u64,
}

/// Issues and validates signed session tokens.
///
/// The signing key is loaded once at startup and is immutable for the
/// lifetime of the process; rotation requires a restart.
pub struct SessionTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
}

impl SessionTokenService {
    /// # Errors
    /// Returns an error if the key, issuer, or audience is empty.
    pub fn new(key: &SecretString, issuer: String, audience: String) -> Result<Self> {
        let secret = key.expose_secret();
        if secret.is_empty() || issuer.is_empty() || audience.is_empty() {
            return Err(anyhow!("session token key, issuer, and audience must be set"));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            audience,
        })
    }

    /// Issue a token for the subject; returns `(token, jti)`.
    ///
    /// # Errors
    /// Returns an error if the system clock is unusable or signing fails.
    pub fn issue(&self, subject: &str) -> Result<(String, String)> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .context("system clock before unix epoch")?
            .as_secs();
        self.issue_at(subject, now)
    }

    fn issue_at(&self, subject: &str, now_unix: u64) -> Result<(String, String)> {
        let jti = Ulid::new().to_string();
        let claims = SessionClaims {
            sub: subject.to_string(),
            jti: jti.clone(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            exp: now_unix + SESSION_TTL_SECONDS,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .context("failed to sign session token")?;

        Ok((token, jti))
    }

    /// Validate signature, issuer, audience, and expiry.
    ///
    /// # Errors
    /// Returns the underlying decode error; callers present all failures
    /// uniformly as unauthorized.
    pub fn validate(&self, token: &str) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.leeway = 0;

        let data = decode::<SessionClaims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::errors::ErrorKind;

    fn service() -> SessionTokenService {
        SessionTokenService::new(
            &SecretString::from("test-signing-key"),
            "vouch.dev".to_string(),
            "vouch-clients".to_string(),
        )
        .expect("service")
    }

    #[test]
    fn issue_and_validate_round_trip() {
        let service = service();
        let (token, jti) = service.issue("alice@example.com").expect("issue");
        let claims = service.validate(&token).expect("validate");
        assert_eq!(claims.sub, "alice@example.com");
        assert_eq!(claims.jti, jti);
        assert_eq!(claims.iss, "vouch.dev");
        assert_eq!(claims.aud, "vouch-clients");
    }

    #[test]
    fn jti_is_unique_per_token() {
        let service = service();
        let (_, jti_a) = service.issue("alice@example.com").expect("issue");
        let (_, jti_b) = service.issue("alice@example.com").expect("issue");
        assert_ne!(jti_a, jti_b);
    }

    #[test]
    fn expired_token_rejected_despite_valid_signature() {
        let service = service();
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_secs();
        // Issued far enough in the past that the 30m expiry has elapsed.
        let (token, _) = service
            .issue_at("alice@example.com", now - SESSION_TTL_SECONDS - 60)
            .expect("issue");
        let err = service.validate(&token).expect_err("must be expired");
        assert_eq!(*err.kind(), ErrorKind::ExpiredSignature);
    }

    #[test]
    fn wrong_key_rejected() {
        let service = service();
        let other = SessionTokenService::new(
            &SecretString::from("other-key"),
            "vouch.dev".to_string(),
            "vouch-clients".to_string(),
        )
        .expect("service");
        let (token, _) = service.issue("alice@example.com").expect("issue");
        assert!(other.validate(&token).is_err());
    }

    #[test]
    fn wrong_issuer_or_audience_rejected() {
        let service = service();
        let (token, _) = service.issue("alice@example.com").expect("issue");

        let wrong_issuer = SessionTokenService::new(
            &SecretString::from("test-signing-key"),
            "evil.dev".to_string(),
            "vouch-clients".to_string(),
        )
        .expect("service");
        assert!(wrong_issuer.validate(&token).is_err());

        let wrong_audience = SessionTokenService::new(
            &SecretString::from("test-signing-key"),
            "vouch.dev".to_string(),
            "other-clients".to_string(),
        )
        .expect("service");
        assert!(wrong_audience.validate(&token).is_err());
    }

    #[test]
    fn empty_configuration_fails_fast() {
        assert!(SessionTokenService::new(
            &SecretString::from(""),
            "vouch.dev".to_string(),
            "vouch-clients".to_string()
        )
        .is_err());
        assert!(SessionTokenService::new(
            &SecretString::from("key"),
            String::new(),
            "vouch-clients".to_string()
        )
        .is_err());
        assert!(SessionTokenService::new(
            &SecretString::from("key"),
            "vouch.dev".to_string(),
            String::new()
        )
        .is_err());
    }
}
