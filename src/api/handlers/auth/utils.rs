//! Small helpers shared across the auth handlers.

use anyhow::{Context, Result};
use axum::http::{header::AUTHORIZATION, HeaderMap};
use base64ct::{Base64, Encoding};
use rand::{rngs::OsRng, RngCore};
use regex::Regex;

use super::{state::AuthState, tokens::SessionClaims, AuthError};

/// Normalize an email for lookup/uniqueness checks.
pub(super) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic email format check on already-normalized input.
pub(super) fn valid_email(email_normalized: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email_normalized))
}

/// Mint a reset token: 32 bytes from the OS CSPRNG, base64-encoded.
///
/// The raw value is mailed nowhere and stored as-is; it only authorizes a
/// single password change before being deleted.
pub(super) fn generate_reset_token() -> Result<String> {
    let mut bytes = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate reset token")?;
    Ok(Base64::encode_string(&bytes))
}

/// Pull the bearer token out of the Authorization header, if any.
pub(super) fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Resolve the caller's identity from the session token claims.
///
/// Self-service endpoints always derive identity this way; a client-supplied
/// identifier is never trusted for actions on the caller's own account.
pub(super) fn require_subject(
    headers: &HeaderMap,
    state: &AuthState,
) -> Result<SessionClaims, AuthError> {
    let Some(token) = extract_bearer_token(headers) else {
        return Err(AuthError::Unauthorized);
    };
    state.tokens().validate(&token).map_err(|err| {
        tracing::warn!("Session token rejected: {err}");
        AuthError::Unauthorized
    })
}

pub(super) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}
