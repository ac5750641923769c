//! # Vouch (Credential & Identity Verification)
//!
//! `vouch` authenticates users, issues time-bounded session tokens, and runs
//! the multi-step verification workflows around them: password reset with
//! one-time codes, single-use reset tokens, and step-up link verification.
//!
//! ## Credential lifecycle
//!
//! - **Passwords** are stored as an HMAC-SHA512 digest under a random
//!   per-credential 64-byte key (the stored "salt"). Verification is
//!   constant-time.
//! - **One-time codes** are short numeric values drawn from the OS CSPRNG,
//!   tagged with the purpose that issued them (`signup`, `step_up`,
//!   `password_reset`) and consumed on first successful check.
//! - **Reset tokens** are 256-bit opaque values minted only after a verified
//!   code. Redemption and the credential re-hash happen in one transaction,
//!   so a token can never authorize two password changes, even under
//!   concurrent redemption attempts.
//! - **Session tokens** are stateless signed JWTs (HS256) with a 30-minute
//!   expiry. There is no revocation list: logout only clears an advisory
//!   in-process cache entry, and tokens stay valid until they expire.
//!
//! The signing key, issuer, and audience are loaded once at startup and the
//! process refuses to boot without them. Key rotation requires a restart.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(GIT_COMMIT_HASH.len() >= 7);
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
