//! Credential lifecycle handlers and supporting modules.
//!
//! This module covers the whole credential lifecycle: password hashing and
//! verification, purpose-tagged one-time codes, single-use reset tokens, and
//! stateless session tokens.
//!
//! ## Step ordering
//!
//! Password reset is a three-stage machine: request a code, exchange the code
//! for a reset token, redeem the token together with the new password. Each
//! stage requires the artifact from the previous one to be unexpired and
//! unconsumed. Codes are invalidated on first successful check; reset tokens
//! are deleted in the same transaction as the credential mutation, so a token
//! can never be redeemed twice even under concurrent requests.
//!
//! ## Logout
//!
//! Session tokens are stateless and carry their own expiry. Logout only
//! clears an advisory in-process cache entry; the token itself stays valid
//! until `exp`. This is a deliberate short-TTL/no-revocation design.

pub mod account;
pub mod codes;
mod error;
pub mod login;
pub mod password;
pub mod password_reset;
pub mod signup;
mod state;
mod storage;
pub mod tokens;
pub mod types;
mod utils;
pub mod verification;

pub use error::AuthError;
pub use state::{AuthConfig, AuthState};
