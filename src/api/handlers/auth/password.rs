//! Password hashing and verification.
//!
//! Credentials are stored as an HMAC-SHA512 digest of the password under a
//! random 64-byte key generated per credential; the key is persisted as the
//! "salt". There is no iteration count or memory-hard work factor, which is a
//! known policy gap kept for compatibility with existing stored credentials.

use anyhow::{anyhow, Context, Result};
use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, RngCore};
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;

/// Key length for the per-credential HMAC key.
pub const SALT_LEN: usize = 64;

/// Hash a password under a fresh random key.
///
/// Returns `(digest, salt)`; both are always written to storage together.
///
/// # Errors
/// Returns an error for an empty password or if the OS RNG fails.
pub fn hash(password: &str) -> Result<(Vec<u8>, Vec<u8>)> {
    if password.is_empty() {
        return Err(anyhow!("password must not be empty"));
    }

    let mut salt = [0u8; SALT_LEN];
    OsRng
        .try_fill_bytes(&mut salt)
        .context("failed to generate password salt")?;

    let mut mac =
        HmacSha512::new_from_slice(&salt).context("failed to initialize password hasher")?;
    mac.update(password.as_bytes());
    let digest = mac.finalize().into_bytes().to_vec();

    Ok((digest, salt.to_vec()))
}

/// Recompute the keyed hash with the stored salt and compare.
///
/// The comparison is constant-time (`Mac::verify_slice`), so a stored digest
/// leaks nothing through timing.
#[must_use]
pub fn verify(password: &str, digest: &[u8], salt: &[u8]) -> bool {
    let Ok(mut mac) = HmacSha512::new_from_slice(salt) else {
        return false;
    };
    mac.update(password.as_bytes());
    mac.verify_slice(digest).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_verifies() {
        let (digest, salt) = hash("Secret1!").expect("hash");
        assert!(verify("Secret1!", &digest, &salt));
    }

    #[test]
    fn wrong_password_fails() {
        let (digest, salt) = hash("Secret1!").expect("hash");
        assert!(!verify("secret1!", &digest, &salt));
        assert!(!verify("Secret1", &digest, &salt));
        assert!(!verify("", &digest, &salt));
    }

    #[test]
    fn salt_differs_per_credential() {
        let (digest_a, salt_a) = hash("Secret1!").expect("hash");
        let (digest_b, salt_b) = hash("Secret1!").expect("hash");
        assert_ne!(salt_a, salt_b);
        assert_ne!(digest_a, digest_b);
        // Each digest still verifies against its own salt only.
        assert!(verify("Secret1!", &digest_a, &salt_a));
        assert!(!verify("Secret1!", &digest_a, &salt_b));
    }

    #[test]
    fn empty_password_rejected() {
        assert!(hash("").is_err());
    }

    #[test]
    fn digest_and_salt_lengths() {
        let (digest, salt) = hash("Secret1!").expect("hash");
        assert_eq!(digest.len(), 64);
        assert_eq!(salt.len(), SALT_LEN);
    }
}
