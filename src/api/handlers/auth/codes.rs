//! One-time verification codes.
//!
//! Codes are short decimal strings drawn from the OS CSPRNG and tagged with
//! the flow that issued them, so a code minted for one purpose cannot be
//! replayed in another. The step-up (link verification) flow uses 4 digits
//! and 15 minutes; the password-reset flow uses 6 digits and a full hour.

use rand::{rngs::OsRng, Rng};
use std::ops::RangeInclusive;

/// The flow a verification code was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodePurpose {
    Signup,
    StepUp,
    PasswordReset,
}

impl CodePurpose {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Signup => "signup",
            Self::StepUp => "step_up",
            Self::PasswordReset => "password_reset",
        }
    }

    /// Seconds a code stays valid after issuance.
    #[must_use]
    pub const fn ttl_seconds(self) -> i64 {
        match self {
            Self::Signup | Self::StepUp => 15 * 60,
            Self::PasswordReset => 60 * 60,
        }
    }

    const fn code_range(self) -> RangeInclusive<u32> {
        match self {
            Self::StepUp => 1000..=9999,
            Self::Signup | Self::PasswordReset => 100_000..=999_999,
        }
    }
}

/// Outcome of checking a submitted code.
///
/// `Expired` and `NotFound` are distinguished for logging only; callers
/// present them uniformly to avoid leaking code state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeCheck {
    Valid,
    Expired,
    NotFound,
}

/// Draw a fresh code for the given purpose from the OS CSPRNG.
#[must_use]
pub fn generate(purpose: CodePurpose) -> String {
    OsRng.gen_range(purpose.code_range()).to_string()
}
