//! Database helpers for the credential lifecycle.
//!
//! All exclusion is pushed to Postgres: the unique index on `users.email`
//! decides signup races, and single-use artifacts (codes, reset tokens) are
//! consumed with conditional `DELETE .. RETURNING`, so a check and its
//! consumption are one atomic step rather than a read-then-write pair.

use anyhow::{Context, Result};
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::Instrument;
use uuid::Uuid;

use super::codes::{CodeCheck, CodePurpose};
use super::state::RESET_TOKEN_TTL_SECONDS;
use super::utils::is_unique_violation;

/// Outcome when attempting to create a new credential row.
#[derive(Debug)]
pub(super) enum SignupOutcome {
    Created { user_id: Uuid },
    Conflict,
}

/// Outcome of redeeming a reset token together with the credential re-hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum RedeemOutcome {
    PasswordChanged,
    /// No matching token row existed (never issued, or already consumed).
    TokenInvalid,
    /// A matching row existed but its expiry had passed.
    TokenExpired,
    UnknownUser,
}

/// Fields needed to verify a login attempt.
pub(super) struct UserAuthRecord {
    pub(super) user_id: Uuid,
    pub(super) email: String,
    pub(super) password_hash: Vec<u8>,
    pub(super) password_salt: Vec<u8>,
}

/// Look up a credential by normalized email or exact phone number.
pub(super) async fn lookup_user_for_login(
    pool: &PgPool,
    email: &str,
    phone_number: &str,
) -> Result<Option<UserAuthRecord>> {
    let query = r"
        SELECT id, email, password_hash, password_salt
        FROM users
        WHERE email = $1 OR phone_number = $2
        LIMIT 1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .bind(phone_number)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup user for login")?;

    Ok(row.map(|row| UserAuthRecord {
        user_id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        password_salt: row.get("password_salt"),
    }))
}

pub(super) async fn user_exists(pool: &PgPool, email: &str) -> Result<bool> {
    let query = "SELECT EXISTS (SELECT 1 FROM users WHERE email = $1) AS present";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .fetch_one(pool)
        .instrument(span)
        .await
        .context("failed to check user existence")?;
    Ok(row.get("present"))
}

/// Insert a new credential row; hash and salt are always written together.
///
/// A concurrent signup losing the race surfaces as the unique violation and
/// maps to `Conflict`, same as the pre-checked duplicate.
pub(super) async fn insert_user(
    pool: &PgPool,
    email: &str,
    phone_number: &str,
    full_name: Option<&str>,
    password_hash: &[u8],
    password_salt: &[u8],
) -> Result<SignupOutcome> {
    let query = r"
        INSERT INTO users
            (email, phone_number, full_name, password_hash, password_salt)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .bind(phone_number)
        .bind(full_name)
        .bind(password_hash)
        .bind(password_salt)
        .fetch_one(pool)
        .instrument(span)
        .await;

    match row {
        Ok(row) => Ok(SignupOutcome::Created {
            user_id: row.get("id"),
        }),
        Err(err) if is_unique_violation(&err) => Ok(SignupOutcome::Conflict),
        Err(err) => Err(err).context("failed to insert user"),
    }
}

pub(super) async fn insert_verification_code(
    pool: &PgPool,
    email: &str,
    code: &str,
    purpose: CodePurpose,
) -> Result<()> {
    let query = r"
        INSERT INTO verification_codes (email, code, purpose, expires_at)
        VALUES ($1, $2, $3, NOW() + ($4 * INTERVAL '1 second'))
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    sqlx::query(query)
        .bind(email)
        .bind(code)
        .bind(purpose.as_str())
        .bind(purpose.ttl_seconds())
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to insert verification code")?;
    Ok(())
}

/// Check and consume a code in one conditional delete.
///
/// A code that validates successfully is gone afterwards; re-submitting it
/// yields `NotFound`. The uniform consume-on-success invariant holds for
/// every purpose.
pub(super) async fn consume_verification_code(
    tx: &mut Transaction<'_, Postgres>,
    email: &str,
    code: &str,
    purpose: CodePurpose,
) -> Result<CodeCheck> {
    let query = r"
        DELETE FROM verification_codes
        WHERE email = $1
          AND code = $2
          AND purpose = $3
          AND expires_at > NOW()
        RETURNING id
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "DELETE",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .bind(code)
        .bind(purpose.as_str())
        .fetch_optional(&mut **tx)
        .instrument(span)
        .await
        .context("failed to consume verification code")?;

    if row.is_some() {
        return Ok(CodeCheck::Valid);
    }

    // Distinguish a stale code from a wrong one, for logs only.
    let query = r"
        SELECT EXISTS (
            SELECT 1 FROM verification_codes
            WHERE email = $1 AND code = $2 AND purpose = $3
        ) AS present
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .bind(code)
        .bind(purpose.as_str())
        .fetch_one(&mut **tx)
        .instrument(span)
        .await
        .context("failed to probe verification code")?;

    if row.get::<bool, _>("present") {
        Ok(CodeCheck::Expired)
    } else {
        Ok(CodeCheck::NotFound)
    }
}

/// Pool-level wrapper for flows that consume a code without further writes.
pub(super) async fn consume_code(
    pool: &PgPool,
    email: &str,
    code: &str,
    purpose: CodePurpose,
) -> Result<CodeCheck> {
    let mut tx = pool.begin().await.context("begin code consume")?;
    let check = consume_verification_code(&mut tx, email, code, purpose).await?;
    tx.commit().await.context("commit code consume")?;
    Ok(check)
}

pub(super) async fn insert_reset_token(
    tx: &mut Transaction<'_, Postgres>,
    email: &str,
    token: &str,
) -> Result<()> {
    let query = r"
        INSERT INTO reset_tokens (email, token, expires_at)
        VALUES ($1, $2, NOW() + ($3 * INTERVAL '1 second'))
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    sqlx::query(query)
        .bind(email)
        .bind(token)
        .bind(RESET_TOKEN_TTL_SECONDS)
        .execute(&mut **tx)
        .instrument(span)
        .await
        .context("failed to insert reset token")?;
    Ok(())
}

/// Redeem a reset token and re-hash the credential in one transaction.
///
/// The conditional delete and the `UPDATE users` commit together or not at
/// all. Under concurrent redemption the row lock on the token serializes the
/// deletes: exactly one transaction removes the row and changes the
/// password; the other deletes zero rows and reports `TokenInvalid`.
pub(super) async fn redeem_reset_token_and_rehash(
    pool: &PgPool,
    email: &str,
    token: &str,
    password_hash: &[u8],
    password_salt: &[u8],
) -> Result<RedeemOutcome> {
    let mut tx = pool.begin().await.context("begin reset transaction")?;

    let query = r"
        DELETE FROM reset_tokens
        WHERE email = $1
          AND token = $2
          AND expires_at > NOW()
        RETURNING id
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "DELETE",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .bind(token)
        .fetch_optional(&mut *tx)
        .instrument(span)
        .await
        .context("failed to redeem reset token")?;

    if row.is_none() {
        // Expired-vs-consumed matters for logs; the caller presents both as
        // the same client error.
        let query = r"
            SELECT EXISTS (
                SELECT 1 FROM reset_tokens WHERE email = $1 AND token = $2
            ) AS present
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let probe = sqlx::query(query)
            .bind(email)
            .bind(token)
            .fetch_one(&mut *tx)
            .instrument(span)
            .await
            .context("failed to probe reset token")?;

        let _ = tx.rollback().await;
        return if probe.get::<bool, _>("present") {
            Ok(RedeemOutcome::TokenExpired)
        } else {
            Ok(RedeemOutcome::TokenInvalid)
        };
    }

    let query = r"
        UPDATE users
        SET password_hash = $2,
            password_salt = $3,
            updated_at = NOW()
        WHERE email = $1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    let result = sqlx::query(query)
        .bind(email)
        .bind(password_hash)
        .bind(password_salt)
        .execute(&mut *tx)
        .instrument(span)
        .await
        .context("failed to update credential")?;

    if result.rows_affected() == 0 {
        let _ = tx.rollback().await;
        return Ok(RedeemOutcome::UnknownUser);
    }

    tx.commit().await.context("commit reset transaction")?;
    Ok(RedeemOutcome::PasswordChanged)
}

/// Remove a credential row; returns whether anything was deleted.
///
/// Outstanding codes and reset tokens for the address are left to expire on
/// their own; there is no cascading cleanup.
pub(super) async fn delete_user(pool: &PgPool, email: &str) -> Result<bool> {
    let query = "DELETE FROM users WHERE email = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "DELETE",
        db.statement = query
    );
    let result = sqlx::query(query)
        .bind(email)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to delete user")?;
    Ok(result.rows_affected() > 0)
}
