//! Outbound notification sink.
//!
//! Verification flows hand a subject and body to an [`EmailSender`] and treat
//! delivery as opaque: the default local-dev sender logs the message, while
//! [`MailgunSender`] posts it to the Mailgun messages API. Delivery failures
//! surface to the caller as internal errors; the core never retries.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use crate::APP_USER_AGENT;

const MAILGUN_API_BASE: &str = "https://api.mailgun.net/v3";

/// Email delivery abstraction used by the verification flows.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Deliver a message or return an error for the caller to surface.
    async fn send(&self, to_email: &str, subject: &str, body: &str) -> Result<()>;
}

/// Local dev sender that logs the payload instead of sending real email.
#[derive(Clone, Debug)]
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, to_email: &str, subject: &str, body: &str) -> Result<()> {
        info!(to_email, subject, body, "email send stub");
        Ok(())
    }
}

/// Mailgun-backed sender; posts to `/{domain}/messages` with basic auth.
pub struct MailgunSender {
    client: Client,
    api_key: SecretString,
    domain: String,
}

impl MailgunSender {
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(api_key: SecretString, domain: String) -> Result<Self> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .build()
            .context("Failed to build Mailgun HTTP client")?;
        Ok(Self {
            client,
            api_key,
            domain,
        })
    }
}

#[async_trait]
impl EmailSender for MailgunSender {
    async fn send(&self, to_email: &str, subject: &str, body: &str) -> Result<()> {
        let url = format!("{MAILGUN_API_BASE}/{}/messages", self.domain);
        let from = format!("{} <no-reply@{}>", env!("CARGO_PKG_NAME"), self.domain);

        let params = [
            ("from", from.as_str()),
            ("to", to_email),
            ("subject", subject),
            ("text", body),
        ];

        let response = self
            .client
            .post(&url)
            .basic_auth("api", Some(self.api_key.expose_secret()))
            .form(&params)
            .send()
            .await
            .context("Failed to reach Mailgun")?;

        response
            .error_for_status()
            .context("Mailgun rejected the message")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn log_sender_always_succeeds() {
        let sender = LogEmailSender;
        let result = sender
            .send("alice@example.com", "Verification code", "1234")
            .await;
        assert!(result.is_ok());
    }

    #[test]
    fn mailgun_sender_builds() {
        let sender = MailgunSender::new(SecretString::from("key"), "mg.vouch.dev".to_string());
        assert!(sender.is_ok());
    }
}
