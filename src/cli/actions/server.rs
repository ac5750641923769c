use crate::{
    api,
    api::{
        email::{EmailSender, LogEmailSender, MailgunSender},
        handlers::auth::AuthConfig,
    },
    cli::actions::Action,
};
use anyhow::Result;
use secrecy::SecretString;
use std::sync::Arc;
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub jwt_key: SecretString,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub mailgun_api_key: Option<SecretString>,
    pub mailgun_domain: Option<String>,
}

/// Handle the server action
/// # Errors
/// Returns an error if the signing key is unusable or the server fails to start.
pub async fn handle(action: Action) -> Result<()> {
    let Action::Server(args) = action;

    let config = AuthConfig::new(args.jwt_key, args.jwt_issuer, args.jwt_audience);

    // Mailgun when credentials are present, otherwise log-only delivery.
    let sender: Arc<dyn EmailSender> = match (args.mailgun_api_key, args.mailgun_domain) {
        (Some(api_key), Some(domain)) => Arc::new(MailgunSender::new(api_key, domain)?),
        _ => {
            info!("Mailgun not configured, emails will be logged");
            Arc::new(LogEmailSender)
        }
    };

    api::serve(args.port, args.dsn, config, sender).await?;

    Ok(())
}
