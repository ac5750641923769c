//! Command-line argument dispatch and server initialization.

use crate::cli::actions::{server::Args, Action};
use anyhow::{Context, Result};
use secrecy::SecretString;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;

    let jwt_key = matches
        .get_one::<String>("jwt-key")
        .cloned()
        .map(SecretString::from)
        .context("missing required argument: --jwt-key")?;
    let jwt_issuer = matches
        .get_one::<String>("jwt-issuer")
        .cloned()
        .context("missing required argument: --jwt-issuer")?;
    let jwt_audience = matches
        .get_one::<String>("jwt-audience")
        .cloned()
        .context("missing required argument: --jwt-audience")?;

    let mailgun_api_key = matches
        .get_one::<String>("mailgun-api-key")
        .cloned()
        .map(SecretString::from);
    let mailgun_domain = matches.get_one::<String>("mailgun-domain").cloned();

    Ok(Action::Server(Args {
        port,
        dsn,
        jwt_key,
        jwt_issuer,
        jwt_audience,
        mailgun_api_key,
        mailgun_domain,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{actions::Action, commands};

    #[test]
    fn builds_server_action_from_matches() {
        temp_env::with_vars(
            [
                ("VOUCH_DSN", Some("postgres://user@localhost:5432/vouch")),
                ("VOUCH_JWT_KEY", Some("signing-key")),
                ("VOUCH_JWT_ISSUER", Some("vouch.dev")),
                ("VOUCH_JWT_AUDIENCE", Some("vouch-clients")),
            ],
            || {
                let matches = commands::new().get_matches_from(vec!["vouch"]);
                let action = handler(&matches).expect("handler should succeed");
                let Action::Server(args) = action;
                assert_eq!(args.port, 8080);
                assert_eq!(args.dsn, "postgres://user@localhost:5432/vouch");
                assert_eq!(args.jwt_issuer, "vouch.dev");
                assert_eq!(args.jwt_audience, "vouch-clients");
                assert!(args.mailgun_api_key.is_none());
                assert!(args.mailgun_domain.is_none());
            },
        );
    }
}
