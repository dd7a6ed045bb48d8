//! Command execution context
//!
//! Loads configuration, applies global overrides, and hands commands an
//! authenticated client.

use std::sync::Arc;

use colored::Colorize;
use dialoguer::Confirm;
use log::debug;

use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::client::models::AccessToken;
use crate::client::{AuthApi, Credentials, WizApi, WizClient};
use crate::config::{CachedToken, Config};
use crate::error::{ConfigError, Error, Result};

/// Context for command execution containing the client and runtime options.
pub struct CommandContext {
    /// Authenticated API client
    pub client: Arc<dyn WizApi>,
    /// Output format preference
    pub format: OutputFormat,
}

impl CommandContext {
    /// Create a new command context with full initialization.
    ///
    /// A missing config file is fine when credentials come from flags or the
    /// environment. The token is only cached back to disk when the config file
    /// already exists.
    pub async fn new(opts: &GlobalOptions) -> Result<Self> {
        let stored = match Config::load_at(opts.config_ref()) {
            Ok(config) => Some(config),
            Err(Error::Config(ConfigError::NotFound)) if opts.has_credentials() => {
                debug!("No config file; using credentials from flags/environment");
                None
            }
            Err(e) => return Err(e),
        };
        let mut config = stored.clone().unwrap_or_default();
        opts.apply_to(&mut config);
        config.validate_auth()?;

        let credentials = match (&config.client_id, &config.client_secret) {
            (Some(id), Some(secret)) => Credentials {
                client_id: id.clone(),
                client_secret: secret.clone(),
            },
            _ => return Err(ConfigError::MissingCredentials.into()),
        };

        debug!("Using API endpoint {}", config.api_url());
        let client = WizClient::new(config.api_url(), config.auth_url(), Some(credentials.clone()))?;

        match (&config.token, config.is_token_expired()) {
            (Some(cached), false) => {
                debug!("Using cached access token");
                client.set_token(AccessToken::from(cached)).await;
            }
            _ => {
                debug!("Requesting access token");
                let token = client
                    .authenticate(&credentials.client_id, &credentials.client_secret)
                    .await?;
                if let Some(stored) = stored {
                    cache_token(stored, &credentials.client_id, &token, opts.config_ref())?;
                }
                client.set_token(token).await;
            }
        }

        Ok(Self {
            client: Arc::new(client),
            format: opts.format,
        })
    }
}

/// Save a fresh token into the config file as it was loaded.
///
/// Flag and environment overrides never reach the file. A token issued for
/// some other client id is not cached.
fn cache_token(
    mut stored: Config,
    client_id: &str,
    token: &AccessToken,
    path: Option<&str>,
) -> Result<()> {
    if stored.client_id.as_deref() != Some(client_id) {
        debug!("Credentials differ from the config file; token not cached");
        return Ok(());
    }
    stored.token = Some(CachedToken::from(token.clone()));
    stored.save_at(path)
}

/// Yellow banner shown before a run that only plans changes.
pub fn dry_run_banner() {
    eprintln!("{}", "DRY RUN - no changes will be made".yellow());
    eprintln!("{}", "Re-run with --write to apply.".dimmed());
    eprintln!();
}

/// Ask before writing unless `--yes` was given.
pub fn confirm_write(prompt: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    let confirmed = Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?;
    if !confirmed {
        eprintln!("Cancelled.");
    }
    Ok(confirmed)
}

/// Resolve an optional yes/no flag, prompting when it was not given.
pub fn resolve_flag(value: Option<bool>, prompt: &str) -> Result<bool> {
    match value {
        Some(value) => Ok(value),
        None => Ok(Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()?),
    }
}
