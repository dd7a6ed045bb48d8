//! Global CLI options shared across all commands
//!
//! Collects the global flags once after parsing so handlers take a single
//! `&GlobalOptions` instead of a long parameter list.

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;

/// Global CLI options passed to all command handlers.
///
/// # Precedence
///
/// CLI flag > environment variable > config file > default. Clap resolves
/// the first two; [`apply_to`](Self::apply_to) layers the result over the
/// loaded config file.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Output format (pretty, table, json)
    pub format: OutputFormat,

    /// Service account client ID override
    pub client_id: Option<String>,

    /// Service account client secret override
    pub client_secret: Option<String>,

    /// Data center override (e.g. `us20`)
    pub datacenter: Option<String>,

    /// GraphQL endpoint override
    pub api_url: Option<String>,

    /// Token endpoint override
    pub auth_url: Option<String>,

    /// Custom config file path (defaults to ~/.wizsync/config.yaml)
    pub config: Option<String>,
}

impl GlobalOptions {
    /// Create GlobalOptions from a parsed CLI struct.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            client_id: cli.client_id.clone(),
            client_secret: cli.client_secret.clone(),
            datacenter: cli.datacenter.clone(),
            api_url: cli.api_url.clone(),
            auth_url: cli.auth_url.clone(),
            config: cli.config.clone(),
        }
    }

    /// Get config path as `Option<&str>`.
    pub fn config_ref(&self) -> Option<&str> {
        self.config.as_deref()
    }

    /// Whether both credentials were given on the command line or environment.
    pub fn has_credentials(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some()
    }

    /// Overlay CLI/env values on a loaded config.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(id) = &self.client_id {
            if config.client_id.as_ref() != Some(id) {
                // A cached token belongs to the credentials that obtained it
                config.token = None;
            }
            config.client_id = Some(id.clone());
        }
        if let Some(secret) = &self.client_secret {
            config.client_secret = Some(secret.clone());
        }
        if let Some(dc) = &self.datacenter {
            config.datacenter = Some(dc.clone());
        }
        if let Some(url) = &self.api_url {
            config.api_url = Some(url.clone());
        }
        if let Some(url) = &self.auth_url {
            config.auth_url = Some(url.clone());
        }
    }
}
