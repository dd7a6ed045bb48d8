//! Configuration management for wizsync

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::client::models::{AccessToken, needs_refresh};
use crate::error::{ConfigError, Result};

/// Data center used when neither the CLI nor the config file names one
pub const DEFAULT_DATACENTER: &str = "us20";

/// OAuth token endpoint shared by every data center
pub const DEFAULT_AUTH_URL: &str = "https://auth.app.wiz.io/oauth/token";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Service account client ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// Service account client secret
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,

    /// Tenant data center (e.g. `us20`, `eu1`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datacenter: Option<String>,

    /// Full GraphQL endpoint, overriding the data center URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Token endpoint override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_url: Option<String>,

    /// Cached access token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<CachedToken>,
}

/// Access token with expiry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedToken {
    /// The bearer token string
    pub token: String,

    /// Token expiration time
    pub expires_at: DateTime<Utc>,

    /// When the token was obtained; absent in files written by older versions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<DateTime<Utc>>,
}

impl From<AccessToken> for CachedToken {
    fn from(token: AccessToken) -> Self {
        Self {
            token: token.token,
            expires_at: token.expires_at,
            issued_at: token.issued_at,
        }
    }
}

impl From<&CachedToken> for AccessToken {
    fn from(cached: &CachedToken) -> Self {
        Self {
            token: cached.token.clone(),
            expires_at: cached.expires_at,
            issued_at: cached.issued_at,
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".wizsync").join("config.yaml"))
    }

    /// Resolve an optional override into a concrete config path
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Load configuration from an optional path override
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        Self::load_from(Self::resolve_path(path)?)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound.into());
        }

        let contents = std::fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;

        Ok(config)
    }

    /// Save configuration to an optional path override
    pub fn save_at(&self, path: Option<&str>) -> Result<()> {
        self.save_to(Self::resolve_path(path)?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(&path, contents)?;

        // Credentials live in this file
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&path, perms)?;
        }

        Ok(())
    }

    /// Check if the cached token is expired or inside its refresh margin
    pub fn is_token_expired(&self) -> bool {
        match &self.token {
            None => true,
            Some(token) => needs_refresh(token.expires_at, token.issued_at, Utc::now()),
        }
    }

    /// Data center, falling back to the default
    pub fn datacenter(&self) -> &str {
        self.datacenter.as_deref().unwrap_or(DEFAULT_DATACENTER)
    }

    /// GraphQL endpoint for the configured data center
    pub fn api_url(&self) -> String {
        match &self.api_url {
            Some(url) => url.clone(),
            None => format!("https://api.{}.app.wiz.io/graphql", self.datacenter()),
        }
    }

    /// OAuth token endpoint
    pub fn auth_url(&self) -> String {
        self.auth_url
            .clone()
            .unwrap_or_else(|| DEFAULT_AUTH_URL.to_string())
    }

    /// Validate that client credentials are present
    pub fn validate_auth(&self) -> Result<()> {
        if self.client_id.is_none() || self.client_secret.is_none() {
            return Err(ConfigError::MissingCredentials.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.client_id.is_none());
        assert!(config.token.is_none());
        assert_eq!(config.datacenter(), "us20");
    }

    #[test]
    fn test_endpoints_follow_datacenter() {
        let config = Config {
            datacenter: Some("eu7".to_string()),
            ..Default::default()
        };
        assert_eq!(config.api_url(), "https://api.eu7.app.wiz.io/graphql");
        assert_eq!(config.auth_url(), DEFAULT_AUTH_URL);
    }

    #[test]
    fn test_endpoint_overrides() {
        let config = Config {
            datacenter: Some("eu7".to_string()),
            api_url: Some("http://127.0.0.1:9000/graphql".to_string()),
            auth_url: Some("http://127.0.0.1:9000/oauth/token".to_string()),
            ..Default::default()
        };
        assert_eq!(config.api_url(), "http://127.0.0.1:9000/graphql");
        assert_eq!(config.auth_url(), "http://127.0.0.1:9000/oauth/token");
    }

    #[test]
    fn test_validate_auth_requires_both_credentials() {
        let mut config = Config {
            client_id: Some("id".to_string()),
            ..Default::default()
        };
        assert!(config.validate_auth().is_err());

        config.client_secret = Some("secret".to_string());
        assert!(config.validate_auth().is_ok());
    }

    #[test]
    fn test_token_expiry() {
        let mut config = Config::default();

        assert!(config.is_token_expired());

        config.token = Some(CachedToken {
            token: "test".to_string(),
            expires_at: Utc::now() - chrono::Duration::hours(1),
            issued_at: None,
        });
        assert!(config.is_token_expired());

        config.token = Some(CachedToken {
            token: "test".to_string(),
            expires_at: Utc::now() + chrono::Duration::hours(1),
            issued_at: None,
        });
        assert!(!config.is_token_expired());

        config.token = Some(CachedToken {
            token: "test".to_string(),
            expires_at: Utc::now() + chrono::Duration::minutes(2),
            issued_at: None,
        });
        assert!(config.is_token_expired());

        // A two-minute token is still fresh right after it was issued
        config.token = Some(CachedToken {
            token: "test".to_string(),
            expires_at: Utc::now() + chrono::Duration::minutes(2),
            issued_at: Some(Utc::now()),
        });
        assert!(!config.is_token_expired());
    }

    #[test]
    fn test_cached_token_without_issue_time_loads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "client_id: id\ntoken:\n  token: abc\n  expires_at: 2030-01-01T00:00:00Z\n",
        )
        .unwrap();

        let loaded = Config::load_from(path).unwrap();
        let token = loaded.token.unwrap();
        assert_eq!(token.token, "abc");
        assert!(token.issued_at.is_none());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let config = Config {
            client_id: Some("client".to_string()),
            client_secret: Some("secret".to_string()),
            datacenter: Some("us17".to_string()),
            ..Default::default()
        };
        config.save_to(path.clone()).unwrap();

        let loaded = Config::load_from(path).unwrap();
        assert_eq!(loaded.client_id.as_deref(), Some("client"));
        assert_eq!(loaded.datacenter(), "us17");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = Config::load_from(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Config(ConfigError::NotFound)
        ));
    }
}
