//! SAML identity provider API trait

use async_trait::async_trait;

use crate::client::models::{SamlProvider, SamlProviderSummary, UpdateSamlProviderInput};
use crate::error::Result;

/// Identity provider operations for the Wiz API
#[async_trait]
pub trait SamlApi: Send + Sync {
    /// List providers configured through the modern SSO settings.
    async fn list_saml_providers(&self) -> Result<Vec<SamlProviderSummary>>;

    /// Load full provider settings, including group mappings.
    async fn get_saml_provider(&self, id: &str) -> Result<SamlProvider>;

    /// Replace provider settings and group mappings.
    async fn update_saml_provider(&self, input: &UpdateSamlProviderInput) -> Result<()>;
}
