//! Connected cloud account and organization models

use serde::{Deserialize, Serialize};

/// Cloud account (subscription, AWS account, GCP project) known to Wiz
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudAccount {
    /// Wiz ID
    pub id: String,

    pub name: String,

    /// Provider-side ID
    #[serde(default)]
    pub external_id: Option<String>,

    #[serde(default)]
    pub cloud_provider: Option<String>,
}

/// Cloud organization (management group, GCP folder, AWS OU) known to Wiz
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudOrganization {
    /// Wiz ID
    pub id: String,

    pub name: String,

    /// Provider-side ID
    #[serde(default)]
    pub external_id: Option<String>,

    #[serde(default)]
    pub cloud_provider: Option<String>,
}
