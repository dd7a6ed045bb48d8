//! SAML display models

use serde::Serialize;
use tabled::Tabled;

use super::common::{list_cell, opt_cell};
use crate::client::models::{GroupMappingInput, SamlProviderSummary};
use crate::sync::GroupSummary;

/// Identity provider listing
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct ProviderDisplay {
    #[tabled(rename = "PROVIDER ID")]
    pub id: String,

    #[tabled(rename = "NAME")]
    pub name: String,

    #[tabled(rename = "LOGIN URL")]
    pub login_url: String,
}

impl From<&SamlProviderSummary> for ProviderDisplay {
    fn from(provider: &SamlProviderSummary) -> Self {
        Self {
            id: provider.id.clone(),
            name: provider.name.clone(),
            login_url: opt_cell(provider.login_url.as_deref()),
        }
    }
}

/// Group mapping as it will be sent to the provider
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct MappingDisplay {
    #[tabled(rename = "GROUP")]
    pub group: String,

    #[tabled(rename = "ROLE")]
    pub role: String,

    /// Project IDs
    #[tabled(rename = "PROJECTS")]
    pub projects: String,
}

impl From<&GroupMappingInput> for MappingDisplay {
    fn from(mapping: &GroupMappingInput) -> Self {
        Self {
            group: mapping.provider_group_id.clone(),
            role: mapping.role.clone(),
            projects: list_cell(mapping.projects.as_deref().unwrap_or_default()),
        }
    }
}

/// AD group aggregated for the SAML mappings file
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct GroupDisplay {
    #[tabled(rename = "GROUP")]
    pub group: String,

    #[tabled(rename = "CLOUD")]
    pub cloud: String,

    #[tabled(rename = "PROJECTS")]
    pub projects: String,

    #[tabled(rename = "MEMBERS")]
    pub members: usize,
}

impl From<&GroupSummary> for GroupDisplay {
    fn from(group: &GroupSummary) -> Self {
        Self {
            group: group.group.clone(),
            cloud: group.cloud.clone(),
            projects: list_cell(&group.projects),
            members: group.members.len(),
        }
    }
}
