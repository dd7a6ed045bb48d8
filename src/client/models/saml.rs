//! SAML identity provider models

use serde::{Deserialize, Serialize};

/// Identity provider as listed in the SSO settings table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamlProviderSummary {
    pub id: String,

    pub name: String,

    #[serde(default, rename = "loginURL")]
    pub login_url: Option<String>,
}

/// Full identity provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamlProvider {
    pub id: String,

    pub name: String,

    #[serde(default, rename = "loginURL")]
    pub login_url: Option<String>,

    #[serde(default, rename = "logoutURL")]
    pub logout_url: Option<String>,

    #[serde(default)]
    pub use_provider_managed_roles: bool,

    #[serde(default)]
    pub certificate: Option<String>,

    #[serde(default)]
    pub domains: Option<Vec<String>>,

    #[serde(default, rename = "issuerURL")]
    pub issuer_url: Option<String>,

    #[serde(default)]
    pub merge_groups_mapping_by_role: bool,

    #[serde(default)]
    pub allow_manual_role_override: bool,

    #[serde(default)]
    pub group_mapping: Vec<GroupMapping>,
}

/// Existing group mapping as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMapping {
    pub provider_group_id: String,

    pub role: GroupMappingRole,

    #[serde(default)]
    pub projects: Option<Vec<GroupMappingProject>>,
}

/// Role reference inside a group mapping
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMappingRole {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub is_project_scoped: bool,
}

/// Project reference inside a group mapping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMappingProject {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,
}

/// Group mapping in mutation input form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMappingInput {
    pub provider_group_id: String,

    /// Role ID (e.g. `PROJECT_READER`)
    pub role: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<String>>,
}

impl From<&GroupMapping> for GroupMappingInput {
    fn from(mapping: &GroupMapping) -> Self {
        Self {
            provider_group_id: mapping.provider_group_id.clone(),
            role: mapping.role.id.clone(),
            projects: mapping
                .projects
                .as_ref()
                .map(|projects| projects.iter().map(|p| p.id.clone()).collect()),
        }
    }
}

/// Input for the `updateSAMLIdentityProvider` mutation
#[derive(Debug, Clone, Serialize)]
pub struct UpdateSamlProviderInput {
    pub id: String,
    pub patch: SamlProviderPatch,
}

/// Provider settings; every field is resent so the patch never clears settings
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SamlProviderPatch {
    #[serde(rename = "loginURL")]
    pub login_url: Option<String>,

    #[serde(rename = "logoutURL")]
    pub logout_url: Option<String>,

    pub certificate: Option<String>,

    #[serde(rename = "issuerURL")]
    pub issuer_url: Option<String>,

    pub use_provider_managed_roles: bool,

    pub merge_groups_mapping_by_role: bool,

    pub allow_manual_role_override: bool,

    pub group_mapping: Vec<GroupMappingInput>,
}

impl SamlProviderPatch {
    /// Carry over the provider's settings with a new group mapping.
    pub fn preserving(provider: &SamlProvider, group_mapping: Vec<GroupMappingInput>) -> Self {
        Self {
            login_url: provider.login_url.clone(),
            logout_url: provider.logout_url.clone(),
            certificate: provider.certificate.clone(),
            issuer_url: provider.issuer_url.clone(),
            use_provider_managed_roles: provider.use_provider_managed_roles,
            merge_groups_mapping_by_role: provider.merge_groups_mapping_by_role,
            allow_manual_role_override: provider.allow_manual_role_override,
            group_mapping,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> SamlProvider {
        serde_json::from_str(
            r#"{
                "id": "idp-1",
                "name": "Entra ID",
                "loginURL": "https://login.example/saml",
                "logoutURL": null,
                "useProviderManagedRoles": false,
                "certificate": "MIIC...",
                "domains": ["example.com"],
                "issuerURL": "https://sts.example/",
                "mergeGroupsMappingByRole": true,
                "allowManualRoleOverride": false,
                "groupMapping": [
                    {
                        "providerGroupId": "wiz-admins",
                        "role": {"id": "GLOBAL_ADMIN", "name": "GlobalAdmin", "isProjectScoped": false},
                        "projects": null
                    },
                    {
                        "providerGroupId": "Wiz_Payments_PROJECT_READER",
                        "role": {"id": "PROJECT_READER", "name": "ProjectReader", "isProjectScoped": true},
                        "projects": [{"id": "p-1", "name": "Payments"}]
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_group_mapping_converts_to_input_form() {
        let provider = provider();
        let inputs: Vec<GroupMappingInput> =
            provider.group_mapping.iter().map(GroupMappingInput::from).collect();

        assert_eq!(inputs[0].role, "GLOBAL_ADMIN");
        assert_eq!(inputs[0].projects, None);
        assert_eq!(inputs[1].role, "PROJECT_READER");
        assert_eq!(inputs[1].projects, Some(vec!["p-1".to_string()]));
    }

    #[test]
    fn test_patch_preserves_provider_settings() {
        let provider = provider();
        let patch = SamlProviderPatch::preserving(&provider, vec![]);
        let json = serde_json::to_value(&patch).unwrap();

        assert_eq!(json["loginURL"], "https://login.example/saml");
        assert!(json["logoutURL"].is_null());
        assert_eq!(json["issuerURL"], "https://sts.example/");
        assert_eq!(json["mergeGroupsMappingByRole"], true);
        assert_eq!(json["groupMapping"].as_array().unwrap().len(), 0);
    }
}
