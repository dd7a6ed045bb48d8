//! Project models
//!
//! Query results and mutation inputs use different shapes for cloud links: the
//! API returns nested objects (`cloudAccount { id externalId }`) but expects
//! plain IDs on input. The `From` impls convert between the two.

use serde::{Deserialize, Serialize};

/// Environment assigned to new cloud links
pub const DEFAULT_LINK_ENVIRONMENT: &str = "PRODUCTION";

/// Project or folder project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub slug: Option<String>,

    #[serde(default)]
    pub is_folder: bool,

    #[serde(default)]
    pub archived: bool,

    #[serde(default)]
    pub child_project_count: usize,

    #[serde(default)]
    pub cloud_account_links: Vec<CloudAccountLink>,

    #[serde(default)]
    pub cloud_organization_links: Vec<CloudOrganizationLink>,

    /// Ancestors, nearest first
    #[serde(default)]
    pub ancestor_projects: Vec<ProjectRef>,
}

/// Reference to another project by ID
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub id: String,
}

/// Linked object reference in query output
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedObject {
    pub id: String,

    #[serde(default)]
    pub external_id: Option<String>,
}

/// Resource tag selector on a link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTag {
    pub key: String,
    pub value: String,
}

/// Cloud account link as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudAccountLink {
    pub cloud_account: LinkedObject,

    #[serde(default)]
    pub shared: bool,

    #[serde(default)]
    pub environment: Option<String>,

    #[serde(default)]
    pub resource_groups: Option<Vec<String>>,

    #[serde(default)]
    pub resource_tags: Option<Vec<ResourceTag>>,
}

/// Cloud organization link as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudOrganizationLink {
    pub cloud_organization: LinkedObject,

    #[serde(default)]
    pub shared: bool,

    #[serde(default)]
    pub environment: Option<String>,

    #[serde(default)]
    pub resource_groups: Option<Vec<String>>,

    #[serde(default)]
    pub resource_tags: Option<Vec<ResourceTag>>,
}

/// Cloud account link in mutation input form
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudAccountLinkInput {
    pub cloud_account: String,

    pub environment: String,

    pub shared: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_groups: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_tags: Option<Vec<ResourceTag>>,
}

impl CloudAccountLinkInput {
    /// Unshared production link to an account.
    pub fn new(cloud_account_id: impl Into<String>) -> Self {
        Self {
            cloud_account: cloud_account_id.into(),
            environment: DEFAULT_LINK_ENVIRONMENT.to_string(),
            shared: false,
            resource_groups: None,
            resource_tags: None,
        }
    }
}

impl From<&CloudAccountLink> for CloudAccountLinkInput {
    fn from(link: &CloudAccountLink) -> Self {
        Self {
            cloud_account: link.cloud_account.id.clone(),
            environment: link
                .environment
                .clone()
                .unwrap_or_else(|| DEFAULT_LINK_ENVIRONMENT.to_string()),
            shared: link.shared,
            resource_groups: link.resource_groups.clone(),
            resource_tags: link.resource_tags.clone(),
        }
    }
}

/// Cloud organization link in mutation input form
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudOrganizationLinkInput {
    pub cloud_organization: String,

    pub environment: String,

    pub shared: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_groups: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_tags: Option<Vec<ResourceTag>>,
}

impl CloudOrganizationLinkInput {
    /// Unshared production link to an organization.
    pub fn new(cloud_organization_id: impl Into<String>) -> Self {
        Self {
            cloud_organization: cloud_organization_id.into(),
            environment: DEFAULT_LINK_ENVIRONMENT.to_string(),
            shared: false,
            resource_groups: None,
            resource_tags: None,
        }
    }
}

impl From<&CloudOrganizationLink> for CloudOrganizationLinkInput {
    fn from(link: &CloudOrganizationLink) -> Self {
        Self {
            cloud_organization: link.cloud_organization.id.clone(),
            environment: link
                .environment
                .clone()
                .unwrap_or_else(|| DEFAULT_LINK_ENVIRONMENT.to_string()),
            shared: link.shared,
            resource_groups: link.resource_groups.clone(),
            resource_tags: link.resource_tags.clone(),
        }
    }
}

/// Risk profile sent with every new project
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskProfile {
    pub business_impact: String,
    #[serde(rename = "hasExposedAPI")]
    pub has_exposed_api: String,
    pub has_authentication: String,
    pub is_customer_facing: String,
    pub is_internet_facing: String,
    pub is_regulated: String,
    pub sensitive_data_types: Vec<String>,
    pub stores_data: String,
    pub regulatory_standards: Vec<String>,
}

impl Default for RiskProfile {
    fn default() -> Self {
        let unknown = || "UNKNOWN".to_string();
        Self {
            business_impact: "MBI".to_string(),
            has_exposed_api: unknown(),
            has_authentication: unknown(),
            is_customer_facing: unknown(),
            is_internet_facing: unknown(),
            is_regulated: unknown(),
            sensitive_data_types: Vec::new(),
            stores_data: unknown(),
            regulatory_standards: Vec::new(),
        }
    }
}

/// `ProjectFilters` for the projects table query
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_folder: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_project_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_archived: Option<bool>,
}

impl ProjectFilter {
    /// Name search, optionally restricted to folders or leaves.
    pub fn by_name(name: &str, is_folder: Option<bool>) -> Self {
        Self {
            search: Some(name.to_string()),
            is_folder,
            ..Default::default()
        }
    }

    /// A single project by ID.
    pub fn by_id(id: &str, include_archived: bool) -> Self {
        Self {
            id: Some(id.to_string()),
            include_archived: Some(include_archived),
            ..Default::default()
        }
    }

    /// Direct children of a folder project.
    pub fn children_of(parent_id: &str, include_archived: bool) -> Self {
        Self {
            parent_project_id: Some(parent_id.to_string()),
            include_archived: Some(include_archived),
            ..Default::default()
        }
    }
}

/// Input for the `createProject` mutation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectInput {
    pub name: String,
    pub identifiers: Vec<String>,
    pub is_folder: bool,
    pub description: String,
    pub business_unit: String,
    pub risk_profile: RiskProfile,
    pub parent_project_id: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cloud_account_links: Vec<CloudAccountLinkInput>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cloud_organization_links: Vec<CloudOrganizationLinkInput>,
}

impl CreateProjectInput {
    /// Folder project without cloud links.
    pub fn folder(name: impl Into<String>, parent_project_id: Option<String>) -> Self {
        Self::new(name, true, parent_project_id)
    }

    /// Leaf project; attach links with [`with_links`](Self::with_links).
    pub fn project(name: impl Into<String>, parent_project_id: Option<String>) -> Self {
        Self::new(name, false, parent_project_id)
    }

    fn new(name: impl Into<String>, is_folder: bool, parent_project_id: Option<String>) -> Self {
        Self {
            name: name.into(),
            identifiers: Vec::new(),
            is_folder,
            description: String::new(),
            business_unit: String::new(),
            risk_profile: RiskProfile::default(),
            parent_project_id,
            cloud_account_links: Vec::new(),
            cloud_organization_links: Vec::new(),
        }
    }

    pub fn with_links(
        mut self,
        accounts: Vec<CloudAccountLinkInput>,
        organizations: Vec<CloudOrganizationLinkInput>,
    ) -> Self {
        self.cloud_account_links = accounts;
        self.cloud_organization_links = organizations;
        self
    }
}

/// Input for the `updateProject` mutation
#[derive(Debug, Clone, Serialize)]
pub struct UpdateProjectInput {
    pub id: String,
    pub patch: ProjectPatch,
}

/// Fields to change; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,

    /// `Some(None)` moves the project to the top level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_project_id: Option<Option<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_account_links: Option<Vec<CloudAccountLinkInput>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_organization_links: Option<Vec<CloudOrganizationLinkInput>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_deserializes_links() {
        let project: Project = serde_json::from_str(
            r#"{
                "id": "p1",
                "name": "Payments",
                "isFolder": false,
                "cloudAccountLinks": [{
                    "cloudAccount": {"id": "ca-1", "externalId": "sub-1"},
                    "shared": true,
                    "environment": "STAGING",
                    "resourceGroups": null,
                    "resourceTags": [{"key": "team", "value": "pay"}]
                }],
                "cloudOrganizationLinks": [],
                "ancestorProjects": [{"id": "f1"}]
            }"#,
        )
        .unwrap();

        let input = CloudAccountLinkInput::from(&project.cloud_account_links[0]);
        assert_eq!(input.cloud_account, "ca-1");
        assert_eq!(input.environment, "STAGING");
        assert!(input.shared);
        assert_eq!(input.resource_tags.as_ref().unwrap()[0].key, "team");
        assert_eq!(project.ancestor_projects[0].id, "f1");
    }

    #[test]
    fn test_create_folder_input_shape() {
        let input = CreateProjectInput::folder("Platform", Some("root".to_string()));
        let json = serde_json::to_value(&input).unwrap();

        assert_eq!(json["isFolder"], true);
        assert_eq!(json["parentProjectId"], "root");
        assert_eq!(json["riskProfile"]["businessImpact"], "MBI");
        assert_eq!(json["riskProfile"]["hasExposedAPI"], "UNKNOWN");
        assert!(json.get("cloudAccountLinks").is_none());
    }

    #[test]
    fn test_create_project_without_parent_sends_null() {
        let input = CreateProjectInput::project("Leaf", None)
            .with_links(vec![CloudAccountLinkInput::new("ca-9")], vec![]);
        let json = serde_json::to_value(&input).unwrap();

        assert!(json["parentProjectId"].is_null());
        assert_eq!(json["cloudAccountLinks"][0]["cloudAccount"], "ca-9");
        assert_eq!(json["cloudAccountLinks"][0]["environment"], "PRODUCTION");
        assert_eq!(json["cloudAccountLinks"][0]["shared"], false);
    }

    #[test]
    fn test_patch_only_serializes_set_fields() {
        let patch = ProjectPatch {
            parent_project_id: Some(None),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 1);
        assert!(json["parentProjectId"].is_null());
    }
}
