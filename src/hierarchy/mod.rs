//! Cloud hierarchy modelling
//!
//! Graph search rows are flat: each row is one path through the cloud
//! organization tree, with one entity per query node. The [`EntityMatrix`]
//! says which kind of entity sits at each row position and which position is
//! its parent; [`RowWalker`] uses it to rebuild a [`ProjectNode`] tree that
//! mirrors the management group / OU / folder structure.

mod builder;
mod matrix;
mod query;
mod tree;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use builder::RowWalker;
pub use matrix::{EntityKind, EntityMatrix, EntitySlot};
pub use query::{hierarchy_query, member_query};
pub use tree::{CreatedNode, Insertion, NodeKind, ProjectNode};

/// Cloud provider a hierarchy comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum Cloud {
    #[value(name = "Azure", alias = "azure")]
    #[serde(rename = "Azure")]
    Azure,
    #[value(name = "AWS", alias = "aws")]
    #[serde(rename = "AWS")]
    Aws,
    #[value(name = "GCP", alias = "gcp")]
    #[serde(rename = "GCP")]
    Gcp,
}

impl Cloud {
    /// Value of the `cloudPlatform` graph property.
    pub fn platform(&self) -> &'static str {
        match self {
            Cloud::Azure => "Azure",
            Cloud::Aws => "AWS",
            Cloud::Gcp => "GCP",
        }
    }

    /// Entity matrix matching the depth this cloud's hierarchy is queried to.
    pub fn matrix(&self) -> EntityMatrix {
        match self {
            Cloud::Azure => EntityMatrix::azure(),
            Cloud::Aws => EntityMatrix::aws(),
            Cloud::Gcp => EntityMatrix::gcp(),
        }
    }

    /// Graph property holding a user's email or UPN.
    pub fn email_property(&self) -> &'static str {
        match self {
            Cloud::Azure => "userPrincipalName",
            Cloud::Aws | Cloud::Gcp => "name",
        }
    }

    /// Whether role bindings can be attached to organizations of this cloud.
    ///
    /// AWS OUs carry no role bindings in the graph.
    pub fn has_organization_bindings(&self) -> bool {
        !matches!(self, Cloud::Aws)
    }
}

impl fmt::Display for Cloud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.platform())
    }
}

/// One entry of a root group list: a management group / organization to model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootGroup {
    /// Folder name used instead of the group's graph name
    pub friendly_name: String,

    /// External ID of the root management group or organization
    pub group_id: String,

    /// External IDs whose subtrees are excluded
    #[serde(default)]
    pub burner_list: Vec<String>,
}

impl RootGroup {
    /// Parse a JSON root group list.
    pub fn parse_list(json: &str) -> crate::error::Result<Vec<RootGroup>> {
        serde_json::from_str(json).map_err(|e| {
            crate::error::Error::Input(format!("invalid root group list: {}", e))
        })
    }
}

/// Project names may not contain `/`.
pub fn sanitize_name(name: &str) -> String {
    name.replace('/', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_name_replaces_slashes() {
        assert_eq!(sanitize_name("a/b/c"), "a-b-c");
        assert_eq!(sanitize_name("plain"), "plain");
    }

    #[test]
    fn test_parse_root_group_list() {
        let roots = RootGroup::parse_list(
            r#"[{"friendly_name": "Corp", "group_id": "mg-1", "burner_list": ["mg-x"]},
                {"friendly_name": "Lab", "group_id": "mg-2"}]"#,
        )
        .unwrap();
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].burner_list, vec!["mg-x"]);
        assert!(roots[1].burner_list.is_empty());
    }

    #[test]
    fn test_parse_root_group_list_rejects_garbage() {
        assert!(RootGroup::parse_list("{not json").is_err());
        assert!(RootGroup::parse_list("[]").unwrap().is_empty());
    }

    #[test]
    fn test_cloud_email_property() {
        assert_eq!(Cloud::Azure.email_property(), "userPrincipalName");
        assert_eq!(Cloud::Gcp.email_property(), "name");
        assert!(!Cloud::Aws.has_organization_bindings());
        assert_eq!(Cloud::Aws.to_string(), "AWS");
    }
}
