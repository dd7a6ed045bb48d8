//! SAML group mapping planning
//!
//! Two flows live here: aggregating the AD groups CSV into one mapping row per
//! group (offline), and merging desired mappings into an identity provider's
//! existing group mapping list.

use log::{debug, info, warn};

use crate::client::models::{GroupMappingInput, Project};
use crate::error::{Error, Result};

/// Roles a group mapping may grant
pub const ALLOWED_ROLES: [&str; 11] = [
    "GLOBAL_ADMIN",
    "GLOBAL_READER",
    "GLOBAL_RESPONDER",
    "GLOBAL_CONTRIBUTOR",
    "GLOBAL_GRAPH_READER",
    "CONNECTOR_ADMIN",
    "CONNECTOR_READER",
    "PROJECT_ADMIN",
    "PROJECT_MEMBER",
    "PROJECT_READER",
    "PROJECT_GRAPH_READER",
];

/// Whether a role can be scoped to projects.
pub fn is_project_role(role: &str) -> bool {
    role.starts_with("PROJECT_")
}

/// One desired mapping, with projects still given by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRow {
    pub group: String,
    pub role: String,
    pub projects: Vec<String>,
}

/// Check every row before any API call; all problems are reported together.
pub fn validate_rows(rows: &[MappingRow]) -> Result<()> {
    let mut problems = Vec::new();

    for row in rows {
        if !ALLOWED_ROLES.contains(&row.role.as_str()) {
            problems.push(format!(
                "{}: '{}' is not an allowed role (allowed: {})",
                row.group,
                row.role,
                ALLOWED_ROLES.join(", ")
            ));
        } else if !is_project_role(&row.role) && !row.projects.is_empty() {
            problems.push(format!(
                "{}: {} is a global role but lists projects ({})",
                row.group,
                row.role,
                row.projects.join(",")
            ));
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(Error::Input(problems.join("\n")))
    }
}

/// Pick the project a name refers to among search hits.
///
/// An exact name match wins; otherwise a single hit is accepted.
pub fn resolve_project_id(name: &str, hits: &[Project]) -> Option<String> {
    hits.iter()
        .find(|p| p.name == name)
        .or(match hits {
            [only] => Some(only),
            _ => None,
        })
        .map(|p| p.id.clone())
}

/// Result of merging desired mappings into an existing list
#[derive(Debug, Clone, Default)]
pub struct MappingMerge {
    pub mappings: Vec<GroupMappingInput>,
    pub added: usize,
    pub updated: usize,
    pub skipped: usize,
}

/// Append unknown groups; replace role and projects of known ones when allowed.
pub fn merge_group_mappings(
    existing: Vec<GroupMappingInput>,
    desired: Vec<GroupMappingInput>,
    update_existing: bool,
) -> MappingMerge {
    let mut merge = MappingMerge {
        mappings: existing,
        ..Default::default()
    };

    for mapping in desired {
        match merge
            .mappings
            .iter_mut()
            .find(|m| m.provider_group_id == mapping.provider_group_id)
        {
            None => {
                info!("Adding mapping for {}", mapping.provider_group_id);
                merge.mappings.push(mapping);
                merge.added += 1;
            }
            Some(current) if update_existing => {
                info!("Updating mapping for {}", mapping.provider_group_id);
                current.role = mapping.role;
                current.projects = mapping.projects;
                merge.updated += 1;
            }
            Some(_) => {
                info!(
                    "Mapping for {} already exists; not updating",
                    mapping.provider_group_id
                );
                merge.skipped += 1;
            }
        }
    }

    merge
}

/// Row of the AD groups CSV
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdGroupRow {
    pub group: String,
    pub project: String,
    pub member_name: String,
    pub member_email: String,
    pub cloud: String,
}

/// One AD group with its distinct projects and members
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSummary {
    pub group: String,
    pub cloud: String,
    pub projects: Vec<String>,
    pub members: Vec<String>,
}

/// Group AD rows by group name, keeping first-seen order throughout.
pub fn aggregate_ad_groups(rows: &[AdGroupRow]) -> Vec<GroupSummary> {
    let mut groups: Vec<GroupSummary> = Vec::new();

    for row in rows {
        let index = match groups.iter().position(|g| g.group == row.group) {
            Some(index) => index,
            None => {
                groups.push(GroupSummary {
                    group: row.group.clone(),
                    cloud: row.cloud.clone(),
                    projects: Vec::new(),
                    members: Vec::new(),
                });
                groups.len() - 1
            }
        };
        let group = &mut groups[index];

        if !group.projects.contains(&row.project) {
            group.projects.push(row.project.clone());
        }

        if row.member_email.is_empty() {
            continue;
        }
        if group.members.contains(&row.member_email) {
            warn!(
                "Duplicate member {} in group {}",
                row.member_email, row.group
            );
        } else {
            debug!("Group {} member {}", row.group, row.member_email);
            group.members.push(row.member_email.clone());
        }
    }

    groups
}
