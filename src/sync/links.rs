//! Merging desired cloud links and parents into existing projects

use crate::client::models::{
    CloudAccountLinkInput, CloudOrganizationLinkInput, Project, ProjectPatch, ProjectRef,
};

/// Existing account links plus any of `new_ids` not already linked.
///
/// Returns `None` when every ID is already linked, so no mutation is needed.
pub fn merge_account_links(
    project: &Project,
    new_ids: &[String],
) -> Option<Vec<CloudAccountLinkInput>> {
    let mut links: Vec<CloudAccountLinkInput> = project
        .cloud_account_links
        .iter()
        .map(CloudAccountLinkInput::from)
        .collect();
    let before = links.len();

    for id in new_ids {
        if !links.iter().any(|l| &l.cloud_account == id) {
            links.push(CloudAccountLinkInput::new(id.clone()));
        }
    }

    (links.len() > before).then_some(links)
}

/// Existing organization links plus any of `new_ids` not already linked.
pub fn merge_organization_links(
    project: &Project,
    new_ids: &[String],
) -> Option<Vec<CloudOrganizationLinkInput>> {
    let mut links: Vec<CloudOrganizationLinkInput> = project
        .cloud_organization_links
        .iter()
        .map(CloudOrganizationLinkInput::from)
        .collect();
    let before = links.len();

    for id in new_ids {
        if !links.iter().any(|l| &l.cloud_organization == id) {
            links.push(CloudOrganizationLinkInput::new(id.clone()));
        }
    }

    (links.len() > before).then_some(links)
}

/// Whether a project must be moved to `desired` parent.
///
/// With several ancestors the project is left alone if any of them is the
/// desired parent. Otherwise the direct parent (or none) is compared as is,
/// so an empty desired parent moves a nested project to the top level.
pub fn parent_needs_update(ancestors: &[ProjectRef], desired: Option<&str>) -> bool {
    if ancestors.len() > 1 {
        return !ancestors.iter().any(|a| Some(a.id.as_str()) == desired);
    }
    ancestors.first().map(|a| a.id.as_str()) != desired
}

/// Patch for an existing project, or `None` when nothing would change.
pub fn plan_project_update(
    project: &Project,
    account_ids: &[String],
    organization_ids: &[String],
    desired_parent: Option<&str>,
) -> Option<ProjectPatch> {
    let patch = ProjectPatch {
        cloud_account_links: merge_account_links(project, account_ids),
        cloud_organization_links: merge_organization_links(project, organization_ids),
        parent_project_id: parent_needs_update(&project.ancestor_projects, desired_parent)
            .then(|| desired_parent.map(str::to_string)),
        ..Default::default()
    };

    (patch != ProjectPatch::default()).then_some(patch)
}
