//! Pulling a project subtree and planning its rename/archive

use futures::future::BoxFuture;
use log::{debug, info};

use crate::client::ProjectApi;
use crate::client::models::{Project, ProjectFilter, ProjectPatch, UpdateProjectInput};
use crate::error::Result;

/// A project with its descendants
#[derive(Debug, Clone)]
pub struct ProjectTree {
    pub project: Project,
    pub children: Vec<ProjectTree>,
}

impl ProjectTree {
    /// Pre-order: each project before its children.
    pub fn flatten(&self) -> Vec<&Project> {
        let mut out = vec![&self.project];
        for child in &self.children {
            out.extend(child.flatten());
        }
        out
    }

    /// Indented outline for display.
    pub fn outline(&self) -> Vec<String> {
        let mut lines = Vec::new();
        self.outline_into(0, &mut lines);
        lines
    }

    fn outline_into(&self, level: usize, lines: &mut Vec<String>) {
        let p = &self.project;
        let mut flags = Vec::new();
        if p.is_folder {
            flags.push("folder");
        }
        if p.archived {
            flags.push("archived");
        }
        let suffix = if flags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", flags.join(", "))
        };
        lines.push(format!("{}{} ({}){}", "  ".repeat(level), p.name, p.id, suffix));
        for child in &self.children {
            child.outline_into(level + 1, lines);
        }
    }
}

/// Pull the root project and every descendant.
///
/// Children are only requested for projects reporting `childProjectCount > 0`.
pub async fn pull_project_tree<A>(
    api: &A,
    root_id: &str,
    include_archived: bool,
) -> Result<Vec<ProjectTree>>
where
    A: ProjectApi + ?Sized,
{
    pull_level(api, ProjectFilter::by_id(root_id, include_archived), include_archived).await
}

fn pull_level<'a, A>(
    api: &'a A,
    filter: ProjectFilter,
    include_archived: bool,
) -> BoxFuture<'a, Result<Vec<ProjectTree>>>
where
    A: ProjectApi + ?Sized,
{
    Box::pin(async move {
        let projects = api.list_all_projects(&filter).await?;
        let mut level = Vec::with_capacity(projects.len());

        for project in projects {
            let children = if project.child_project_count > 0 {
                debug!("Pulling children of {} ({})", project.name, project.id);
                pull_level(
                    api,
                    ProjectFilter::children_of(&project.id, include_archived),
                    include_archived,
                )
                .await?
            } else {
                Vec::new()
            };
            level.push(ProjectTree { project, children });
        }

        Ok(level)
    })
}

/// What to change on every project of the subtree
#[derive(Debug, Clone, Default)]
pub struct ArchiveSettings {
    pub name_suffix: String,
    pub slug_suffix: String,
    pub archived: bool,
}

/// One planned project update, with the name it had before
#[derive(Debug, Clone)]
pub struct PlannedUpdate {
    pub current_name: String,
    pub current_slug: Option<String>,
    pub currently_archived: bool,
    pub input: UpdateProjectInput,
}

/// Plan updates for every project, parents before children.
pub fn plan_archive(trees: &[ProjectTree], settings: &ArchiveSettings) -> Vec<PlannedUpdate> {
    trees
        .iter()
        .flat_map(ProjectTree::flatten)
        .map(|project| {
            let patch = ProjectPatch {
                name: (!settings.name_suffix.is_empty())
                    .then(|| format!("{}{}", project.name, settings.name_suffix)),
                slug: project
                    .slug
                    .as_ref()
                    .filter(|_| !settings.slug_suffix.is_empty())
                    .map(|slug| format!("{}{}", slug, settings.slug_suffix)),
                archived: Some(settings.archived),
                ..Default::default()
            };
            PlannedUpdate {
                current_name: project.name.clone(),
                current_slug: project.slug.clone(),
                currently_archived: project.archived,
                input: UpdateProjectInput {
                    id: project.id.clone(),
                    patch,
                },
            }
        })
        .collect()
}

/// Apply planned updates in order; stops at the first failure.
pub async fn apply_archive<A>(api: &A, plan: &[PlannedUpdate]) -> Result<usize>
where
    A: ProjectApi + ?Sized,
{
    for update in plan {
        info!(
            "Updating {} ({}): name {:?}, slug {:?}, archived {} -> {:?}",
            update.current_name,
            update.input.id,
            update.input.patch.name,
            update.input.patch.slug,
            update.currently_archived,
            update.input.patch.archived
        );
        api.update_project(&update.input).await?;
    }
    Ok(plan.len())
}
