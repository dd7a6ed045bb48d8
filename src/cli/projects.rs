//! Create-projects command: bulk create or update projects from a CSV file

use std::collections::HashMap;

use colored::Colorize;
use log::{debug, info, warn};

use crate::cli::context::{confirm_write, dry_run_banner, resolve_flag};
use crate::cli::{CommandContext, CreateProjectsArgs, OutputFormat};
use crate::client::ProjectApi;
use crate::client::models::{
    CloudAccountLinkInput, CloudOrganizationLinkInput, CreateProjectInput, Project, ProjectFilter,
    UpdateProjectInput,
};
use crate::error::Result;
use crate::models::ProjectResultDisplay;
use crate::output::Formattable;
use crate::output::csv::{CreatedProjectsCsv, ProjectInputRow, read_project_rows};
use crate::output::json::format_json_run;
use crate::sync::plan_project_update;

/// Where a row's parent folder was found
#[derive(Debug, Clone, PartialEq, Eq)]
enum ParentLookup {
    /// The row names no parent
    TopLevel,
    Found(String),
    /// Created by an earlier row of this dry run, so it has no ID yet
    Planned,
    Missing,
}

impl ParentLookup {
    fn id(&self) -> Option<&str> {
        match self {
            ParentLookup::Found(id) => Some(id),
            _ => None,
        }
    }
}

/// Applies projects file rows one at a time.
pub struct ProjectSync<'a, A: ProjectApi + ?Sized> {
    api: &'a A,
    write: bool,
    update_existing: bool,
    /// Folders created (or planned) by earlier rows, by name
    folders: HashMap<String, Option<String>>,
}

impl<'a, A: ProjectApi + ?Sized> ProjectSync<'a, A> {
    pub fn new(api: &'a A, write: bool, update_existing: bool) -> Self {
        Self {
            api,
            write,
            update_existing,
            folders: HashMap::new(),
        }
    }

    /// Create the row's project or bring an existing one up to date.
    pub async fn apply_row(&mut self, row: &ProjectInputRow) -> Result<ProjectResultDisplay> {
        debug!("Checking whether project '{}' exists", row.name);
        match self.find_existing(&row.name, row.is_folder).await? {
            None => self.create(row).await,
            Some(project) if self.update_existing => self.update(row, &project).await,
            Some(project) => {
                info!("Project '{}' exists; not updating it", row.name);
                Ok(result("skipped", &project.id, row, "exists"))
            }
        }
    }

    async fn find_existing(&self, name: &str, is_folder: bool) -> Result<Option<Project>> {
        let matches = self
            .api
            .list_all_projects(&ProjectFilter::by_name(name, Some(is_folder)))
            .await?;
        Ok(matches.into_iter().find(|p| p.name == name))
    }

    /// Wiz IDs of accounts by external ID; unknown accounts are skipped.
    async fn resolve_accounts(&self, external_ids: &[String]) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        for external_id in external_ids {
            match self.api.search_cloud_accounts(external_id).await?.first() {
                Some(account) => ids.push(account.id.clone()),
                None => warn!("Cloud account {} is not known to Wiz yet; skipping it", external_id),
            }
        }
        Ok(ids)
    }

    async fn resolve_organizations(&self, external_ids: &[String]) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        for external_id in external_ids {
            match self.api.search_cloud_organizations(external_id).await?.first() {
                Some(org) => ids.push(org.id.clone()),
                None => warn!(
                    "Cloud organization {} is not known to Wiz yet; skipping it",
                    external_id
                ),
            }
        }
        Ok(ids)
    }

    async fn resolve_parent(&self, name: Option<&str>) -> Result<ParentLookup> {
        let Some(name) = name else {
            return Ok(ParentLookup::TopLevel);
        };
        if let Some(folder) = self.find_existing(name, true).await? {
            return Ok(ParentLookup::Found(folder.id));
        }
        Ok(match self.folders.get(name) {
            Some(Some(id)) => ParentLookup::Found(id.clone()),
            Some(None) => ParentLookup::Planned,
            None => ParentLookup::Missing,
        })
    }

    async fn create(&mut self, row: &ProjectInputRow) -> Result<ProjectResultDisplay> {
        let parent = self.resolve_parent(row.parent_name.as_deref()).await?;
        if parent == ParentLookup::Missing {
            warn!(
                "Parent folder '{}' of '{}' not found; creating it at the top level",
                row.parent_name.as_deref().unwrap_or_default(),
                row.name
            );
        }
        let parent_id = parent.id().map(str::to_string);

        let input = if row.is_folder {
            CreateProjectInput::folder(&row.name, parent_id)
        } else {
            let accounts = self.resolve_accounts(&row.account_ids).await?;
            let organizations = self.resolve_organizations(&row.organization_ids).await?;
            CreateProjectInput::project(&row.name, parent_id).with_links(
                accounts.into_iter().map(CloudAccountLinkInput::new).collect(),
                organizations
                    .into_iter()
                    .map(CloudOrganizationLinkInput::new)
                    .collect(),
            )
        };

        let detail = describe_parent(row, &parent);
        if !self.write {
            info!("Would create '{}' ({})", row.name, detail);
            if row.is_folder {
                self.folders.insert(row.name.clone(), None);
            }
            return Ok(result("create", "", row, &detail));
        }

        let id = self.api.create_project(&input).await?;
        info!("Created '{}' ({})", row.name, id);
        if row.is_folder {
            self.folders.insert(row.name.clone(), Some(id.clone()));
        }
        Ok(result("created", &id, row, &detail))
    }

    async fn update(&mut self, row: &ProjectInputRow, project: &Project) -> Result<ProjectResultDisplay> {
        let accounts = self.resolve_accounts(&row.account_ids).await?;
        let organizations = self.resolve_organizations(&row.organization_ids).await?;

        // An unresolved parent leaves the current one alone
        let desired_parent = match self.resolve_parent(row.parent_name.as_deref()).await? {
            ParentLookup::TopLevel => None,
            ParentLookup::Found(id) => Some(id),
            ParentLookup::Planned | ParentLookup::Missing => {
                warn!(
                    "Parent folder '{}' of '{}' not found; keeping the current parent",
                    row.parent_name.as_deref().unwrap_or_default(),
                    row.name
                );
                project.ancestor_projects.first().map(|a| a.id.clone())
            }
        };

        let Some(patch) =
            plan_project_update(project, &accounts, &organizations, desired_parent.as_deref())
        else {
            info!("No changes to apply to '{}'", row.name);
            return Ok(result("unchanged", &project.id, row, "up to date"));
        };

        let mut changes = Vec::new();
        if patch.cloud_account_links.is_some() {
            changes.push("account links");
        }
        if patch.cloud_organization_links.is_some() {
            changes.push("organization links");
        }
        if patch.parent_project_id.is_some() {
            changes.push("parent");
        }
        let detail = changes.join(", ");

        if !self.write {
            info!("Would update {} of '{}'", detail, row.name);
            return Ok(result("update", &project.id, row, &detail));
        }

        self.api
            .update_project(&UpdateProjectInput {
                id: project.id.clone(),
                patch,
            })
            .await?;
        info!("Updated {} of '{}'", detail, row.name);
        Ok(result("updated", &project.id, row, &detail))
    }
}

fn describe_parent(row: &ProjectInputRow, parent: &ParentLookup) -> String {
    match (parent, &row.parent_name) {
        (ParentLookup::TopLevel, _) | (ParentLookup::Missing, _) | (_, None) => {
            "top level".to_string()
        }
        (_, Some(name)) => format!("under {}", name),
    }
}

fn result(action: &str, id: &str, row: &ProjectInputRow, detail: &str) -> ProjectResultDisplay {
    ProjectResultDisplay {
        action: action.to_string(),
        id: id.to_string(),
        name: row.name.clone(),
        is_folder: row.is_folder,
        detail: detail.to_string(),
    }
}

/// Apply every row, recording created and updated projects in `out`.
pub async fn sync_projects<A>(
    api: &A,
    rows: &[ProjectInputRow],
    write: bool,
    update_existing: bool,
    out: &mut CreatedProjectsCsv,
) -> Result<Vec<ProjectResultDisplay>>
where
    A: ProjectApi + ?Sized,
{
    let mut sync = ProjectSync::new(api, write, update_existing);
    let mut results = Vec::with_capacity(rows.len());

    for row in rows {
        let outcome = sync.apply_row(row).await?;
        if outcome.action != "skipped" && outcome.action != "unchanged" {
            out.write(&outcome.id, &outcome.name, outcome.is_folder)?;
        }
        results.push(outcome);
    }

    Ok(results)
}

/// Run the create-projects command
pub async fn run(ctx: &CommandContext, args: &CreateProjectsArgs) -> Result<()> {
    let rows = read_project_rows(&args.input)?;
    if rows.is_empty() {
        eprintln!("No projects in {}", args.input.display());
        return Ok(());
    }

    if ctx.format != OutputFormat::Json {
        if !args.write {
            dry_run_banner();
        }
        eprintln!("{} projects read from {}", rows.len(), args.input.display());
    }

    let update_existing = resolve_flag(
        args.update_existing,
        "Update projects that already exist?",
    )?;
    if args.write
        && !confirm_write(
            &format!("Create or update {} projects?", rows.len()),
            args.yes,
        )?
    {
        return Ok(());
    }

    let mut out = CreatedProjectsCsv::create(&args.output)?;
    let results = sync_projects(
        ctx.client.as_ref(),
        &rows,
        args.write,
        update_existing,
        &mut out,
    )
    .await?;

    match ctx.format {
        OutputFormat::Json => println!("{}", format_json_run(&results, !args.write)?),
        _ => {
            results.print(ctx.format)?;
            let changed = results
                .iter()
                .filter(|r| !matches!(r.action.as_str(), "skipped" | "unchanged"))
                .count();
            eprintln!(
                "{} {} of {} projects {}; listed in {}",
                "✓".green(),
                changed,
                results.len(),
                if args.write { "changed" } else { "would change" },
                args.output.display()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockWizClient;
    use crate::client::models::{CloudAccount, CloudOrganization};
    use serde_json::json;
    use tempfile::tempdir;

    fn row(name: &str, is_folder: bool, accounts: &[&str], parent: Option<&str>) -> ProjectInputRow {
        ProjectInputRow {
            name: name.to_string(),
            is_folder,
            account_ids: accounts.iter().map(|s| s.to_string()).collect(),
            organization_ids: Vec::new(),
            parent_name: parent.map(str::to_string),
        }
    }

    fn project(id: &str, name: &str, is_folder: bool, ancestors: &[&str]) -> Project {
        serde_json::from_value(json!({
            "id": id,
            "name": name,
            "isFolder": is_folder,
            "ancestorProjects": ancestors.iter().map(|a| json!({"id": a})).collect::<Vec<_>>(),
        }))
        .unwrap()
    }

    fn account(id: &str, external_id: &str) -> CloudAccount {
        CloudAccount {
            id: id.to_string(),
            name: format!("acct {}", external_id),
            external_id: Some(external_id.to_string()),
            cloud_provider: Some("Azure".to_string()),
        }
    }

    #[tokio::test]
    async fn test_write_creates_folder_then_child() {
        let dir = tempdir().unwrap();
        let mut out = CreatedProjectsCsv::create(&dir.path().join("out.csv")).unwrap();
        let mock = MockWizClient::new()
            .with_accounts(vec![account("ca-1", "sub-1")])
            .await;

        let rows = vec![
            row("Platform", true, &[], None),
            row("prod", false, &["sub-1", "sub-missing"], Some("Platform")),
        ];
        let results = sync_projects(&mock, &rows, true, false, &mut out).await.unwrap();

        assert_eq!(results[0].action, "created");
        assert_eq!(results[1].action, "created");
        let created = mock.captured().await.created;
        assert!(created[0].cloud_account_links.is_empty());
        assert_eq!(created[1].parent_project_id.as_deref(), Some(results[0].id.as_str()));
        assert_eq!(created[1].cloud_account_links.len(), 1);
        assert_eq!(created[1].cloud_account_links[0].cloud_account, "ca-1");
    }

    #[tokio::test]
    async fn test_leaf_links_organizations() {
        let dir = tempdir().unwrap();
        let mut out = CreatedProjectsCsv::create(&dir.path().join("out.csv")).unwrap();
        let mock = MockWizClient::new()
            .with_organizations(vec![CloudOrganization {
                id: "co-1".to_string(),
                name: "Landing Zones".to_string(),
                external_id: Some("mg-lz".to_string()),
                cloud_provider: Some("Azure".to_string()),
            }])
            .await;

        let mut input = row("lz", false, &[], None);
        input.organization_ids = vec!["mg-lz".to_string()];
        sync_projects(&mock, &[input], true, false, &mut out).await.unwrap();

        let created = mock.captured().await.created;
        assert_eq!(created[0].cloud_organization_links[0].cloud_organization, "co-1");
        assert_eq!(created[0].cloud_organization_links[0].environment, "PRODUCTION");
    }

    #[tokio::test]
    async fn test_dry_run_makes_no_mutations() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut out = CreatedProjectsCsv::create(&path).unwrap();
        let mock = MockWizClient::new();

        let rows = vec![
            row("Platform", true, &[], None),
            row("prod", false, &[], Some("Platform")),
        ];
        let results = sync_projects(&mock, &rows, false, true, &mut out).await.unwrap();

        assert_eq!(mock.call_counts().await.mutations(), 0);
        assert_eq!(results[1].action, "create");
        assert_eq!(results[1].detail, "under Platform");
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains(",prod,False"));
    }

    #[tokio::test]
    async fn test_existing_project_gets_missing_links_and_parent() {
        let dir = tempdir().unwrap();
        let mut out = CreatedProjectsCsv::create(&dir.path().join("out.csv")).unwrap();
        let mock = MockWizClient::new()
            .with_projects(vec![
                project("f-1", "Platform", true, &[]),
                project("p-1", "prod", false, &[]),
            ])
            .await
            .with_accounts(vec![account("ca-1", "sub-1")])
            .await;

        let rows = vec![row("prod", false, &["sub-1"], Some("Platform"))];
        let results = sync_projects(&mock, &rows, true, true, &mut out).await.unwrap();

        assert_eq!(results[0].action, "updated");
        assert_eq!(results[0].detail, "account links, parent");
        let updated = mock.captured().await.updated;
        assert_eq!(updated[0].id, "p-1");
        assert_eq!(updated[0].patch.parent_project_id, Some(Some("f-1".to_string())));
    }

    #[tokio::test]
    async fn test_existing_project_skipped_without_update() {
        let dir = tempdir().unwrap();
        let mut out = CreatedProjectsCsv::create(&dir.path().join("out.csv")).unwrap();
        let mock = MockWizClient::new()
            .with_projects(vec![project("p-1", "prod", false, &[])])
            .await;

        let results = sync_projects(&mock, &[row("prod", false, &[], None)], true, false, &mut out)
            .await
            .unwrap();
        assert_eq!(results[0].action, "skipped");
        assert_eq!(mock.call_counts().await.mutations(), 0);
    }

    #[tokio::test]
    async fn test_name_search_requires_exact_match() {
        let dir = tempdir().unwrap();
        let mut out = CreatedProjectsCsv::create(&dir.path().join("out.csv")).unwrap();
        let mock = MockWizClient::new()
            .with_projects(vec![project("p-1", "prod-eu", false, &[])])
            .await;

        let results = sync_projects(&mock, &[row("prod", false, &[], None)], true, true, &mut out)
            .await
            .unwrap();
        assert_eq!(results[0].action, "created");
    }

    #[tokio::test]
    async fn test_unresolved_parent_keeps_current_parent() {
        let dir = tempdir().unwrap();
        let mut out = CreatedProjectsCsv::create(&dir.path().join("out.csv")).unwrap();
        let mock = MockWizClient::new()
            .with_projects(vec![project("p-1", "prod", false, &["f-old"])])
            .await;

        let results = sync_projects(&mock, &[row("prod", false, &[], Some("Gone"))], true, true, &mut out)
            .await
            .unwrap();
        assert_eq!(results[0].action, "unchanged");
    }
}
