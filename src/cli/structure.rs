//! Structure command: one management group as folder projects

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write;

use colored::Colorize;
use log::{debug, info};

use crate::cli::context::dry_run_banner;
use crate::cli::{CommandContext, OutputFormat, StructureArgs};
use crate::client::models::CreateProjectInput;
use crate::client::{GraphApi, ProjectApi};
use crate::error::{Error, Result};
use crate::hierarchy::{
    CreatedNode, EntityMatrix, NodeKind, ProjectNode, RowWalker, hierarchy_query, sanitize_name,
};
use crate::models::NodeDisplay;
use crate::output::Formattable;
use crate::output::json::format_json_run;

/// Name of the container node the modelled root hangs off
const CONTAINER: &str = "<root>";

/// Path relative to the container; folders end with `/`.
fn relative_path(node: &ProjectNode) -> String {
    let path = node
        .path
        .strip_prefix(&format!("{}/", CONTAINER))
        .unwrap_or(&node.path);
    if node.is_folder() {
        format!("{}/", path)
    } else {
        path.to_string()
    }
}

/// Result of modelling (and optionally creating) one structure
#[derive(Debug)]
pub struct StructureRun {
    pub created: Vec<CreatedNode>,
    pub folders: usize,
    pub projects: usize,
    /// Project IDs by tree path; empty in a dry run
    pub ids: HashMap<String, String>,
}

/// Model the hierarchy, write each path to `out`, and create projects when asked.
pub async fn model_structure<A, W>(api: &A, args: &StructureArgs, out: &mut W) -> Result<StructureRun>
where
    A: GraphApi + ProjectApi + ?Sized,
    W: Write,
{
    let matrix = EntityMatrix::basic();

    info!("Querying hierarchy below {}", args.root);
    let rows = api
        .graph_search_all(&hierarchy_query(&matrix, &args.root))
        .await?
        .items;

    let root_name = match (&args.name, rows.first().and_then(|r| r.entities.first())) {
        (Some(name), _) => name.clone(),
        (None, Some(Some(entity))) => sanitize_name(&entity.name),
        (None, _) => {
            return Err(Error::Input(format!(
                "no management group with external ID '{}' was found",
                args.root
            )));
        }
    };

    let mut tree = ProjectNode::root_folder(CONTAINER, None);
    let created = RowWalker::new(&matrix, &root_name).build(&mut tree, &rows);
    let (folders, projects) = tree.count();
    debug!("Modelled {} folders and {} projects", folders, projects);

    // Parents are walked before their children, so each parent ID is known
    let mut ids: HashMap<String, String> = HashMap::new();
    for node in tree.walk().into_iter().skip(1) {
        writeln!(out, "{}", relative_path(node))?;

        if !args.write {
            continue;
        }
        let parent_id = match node.path.rsplit_once('/') {
            Some((parent, _)) if parent != CONTAINER => ids.get(parent).cloned(),
            _ => args.parent_project_id.clone(),
        };
        let input = match node.kind {
            NodeKind::Folder => CreateProjectInput::folder(&node.name, parent_id),
            NodeKind::Project => CreateProjectInput::project(&node.name, parent_id),
        };
        let id = api.create_project(&input).await?;
        info!("Created {} ({})", node.path, id);
        ids.insert(node.path.clone(), id);
    }

    Ok(StructureRun {
        created,
        folders,
        projects,
        ids,
    })
}

/// Run the structure command
pub async fn run(ctx: &CommandContext, args: &StructureArgs) -> Result<()> {
    if !args.write && ctx.format != OutputFormat::Json {
        dry_run_banner();
    }

    let mut output = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&args.output)?;
    let run = model_structure(ctx.client.as_ref(), args, &mut output).await?;

    let display: Vec<NodeDisplay> = run.created.iter().map(NodeDisplay::from).collect();
    match ctx.format {
        OutputFormat::Json => println!("{}", format_json_run(&display, !args.write)?),
        _ => {
            display.print(ctx.format)?;
            eprintln!(
                "{} {} folders, {} projects; paths appended to {}",
                "✓".green(),
                run.folders,
                run.projects,
                args.output.display()
            );
            if args.write {
                eprintln!("{} Created {} projects", "✓".green(), run.ids.len());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockWizClient;
    use crate::client::models::{GraphEntity, GraphSearchRow};
    use serde_json::json;

    #[test]
    fn test_relative_path_strips_container() {
        let mut tree = ProjectNode::root_folder(CONTAINER, None);
        tree.find_or_create_folder(&["Corp".to_string()], None, "<root>/Corp");
        tree.find_or_create_project(
            &["Corp".to_string(), "prod".to_string()],
            None,
            "<root>/Corp/prod",
        );

        let paths: Vec<String> = tree.walk().into_iter().skip(1).map(relative_path).collect();
        assert_eq!(paths, vec!["Corp/", "Corp/prod"]);
    }

    fn entity(name: &str, entity_type: &str, ext: &str) -> Option<GraphEntity> {
        Some(GraphEntity {
            id: format!("g-{}", ext),
            name: name.to_string(),
            entity_type: entity_type.to_string(),
            properties: json!({ "externalId": ext }),
        })
    }

    fn rows() -> Vec<GraphSearchRow> {
        vec![GraphSearchRow {
            entities: vec![
                entity("Tenant Root", "CLOUD_ORGANIZATION", "mg-root"),
                entity("Platform", "CLOUD_ORGANIZATION", "mg-plat"),
                entity("plat-prod", "SUBSCRIPTION", "s-1"),
                None,
                None,
                entity("root-sub", "SUBSCRIPTION", "s-2"),
            ],
        }]
    }

    fn args(write: bool, name: Option<&str>) -> StructureArgs {
        StructureArgs {
            root: "mg-root".to_string(),
            name: name.map(str::to_string),
            output: "unused.txt".into(),
            write,
            parent_project_id: Some("top".to_string()),
        }
    }

    #[tokio::test]
    async fn test_dry_run_writes_paths_only() {
        let mock = MockWizClient::new().with_graph_rows("mg-root", rows()).await;
        let mut out = Vec::new();

        let run = model_structure(&mock, &args(false, None), &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text.lines().collect::<Vec<_>>(),
            vec!["Tenant Root/", "Tenant Root/root-sub", "Tenant Root/Platform/", "Tenant Root/Platform/plat-prod"]
        );
        assert_eq!((run.folders, run.projects), (2, 2));
        assert_eq!(mock.call_counts().await.mutations(), 0);
    }

    #[tokio::test]
    async fn test_write_creates_under_parents() {
        let mock = MockWizClient::new().with_graph_rows("mg-root", rows()).await;
        let mut out = Vec::new();

        let run = model_structure(&mock, &args(true, Some("Corp")), &mut out).await.unwrap();
        assert_eq!(run.ids.len(), 4);

        let created = mock.captured().await.created;
        assert_eq!(created[0].name, "Corp");
        assert!(created[0].is_folder);
        assert_eq!(created[0].parent_project_id.as_deref(), Some("top"));
        let corp_id = run.ids.get("<root>/Corp").cloned();
        assert_eq!(created[1].name, "root-sub");
        assert_eq!(created[1].parent_project_id, corp_id);
        assert_eq!(created[3].name, "plat-prod");
        assert_eq!(created[3].parent_project_id, run.ids.get("<root>/Corp/Platform").cloned());
    }

    #[tokio::test]
    async fn test_slash_in_root_name_keeps_parent_links() {
        let mock = MockWizClient::new().with_graph_rows("mg-root", rows()).await;
        let mut out = Vec::new();

        let run = model_structure(&mock, &args(true, Some("Corp/EU")), &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().next(), Some("Corp-EU/"));

        let created = mock.captured().await.created;
        assert_eq!(created[0].name, "Corp-EU");
        let corp_id = run.ids.get("<root>/Corp-EU").cloned();
        assert!(corp_id.is_some());
        assert_eq!(created[1].parent_project_id, corp_id);
        assert_eq!(created[2].name, "Platform");
        assert_eq!(created[2].parent_project_id, corp_id);
    }

    #[tokio::test]
    async fn test_unknown_root_is_an_error() {
        let mock = MockWizClient::new();
        let mut out = Vec::new();
        let err = model_structure(&mock, &args(false, None), &mut out).await.unwrap_err();
        assert!(err.to_string().contains("mg-root"));
    }
}
