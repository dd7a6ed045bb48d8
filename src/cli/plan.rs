//! Plan command: projects and AD groups CSV files from cloud hierarchies
//!
//! Each cloud gets a root folder project. Every root group listed for that
//! cloud is queried to the depth of the cloud's entity matrix and walked into
//! the cloud's tree; each node created along the way becomes a projects row
//! and, unless `--skip-members`, a `Wiz_<project>_<role>` group whose members
//! are the users bound to the node's subscription or organization.

use colored::Colorize;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use serde::Serialize;
use tabled::Tabled;

use crate::cli::{CommandContext, OutputFormat, PlanArgs};
use crate::client::GraphApi;
use crate::error::Result;
use crate::hierarchy::{
    Cloud, CreatedNode, EntityKind, NodeKind, ProjectNode, RootGroup, RowWalker, hierarchy_query,
};
use crate::output::Formattable;
use crate::output::csv::{AdGroupsCsv, ProjectsCsv};
use crate::output::json::format_json;
use crate::sync::{AdGroupRow, Member, fetch_members};

/// Member lookups in flight at once
const MEMBER_LOOKUP_CONCURRENCY: usize = 4;

/// Order root rows are written in
const ROOT_ROW_ORDER: [Cloud; 3] = [Cloud::Aws, Cloud::Azure, Cloud::Gcp];

/// Order clouds are modelled in
const MODEL_ORDER: [Cloud; 3] = [Cloud::Azure, Cloud::Gcp, Cloud::Aws];

/// Root groups to model for one cloud
#[derive(Debug, Clone)]
pub struct CloudRoots {
    pub cloud: Cloud,
    pub root_project: String,
    pub roots: Vec<RootGroup>,
}

/// Per-cloud totals
#[derive(Debug, Clone, Default, Tabled, Serialize)]
pub struct PlanSummary {
    #[tabled(rename = "CLOUD")]
    pub cloud: String,

    #[tabled(rename = "FOLDERS")]
    pub folders: usize,

    #[tabled(rename = "PROJECTS")]
    pub projects: usize,

    #[tabled(rename = "GROUPS")]
    pub groups: usize,

    #[tabled(rename = "MEMBERS")]
    pub members: usize,
}

/// Parse the three root lists; clouds without roots are dropped.
pub fn collect_roots(args: &PlanArgs) -> Result<Vec<CloudRoots>> {
    let mut clouds = Vec::new();
    for cloud in MODEL_ORDER {
        let (root_project, json) = match cloud {
            Cloud::Azure => (&args.azure_root_project, &args.azure_roots),
            Cloud::Gcp => (&args.gcp_root_project, &args.gcp_roots),
            Cloud::Aws => (&args.aws_root_project, &args.aws_roots),
        };
        let roots = RootGroup::parse_list(json)?;
        if !roots.is_empty() {
            clouds.push(CloudRoots {
                cloud,
                root_project: root_project.clone(),
                roots,
            });
        }
    }
    Ok(clouds)
}

/// Group name for a project
pub fn group_name(project: &str, role: &str) -> String {
    format!("Wiz_{}_{}", project, role)
}

fn scope_kind(node: &CreatedNode) -> EntityKind {
    match node.kind {
        NodeKind::Folder => EntityKind::CloudOrganization,
        NodeKind::Project => EntityKind::Subscription,
    }
}

fn member_progress(len: usize) -> ProgressBar {
    let bar = ProgressBar::new(len as u64);
    if let Ok(style) =
        ProgressStyle::with_template("{spinner:.cyan} {msg} [{bar:30.cyan/blue}] {pos}/{len}")
    {
        bar.set_style(style.progress_chars("=> "));
    }
    bar.set_message("Looking up group members");
    bar
}

/// Members of every node, in node order.
async fn lookup_members<A>(
    api: &A,
    nodes: &[CreatedNode],
    cloud: Cloud,
) -> Result<Vec<Vec<Member>>>
where
    A: GraphApi + ?Sized,
{
    let bar = member_progress(nodes.len());

    let results: Vec<Result<Vec<Member>>> = stream::iter(nodes.iter().map(|node| {
        let bar = bar.clone();
        async move {
            let members = match &node.external_id {
                Some(scope) => fetch_members(api, scope, scope_kind(node), cloud).await,
                None => Ok(Vec::new()),
            };
            bar.inc(1);
            members
        }
    }))
    .buffered(MEMBER_LOOKUP_CONCURRENCY)
    .collect()
    .await;

    bar.finish_and_clear();
    results.into_iter().collect()
}

/// Build both files; returns per-cloud totals.
pub async fn write_plan<A>(
    api: &A,
    clouds: &[CloudRoots],
    args: &PlanArgs,
) -> Result<Vec<PlanSummary>>
where
    A: GraphApi + ?Sized,
{
    let mut projects_csv = ProjectsCsv::create(&args.projects_output)?;
    let mut ad_csv = AdGroupsCsv::create(&args.ad_groups_output)?;

    for cloud in ROOT_ROW_ORDER {
        if let Some(entry) = clouds.iter().find(|c| c.cloud == cloud) {
            projects_csv.write_root(&entry.root_project, cloud.platform())?;
        }
    }

    let mut summaries = Vec::new();
    for entry in clouds {
        let cloud = entry.cloud;
        let matrix = cloud.matrix();
        let mut tree = ProjectNode::root_folder(&entry.root_project, Some(cloud));
        let mut summary = PlanSummary {
            cloud: cloud.to_string(),
            ..Default::default()
        };

        for root in &entry.roots {
            info!("Modelling {} {} ({})", cloud, root.friendly_name, root.group_id);
            let rows = api
                .graph_search_all(&hierarchy_query(&matrix, &root.group_id))
                .await?;
            if rows.items.is_empty() {
                warn!("No hierarchy found below {} ({})", root.friendly_name, root.group_id);
                continue;
            }

            let created = RowWalker::new(&matrix, &root.friendly_name)
                .with_burners(&root.burner_list)
                .build(&mut tree, &rows.items);
            for node in &created {
                projects_csv.write_node(node)?;
            }

            if args.skip_members {
                continue;
            }
            let members = lookup_members(api, &created, cloud).await?;
            for (node, members) in created.iter().zip(members) {
                summary.groups += 1;
                summary.members += members.len();
                let group = group_name(&node.name, &args.user_role);
                for member in members {
                    ad_csv.write_member(&AdGroupRow {
                        group: group.clone(),
                        project: node.name.clone(),
                        member_name: member.name,
                        member_email: member.email,
                        cloud: cloud.to_string(),
                    })?;
                }
            }
        }

        let (folders, projects) = tree.count();
        summary.folders = folders;
        summary.projects = projects;
        summaries.push(summary);
    }

    info!(
        "Wrote {} project rows and {} member rows",
        projects_csv.rows(),
        ad_csv.rows()
    );
    projects_csv.finish()?;
    ad_csv.finish()?;
    Ok(summaries)
}

/// Run the plan command
pub async fn run(ctx: &CommandContext, args: &PlanArgs) -> Result<()> {
    let clouds = collect_roots(args)?;
    if clouds.is_empty() {
        warn!("No root groups given; only the CSV headers will be written");
    }

    let summaries = write_plan(ctx.client.as_ref(), &clouds, args).await?;

    match ctx.format {
        OutputFormat::Json => println!("{}", format_json(&summaries)?),
        _ => {
            summaries.print(ctx.format)?;
            eprintln!(
                "{} Projects written to {}",
                "✓".green(),
                args.projects_output.display()
            );
            eprintln!(
                "{} AD groups written to {}",
                "✓".green(),
                args.ad_groups_output.display()
            );
            if let Some(provider) = &args.saml_provider {
                eprintln!("→ Map the groups on identity provider {}", provider.bold());
            }
        }
    }

    Ok(())
}
