//! SAML group mapping commands

use std::collections::HashMap;

use colored::Colorize;
use dialoguer::{Select, theme::ColorfulTheme};
use log::{debug, info, warn};

use crate::cli::context::{confirm_write, dry_run_banner, resolve_flag};
use crate::cli::{CommandContext, OutputFormat, SamlMappingsArgs, SamlMappingsFileArgs};
use crate::client::models::{
    GroupMappingInput, ProjectFilter, SamlProvider, SamlProviderPatch, SamlProviderSummary,
    UpdateSamlProviderInput,
};
use crate::client::{ProjectApi, SamlApi};
use crate::error::{Error, Result};
use crate::models::{GroupDisplay, MappingDisplay, ProviderDisplay};
use crate::output::Formattable;
use crate::output::csv::{read_ad_group_rows, read_mapping_rows, write_saml_mappings};
use crate::output::json::{format_json, format_json_run};
use crate::sync::{
    MappingMerge, MappingRow, aggregate_ad_groups, is_project_role, merge_group_mappings,
    resolve_project_id, validate_rows,
};

// ============================================================================
// saml-mappings-file
// ============================================================================

/// Build the group mappings file from the AD groups file. No API calls.
pub fn file(args: &SamlMappingsFileArgs, format: OutputFormat) -> Result<()> {
    let rows = read_ad_group_rows(&args.input)?;
    let groups = aggregate_ad_groups(&rows);

    let mapping_rows: Vec<MappingRow> = groups
        .iter()
        .map(|g| MappingRow {
            group: g.group.clone(),
            role: args.role.clone(),
            projects: g.projects.clone(),
        })
        .collect();
    validate_rows(&mapping_rows)?;

    write_saml_mappings(&args.output, &groups, &args.role)?;
    info!("Wrote {} group mappings to {}", groups.len(), args.output.display());

    let display: Vec<GroupDisplay> = groups.iter().map(GroupDisplay::from).collect();
    match format {
        OutputFormat::Json => println!("{}", format_json(&display)?),
        _ => {
            display.print(format)?;
            eprintln!(
                "{} {} groups from {} rows written to {}",
                "✓".green(),
                groups.len(),
                rows.len(),
                args.output.display()
            );
        }
    }
    Ok(())
}

// ============================================================================
// saml-mappings
// ============================================================================

/// Pick the provider named by `idp` (ID or name), the only one, or ask.
pub fn select_provider(
    providers: &[SamlProviderSummary],
    idp: Option<&str>,
) -> Result<SamlProviderSummary> {
    if let Some(idp) = idp {
        return providers
            .iter()
            .find(|p| p.id == idp || p.name.eq_ignore_ascii_case(idp))
            .cloned()
            .ok_or_else(|| {
                let names: Vec<&str> = providers.iter().map(|p| p.name.as_str()).collect();
                Error::Input(format!(
                    "identity provider '{}' not found (available: {})",
                    idp,
                    names.join(", ")
                ))
            });
    }

    match providers {
        [] => Err(Error::Input("no SAML identity providers are configured".to_string())),
        [only] => Ok(only.clone()),
        _ => {
            let names: Vec<String> = providers
                .iter()
                .map(|p| format!("{} ({})", p.name, p.id))
                .collect();
            let index = Select::with_theme(&ColorfulTheme::default())
                .with_prompt("Identity provider")
                .items(&names)
                .default(0)
                .interact()?;
            Ok(providers[index].clone())
        }
    }
}

/// Project name to ID lookups, remembered for the whole run.
struct ProjectResolver<'a, A: ProjectApi + ?Sized> {
    api: &'a A,
    cache: HashMap<String, Option<String>>,
}

impl<'a, A: ProjectApi + ?Sized> ProjectResolver<'a, A> {
    fn new(api: &'a A) -> Self {
        Self {
            api,
            cache: HashMap::new(),
        }
    }

    async fn resolve(&mut self, name: &str) -> Result<Option<String>> {
        if let Some(cached) = self.cache.get(name) {
            return Ok(cached.clone());
        }
        let hits = self
            .api
            .list_all_projects(&ProjectFilter::by_name(name, None))
            .await?;
        let id = resolve_project_id(name, &hits);
        match &id {
            Some(id) => debug!("Project '{}' is {}", name, id),
            None => warn!(
                "Project '{}' did not resolve to a single project ({} hits); skipping it",
                name,
                hits.len()
            ),
        }
        self.cache.insert(name.to_string(), id.clone());
        Ok(id)
    }
}

/// Resolve rows into mapping inputs and merge them into the provider's list.
///
/// A project-scoped row whose projects all fail to resolve is dropped.
pub async fn plan_mappings<A>(
    api: &A,
    provider: &SamlProvider,
    rows: &[MappingRow],
    update_existing: bool,
) -> Result<MappingMerge>
where
    A: ProjectApi + ?Sized,
{
    let existing: Vec<GroupMappingInput> = provider
        .group_mapping
        .iter()
        .map(GroupMappingInput::from)
        .collect();
    debug!("Provider {} has {} group mappings", provider.name, existing.len());

    let mut resolver = ProjectResolver::new(api);
    let mut desired = Vec::with_capacity(rows.len());
    for row in rows {
        let projects = if is_project_role(&row.role) {
            let mut ids = Vec::new();
            for name in &row.projects {
                if let Some(id) = resolver.resolve(name).await? {
                    if !ids.contains(&id) {
                        ids.push(id);
                    }
                }
            }
            if ids.is_empty() && !row.projects.is_empty() {
                warn!("No projects of {} could be resolved; skipping it", row.group);
                continue;
            }
            // No projects listed: the role applies to every project
            (!ids.is_empty()).then_some(ids)
        } else {
            None
        };

        desired.push(GroupMappingInput {
            provider_group_id: row.group.clone(),
            role: row.role.clone(),
            projects,
        });
    }

    Ok(merge_group_mappings(existing, desired, update_existing))
}

/// Run the saml-mappings command
pub async fn apply(ctx: &CommandContext, args: &SamlMappingsArgs) -> Result<()> {
    let rows = read_mapping_rows(&args.input)?;
    validate_rows(&rows)?;
    if rows.is_empty() {
        eprintln!("No group mappings in {}", args.input.display());
        return Ok(());
    }

    let json = ctx.format == OutputFormat::Json;
    if !args.write && !json {
        dry_run_banner();
    }

    let api = ctx.client.as_ref();
    let providers = api.list_saml_providers().await?;
    debug!("{} identity providers available", providers.len());
    if args.idp.is_none() && providers.len() > 1 && !json {
        let listing: Vec<ProviderDisplay> = providers.iter().map(ProviderDisplay::from).collect();
        listing.print(ctx.format)?;
    }
    let selected = select_provider(&providers, args.idp.as_deref())?;
    info!("Using identity provider {} ({})", selected.name, selected.id);
    let provider = api.get_saml_provider(&selected.id).await?;

    let update_existing = resolve_flag(
        args.update_existing,
        "Replace the role and projects of groups that are already mapped?",
    )?;
    let merge = plan_mappings(api, &provider, &rows, update_existing).await?;

    let display: Vec<MappingDisplay> = merge.mappings.iter().map(MappingDisplay::from).collect();
    if json {
        println!("{}", format_json_run(&display, !args.write)?);
    } else {
        display.print(ctx.format)?;
        eprintln!(
            "{} added, {} updated, {} already mapped",
            merge.added, merge.updated, merge.skipped
        );
    }

    if !args.write {
        return Ok(());
    }
    if merge.added + merge.updated == 0 {
        eprintln!("{} Nothing to change on {}", "○".dimmed(), provider.name);
        return Ok(());
    }
    if !confirm_write(
        &format!("Update the group mappings of {}?", provider.name),
        args.yes,
    )? {
        return Ok(());
    }

    api.update_saml_provider(&UpdateSamlProviderInput {
        id: provider.id.clone(),
        patch: SamlProviderPatch::preserving(&provider, merge.mappings),
    })
    .await?;
    eprintln!("{} Group mappings of {} updated", "✓".green(), provider.name);
    Ok(())
}
