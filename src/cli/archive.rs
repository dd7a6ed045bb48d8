//! Archive-projects command

use colored::Colorize;

use crate::cli::context::{confirm_write, dry_run_banner};
use crate::cli::{ArchiveArgs, CommandContext, OutputFormat};
use crate::error::{Error, Result};
use crate::models::ArchiveDisplay;
use crate::output::Formattable;
use crate::output::json::format_json_run;
use crate::sync::{ArchiveSettings, apply_archive, plan_archive, pull_project_tree};

/// Run the archive-projects command
pub async fn run(ctx: &CommandContext, args: &ArchiveArgs) -> Result<()> {
    let api = ctx.client.as_ref();
    let json = ctx.format == OutputFormat::Json;
    if !args.write && !json {
        dry_run_banner();
    }

    let trees = pull_project_tree(api, &args.root, args.include_archived).await?;
    if trees.is_empty() {
        return Err(Error::Input(format!(
            "project {} not found{}",
            args.root,
            if args.include_archived {
                ""
            } else {
                " (use --include-archived for archived projects)"
            }
        )));
    }

    if !json {
        for tree in &trees {
            for line in tree.outline() {
                eprintln!("{}", line);
            }
        }
        eprintln!();
    }

    let settings = ArchiveSettings {
        name_suffix: args.name_suffix.clone(),
        slug_suffix: args.slug_suffix.clone(),
        archived: args.archive,
    };
    let plan = plan_archive(&trees, &settings);
    let display: Vec<ArchiveDisplay> = plan.iter().map(ArchiveDisplay::from).collect();

    if json {
        println!("{}", format_json_run(&display, !args.write)?);
    } else {
        display.print(ctx.format)?;
    }

    if !args.write {
        return Ok(());
    }
    if !confirm_write(&format!("Update {} projects?", plan.len()), args.yes)? {
        return Ok(());
    }

    let updated = apply_archive(api, &plan).await?;
    eprintln!("{} Updated {} projects", "✓".green(), updated);
    Ok(())
}
