//! CLI command definitions and handlers

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
pub use clap_complete::Shell;

use crate::hierarchy::{Cloud, EntityKind};

pub mod archive;
pub mod args;
pub mod completions;
pub mod context;
pub mod init;
pub mod members;
pub mod plan;
pub mod projects;
pub mod saml;
pub mod status;
pub mod structure;

pub use args::{LogLevel, OutputFormat};
pub use context::CommandContext;

/// wizsync - sync cloud hierarchies into Wiz projects and SAML group mappings
#[derive(Parser, Debug)]
#[command(name = "wizsync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, table, json)
    #[arg(
        long,
        global = true,
        env = "WIZSYNC_FORMAT",
        default_value = "pretty",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: OutputFormat,

    /// Service account client ID
    #[arg(long, global = true, env = "WIZ_CLIENT_ID", hide_env_values = true)]
    pub client_id: Option<String>,

    /// Service account client secret
    #[arg(long, global = true, env = "WIZ_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Tenant data center (e.g. us20, eu1)
    #[arg(long, global = true, env = "WIZ_DATACENTER")]
    pub datacenter: Option<String>,

    /// Override the GraphQL endpoint
    #[arg(long, global = true, env = "WIZSYNC_API_URL", hide_env = true)]
    pub api_url: Option<String>,

    /// Override the OAuth token endpoint
    #[arg(long, global = true, env = "WIZSYNC_AUTH_URL", hide_env = true)]
    pub auth_url: Option<String>,

    /// Override config file location
    #[arg(long, global = true, env = "WIZSYNC_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Log verbosity
    #[arg(long, global = true, env = "WIZSYNC_LOG_LEVEL", hide_env = true)]
    pub log_level: Option<LogLevel>,

    /// Enable debug logging
    #[arg(long, global = true, env = "WIZSYNC_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Save credentials and data center to the config file
    Init,

    /// Show authentication and configuration status
    Status,

    /// Display version information
    Version,

    /// Generate shell completions
    #[command(after_help = "\
Examples:
  bash:   wizsync completion bash > /etc/bash_completion.d/wizsync
  zsh:    wizsync completion zsh > \"${fpath[1]}/_wizsync\"
  fish:   wizsync completion fish > ~/.config/fish/completions/wizsync.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Model one management group as folder projects
    Structure(StructureArgs),

    /// Write the projects and AD groups CSV files from cloud hierarchies
    Plan(PlanArgs),

    /// Create or update projects from a projects CSV file
    #[command(name = "create-projects")]
    CreateProjects(CreateProjectsArgs),

    /// Build a SAML group mappings file from an AD groups CSV file (offline)
    #[command(name = "saml-mappings-file")]
    SamlMappingsFile(SamlMappingsFileArgs),

    /// Apply group mappings to a SAML identity provider
    #[command(name = "saml-mappings")]
    SamlMappings(SamlMappingsArgs),

    /// Rename and archive a project and all its descendants
    #[command(name = "archive-projects")]
    ArchiveProjects(ArchiveArgs),

    /// Show the users holding role bindings on a subscription or organization
    Members(MembersArgs),
}

/// Arguments for `structure`
#[derive(Args, Debug)]
#[command(after_help = "EXAMPLES:\n  \
    wizsync structure --root mg-root                 # Dry run, paths to output.txt\n  \
    wizsync structure --root mg-root --name Corp --write --parent-project-id <id>")]
pub struct StructureArgs {
    /// External ID of the root management group
    #[arg(long)]
    pub root: String,

    /// Folder name for the root (defaults to its graph name)
    #[arg(long)]
    pub name: Option<String>,

    /// File the project paths are appended to
    #[arg(long, default_value = "output.txt")]
    pub output: PathBuf,

    /// Create the folder projects
    #[arg(long)]
    pub write: bool,

    /// Existing folder project to create the structure under
    #[arg(long)]
    pub parent_project_id: Option<String>,
}

/// Arguments for `plan`
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Root folder project name for Azure
    #[arg(long, default_value = "Azure")]
    pub azure_root_project: String,

    /// Azure management groups to model, as a JSON list
    #[arg(long, default_value = "[]")]
    pub azure_roots: String,

    /// Root folder project name for GCP
    #[arg(long, default_value = "GCP")]
    pub gcp_root_project: String,

    /// GCP organizations to model, as a JSON list
    #[arg(long, default_value = "[]")]
    pub gcp_roots: String,

    /// Root folder project name for AWS
    #[arg(long, default_value = "AWS")]
    pub aws_root_project: String,

    /// AWS organizations to model, as a JSON list
    #[arg(long, default_value = "[]")]
    pub aws_roots: String,

    /// Identity provider the groups are meant for (recorded in the summary)
    #[arg(long)]
    pub saml_provider: Option<String>,

    /// Role used in group names (Wiz_<project>_<role>)
    #[arg(long, default_value = "PROJECT_READER")]
    pub user_role: String,

    /// Projects CSV file to write
    #[arg(long, default_value = "wiz-projects.csv")]
    pub projects_output: PathBuf,

    /// AD groups CSV file to write
    #[arg(long, default_value = "wiz-ad-groups.csv")]
    pub ad_groups_output: PathBuf,

    /// Do not look up group members
    #[arg(long)]
    pub skip_members: bool,
}

/// Arguments for `create-projects`
#[derive(Args, Debug)]
pub struct CreateProjectsArgs {
    /// Projects CSV file
    #[arg(long, default_value = "wiz-projects.csv")]
    pub input: PathBuf,

    /// File listing the created or updated projects
    #[arg(long, default_value = "created-projects.csv")]
    pub output: PathBuf,

    /// Apply changes (default is a dry run)
    #[arg(long)]
    pub write: bool,

    /// Update projects that already exist (prompted when omitted)
    #[arg(long, action = ArgAction::Set)]
    pub update_existing: Option<bool>,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Arguments for `saml-mappings-file`
#[derive(Args, Debug)]
pub struct SamlMappingsFileArgs {
    /// AD groups CSV file
    #[arg(long, default_value = "wiz-ad-groups.csv")]
    pub input: PathBuf,

    /// Group mappings CSV file to write
    #[arg(long, default_value = "group-mappings-to-create.csv")]
    pub output: PathBuf,

    /// Role granted to every group
    #[arg(long, default_value = "PROJECT_READER")]
    pub role: String,
}

/// Arguments for `saml-mappings`
#[derive(Args, Debug)]
pub struct SamlMappingsArgs {
    /// Group mappings CSV file
    #[arg(long, default_value = "group-mappings-to-create.csv")]
    pub input: PathBuf,

    /// Identity provider ID or name (interactive pick when omitted)
    #[arg(long)]
    pub idp: Option<String>,

    /// Replace the role and projects of groups that are already mapped
    #[arg(long, action = ArgAction::Set)]
    pub update_existing: Option<bool>,

    /// Apply changes (default is a dry run)
    #[arg(long)]
    pub write: bool,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Arguments for `archive-projects`
#[derive(Args, Debug)]
pub struct ArchiveArgs {
    /// ID of the root project
    #[arg(long)]
    pub root: String,

    /// Include projects that are already archived
    #[arg(long)]
    pub include_archived: bool,

    /// Appended to every project name
    #[arg(long, default_value = "")]
    pub name_suffix: String,

    /// Appended to every project slug
    #[arg(long, default_value = "")]
    pub slug_suffix: String,

    /// Archived status to set
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub archive: bool,

    /// Apply changes (default is a dry run)
    #[arg(long)]
    pub write: bool,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Arguments for `members`
#[derive(Args, Debug)]
pub struct MembersArgs {
    /// External ID of the subscription or organization
    #[arg(long)]
    pub scope: String,

    /// Kind of scope
    #[arg(long, value_enum, default_value = "subscription")]
    pub kind: EntityKind,

    /// Cloud the scope belongs to
    #[arg(long, value_enum, default_value = "Azure")]
    pub cloud: Cloud,
}
