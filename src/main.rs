//! wizsync CLI - sync cloud hierarchies into Wiz projects and SAML group mappings

use clap::Parser;
use log::{LevelFilter, debug};

mod cli;
mod client;
mod config;
mod error;
mod hierarchy;
mod models;
mod output;
mod sync;

use cli::args::GlobalOptions;
use cli::{Cli, CommandContext, Commands};
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

/// `RUST_LOG` applies unless `--debug` or `--log-level` is given.
fn init_logging(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    builder.format_timestamp(None);

    if cli.debug {
        builder.filter_level(LevelFilter::Debug);
    } else if let Some(level) = cli.log_level {
        builder.filter_level(level.into());
    }
    builder.init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);
    debug!("Parsed command {:?}", cli.command);

    let opts = GlobalOptions::from_cli(&cli);

    match &cli.command {
        Commands::Init => cli::init::run(&opts).await,
        Commands::Status => cli::status::run(&opts),
        Commands::Version => {
            println!("wizsync version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Completion { shell } => {
            cli::completions::run(*shell);
            Ok(())
        }
        Commands::SamlMappingsFile(args) => cli::saml::file(args, opts.format),
        Commands::Structure(args) => {
            let ctx = CommandContext::new(&opts).await?;
            cli::structure::run(&ctx, args).await
        }
        Commands::Plan(args) => {
            let ctx = CommandContext::new(&opts).await?;
            cli::plan::run(&ctx, args).await
        }
        Commands::CreateProjects(args) => {
            let ctx = CommandContext::new(&opts).await?;
            cli::projects::run(&ctx, args).await
        }
        Commands::SamlMappings(args) => {
            let ctx = CommandContext::new(&opts).await?;
            cli::saml::apply(&ctx, args).await
        }
        Commands::ArchiveProjects(args) => {
            let ctx = CommandContext::new(&opts).await?;
            cli::archive::run(&ctx, args).await
        }
        Commands::Members(args) => {
            let ctx = CommandContext::new(&opts).await?;
            cli::members::run(&ctx, args).await
        }
    }
}
