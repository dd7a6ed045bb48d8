//! Status command implementation

use colored::Colorize;

use crate::cli::args::GlobalOptions;
use crate::config::Config;
use crate::error::Result;

/// Run the status command to display configuration status
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}\n", "wizsync Configuration Status".bold());

    let config_path = Config::resolve_path(opts.config_ref())?;
    let mut config = match Config::load_from(config_path.clone()) {
        Ok(config) => {
            println!("Config file: {}", config_path.display().to_string().cyan());
            config
        }
        Err(_) => {
            println!("{} Configuration not found", "✗".red());
            println!("  → Run {} to create one", "wizsync init".cyan());
            Config::default()
        }
    };
    opts.apply_to(&mut config);
    println!();

    if config.client_id.is_some() && config.client_secret.is_some() {
        println!("{} Client credentials configured", "✓".green());
    } else {
        println!("{} Client credentials not configured", "✗".red());
        println!("  → Set WIZ_CLIENT_ID/WIZ_CLIENT_SECRET or run 'wizsync init'");
    }

    println!("{} Data center: {}", "○".dimmed(), config.datacenter());
    println!("{} API endpoint: {}", "○".dimmed(), config.api_url().cyan());
    println!("{} Token endpoint: {}", "○".dimmed(), config.auth_url().cyan());

    match &config.token {
        Some(token) if !config.is_token_expired() => {
            let remaining = token.expires_at.signed_duration_since(chrono::Utc::now());
            println!(
                "{} Access token valid (expires in {}h {}m)",
                "✓".green(),
                remaining.num_hours(),
                remaining.num_minutes() % 60
            );
        }
        Some(_) => println!(
            "{} Access token expired (will refresh on next command)",
            "⚠".yellow()
        ),
        None => println!(
            "{} Access token not cached (will authenticate on next command)",
            "○".dimmed()
        ),
    }

    println!();
    Ok(())
}
