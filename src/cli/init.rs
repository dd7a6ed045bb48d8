//! Init command implementation

use colored::Colorize;
use dialoguer::{Input, Password, theme::ColorfulTheme};

use crate::cli::args::GlobalOptions;
use crate::client::{AuthApi, Credentials, WizClient};
use crate::config::{CachedToken, Config, DEFAULT_DATACENTER};
use crate::error::Result;

/// Run the init command
///
/// Values given as flags or environment variables are used as prompt defaults.
pub async fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}", "Welcome to wizsync!".bold().green());
    println!("Let's set up your Wiz service account.\n");

    let theme = ColorfulTheme::default();
    let mut config = Config::load_at(opts.config_ref()).unwrap_or_default();

    let mut client_id_prompt = Input::<String>::with_theme(&theme).with_prompt("Client ID");
    if let Some(id) = opts.client_id.clone().or_else(|| config.client_id.clone()) {
        client_id_prompt = client_id_prompt.default(id);
    }
    let client_id = client_id_prompt.interact_text()?;

    let client_secret = match &opts.client_secret {
        Some(secret) => secret.clone(),
        None => Password::with_theme(&theme)
            .with_prompt("Client secret")
            .interact()?,
    };

    let datacenter: String = Input::with_theme(&theme)
        .with_prompt("Data center")
        .default(
            opts.datacenter
                .clone()
                .or_else(|| config.datacenter.clone())
                .unwrap_or_else(|| DEFAULT_DATACENTER.to_string()),
        )
        .interact_text()?;

    config.client_id = Some(client_id.clone());
    config.client_secret = Some(client_secret.clone());
    config.datacenter = Some(datacenter);
    if opts.api_url.is_some() {
        config.api_url = opts.api_url.clone();
    }
    if opts.auth_url.is_some() {
        config.auth_url = opts.auth_url.clone();
    }

    println!("\n{}", "Authenticating...".cyan());
    let client = WizClient::new(
        config.api_url(),
        config.auth_url(),
        Some(Credentials {
            client_id: client_id.clone(),
            client_secret: client_secret.clone(),
        }),
    )?;
    let token = client.authenticate(&client_id, &client_secret).await?;
    println!("{}", "✓ Authentication successful!".green());

    config.token = Some(CachedToken::from(token));
    config.save_at(opts.config_ref())?;

    let config_path = Config::resolve_path(opts.config_ref())?;
    println!(
        "\n{} Configuration saved to: {}",
        "✓".green(),
        config_path.display()
    );
    println!("  Data center: {}", config.datacenter().bold());

    println!("\n{}", "You're all set! Try running:".bold());
    println!("  {} - Show configuration status", "wizsync status".cyan());
    println!(
        "  {} - Inspect a management group",
        "wizsync structure --root <id>".cyan()
    );

    Ok(())
}
