//! Init command implementation

use colored::Colorize;
use dialoguer::{Input, Password, theme::ColorfulTheme};

use crate::cli::GlobalOptions;
use crate::config::Config;
use crate::error::Result;
use crate::store::{OrgStore, RestStore};
use crate::tree::ops;

/// Run the init command
///
/// Existing values are offered as defaults, so re-running init only changes
/// what the user retypes.
pub async fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}", "Welcome to orgtree!".bold().green());
    println!("Let's connect to the database holding your organization chart.\n");

    let mut config = Config::load_at(opts.config_ref()).unwrap_or_default();
    let theme = ColorfulTheme::default();

    let store_url: String = match opts.store_url_ref() {
        Some(url) => url.to_string(),
        None => {
            let mut input = Input::<String>::with_theme(&theme).with_prompt("Database URL");
            if let Some(ref current) = config.store_url {
                input = input.default(current.clone());
            }
            input.interact_text()?
        }
    };

    let api_key: String = Password::with_theme(&theme)
        .with_prompt("API key")
        .interact()?;

    let table: String = Input::with_theme(&theme)
        .with_prompt("Table")
        .default(config.table.clone())
        .interact_text()?;

    let contact_domain: String = Input::with_theme(&theme)
        .with_prompt("Contact domain")
        .default(config.contact_domain.clone())
        .interact_text()?;

    config.store_url = Some(store_url.trim().to_string());
    config.api_key = Some(api_key);
    config.table = table;
    config.contact_domain = contact_domain;
    config.validate_store()?;

    println!("\n{}", "Checking connection...".cyan());
    let store = RestStore::new(
        config.store_url.as_deref().unwrap_or_default(),
        &config.table,
        config.api_key.as_deref().unwrap_or_default(),
    )?;
    match store.fetch_tree().await? {
        Some(root) => println!(
            "{} Found an organization of {} people headed by {}",
            "✓".green(),
            ops::node_count(&root),
            root.name.bold()
        ),
        None => println!("{} Connected; the table is empty", "✓".green()),
    }

    config.save_at(opts.config_ref())?;

    let config_path = Config::resolve_path(opts.config_ref())?;
    println!(
        "\n{} Configuration saved to: {}",
        "✓".green(),
        config_path.display()
    );

    println!("\n{}", "You're all set! Try running:".bold());
    println!("  {} - Show configuration status", "orgtree status".cyan());
    println!("  {} - Show the organization", "orgtree show".cyan());

    Ok(())
}
