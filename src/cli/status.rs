//! Status command implementation

use colored::Colorize;

use crate::cli::GlobalOptions;
use crate::config::Config;
use crate::error::Result;

/// Run the status command to display configuration status
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}\n", "orgtree Configuration Status".bold());

    let config = match Config::load_at(opts.config_ref()) {
        Ok(config) => config,
        Err(_) => {
            println!("{} Configuration not found", "✗".red());
            println!();
            println!(
                "Run {} to create a configuration file.",
                "orgtree init".cyan()
            );
            println!();
            return Ok(());
        }
    };

    let config_path = Config::resolve_path(opts.config_ref())?;
    println!("Config file: {}", config_path.display().to_string().cyan());
    println!();

    match (opts.store_url_ref(), config.store_url.as_deref()) {
        (Some(url), _) => println!(
            "{} Database: {} {}",
            "✓".green(),
            url,
            "(via --store-url)".dimmed()
        ),
        (None, Some(url)) if !url.is_empty() => println!("{} Database: {}", "✓".green(), url),
        _ => {
            println!("{} Database URL not configured", "✗".red());
            println!("  → Run 'orgtree init' to configure");
        }
    }

    if config.api_key.as_deref().is_some_and(|k| !k.is_empty()) {
        println!("{} API key configured", "✓".green());
    } else {
        println!("{} API key not configured", "✗".red());
        println!("  → Run 'orgtree init' to configure");
    }

    println!("{} Table: {}", "○".dimmed(), config.table);
    println!("{} Contact domain: {}", "○".dimmed(), config.contact_domain);
    println!(
        "{} Cache lifetime: {}s{}",
        "○".dimmed(),
        config.preferences.cache_ttl_secs,
        if opts.no_cache {
            " (bypassed via --no-cache)"
        } else {
            ""
        }
    );
    println!();

    Ok(())
}
