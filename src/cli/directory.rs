//! Contact and location commands
//!
//! These work offline: only the optional contact domain is read from the
//! config file.

use serde::Serialize;

use crate::cli::{GlobalOptions, OutputFormat};
use crate::config::Config;
use crate::directory::{DEFAULT_CONTACT_DOMAIN, contact_handle, location_code};
use crate::error::{ConfigError, Error, Result};
use crate::output::format_json;

#[derive(Serialize)]
struct ContactOutput<'a> {
    name: &'a str,
    contact: String,
}

#[derive(Serialize)]
struct LocationOutput<'a> {
    name: &'a str,
    title: &'a str,
    location: String,
}

/// Run the contact command
pub fn contact(opts: &GlobalOptions, name: &str) -> Result<()> {
    let (domain, format) = match Config::load_at(opts.config_ref()) {
        Ok(config) => (config.contact_domain.clone(), opts.resolve_format(&config)),
        Err(Error::Config(ConfigError::NotFound)) => (
            DEFAULT_CONTACT_DOMAIN.to_string(),
            opts.format_or_default(),
        ),
        Err(e) => return Err(e),
    };

    let contact = contact_handle(name, &domain);
    match format {
        OutputFormat::Json => println!("{}", format_json(&ContactOutput { name, contact })?),
        _ => println!("{}", contact),
    }
    Ok(())
}

/// Run the location command
pub fn location(opts: &GlobalOptions, name: &str, title: &str) -> Result<()> {
    let location = location_code(name, title);
    match opts.format_or_default() {
        OutputFormat::Json => println!(
            "{}",
            format_json(&LocationOutput {
                name,
                title,
                location
            })?
        ),
        _ => println!("{}", location),
    }
    Ok(())
}
