//! Global CLI options shared across all commands

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;

/// Global CLI options passed to all command handlers.
///
/// # Precedence
///
/// CLI flag > environment variable > config file > default. This struct
/// captures the CLI/env layer; config file values are folded in by
/// [`GlobalOptions::resolve_format`] and `CommandContext`.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Output format, if given on the command line
    pub format: Option<OutputFormat>,

    /// Custom config file path (defaults to ~/.orgtree/config.yaml)
    pub config: Option<String>,

    /// Database URL override
    pub store_url: Option<String>,

    /// Bypass the snapshot cache
    pub no_cache: bool,
}

impl GlobalOptions {
    /// Called once in main.rs after parsing.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            config: cli.config.clone(),
            store_url: cli.store_url.clone(),
            no_cache: cli.no_cache,
        }
    }

    pub fn config_ref(&self) -> Option<&str> {
        self.config.as_deref()
    }

    pub fn store_url_ref(&self) -> Option<&str> {
        self.store_url.as_deref()
    }

    /// Format for commands that never read the config file.
    pub fn format_or_default(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }

    /// Flag first, then the config preference, then the default.
    pub fn resolve_format(&self, config: &Config) -> OutputFormat {
        self.format
            .or_else(|| {
                config
                    .preferences
                    .format
                    .as_deref()
                    .and_then(OutputFormat::from_name)
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_options_accessors() {
        let opts = GlobalOptions {
            format: Some(OutputFormat::Json),
            config: Some("/custom/path".to_string()),
            store_url: Some("http://localhost:54321".to_string()),
            no_cache: true,
        };

        assert_eq!(opts.config_ref(), Some("/custom/path"));
        assert_eq!(opts.store_url_ref(), Some("http://localhost:54321"));
        assert_eq!(opts.format_or_default(), OutputFormat::Json);
        assert!(opts.no_cache);
    }

    #[test]
    fn test_resolve_format_precedence() {
        let mut config = Config::default();
        config.preferences.format = Some("table".to_string());

        let flagged = GlobalOptions {
            format: Some(OutputFormat::Json),
            ..Default::default()
        };
        assert_eq!(flagged.resolve_format(&config), OutputFormat::Json);

        let unflagged = GlobalOptions::default();
        assert_eq!(unflagged.resolve_format(&config), OutputFormat::Table);
        assert_eq!(
            unflagged.resolve_format(&Config::default()),
            OutputFormat::Pretty
        );
    }
}
