//! Command execution context
//!
//! Loads the configuration once, builds the store stack and hands each
//! command a ready [`OrgChart`].

use crate::cache::CachedOrgStore;
use crate::chart::OrgChart;
use crate::cli::{GlobalOptions, OutputFormat};
use crate::config::Config;
use crate::error::{ConfigError, Error, Result};
use crate::store::RestStore;
use crate::tree::OrgTree;

/// Store stack used by the CLI
pub type CliStore = CachedOrgStore<RestStore>;

/// Context for command execution containing config, chart, and runtime options.
pub struct CommandContext {
    /// Loaded and validated configuration
    pub config: Config,
    /// Chart backed by the cached REST store
    pub chart: OrgChart<CliStore>,
    /// Output format preference
    pub format: OutputFormat,
}

impl CommandContext {
    /// Create a new command context.
    ///
    /// This handles:
    /// - Loading config from path (or default location)
    /// - Applying the `--store-url` override
    /// - Validating the connection settings
    /// - Creating the REST store with its caching wrapper
    ///
    /// # Errors
    /// Returns error if config cannot be loaded or is incomplete.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let mut config = Config::load_at(opts.config_ref())?;
        if let Some(url) = opts.store_url_ref() {
            config.store_url = Some(url.to_string());
        }
        config.validate_store()?;

        let store_url = config
            .store_url
            .clone()
            .ok_or(ConfigError::MissingStoreUrl)?;
        let api_key = config.api_key.clone().ok_or(ConfigError::MissingApiKey)?;

        let rest = RestStore::new(&store_url, &config.table, &api_key)?;
        let store = CachedOrgStore::new(
            rest,
            &store_url,
            &config.table,
            config.cache_ttl(),
            !opts.no_cache,
        );

        let format = opts.resolve_format(&config);
        log::debug!("Using table {} at {}", config.table, store_url);

        Ok(Self {
            config,
            chart: OrgChart::new(store),
            format,
        })
    }

    /// Load the tree, failing when the organization is still empty.
    pub async fn require_tree(&mut self) -> Result<&OrgTree> {
        match self.chart.load().await? {
            Some(tree) => Ok(tree),
            None => Err(Error::Other(
                "The organization is empty. Run `orgtree root <NAME> <TITLE>` to create it."
                    .to_string(),
            )),
        }
    }
}
