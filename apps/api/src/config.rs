use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::info;

use crate::matching::{MatchConfig, SynonymTable};

const DEFAULT_RECOVERY_DISPLAY_LIMIT: usize = 5;

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or a value does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// JSON file `{canonical: [aliases...]}` replacing the built-in synonym table.
    pub synonyms_path: Option<PathBuf>,
    pub fuzzy_cutoff: f64,
    /// How many recovery suggestions the report shows up front.
    pub recovery_display_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let anthropic_api_key = lookup("ANTHROPIC_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .context("Required environment variable 'ANTHROPIC_API_KEY' is not set")?;

        let port = lookup("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let fuzzy_cutoff = match lookup("FUZZY_MATCH_CUTOFF") {
            Some(raw) => raw
                .parse::<f64>()
                .context("FUZZY_MATCH_CUTOFF must be a number")?,
            None => MatchConfig::default().fuzzy_cutoff,
        };

        let recovery_display_limit = match lookup("RECOVERY_DISPLAY_LIMIT") {
            Some(raw) => raw
                .parse::<usize>()
                .context("RECOVERY_DISPLAY_LIMIT must be a non-negative integer")?,
            None => DEFAULT_RECOVERY_DISPLAY_LIMIT,
        };

        let config = Config {
            anthropic_api_key,
            port,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            synonyms_path: lookup("SYNONYMS_PATH")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            fuzzy_cutoff,
            recovery_display_limit,
        };

        if let Err(e) = config.match_config().validate() {
            bail!("FUZZY_MATCH_CUTOFF is out of range: {e}");
        }

        Ok(config)
    }

    pub fn match_config(&self) -> MatchConfig {
        MatchConfig {
            fuzzy_cutoff: self.fuzzy_cutoff,
            ..MatchConfig::default()
        }
    }

    /// The configured synonym table, or the built-in one when no file is set.
    pub fn synonym_table(&self) -> Result<SynonymTable> {
        match &self.synonyms_path {
            Some(path) => {
                let table = SynonymTable::from_json_file(path)?;
                info!(path = %path.display(), groups = table.len(), "Loaded synonym table");
                Ok(table)
            }
            None => Ok(SynonymTable::builtin()),
        }
    }
}
