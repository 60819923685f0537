//! Application settings and scenario file loading.

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use config::{Config, Environment, File as ConfigFile};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tokensim_engine::{NamedScenario, ScenarioConfig};
use tracing::debug;

/// Environment variable prefix, e.g. `TOKENSIM_LOG_LEVEL`.
pub const ENV_PREFIX: &str = "TOKENSIM";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
    Table,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: String,
    /// `pretty` or `compact`
    pub log_format: String,
    pub output_format: OutputFormat,
    pub pretty_json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            log_format: "compact".to_string(),
            output_format: OutputFormat::Json,
            pretty_json: true,
        }
    }
}

impl AppConfig {
    /// Defaults, then the optional settings file, then `TOKENSIM_*` variables.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = config_path {
            if !path.exists() {
                bail!(
                    "Configuration file {} not found (specified via --config)",
                    path.display()
                );
            }
            builder = builder.add_source(ConfigFile::from(path));
        }

        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX));

        let config: AppConfig = builder
            .build()
            .context("failed to read configuration")?
            .try_deserialize()
            .context("invalid configuration values")?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        match self.log_format.as_str() {
            "pretty" | "compact" => Ok(()),
            other => bail!("log_format must be 'pretty' or 'compact', got '{other}'"),
        }
    }
}

fn parse_file<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario file {}", path.display()))?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str(&raw)
            .with_context(|| format!("failed to parse TOML scenario {}", path.display())),
        Some("json") | None => serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse JSON scenario {}", path.display())),
        Some(other) => bail!(
            "unsupported scenario file extension '{other}' for {} (expected json or toml)",
            path.display()
        ),
    }
}

/// Load a scenario file. A missing or blank `name` falls back to the file stem.
pub fn load_scenario(path: &Path) -> Result<NamedScenario> {
    let mut scenario: NamedScenario = parse_file(path)?;
    if scenario.name.trim().is_empty() {
        scenario.name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("scenario")
            .to_string();
    }
    debug!("Loaded scenario '{}' from {}", scenario.name, path.display());
    Ok(scenario)
}

/// Load a scenario file, keeping only its configuration.
pub fn load_scenario_config(path: &Path) -> Result<ScenarioConfig> {
    parse_file(path)
}
