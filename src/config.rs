use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::entrez::{DEFAULT_DATABASE, DEFAULT_ENDPOINT};
use crate::transcript::{HgncPrefix, PopulateOptions};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntrezConfig {
    pub endpoint: String,
    pub database: String,
    pub api_key: Option<String>,
}

impl Default for EntrezConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogConfig {
    pub dir: PathBuf,
    pub file_name: String,
    pub file_enabled: bool,
    pub console_level: String,
    pub file_level: String,
    pub max_bytes: u64,
    pub backups: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("logs"),
            file_name: "genbank_seqkit.log".to_string(),
            file_enabled: true,
            console_level: "debug".to_string(),
            file_level: "debug".to_string(),
            max_bytes: 500_000,
            backups: 2,
        }
    }
}

impl LogConfig {
    #[must_use]
    pub fn file_path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeqkitConfig {
    pub entrez: EntrezConfig,
    pub logging: LogConfig,
    pub data_dir: PathBuf,
    pub hgnc_prefix: HgncPrefix,
    pub trace_normalization: bool,
}

impl Default for SeqkitConfig {
    fn default() -> Self {
        Self {
            entrez: EntrezConfig::default(),
            logging: LogConfig::default(),
            data_dir: PathBuf::from("test_data"),
            hgnc_prefix: HgncPrefix::default(),
            trace_normalization: false,
        }
    }
}

impl SeqkitConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise use defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Feature-walk options derived from this configuration.
    #[must_use]
    pub fn populate_options(&self) -> PopulateOptions {
        PopulateOptions {
            hgnc_prefix: self.hgnc_prefix,
            trace_normalization: self.trace_normalization,
        }
    }

    fn validate(&self) -> Result<()> {
        let endpoint = &self.entrez.endpoint;
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            bail!("invalid Entrez endpoint '{endpoint}': expected an http(s) URL");
        }

        if self.entrez.database.trim().is_empty() {
            bail!("Entrez database must not be empty");
        }

        if let Some(key) = &self.entrez.api_key {
            if key.trim().is_empty() {
                bail!("Entrez API key must not be empty when present");
            }
        }

        for (name, level) in [
            ("consoleLevel", &self.logging.console_level),
            ("fileLevel", &self.logging.file_level),
        ] {
            level
                .parse::<tracing::Level>()
                .with_context(|| format!("invalid log level for '{name}': '{level}'"))?;
        }

        if self.logging.max_bytes == 0 {
            bail!("logging maxBytes must be greater than zero");
        }

        Ok(())
    }
}
