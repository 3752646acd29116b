use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::predicates::PredicateDictionary;

pub const DEFAULT_ACCEPT: &str = "application/sparql-results+json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// TOML-backed client configuration: which endpoint to talk to, which query
/// templates to use and which optional follow-up queries to run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    #[serde(default)]
    pub connection: ConnectionConfig,
    /// Per-axis template overrides, keyed by axis name (`document`,
    /// `bnode`, `documentUri`, `inverse`, `inverseSameAs`).
    #[serde(default)]
    pub queries: BTreeMap<String, String>,
    #[serde(default)]
    pub do_inverse: bool,
    #[serde(default)]
    pub do_inverse_same_as: bool,
    /// Replacement predicate dictionary. The bundled one is used when unset.
    #[serde(default)]
    pub dictionary: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionConfig {
    #[serde(default)]
    pub endpoint: String,
    #[serde(default = "default_accept")]
    pub accept: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Extra query-string parameters sent with every request.
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            accept: default_accept(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            params: BTreeMap::new(),
        }
    }
}

fn default_accept() -> String {
    DEFAULT_ACCEPT.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl ClientConfig {
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("Failed to parse client config")
    }

    /// Load the dictionary named by `dictionary`, relative to `base` when the
    /// path is relative. `None` means the bundled dictionary applies.
    pub fn load_dictionary(&self, base: &Path) -> anyhow::Result<Option<PredicateDictionary>> {
        let Some(path) = &self.dictionary else {
            return Ok(None);
        };
        let path = if path.is_relative() {
            base.join(path)
        } else {
            path.clone()
        };
        let dictionary = PredicateDictionary::load(&path)
            .with_context(|| format!("Failed to load predicate dictionary: {}", path.display()))?;
        Ok(Some(dictionary))
    }
}

/// Load and parse a TOML client config file.
pub fn load_config(path: &Path) -> anyhow::Result<ClientConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    ClientConfig::from_toml_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}
