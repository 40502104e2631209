//! Deployment configuration — `convoy.yaml` plus CLI overrides.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Project config filename looked up in the working directory.
pub const CONFIG_FILENAME: &str = "convoy.yaml";

/// Ledger used for key generation when none is configured.
pub const DEFAULT_LEDGER: &str = "ethereum";

/// Participant count when none is configured.
pub const DEFAULT_PARTICIPANTS: u32 = 4;

/// Keys filename written by `autonomy generate-key`.
pub const DEFAULT_KEYS_FILE: &str = "keys.json";

/// Deployment build directory produced by `autonomy deploy build`.
pub const DEFAULT_BUILD_DIR: &str = "abci_build";

/// On-disk config file shape. Every field is optional; CLI flags override
/// whatever the file provides.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Service id to fetch, e.g. `valory/hello_world`.
    pub service: Option<String>,
    /// Local directory the fetched service is aliased to.
    pub alias: Option<String>,
    /// Ledger passed to key generation.
    pub ledger: Option<String>,
    /// Number of participant keys to generate.
    pub participants: Option<u32>,
    /// Keys file written by key generation, relative to the alias dir.
    pub keys_file: Option<String>,
    /// Deployment build directory, relative to the alias dir.
    pub build_dir: Option<String>,
}

impl ConfigFile {
    /// Load `convoy.yaml` from `dir`. A missing file yields defaults; a
    /// file that exists but cannot be read or parsed is an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is unreadable or invalid.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILENAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))
    }
}

/// Fully-resolved deployment configuration.
#[derive(Debug, Clone)]
pub struct DeployConfig {
    /// Service id to fetch.
    pub service: String,
    /// Local directory the fetched service is aliased to.
    pub alias: String,
    /// Ledger passed to key generation.
    pub ledger: String,
    /// Number of participant keys to generate.
    pub participants: u32,
    /// Keys file written by key generation, relative to the alias dir.
    pub keys_file: String,
    /// Deployment build directory, relative to the alias dir.
    pub build_dir: String,
    /// Whether to run the deployment after building it.
    pub run_deployment: bool,
}
