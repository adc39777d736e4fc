use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const CONFIG_ENV: &str = "SUNBEAM_CONFIG";
pub const EXTENSION_DIR_ENV: &str = "SUNBEAM_EXTENSION_DIR";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Upper bound for the content area; the terminal size wins when smaller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height: Option<u16>,

    /// Directory holding one sub-directory per local extension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension_dir: Option<PathBuf>,

    /// Remote extensions by name, each the base URL of a re-exposition server.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub remotes: BTreeMap<String, String>,
}

impl Config {
    /// Reads the config from `SUNBEAM_CONFIG` or the user config dir. A missing file
    /// yields defaults.
    pub fn load() -> Result<Self> {
        let path = match std::env::var_os(CONFIG_ENV) {
            Some(p) => PathBuf::from(p),
            None => match dirs::config_dir() {
                Some(dir) => dir.join("sunbeam").join("config.json"),
                None => return Ok(Self::default().with_env_overrides()),
            },
        };
        Ok(Self::read(&path)?.with_env_overrides())
    }

    pub fn read(path: &Path) -> Result<Self> {
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => {
                return Err(err).with_context(|| format!("read config {}", path.display()));
            }
        };
        serde_json::from_slice(&bytes).with_context(|| format!("parse config {}", path.display()))
    }

    fn with_env_overrides(mut self) -> Self {
        if let Some(dir) = std::env::var_os(EXTENSION_DIR_ENV) {
            self.extension_dir = Some(PathBuf::from(dir));
        }
        self
    }

    pub fn extension_dir(&self) -> Option<PathBuf> {
        self.extension_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join("sunbeam").join("extensions")))
    }
}
