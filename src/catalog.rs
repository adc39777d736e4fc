//! Loads the extension catalog: local manifests from the extension directory plus
//! remote manifests fetched from their base URLs.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::Config;
use crate::model::{Extension, Manifest, Origin};

pub const MANIFEST_FILE: &str = "sunbeam.json";

/// Read-only set of extensions, shared by every runner.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    extensions: Vec<Arc<Extension>>,
}

impl Catalog {
    pub fn new(mut extensions: Vec<Extension>) -> Self {
        extensions.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            extensions: extensions.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn load(config: &Config) -> Result<Self> {
        let mut extensions = match config.extension_dir() {
            Some(dir) if dir.is_dir() => load_dir(&dir)?,
            _ => Vec::new(),
        };
        for (name, url) in &config.remotes {
            match fetch_remote(name, url) {
                Ok(ext) => extensions.push(ext),
                Err(err) => warn!(extension = %name, error = %format!("{:#}", err), "skip remote extension"),
            }
        }
        info!(count = extensions.len(), "extensions loaded");
        Ok(Self::new(extensions))
    }

    pub fn extensions(&self) -> &[Arc<Extension>] {
        &self.extensions
    }

    pub fn get(&self, name: &str) -> Option<Arc<Extension>> {
        self.extensions.iter().find(|e| e.name == name).cloned()
    }
}

/// Loads every sub-directory of `dir` holding a manifest. Broken extensions are skipped
/// with a warning so one bad manifest does not hide the rest.
pub fn load_dir(dir: &Path) -> Result<Vec<Extension>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("read extension dir {}", dir.display()))?;

    let mut out = Vec::new();
    for entry in entries {
        let entry = entry.context("read extension dir entry")?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        match load_local(&path) {
            Ok(ext) => out.push(ext),
            Err(err) => warn!(path = %path.display(), error = %format!("{:#}", err), "skip extension"),
        }
    }
    Ok(out)
}

pub fn load_local(root: &Path) -> Result<Extension> {
    let manifest_path = root.join(MANIFEST_FILE);
    let bytes = std::fs::read(&manifest_path)
        .with_context(|| format!("read manifest {}", manifest_path.display()))?;
    let manifest: Manifest = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse manifest {}", manifest_path.display()))?;
    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .context("extension dir has no name")?;
    let root = root
        .canonicalize()
        .with_context(|| format!("resolve {}", root.display()))?;
    Ok(Extension {
        name,
        origin: Origin::Local(root),
        manifest,
    })
}

/// Fetches `GET {base_url}` and reads it as a manifest.
pub fn fetch_remote(name: &str, base_url: &str) -> Result<Extension> {
    let client = reqwest::blocking::Client::builder()
        .user_agent("sunbeam")
        .build()
        .context("build reqwest client")?;
    let manifest: Manifest = client
        .get(base_url)
        .send()
        .with_context(|| format!("GET {}", base_url))?
        .error_for_status()
        .with_context(|| format!("GET {} status", base_url))?
        .json()
        .with_context(|| format!("parse manifest from {}", base_url))?;
    Ok(Extension {
        name: name.to_string(),
        origin: Origin::Remote(base_url.trim_end_matches('/').to_string()),
        manifest,
    })
}
