use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::params::CommandInput;

/// Where an extension's commands execute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Origin {
    /// Extension directory on disk; commands run as local processes rooted here.
    Local(PathBuf),
    /// Base URL of a re-exposed extension; commands are `POST {base}/{command}`.
    Remote(String),
}

impl Origin {
    pub fn is_remote(&self) -> bool {
        matches!(self, Origin::Remote(_))
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Environment variables every command of the extension requires.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requirements: Vec<Requirement>,

    #[serde(default)]
    pub root_items: Vec<RootItem>,

    #[serde(default)]
    pub commands: Vec<Command>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirement {
    pub which: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_page: Option<String>,
}

impl Requirement {
    /// True when the binary can be found on `PATH`.
    pub fn is_met(&self) -> bool {
        let Some(path) = std::env::var_os("PATH") else {
            return false;
        };
        std::env::split_paths(&path).any(|dir| dir.join(&self.which).is_file())
    }
}

/// A shortcut to a command exposed on the root screen.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootItem {
    pub title: String,
    pub command: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub with: BTreeMap<String, CommandInput>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    #[default]
    String,
    Boolean,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandParam {
    pub name: String,

    #[serde(rename = "type", default)]
    pub kind: ParamType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Optional params without a default are left out of the payload instead of prompted.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
}

impl CommandParam {
    pub fn is_required(&self) -> bool {
        !self.optional && self.default.is_none()
    }
}

/// What the shell does with a command's output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OnSuccess {
    PushPage,
    ReloadPage,
    OpenUrl,
    CopyText,
    Quit,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<CommandParam>,

    /// Absent means the shell exits once the command completes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_success: Option<OnSuccess>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub interactive: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<String>,

    /// Shell command line for local extensions; `{{name}}` expands to a quoted param value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exec: Option<String>,
}

impl Command {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }
}

/// A loaded extension. Shared read-only between the catalog and every runner.
#[derive(Clone, Debug)]
pub struct Extension {
    pub name: String,
    pub origin: Origin,
    pub manifest: Manifest,
}

impl Extension {
    pub fn title(&self) -> &str {
        if self.manifest.title.is_empty() {
            &self.name
        } else {
            &self.manifest.title
        }
    }

    pub fn command(&self, name: &str) -> Option<&Command> {
        self.manifest.commands.iter().find(|c| c.name == name)
    }

    pub fn unmet_requirements(&self) -> Vec<&Requirement> {
        self.manifest
            .requirements
            .iter()
            .filter(|r| !r.is_met())
            .collect()
    }
}
