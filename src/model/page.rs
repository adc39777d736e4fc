use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::extension::OnSuccess;
use super::params::CommandInput;

/// A screen description returned by a command.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Page {
    List {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        list: ListPage,
    },
    Detail {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        detail: DetailPage,
    },
}

impl Page {
    pub fn title(&self) -> Option<&str> {
        match self {
            Page::List { title, .. } | Page::Detail { title, .. } => {
                title.as_deref().filter(|t| !t.is_empty())
            }
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPage {
    #[serde(default)]
    pub items: Vec<ListItem>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub show_preview: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empty_text: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accessories: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Action>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<Preview>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetailPage {
    pub preview: Preview,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Action>,
}

/// Preview content: literal text, or a command whose stdout becomes the text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Preview {
    Text { text: String },
    Command(PreviewSpec),
}

/// Which command to run, with which params, to produce preview text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PreviewSpec {
    pub command: String,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub with: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Key binding such as `ctrl+y`; the first action of a screen is also bound to enter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortcut: Option<String>,

    #[serde(flatten)]
    pub kind: ActionKind,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ActionKind {
    RunCommand {
        command: String,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        with: BTreeMap<String, CommandInput>,
        #[serde(
            default,
            rename = "onSuccess",
            skip_serializing_if = "Option::is_none"
        )]
        on_success: Option<OnSuccess>,
    },
    OpenUrl {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        application: Option<String>,
    },
    OpenFile {
        path: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        application: Option<String>,
    },
    CopyText {
        text: String,
    },
    ReloadPage {
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        with: BTreeMap<String, CommandInput>,
    },
}

impl Action {
    pub fn new(kind: ActionKind) -> Self {
        Self {
            title: None,
            shortcut: None,
            kind,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_shortcut(mut self, shortcut: impl Into<String>) -> Self {
        self.shortcut = Some(shortcut.into());
        self
    }

    pub fn title(&self) -> &str {
        if let Some(title) = self.title.as_deref() {
            return title;
        }
        match &self.kind {
            ActionKind::RunCommand { .. } => "Run Command",
            ActionKind::OpenUrl { .. } => "Open URL",
            ActionKind::OpenFile { .. } => "Open File",
            ActionKind::CopyText { .. } => "Copy Text",
            ActionKind::ReloadPage { .. } => "Reload",
        }
    }
}
