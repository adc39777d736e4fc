use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use serde_json::Value;

use crate::catalog::Catalog;
use crate::model::{Action, ActionKind, CommandInput, Extension, ListItem, RootItem};

use super::event::{Effect, ScreenId};
use super::runner::CommandRunner;
use super::view::Screen;
use super::views::{ListEvent, ListView};

pub(super) const ROOT_TITLE: &str = "Sunbeam";

/// Entry list of every extension's root items.
pub(super) struct RootScreen {
    id: ScreenId,
    list: ListView,
    /// Item id -> owning extension.
    owners: HashMap<String, Arc<Extension>>,
}

impl RootScreen {
    pub(super) fn new(catalog: &Catalog) -> Self {
        let mut items = Vec::new();
        let mut owners = HashMap::new();
        for extension in catalog.extensions() {
            for (idx, root_item) in extension.manifest.root_items.iter().enumerate() {
                let id = format!("{}/{}", extension.name, idx);
                items.push(root_list_item(&id, extension, root_item));
                owners.insert(id, extension.clone());
            }
        }
        items.sort_by(|a, b| a.title.cmp(&b.title));

        let footer = format!("{} extensions", catalog.extensions().len());
        let mut list = ListView::new(ROOT_TITLE, &footer);
        list.set_items(items);
        Self {
            id: ScreenId::next(),
            list,
            owners,
        }
    }

    fn open(&self, item_id: &str, action: Action) -> Vec<Effect> {
        match action.kind {
            ActionKind::RunCommand {
                command,
                with,
                on_success,
            } => {
                let Some(extension) = self.owners.get(item_id) else {
                    return vec![Effect::Error(format!("unknown item: {}", item_id))];
                };
                let Some(target) = extension.command(&command) else {
                    return vec![Effect::Error(format!("command not found: {}", command))];
                };
                let mut target = target.clone();
                if on_success.is_some() {
                    target.on_success = on_success;
                }
                vec![Effect::Push(Box::new(CommandRunner::new(
                    extension.clone(),
                    target,
                    with,
                )))]
            }
            ActionKind::CopyText { text } => vec![Effect::Copy(text)],
            ActionKind::OpenUrl { url, application } => vec![Effect::Open {
                target: url,
                application,
            }],
            ActionKind::OpenFile { path, application } => vec![Effect::Open {
                target: path,
                application,
            }],
            ActionKind::ReloadPage { .. } => Vec::new(),
        }
    }
}

fn root_list_item(id: &str, extension: &Extension, root_item: &RootItem) -> ListItem {
    let open = Action::new(ActionKind::RunCommand {
        command: root_item.command.clone(),
        with: root_item.with.clone(),
        on_success: None,
    })
    .with_title("Open Command")
    .with_shortcut("enter");
    let copy = Action::new(ActionKind::CopyText {
        text: shortcut_line(&extension.name, &root_item.command, &root_item.with),
    })
    .with_title("Copy Shortcut")
    .with_shortcut("ctrl+y");

    ListItem {
        id: Some(id.to_string()),
        title: root_item.title.clone(),
        subtitle: Some(extension.title().to_string()),
        actions: vec![open, copy],
        ..ListItem::default()
    }
}

/// The CLI line that runs the same command directly.
pub(super) fn shortcut_line(
    extension: &str,
    command: &str,
    with: &BTreeMap<String, CommandInput>,
) -> String {
    let mut args = vec![
        "sunbeam".to_string(),
        "run".to_string(),
        quote(extension),
        quote(command),
    ];
    for (name, input) in with {
        let value = match input.value() {
            Some(Value::String(s)) => quote(s),
            Some(Value::Bool(b)) => b.to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => continue,
        };
        args.push(format!("--param {}={}", name, value));
    }
    args.join(" ")
}

fn quote(s: &str) -> String {
    shlex::try_quote(s)
        .map(|q| q.into_owned())
        .unwrap_or_else(|_| s.to_string())
}

impl Screen for RootScreen {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn id(&self) -> ScreenId {
        self.id
    }

    fn title(&self) -> &str {
        &self.list.title
    }

    fn set_size(&mut self, _width: u16, _height: u16) {}

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        match self.list.handle_key(key) {
            ListEvent::Back => vec![Effect::Pop],
            ListEvent::Trigger { item_id, action } => self.open(&item_id, action),
            ListEvent::None | ListEvent::SelectionChanged | ListEvent::QueryChanged => Vec::new(),
        }
    }

    fn render(&self, frame: &mut ratatui::Frame, area: Rect) {
        self.list.render(frame, area);
    }
}

#[cfg(test)]
#[path = "../tests/tui_shell/root_tests.rs"]
mod tests;
