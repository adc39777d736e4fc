//! One extension/command pair's lifecycle:
//! `loading -> form? -> loading -> list | detail`, with reloads looping back to loading.

use std::any::Any;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::dispatch::{self, Executable};
use crate::error::RunError;
use crate::model::{
    Action, ActionKind, Command, CommandInput, Extension, FormInput, Manifest, OnSuccess, Origin,
};

use super::event::{Effect, Job, ScreenId, TaskOutcome};
use super::keys;
use super::view::Screen;
use super::views::chrome;
use super::views::{DetailEvent, DetailView, FormEvent, FormField, FormView, ListEvent, ListView};

mod output;
mod preview;

#[derive(Debug)]
pub(super) enum RunnerState {
    Loading,
    Form(FormView),
    List(ListView),
    Detail(DetailView),
}

/// Where a runner's output comes from.
#[derive(Debug)]
enum Source {
    /// The command, through the dispatcher.
    Dispatch,
    /// A page file read from disk on every run.
    File(PathBuf),
}

pub(super) struct CommandRunner {
    id: ScreenId,
    source: Source,
    /// Bumped on every dispatch; results from older dispatches are dropped.
    generation: u64,
    /// A command dispatch is outstanding.
    in_flight: bool,
    extension: Arc<Extension>,
    command: Command,
    with: BTreeMap<String, CommandInput>,
    query: String,
    width: u16,
    height: u16,
    state: RunnerState,
}

impl CommandRunner {
    pub(super) fn new(
        extension: Arc<Extension>,
        command: Command,
        with: BTreeMap<String, CommandInput>,
    ) -> Self {
        Self {
            id: ScreenId::next(),
            source: Source::Dispatch,
            generation: 0,
            in_flight: false,
            extension,
            command,
            with,
            query: String::new(),
            width: 0,
            height: 0,
            state: RunnerState::Loading,
        }
    }

    /// A runner showing a page file. It belongs to no extension, so its actions can
    /// only open, copy or reload.
    pub(super) fn from_file(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let root = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let extension = Extension {
            name: name.clone(),
            origin: Origin::Local(root),
            manifest: Manifest {
                title: name.clone(),
                ..Manifest::default()
            },
        };
        let command = Command {
            name,
            title: None,
            params: Vec::new(),
            on_success: Some(OnSuccess::PushPage),
            interactive: false,
            env: Vec::new(),
            exec: None,
        };
        let mut runner = Self::new(Arc::new(extension), command, BTreeMap::new());
        runner.source = Source::File(path);
        runner
    }

    fn footer(&self) -> String {
        self.extension.title().to_string()
    }

    /// Literal bindings, i.e. the `with` payload of the next dispatch.
    fn bound_params(&self) -> Map<String, Value> {
        self.with
            .iter()
            .filter_map(|(k, v)| v.value().map(|v| (k.clone(), v.clone())))
            .collect()
    }

    /// Fields for every declared param that still needs a value from the user.
    fn missing_fields(&self) -> Vec<FormField> {
        let mut fields = Vec::new();
        for param in &self.command.params {
            match self.with.get(&param.name) {
                Some(CommandInput::Value(_)) => {}
                Some(CommandInput::Input(input)) => fields.push(FormField::new(&param.name, input)),
                None if param.is_required() => {
                    fields.push(FormField::new(&param.name, &FormInput::for_param(param)))
                }
                None => {}
            }
        }
        fields
    }

    fn set_loading(&mut self, loading: bool) {
        match &mut self.state {
            RunnerState::List(list) => list.loading = loading,
            RunnerState::Detail(detail) => detail.loading = loading,
            RunnerState::Loading | RunnerState::Form(_) => {}
        }
    }

    /// Starts one command cycle: prompt for missing params, or dispatch.
    pub(super) fn run(&mut self) -> Vec<Effect> {
        let fields = self.missing_fields();
        if !fields.is_empty() {
            debug!(command = %self.command.name, fields = fields.len(), "prompt for params");
            self.state = RunnerState::Form(FormView::new(
                self.extension.title(),
                self.command.title(),
                fields,
            ));
            return Vec::new();
        }

        let work: Box<dyn FnOnce() -> TaskOutcome + Send> = match &self.source {
            Source::File(path) => {
                let path = path.clone();
                Box::new(move || TaskOutcome::Output(read_page_file(&path)))
            }
            Source::Dispatch => {
                let params = self.bound_params();
                let executable =
                    match dispatch::resolve(&self.extension, &self.command, &params, &self.query) {
                        Ok(e) => e,
                        Err(err) => return vec![Effect::Error(err.to_string())],
                    };
                match executable {
                    Executable::Interactive(invocation) => return vec![Effect::Exec(invocation)],
                    other => Box::new(move || TaskOutcome::Output(other.execute())),
                }
            }
        };

        self.generation += 1;
        self.in_flight = true;
        match self.state {
            RunnerState::List(_) | RunnerState::Detail(_) => self.set_loading(true),
            RunnerState::Loading | RunnerState::Form(_) => self.state = RunnerState::Loading,
        }
        info!(
            extension = %self.extension.name,
            command = %self.command.name,
            generation = self.generation,
            "dispatch command"
        );
        vec![Effect::Spawn(Job::new(self.id, self.generation, work))]
    }

    fn submit_form(&mut self, values: Map<String, Value>) -> Vec<Effect> {
        for (key, value) in values {
            self.with.insert(key, CommandInput::Value(value));
        }
        self.state = RunnerState::Loading;
        self.run()
    }

    pub(super) fn trigger(&mut self, action: Action) -> Vec<Effect> {
        match action.kind {
            ActionKind::RunCommand {
                command,
                with,
                on_success,
            } => {
                let Some(target) = self.extension.command(&command) else {
                    return vec![Effect::Error(format!("command not found: {}", command))];
                };
                let mut target = target.clone();
                if on_success.is_some() {
                    target.on_success = on_success;
                }
                let runner = CommandRunner::new(self.extension.clone(), target, with);
                vec![Effect::Push(Box::new(runner))]
            }
            ActionKind::OpenUrl { url, application } => vec![Effect::Open {
                target: url,
                application,
            }],
            ActionKind::OpenFile { path, application } => vec![Effect::Open {
                target: path,
                application,
            }],
            ActionKind::CopyText { text } => vec![Effect::Copy(text)],
            ActionKind::ReloadPage { with } => self.reload(with),
        }
    }

    fn handle_list_event(&mut self, event: ListEvent) -> Vec<Effect> {
        match event {
            ListEvent::None => Vec::new(),
            ListEvent::Back => vec![Effect::Pop],
            ListEvent::Trigger { action, .. } => self.trigger(action),
            ListEvent::SelectionChanged => self.preview_effects(),
            ListEvent::QueryChanged => {
                if let RunnerState::List(list) = &self.state {
                    self.query = list.query().to_string();
                }
                self.preview_effects()
            }
        }
    }
}

fn read_page_file(path: &Path) -> Result<Vec<u8>, RunError> {
    std::fs::read(path).map_err(|err| RunError::transport(&format!("read {}", path.display()), err))
}

impl Screen for CommandRunner {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn id(&self) -> ScreenId {
        self.id
    }

    fn title(&self) -> &str {
        match &self.state {
            RunnerState::List(list) => &list.title,
            RunnerState::Detail(detail) => &detail.title,
            RunnerState::Loading | RunnerState::Form(_) => self.command.title(),
        }
    }

    fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        if let RunnerState::Detail(detail) = &mut self.state {
            detail.set_size(width, height);
        }
    }

    fn init(&mut self) -> Vec<Effect> {
        self.run()
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        if keys::is_ctrl(&key, 'r')
            && matches!(self.state, RunnerState::List(_) | RunnerState::Detail(_))
        {
            return self.run();
        }
        match &mut self.state {
            RunnerState::Loading => match key.code {
                KeyCode::Esc => vec![Effect::Pop],
                _ => Vec::new(),
            },
            RunnerState::Form(form) => match form.handle_key(key) {
                FormEvent::None => Vec::new(),
                FormEvent::Cancel => vec![Effect::Pop],
                FormEvent::Submit(values) => self.submit_form(values),
            },
            RunnerState::List(list) => {
                let event = list.handle_key(key);
                self.handle_list_event(event)
            }
            RunnerState::Detail(detail) => match detail.handle_key(key) {
                DetailEvent::None => Vec::new(),
                DetailEvent::Back => vec![Effect::Pop],
                DetailEvent::Trigger(action) => self.trigger(action),
            },
        }
    }

    fn handle_task(&mut self, generation: u64, outcome: TaskOutcome) -> Vec<Effect> {
        if let TaskOutcome::Preview { slot, text } = outcome {
            self.set_preview(slot, text);
            return Vec::new();
        }
        if generation != self.generation {
            debug!(
                command = %self.command.name,
                generation,
                current = self.generation,
                "drop stale result"
            );
            return Vec::new();
        }
        match outcome {
            TaskOutcome::Output(Ok(output)) => {
                self.in_flight = false;
                self.set_loading(false);
                self.handle_output(&output)
            }
            TaskOutcome::Output(Err(err)) => {
                self.in_flight = false;
                self.set_loading(false);
                vec![Effect::Error(err.to_string())]
            }
            TaskOutcome::Preview { .. } | TaskOutcome::Effect(_) => Vec::new(),
        }
    }

    fn reload(&mut self, with: BTreeMap<String, CommandInput>) -> Vec<Effect> {
        self.with.extend(with);
        self.run()
    }

    fn render(&self, frame: &mut ratatui::Frame, area: Rect) {
        match &self.state {
            RunnerState::Loading => {
                chrome::render_loading(frame, area, self.command.title(), &self.footer())
            }
            RunnerState::Form(form) => form.render(frame, area),
            RunnerState::List(list) => list.render(frame, area),
            RunnerState::Detail(detail) => detail.render(frame, area),
        }
    }
}

#[cfg(test)]
#[path = "../tests/tui_shell/runner_tests.rs"]
mod tests;
