use std::collections::BTreeMap;
use std::io;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self as term, KeyEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::widgets::{Block, BorderType, Borders};
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::dispatch::Invocation;
use crate::model::CommandInput;

use super::desktop::{Desktop, SystemDesktop};
use super::error_screen::ErrorScreen;
use super::event::{CONTROLLER, Effect, Event, Job, TaskEvent, TaskOutcome};
use super::keys;
use super::root::RootScreen;
use super::runner::CommandRunner;
use super::view::Screen;

mod event_loop;
mod render;
mod runtime;

pub(super) use runtime::run;

/// Navigation controller: owns the screen stack and applies screen effects.
pub(super) struct App {
    frames: Vec<Box<dyn Screen>>,
    width: u16,
    height: u16,
    max_width: Option<u16>,
    max_height: Option<u16>,
    tx: Sender<Event>,
    desktop: Arc<dyn Desktop>,

    pub(super) quit: bool,
    /// Printed after the terminal is restored.
    pub(super) exit_message: Option<String>,
    /// Run attached once the UI is gone; its exit code becomes ours.
    pub(super) exit_exec: Option<Invocation>,
}

impl App {
    pub(super) fn new(
        tx: Sender<Event>,
        desktop: Arc<dyn Desktop>,
        max_width: Option<u16>,
        max_height: Option<u16>,
    ) -> Self {
        Self {
            frames: Vec::new(),
            width: 0,
            height: 0,
            max_width,
            max_height,
            tx,
            desktop,
            quit: false,
            exit_message: None,
            exit_exec: None,
        }
    }

    pub(super) fn top(&self) -> Option<&dyn Screen> {
        self.frames.last().map(|f| f.as_ref())
    }

    /// Size available to a screen: the terminal minus the border, clamped to the
    /// configured maximum.
    pub(super) fn content_size(&self) -> (u16, u16) {
        let mut width = self.width.saturating_sub(2);
        let mut height = self.height.saturating_sub(2);
        if let Some(max) = self.max_width {
            width = width.min(max);
        }
        if let Some(max) = self.max_height {
            height = height.min(max);
        }
        (width, height)
    }

    pub(super) fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let (w, h) = self.content_size();
        for frame in &mut self.frames {
            frame.set_size(w, h);
        }
    }

    pub(super) fn push(&mut self, mut screen: Box<dyn Screen>) {
        let (w, h) = self.content_size();
        screen.set_size(w, h);
        debug!(title = screen.title(), depth = self.frames.len() + 1, "push screen");
        self.frames.push(screen);
        let effects = match self.frames.last_mut() {
            Some(top) => top.init(),
            None => Vec::new(),
        };
        self.apply(effects);
    }

    /// Pops the top screen. Popping the last one ends the session.
    pub(super) fn pop(&mut self) {
        if self.frames.len() <= 1 {
            self.quit = true;
            return;
        }
        self.frames.pop();
    }

    fn error_screen(&self, message: &str) -> Box<dyn Screen> {
        let mut screen = ErrorScreen::new(message);
        let (w, h) = self.content_size();
        screen.set_size(w, h);
        Box::new(screen)
    }

    pub(super) fn show_error(&mut self, message: &str) {
        warn!(error = %message, "show error screen");
        let screen = self.error_screen(message);
        match self.frames.last_mut() {
            Some(top) => *top = screen,
            None => self.frames.push(screen),
        }
    }

    fn reload_top(&mut self, with: BTreeMap<String, CommandInput>) {
        let effects = match self.frames.last_mut() {
            Some(top) => top.reload(with),
            None => Vec::new(),
        };
        self.apply(effects);
    }

    pub(super) fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            if self.quit {
                debug!(?effect, "drop effect after quit");
                continue;
            }
            match effect {
                Effect::Push(screen) => self.push(screen),
                Effect::Pop => self.pop(),
                Effect::Quit => self.quit = true,
                Effect::Error(message) => self.show_error(&message),
                Effect::Copy(text) => {
                    let desktop = self.desktop.clone();
                    self.spawn(Job::new(CONTROLLER, 0, move || {
                        TaskOutcome::Effect(
                            desktop
                                .copy_text(&text)
                                .map(|()| "Copied to clipboard".to_string())
                                .map_err(|err| format!("failed to copy to clipboard: {:#}", err)),
                        )
                    }));
                }
                Effect::Open {
                    target,
                    application,
                } => {
                    let desktop = self.desktop.clone();
                    self.spawn(Job::new(CONTROLLER, 0, move || {
                        let done = match &application {
                            Some(app) => format!("Opened {} with {}", target, app),
                            None => format!("Opened {}", target),
                        };
                        TaskOutcome::Effect(
                            desktop
                                .open(&target, application.as_deref())
                                .map(|()| done)
                                .map_err(|err| format!("failed to open {}: {:#}", target, err)),
                        )
                    }));
                }
                Effect::Exec(invocation) => {
                    info!(line = %invocation.line, "hand terminal to interactive command");
                    self.exit_exec = Some(invocation);
                    self.quit = true;
                }
                Effect::Reload(with) => self.reload_top(with),
                Effect::Spawn(job) => self.spawn(job),
            }
        }
    }

    /// Runs `job` on a worker thread; its outcome comes back through the event channel.
    pub(super) fn spawn(&self, job: Job) {
        let tx = self.tx.clone();
        thread::spawn(move || {
            let Job {
                target,
                generation,
                work,
            } = job;
            let outcome = work();
            // The loop may already be gone; nobody is left to care.
            let _ = tx.send(Event::Task(TaskEvent {
                target,
                generation,
                outcome,
            }));
        });
    }

    pub(super) fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Resize(width, height) => self.resize(width, height),
            Event::Task(task) => self.handle_task(task),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if keys::is_ctrl(&key, 'c') {
            self.quit = true;
            return;
        }
        let effects = match self.frames.last_mut() {
            Some(top) => top.handle_key(key),
            None => Vec::new(),
        };
        self.apply(effects);
    }

    fn handle_task(&mut self, task: TaskEvent) {
        let TaskEvent {
            target,
            generation,
            outcome,
        } = task;

        if target == CONTROLLER {
            match outcome {
                TaskOutcome::Effect(Ok(message)) => {
                    self.exit_message = Some(message);
                    self.quit = true;
                }
                TaskOutcome::Effect(Err(message)) => self.show_error(&message),
                other => debug!(?other, "unexpected controller outcome"),
            }
            return;
        }

        let Some(idx) = self.frames.iter().position(|f| f.id() == target) else {
            debug!(?target, generation, "drop result for a screen that is gone");
            return;
        };
        let effects = self.frames[idx].handle_task(generation, outcome);
        if idx + 1 == self.frames.len() {
            self.apply(effects);
        } else {
            // Covered screens keep their new state, but only background work may follow.
            // A failure replaces the covered screen so it shows once uncovered.
            let mut spawn = Vec::new();
            for effect in effects {
                match effect {
                    Effect::Spawn(job) => spawn.push(Effect::Spawn(job)),
                    Effect::Error(message) => {
                        warn!(error = %message, depth = idx + 1, "covered screen failed");
                        let screen = self.error_screen(&message);
                        self.frames[idx] = screen;
                    }
                    other => debug!(?target, effect = ?other, "drop effect of a covered screen"),
                }
            }
            self.apply(spawn);
        }
    }
}

/// What the session opens with.
pub(super) enum Start {
    Root(Catalog),
    Runner(CommandRunner),
}

impl Start {
    fn into_screen(self) -> Box<dyn Screen> {
        match self {
            Start::Root(catalog) => Box::new(RootScreen::new(&catalog)),
            Start::Runner(runner) => Box::new(runner),
        }
    }
}

#[cfg(test)]
#[path = "../tests/tui_shell/app_tests.rs"]
mod tests;
