use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crossterm::event::KeyEvent;

use crate::dispatch::Invocation;
use crate::error::RunError;
use crate::model::CommandInput;

use super::view::Screen;

/// Identity of a stacked screen; task results are addressed to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(super) struct ScreenId(u64);

/// Address for tasks whose result belongs to the controller itself.
pub(super) const CONTROLLER: ScreenId = ScreenId(0);

impl ScreenId {
    pub(super) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        ScreenId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Everything the loop consumes, in arrival order.
#[derive(Debug)]
pub(super) enum Event {
    Key(KeyEvent),
    Resize(u16, u16),
    Task(TaskEvent),
}

#[derive(Debug)]
pub(super) struct TaskEvent {
    pub(super) target: ScreenId,
    pub(super) generation: u64,
    pub(super) outcome: TaskOutcome,
}

#[derive(Debug)]
pub(super) enum TaskOutcome {
    /// Result of a command dispatch.
    Output(Result<Vec<u8>, RunError>),
    /// Preview text for one slot; dispatch errors arrive here as text too.
    Preview { slot: PreviewSlot, text: String },
    /// Clipboard/opener completion: the exit status line, or the failure.
    Effect(Result<String, String>),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(super) enum PreviewSlot {
    Detail,
    Item(String),
}

/// Work to run off the loop. Its outcome comes back as exactly one [`TaskEvent`].
pub(super) struct Job {
    pub(super) target: ScreenId,
    pub(super) generation: u64,
    pub(super) work: Box<dyn FnOnce() -> TaskOutcome + Send>,
}

impl Job {
    pub(super) fn new(
        target: ScreenId,
        generation: u64,
        work: impl FnOnce() -> TaskOutcome + Send + 'static,
    ) -> Self {
        Self {
            target,
            generation,
            work: Box::new(work),
        }
    }
}

/// Requests a screen makes of the navigation controller. Applied in order.
pub(super) enum Effect {
    Push(Box<dyn Screen>),
    Pop,
    Quit,
    /// Replace the top screen with an error screen.
    Error(String),
    Copy(String),
    Open {
        target: String,
        application: Option<String>,
    },
    /// Tear down the UI and hand the terminal to this process.
    Exec(Invocation),
    /// Re-run the top screen with these bindings merged in.
    Reload(BTreeMap<String, CommandInput>),
    Spawn(Job),
}

impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Effect::Push(screen) => write!(f, "Push({})", screen.title()),
            Effect::Pop => write!(f, "Pop"),
            Effect::Quit => write!(f, "Quit"),
            Effect::Error(msg) => write!(f, "Error({:?})", msg),
            Effect::Copy(text) => write!(f, "Copy({:?})", text),
            Effect::Open {
                target,
                application,
            } => write!(f, "Open({:?}, {:?})", target, application),
            Effect::Exec(inv) => write!(f, "Exec({:?})", inv.line),
            Effect::Reload(with) => write!(f, "Reload({:?})", with),
            Effect::Spawn(job) => write!(f, "Spawn({:?}#{})", job.target, job.generation),
        }
    }
}
