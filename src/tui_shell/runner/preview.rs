use tracing::debug;

use crate::dispatch;
use crate::model::{Extension, PreviewSpec};

use super::super::event::{PreviewSlot, TaskOutcome};

/// Runs a preview command to completion. Every failure becomes the preview text.
pub(super) fn resolve(
    extension: &Extension,
    spec: &PreviewSpec,
    query: &str,
    slot: PreviewSlot,
) -> TaskOutcome {
    let text = render(extension, spec, query);
    TaskOutcome::Preview { slot, text }
}

fn render(extension: &Extension, spec: &PreviewSpec, query: &str) -> String {
    let Some(command) = extension.command(&spec.command) else {
        return format!("command {} not found", spec.command);
    };
    if command.interactive {
        return format!("command {} is interactive and cannot render a preview", spec.command);
    }
    let executable = match dispatch::resolve(extension, command, &spec.with, query) {
        Ok(executable) => executable,
        Err(err) => return err.to_string(),
    };
    match executable.execute() {
        Ok(output) => String::from_utf8_lossy(&output).into_owned(),
        Err(err) => {
            debug!(command = %spec.command, error = %err, "preview failed");
            err.to_string()
        }
    }
}
