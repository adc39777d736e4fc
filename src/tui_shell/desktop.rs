use std::sync::Mutex;

use anyhow::{Context, Result};

/// How long the selection is kept alive after the UI is gone, waiting for a clipboard
/// manager to take it over.
#[cfg(target_os = "linux")]
const CLIPBOARD_HOLD: std::time::Duration = std::time::Duration::from_secs(5);

/// OS integration used by the navigation controller.
pub(super) trait Desktop: Send + Sync {
    fn copy_text(&self, text: &str) -> Result<()>;
    fn open(&self, target: &str, application: Option<&str>) -> Result<()>;

    /// Called once the terminal is restored, right before the process exits.
    fn settle(&self) {}
}

/// Clipboard owner and the text last copied through it.
struct Held {
    clipboard: arboard::Clipboard,
    text: String,
}

#[derive(Default)]
pub(super) struct SystemDesktop {
    held: Mutex<Option<Held>>,
}

impl Desktop for SystemDesktop {
    fn copy_text(&self, text: &str) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new().context("open clipboard")?;
        clipboard
            .set_text(text.to_string())
            .context("write clipboard")?;
        // X11 and Wayland serve the selection from this process; keep the owner alive.
        if let Ok(mut held) = self.held.lock() {
            *held = Some(Held {
                clipboard,
                text: text.to_string(),
            });
        }
        Ok(())
    }

    fn open(&self, target: &str, application: Option<&str>) -> Result<()> {
        match application {
            Some(app) => open::with(target, app).with_context(|| format!("open with {}", app)),
            None => open::that(target).context("open"),
        }
    }

    #[cfg(target_os = "linux")]
    fn settle(&self) {
        use arboard::SetExtLinux;

        let Some(Held {
            mut clipboard,
            text,
        }) = self.held.lock().ok().and_then(|mut held| held.take())
        else {
            return;
        };
        let deadline = std::time::Instant::now() + CLIPBOARD_HOLD;
        if let Err(err) = clipboard.set().wait_until(deadline).text(text) {
            tracing::warn!(error = %err, "hold clipboard selection");
        }
    }
}

#[cfg(test)]
#[path = "../tests/tui_shell/desktop_tests.rs"]
mod tests;
