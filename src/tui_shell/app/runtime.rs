use std::io::IsTerminal;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};

use super::*;

/// Runs the UI until it quits and returns the process exit code.
pub(in crate::tui_shell) fn run(opts: crate::tui::TuiRunOptions, start: Start) -> Result<i32> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        anyhow::bail!("TUI requires an interactive terminal (TTY)");
    }

    let mut stdout = io::stdout();
    enable_raw_mode().context("enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    let (tx, rx) = mpsc::channel();
    let desktop = Arc::new(SystemDesktop::default());
    let mut app = App::new(tx, desktop.clone(), opts.max_width, opts.max_height);
    let res = terminal
        .size()
        .context("read terminal size")
        .and_then(|size| {
            app.resize(size.width, size.height);
            app.push(start.into_screen());
            event_loop::run_loop(&mut terminal, &mut app, &rx)
        });

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    res?;

    if let Some(message) = app.exit_message.take() {
        println!("{}", message);
    }
    desktop.settle();

    match app.exit_exec.take() {
        Some(invocation) => {
            let status = invocation
                .run_attached()
                .with_context(|| format!("run {}", invocation.line))?;
            info!(code = ?status.code(), "interactive command exited");
            Ok(status.code().unwrap_or(1))
        }
        None => Ok(0),
    }
}
