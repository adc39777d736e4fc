use anyhow::{Context, Result};

use crate::catalog::Catalog;
use crate::tui::{Entry, TuiRunOptions};

mod app;
mod desktop;
mod error_screen;
mod event;
mod input;
mod keys;
mod root;
mod runner;
mod suggest;
mod view;
mod views;

pub(crate) fn run_with_options(
    catalog: Catalog,
    entry: Entry,
    opts: TuiRunOptions,
) -> Result<i32> {
    let start = match entry {
        Entry::Root => app::Start::Root(catalog),
        Entry::Command {
            extension,
            command,
            with,
        } => {
            let ext = catalog
                .get(&extension)
                .with_context(|| format!("extension {} not found", extension))?;
            let cmd = ext
                .command(&command)
                .with_context(|| format!("command {} not found in {}", command, extension))?
                .clone();
            app::Start::Runner(runner::CommandRunner::new(ext, cmd, with))
        }
        Entry::File(path) => app::Start::Runner(runner::CommandRunner::from_file(path)),
    };
    app::run(opts, start)
}
