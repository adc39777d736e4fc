use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;

use crate::catalog::Catalog;
use crate::model::CommandInput;

#[derive(Clone, Debug, Default)]
pub struct TuiRunOptions {
    pub max_width: Option<u16>,
    pub max_height: Option<u16>,
}

/// First screen of a session.
#[derive(Clone, Debug)]
pub enum Entry {
    /// Every extension's root items.
    Root,
    /// One command, as `sunbeam run <extension> <command>` does.
    Command {
        extension: String,
        command: String,
        with: BTreeMap<String, CommandInput>,
    },
    /// A page read from a file, as `sunbeam push <page>` does.
    File(PathBuf),
}

/// Runs the UI and returns the exit code of the session.
pub fn run(catalog: Catalog, entry: Entry, opts: TuiRunOptions) -> Result<i32> {
    crate::tui_shell::run_with_options(catalog, entry, opts)
}
