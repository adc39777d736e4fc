use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;

use sunbeam::catalog::Catalog;
use sunbeam::config::Config;
use sunbeam::model::{Command, CommandInput, ParamType};
use sunbeam::tui::{self, Entry, TuiRunOptions};

#[derive(Parser)]
#[command(name = "sunbeam")]
#[command(about = "Terminal launcher for command-line extensions", long_about = None)]
struct Cli {
    /// Maximum width of the content area
    #[arg(long, global = true)]
    max_width: Option<u16>,

    /// Maximum height of the content area
    #[arg(long, global = true)]
    max_height: Option<u16>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one extension command
    Run {
        extension: String,
        command: String,
        /// Bind a parameter (repeatable)
        #[arg(long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },

    /// List installed extensions and their commands
    Extensions,

    /// Read a page from a file and show it
    Push {
        /// Path to a page JSON file
        page: PathBuf,
    },
}

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();

    let config = Config::load()?;
    if let Err(err) = sunbeam::logging::init_file_logging() {
        eprintln!("logging disabled: {:#}", err);
    }
    let catalog = Catalog::load(&config)?;
    let opts = TuiRunOptions {
        max_width: cli.max_width.or(config.max_width),
        max_height: cli.max_height.or(config.max_height),
    };

    match cli.command {
        None => tui::run(catalog, Entry::Root, opts),
        Some(Commands::Run {
            extension,
            command,
            params,
        }) => {
            let ext = catalog
                .get(&extension)
                .with_context(|| format!("extension {} not found", extension))?;
            if let Some(req) = ext.unmet_requirements().first() {
                anyhow::bail!(
                    "extension {} requires `{}`{}",
                    extension,
                    req.which,
                    req.home_page
                        .as_deref()
                        .map(|h| format!(" (see {})", h))
                        .unwrap_or_default()
                );
            }
            let cmd = ext
                .command(&command)
                .with_context(|| format!("command {} not found in {}", command, extension))?;
            let with = parse_params(cmd, &params)?;
            tui::run(
                catalog,
                Entry::Command {
                    extension,
                    command,
                    with,
                },
                opts,
            )
        }
        Some(Commands::Push { page }) => {
            anyhow::ensure!(page.is_file(), "page file {} not found", page.display());
            tui::run(catalog, Entry::File(page), opts)
        }
        Some(Commands::Extensions) => {
            for ext in catalog.extensions() {
                println!("{}\t{}", ext.name, ext.title());
                for cmd in &ext.manifest.commands {
                    println!("  {}\t{}", cmd.name, cmd.title());
                }
                if let Some(req) = ext.unmet_requirements().first() {
                    println!("  missing requirement: {}", req.which);
                }
            }
            Ok(0)
        }
    }
}

/// Parses `--param key=value` pairs, typing booleans by the declared param type.
fn parse_params(command: &Command, raw: &[String]) -> Result<BTreeMap<String, CommandInput>> {
    let mut out = BTreeMap::new();
    for item in raw {
        let (key, value) = item
            .split_once('=')
            .with_context(|| format!("invalid param {:?} (expected KEY=VALUE)", item))?;
        let kind = command
            .params
            .iter()
            .find(|p| p.name == key)
            .map(|p| p.kind);
        let value = match kind {
            Some(ParamType::Boolean) => Value::Bool(
                value
                    .parse()
                    .with_context(|| format!("param {} expects true or false", key))?,
            ),
            _ => Value::String(value.to_string()),
        };
        out.insert(key.to_string(), CommandInput::Value(value));
    }
    Ok(out)
}
