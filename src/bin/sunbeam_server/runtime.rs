use std::net::SocketAddr;
use std::path::PathBuf;

use axum::routing::{get, post};
use clap::Parser;
use sunbeam::config::Config;

use super::*;

#[derive(Parser)]
#[command(name = "sunbeam-server")]
#[command(about = "Serve local sunbeam extensions over HTTP", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: SocketAddr,

    /// Write bound address to this file (dev/test convenience)
    #[arg(long)]
    addr_file: Option<PathBuf>,

    /// Directory of local extensions (defaults to the configured one)
    #[arg(long)]
    extension_dir: Option<PathBuf>,
}

pub(super) fn router(catalog: Catalog) -> Router {
    let state = Arc::new(AppState { catalog });
    Router::new()
        .route("/healthz", get(healthz))
        .route("/", get(list_extensions))
        .route("/:extension", get(get_manifest))
        .route("/:extension/:command", post(run_command))
        .with_state(state)
}

pub(super) async fn run() -> Result<()> {
    let args = Args::parse();
    sunbeam::logging::init_stderr_logging();

    let dir = match args.extension_dir {
        Some(dir) => Some(dir),
        None => Config::load()?.extension_dir(),
    };
    // Only local extensions are served; remotes stay with their own servers.
    let extensions = match &dir {
        Some(dir) if dir.is_dir() => sunbeam::catalog::load_dir(dir)?,
        _ => Vec::new(),
    };
    let catalog = Catalog::new(extensions);
    info!(count = catalog.extensions().len(), "serving extensions");

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("bind {}", args.addr))?;

    let local_addr = listener.local_addr().context("read listener local addr")?;
    eprintln!("sunbeam-server listening on {}", local_addr);

    if let Some(addr_file) = &args.addr_file {
        std::fs::write(addr_file, local_addr.to_string())
            .with_context(|| format!("write addr file {}", addr_file.display()))?;
    }

    axum::serve(listener, router(catalog))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
