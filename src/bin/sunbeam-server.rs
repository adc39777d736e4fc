//! Serves local extensions over HTTP so another machine can use them as remote
//! extensions.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use sunbeam::catalog::Catalog;
use sunbeam::dispatch::{self, QUERY_HEADER};
use sunbeam::error::RunError;
use sunbeam::model::CommandParams;
use tracing::{info, warn};

#[path = "sunbeam_server/http_error.rs"]
mod http_error;
use self::http_error::*;
#[path = "sunbeam_server/handlers.rs"]
mod handlers;
use self::handlers::*;
#[path = "sunbeam_server/runtime.rs"]
mod runtime;

struct AppState {
    catalog: Catalog,
}

#[tokio::main]
async fn main() {
    if let Err(err) = runtime::run().await {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}
