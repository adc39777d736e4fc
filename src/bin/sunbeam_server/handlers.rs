use super::*;

pub(super) async fn healthz() -> &'static str {
    "ok"
}

/// `GET /`: names of the served extensions.
pub(super) async fn list_extensions(State(state): State<Arc<AppState>>) -> Response {
    let names: Vec<&str> = state
        .catalog
        .extensions()
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    Json(names).into_response()
}

/// `GET /{ext}`: the manifest as a remote client sees it.
///
/// Exec lines, env and requirements stay on this side; the server enforces them.
pub(super) async fn get_manifest(
    State(state): State<Arc<AppState>>,
    Path(extension): Path<String>,
) -> Response {
    let Some(ext) = state.catalog.get(&extension) else {
        return not_found(&format!("extension {}", extension));
    };
    let mut manifest = ext.manifest.clone();
    manifest.env.clear();
    manifest.requirements.clear();
    for command in &mut manifest.commands {
        command.exec = None;
        command.env.clear();
    }
    Json(manifest).into_response()
}

/// `POST /{ext}/{cmd}`: runs the command with the posted params and returns its stdout.
pub(super) async fn run_command(
    State(state): State<Arc<AppState>>,
    Path((extension, command)): Path<(String, String)>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Response {
    let params: CommandParams = if body.is_empty() {
        CommandParams::default()
    } else {
        match serde_json::from_slice(&body) {
            Ok(p) => p,
            Err(err) => return bad_request(&format!("invalid command params: {}", err)),
        }
    };
    let query = headers
        .get(QUERY_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let Some(ext) = state.catalog.get(&extension) else {
        return not_found(&format!("extension {}", extension));
    };
    let Some(cmd) = ext.command(&command).cloned() else {
        return not_found(&format!("command {}", command));
    };
    if cmd.interactive {
        return bad_request(&RunError::InteractiveRemote.to_string());
    }

    let executable = match dispatch::resolve(&ext, &cmd, &params.with, &query) {
        Ok(e) => e,
        Err(err) => {
            warn!(extension = %extension, command = %command, error = %err, "reject command");
            return run_error(&err);
        }
    };
    info!(extension = %extension, command = %command, "run command");
    let output = tokio::task::spawn_blocking(move || executable.execute())
        .await
        .context("join command task");

    match output {
        Ok(Ok(stdout)) => {
            ([(header::CONTENT_TYPE, "application/octet-stream")], stdout).into_response()
        }
        Ok(Err(err)) => {
            warn!(extension = %extension, command = %command, error = %err, "command failed");
            run_error(&err)
        }
        Err(err) => internal_error(err),
    }
}
