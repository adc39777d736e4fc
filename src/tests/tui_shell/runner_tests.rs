use std::path::Path;

use crossterm::event::KeyModifiers;
use serde_json::json;

use super::*;
use crate::model::{Manifest, Origin, PreviewSpec};
use crate::tui_shell::event::PreviewSlot;
use crate::tui_shell::views::list::PreviewState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RunnerStateKind {
    Loading,
    Form,
    List,
    Detail,
}

impl CommandRunner {
    fn state_kind(&self) -> RunnerStateKind {
        match self.state {
            RunnerState::Loading => RunnerStateKind::Loading,
            RunnerState::Form(_) => RunnerStateKind::Form,
            RunnerState::List(_) => RunnerStateKind::List,
            RunnerState::Detail(_) => RunnerStateKind::Detail,
        }
    }

    fn state(&self) -> &RunnerState {
        &self.state
    }

    fn bindings(&self) -> &BTreeMap<String, CommandInput> {
        &self.with
    }
}

fn extension(root: &Path, commands: Value) -> Arc<Extension> {
    let manifest: Manifest =
        serde_json::from_value(json!({"title": "GitHub", "commands": commands})).unwrap();
    Arc::new(Extension {
        name: "gh".to_string(),
        origin: Origin::Local(root.to_path_buf()),
        manifest,
    })
}

fn runner(ext: &Arc<Extension>, command: &str, with: Value) -> CommandRunner {
    let cmd = ext.command(command).unwrap().clone();
    let with: BTreeMap<String, CommandInput> = serde_json::from_value(with).unwrap();
    let mut runner = CommandRunner::new(ext.clone(), cmd, with);
    runner.set_size(80, 24);
    runner
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

/// Runs the only spawned job of `effects` inline, the way a worker thread would.
fn run_job(effects: Vec<Effect>) -> (u64, TaskOutcome) {
    let mut jobs: Vec<Job> = effects
        .into_iter()
        .filter_map(|e| match e {
            Effect::Spawn(job) => Some(job),
            _ => None,
        })
        .collect();
    assert_eq!(jobs.len(), 1, "expected exactly one job");
    let job = jobs.remove(0);
    (job.generation, (job.work)())
}

/// Drives one dispatch to completion and returns the runner's reaction.
fn complete(runner: &mut CommandRunner, effects: Vec<Effect>) -> Vec<Effect> {
    let (generation, outcome) = run_job(effects);
    runner.handle_task(generation, outcome)
}

#[test]
fn fully_bound_params_dispatch_without_a_form() {
    let dir = tempfile::tempdir().unwrap();
    let ext = extension(
        dir.path(),
        json!([{
            "name": "issues",
            "params": [{"name": "repo", "type": "string"}],
            "exec": "echo {{repo}}",
            "onSuccess": "copy-text"
        }]),
    );
    let mut r = runner(&ext, "issues", json!({"repo": "cli/cli"}));

    let effects = r.init();
    assert_eq!(r.state_kind(), RunnerStateKind::Loading);
    let effects = complete(&mut r, effects);
    assert!(matches!(effects.as_slice(), [Effect::Copy(text)] if text == "cli/cli\n"));
}

#[test]
fn missing_required_param_prompts_then_sends_payload() {
    let dir = tempfile::tempdir().unwrap();
    let ext = extension(
        dir.path(),
        json!([{
            "name": "search",
            "params": [{"name": "query", "type": "string"}],
            "exec": "cat",
            "onSuccess": "copy-text"
        }]),
    );
    let mut r = runner(&ext, "search", json!({}));

    assert!(r.init().is_empty());
    assert_eq!(r.state_kind(), RunnerStateKind::Form);
    let RunnerState::Form(form) = r.state() else {
        unreachable!();
    };
    assert_eq!(form.fields.len(), 1);
    assert_eq!(form.fields[0].name, "query");

    assert!(r.handle_key(key(KeyCode::Char('g'))).is_empty());
    assert!(r.handle_key(key(KeyCode::Char('o'))).is_empty());
    let effects = r.handle_key(key(KeyCode::Enter));
    assert_eq!(r.state_kind(), RunnerStateKind::Loading);
    assert_eq!(r.bindings()["query"].value(), Some(&json!("go")));

    let effects = complete(&mut r, effects);
    let [Effect::Copy(payload)] = effects.as_slice() else {
        panic!("expected a copy effect, got {:?}", effects);
    };
    let payload: Value = serde_json::from_str(payload).unwrap();
    assert_eq!(payload, json!({"with": {"query": "go"}}));
}

#[test]
fn form_descriptor_bindings_are_prompted_with_their_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let ext = extension(
        dir.path(),
        json!([{
            "name": "note",
            "params": [
                {"name": "title", "type": "string"},
                {"name": "draft", "type": "boolean", "default": false}
            ],
            "exec": "cat",
            "onSuccess": "copy-text"
        }]),
    );
    let mut r = runner(
        &ext,
        "note",
        json!({
            "title": {"type": "textfield", "title": "Title", "default": "hello"},
            "draft": {"type": "checkbox", "label": "Draft"}
        }),
    );

    assert!(r.init().is_empty());
    let RunnerState::Form(form) = r.state() else {
        panic!("expected a form");
    };
    let names: Vec<&str> = form.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["title", "draft"]);

    r.handle_key(key(KeyCode::Tab));
    r.handle_key(key(KeyCode::Char(' ')));
    let effects = r.handle_key(key(KeyCode::Enter));
    let effects = complete(&mut r, effects);
    let [Effect::Copy(payload)] = effects.as_slice() else {
        panic!("expected a copy effect, got {:?}", effects);
    };
    let payload: Value = serde_json::from_str(payload).unwrap();
    assert_eq!(payload, json!({"with": {"title": "hello", "draft": true}}));
}

#[test]
fn list_page_gets_positional_ids_and_extension_title() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("issues.json"),
        r#"{"type":"list","list":{"items":[{"title":"Bug #1"}]}}"#,
    )
    .unwrap();
    let ext = extension(
        dir.path(),
        json!([{"name": "issues", "exec": "cat issues.json", "onSuccess": "push-page"}]),
    );
    let mut r = runner(&ext, "issues", json!({}));

    let effects = r.init();
    assert!(complete(&mut r, effects).is_empty());

    let RunnerState::List(list) = r.state() else {
        panic!("expected a list, got {:?}", r.state_kind());
    };
    assert_eq!(list.title, "GitHub");
    assert_eq!(r.title(), "GitHub");
    assert_eq!(list.items().len(), 1);
    assert_eq!(list.items()[0].title, "Bug #1");
    assert_eq!(list.items()[0].id.as_deref(), Some("0"));
}

#[test]
fn non_zero_exit_becomes_an_error_with_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let ext = extension(
        dir.path(),
        json!([{
            "name": "issues",
            "exec": "echo 'rate limited' >&2; exit 2",
            "onSuccess": "push-page"
        }]),
    );
    let mut r = runner(&ext, "issues", json!({}));

    let effects = r.init();
    let effects = complete(&mut r, effects);
    let [Effect::Error(message)] = effects.as_slice() else {
        panic!("expected an error, got {:?}", effects);
    };
    assert!(message.contains("exit code 2"), "{}", message);
    assert!(message.contains("rate limited"), "{}", message);
}

#[test]
fn invalid_page_is_a_protocol_error() {
    let dir = tempfile::tempdir().unwrap();
    let ext = extension(
        dir.path(),
        json!([{"name": "broken", "exec": "echo '{\"type\":\"list\"}'", "onSuccess": "push-page"}]),
    );
    let mut r = runner(&ext, "broken", json!({}));

    let effects = r.init();
    let effects = complete(&mut r, effects);
    assert!(
        matches!(effects.as_slice(), [Effect::Error(m)] if m.starts_with("invalid page")),
        "{:?}",
        effects
    );
}

#[test]
fn missing_env_fails_before_dispatch() {
    let dir = tempfile::tempdir().unwrap();
    let ext = extension(
        dir.path(),
        json!([{
            "name": "issues",
            "env": ["SUNBEAM_TEST_SURELY_UNSET_TOKEN"],
            "exec": "true"
        }]),
    );
    let mut r = runner(&ext, "issues", json!({}));

    let effects = r.init();
    assert!(
        matches!(effects.as_slice(), [Effect::Error(m)] if m == "missing env variable: SUNBEAM_TEST_SURELY_UNSET_TOKEN"),
        "{:?}",
        effects
    );
}

#[test]
fn success_behaviors_map_to_controller_effects() {
    let dir = tempfile::tempdir().unwrap();
    let ext = extension(
        dir.path(),
        json!([
            {"name": "url", "exec": "echo ' https://example.com '", "onSuccess": "open-url"},
            {"name": "refresh", "exec": "true", "onSuccess": "reload-page"},
            {"name": "fire", "exec": "true"}
        ]),
    );

    let mut r = runner(&ext, "url", json!({}));
    let effects = r.init();
    let effects = complete(&mut r, effects);
    assert!(matches!(
        effects.as_slice(),
        [Effect::Open { target, application: None }] if target == "https://example.com"
    ));

    let mut r = runner(&ext, "refresh", json!({}));
    let effects = r.init();
    let effects = complete(&mut r, effects);
    assert!(matches!(effects.as_slice(), [Effect::Pop, Effect::Reload(with)] if with.is_empty()));

    let mut r = runner(&ext, "fire", json!({}));
    let effects = r.init();
    let effects = complete(&mut r, effects);
    assert!(matches!(effects.as_slice(), [Effect::Quit]));
}

#[test]
fn stale_results_are_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let ext = extension(
        dir.path(),
        json!([{"name": "fire", "exec": "true", "onSuccess": "copy-text"}]),
    );
    let mut r = runner(&ext, "fire", json!({}));

    let first = r.init();
    let (old_generation, outcome) = run_job(first);
    let second = r.reload(BTreeMap::new());
    assert_eq!(r.generation, old_generation + 1);

    assert!(r.handle_task(old_generation, outcome).is_empty());
    assert_eq!(r.state_kind(), RunnerStateKind::Loading);
    assert!(matches!(complete(&mut r, second).as_slice(), [Effect::Copy(_)]));
}

#[test]
fn escape_while_loading_pops() {
    let dir = tempfile::tempdir().unwrap();
    let ext = extension(dir.path(), json!([{"name": "slow", "exec": "sleep 5"}]));
    let mut r = runner(&ext, "slow", json!({}));
    let _pending = r.init();
    assert!(matches!(r.handle_key(key(KeyCode::Esc)).as_slice(), [Effect::Pop]));
}

#[test]
fn interactive_local_commands_hand_off_the_terminal() {
    let dir = tempfile::tempdir().unwrap();
    let ext = extension(
        dir.path(),
        json!([{"name": "edit", "interactive": true, "exec": "vi {{file}}", "params": [{"name": "file"}]}]),
    );
    let mut r = runner(&ext, "edit", json!({"file": "notes.md"}));
    let effects = r.init();
    let [Effect::Exec(invocation)] = effects.as_slice() else {
        panic!("expected exec, got {:?}", effects);
    };
    assert_eq!(invocation.line, "vi notes.md");
    assert_eq!(invocation.dir, dir.path());
}

#[test]
fn run_command_action_pushes_a_nested_runner() {
    let dir = tempfile::tempdir().unwrap();
    let ext = extension(
        dir.path(),
        json!([
            {"name": "issues", "exec": "true", "onSuccess": "push-page"},
            {"name": "close", "exec": "true", "params": [{"name": "id"}]}
        ]),
    );
    let mut r = runner(&ext, "issues", json!({}));

    let action: Action = serde_json::from_value(json!({
        "type": "run-command",
        "command": "close",
        "with": {"id": "7"},
        "onSuccess": "reload-page"
    }))
    .unwrap();
    let effects = r.trigger(action);
    let [Effect::Push(screen)] = effects.as_slice() else {
        panic!("expected a push, got {:?}", effects);
    };
    let nested = screen.as_any().downcast_ref::<CommandRunner>().unwrap();
    assert_eq!(nested.command.name, "close");
    assert_eq!(nested.command.on_success, Some(crate::model::OnSuccess::ReloadPage));
    assert_eq!(nested.bindings()["id"].value(), Some(&json!("7")));

    let missing: Action =
        serde_json::from_value(json!({"type": "run-command", "command": "nope"})).unwrap();
    assert!(matches!(
        r.trigger(missing).as_slice(),
        [Effect::Error(m)] if m == "command not found: nope"
    ));
}

#[test]
fn list_previews_resolve_through_a_task() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("page.json"),
        r#"{"type":"list","list":{"showPreview":true,"items":[
            {"id":"a","title":"A","preview":{"command":"show","with":{"name":"a"}}},
            {"title":"B","preview":{"text":"static"}}
        ]}}"#,
    )
    .unwrap();
    let ext = extension(
        dir.path(),
        json!([
            {"name": "browse", "exec": "cat page.json", "onSuccess": "push-page"},
            {"name": "show", "exec": "printf 'preview of %s' {{name}}", "params": [{"name": "name"}]}
        ]),
    );
    let mut r = runner(&ext, "browse", json!({}));

    let effects = r.init();
    let preview_jobs = complete(&mut r, effects);
    let (generation, outcome) = run_job(preview_jobs);
    assert!(matches!(
        &outcome,
        TaskOutcome::Preview { slot: PreviewSlot::Item(id), text } if id == "a" && text == "preview of a"
    ));
    assert!(r.handle_task(generation, outcome).is_empty());

    let RunnerState::List(list) = r.state() else {
        panic!("expected a list");
    };
    assert_eq!(
        list.preview_state("a"),
        Some(&PreviewState::Ready("preview of a".to_string()))
    );

    // Moving to an item with a text preview needs no task.
    assert!(r.handle_key(key(KeyCode::Down)).is_empty());
}

#[test]
fn preview_result_survives_a_reload_started_after_it() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("page.json"),
        r#"{"type":"list","list":{"showPreview":true,"items":[
            {"id":"a","title":"A","preview":{"command":"show","with":{"name":"a"}}}
        ]}}"#,
    )
    .unwrap();
    let ext = extension(
        dir.path(),
        json!([
            {"name": "browse", "exec": "cat page.json", "onSuccess": "push-page"},
            {"name": "show", "exec": "printf 'preview of %s' {{name}}", "params": [{"name": "name"}]}
        ]),
    );
    let mut r = runner(&ext, "browse", json!({}));

    let effects = r.init();
    let preview_jobs = complete(&mut r, effects);
    let (preview_generation, preview) = run_job(preview_jobs);

    let reload = r.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL));
    assert!(r.generation > preview_generation);

    assert!(r.handle_task(preview_generation, preview).is_empty());
    let RunnerState::List(list) = r.state() else {
        panic!("expected a list");
    };
    assert!(list.loading, "reload is still running");
    assert_eq!(
        list.preview_state("a"),
        Some(&PreviewState::Ready("preview of a".to_string()))
    );

    // Results for items the view no longer lists are refused.
    let ghost = TaskOutcome::Preview {
        slot: PreviewSlot::Item("ghost".to_string()),
        text: "boo".to_string(),
    };
    assert!(r.handle_task(preview_generation, ghost).is_empty());
    let RunnerState::List(list) = r.state() else {
        panic!("expected a list");
    };
    assert_eq!(list.preview_state("ghost"), None);

    // The reload itself still lands and asks for a fresh preview.
    let refreshed = complete(&mut r, reload);
    assert_eq!(run_job(refreshed).0, r.generation);
}

#[test]
fn preview_of_unknown_command_renders_inline() {
    let dir = tempfile::tempdir().unwrap();
    let ext = extension(dir.path(), json!([]));
    let spec = PreviewSpec {
        command: "ghost".to_string(),
        with: Map::new(),
    };
    let outcome = preview::resolve(&ext, &spec, "", PreviewSlot::Detail);
    assert!(matches!(
        outcome,
        TaskOutcome::Preview { slot: PreviewSlot::Detail, text } if text == "command ghost not found"
    ));
}

#[test]
fn detail_page_renders_into_a_test_backend() {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    let dir = tempfile::tempdir().unwrap();
    let ext = extension(
        dir.path(),
        json!([{
            "name": "readme",
            "exec": "echo '{\"type\":\"detail\",\"title\":\"Readme\",\"detail\":{\"preview\":{\"text\":\"hello world\"}}}'",
            "onSuccess": "push-page"
        }]),
    );
    let mut r = runner(&ext, "readme", json!({}));
    let effects = r.init();
    assert!(complete(&mut r, effects).is_empty());
    assert_eq!(r.state_kind(), RunnerStateKind::Detail);
    assert_eq!(r.title(), "Readme");

    let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
    terminal.draw(|f| r.render(f, f.area())).unwrap();
    let content: String = terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|c| c.symbol())
        .collect();
    assert!(content.contains("Readme"));
    assert!(content.contains("hello world"));
}

#[test]
fn remote_server_error_shows_the_status() {
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async move {
            let router = axum::Router::new().route(
                "/gh/issues",
                axum::routing::post(|| async {
                    (axum::http::StatusCode::INTERNAL_SERVER_ERROR, "boom")
                }),
            );
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            axum::serve(listener, router).await.unwrap();
        });
    });
    let addr = rx.recv().unwrap();

    let manifest: Manifest = serde_json::from_value(json!({
        "title": "GitHub",
        "commands": [{"name": "issues", "onSuccess": "push-page"}]
    }))
    .unwrap();
    let ext = Arc::new(Extension {
        name: "gh".to_string(),
        origin: Origin::Remote(format!("http://{}/gh", addr)),
        manifest,
    });
    let mut r = runner(&ext, "issues", json!({}));

    let effects = r.init();
    let effects = complete(&mut r, effects);
    let [Effect::Error(message)] = effects.as_slice() else {
        panic!("expected an error, got {:?}", effects);
    };
    assert!(message.contains("500"), "{}", message);
    assert!(message.contains("Internal Server Error"), "{}", message);
}

#[test]
fn page_file_renders_and_reloads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bookmarks.json");
    std::fs::write(
        &path,
        r#"{"type":"list","list":{"items":[{"title":"Docs","actions":[{"type":"run-command","command":"open"}]}]}}"#,
    )
    .unwrap();
    let mut r = CommandRunner::from_file(path.clone());
    r.set_size(80, 24);

    let effects = r.init();
    assert_eq!(r.state_kind(), RunnerStateKind::Loading);
    assert!(complete(&mut r, effects).is_empty());
    let RunnerState::List(list) = r.state() else {
        panic!("expected a list, got {:?}", r.state_kind());
    };
    assert_eq!(list.title, "bookmarks.json");
    assert_eq!(list.items()[0].title, "Docs");

    // No extension backs the page, so commands cannot be found.
    assert!(matches!(
        r.handle_key(key(KeyCode::Enter)).as_slice(),
        [Effect::Error(m)] if m == "command not found: open"
    ));

    std::fs::write(
        &path,
        r#"{"type":"detail","title":"Notes","detail":{"preview":{"text":"edited"}}}"#,
    )
    .unwrap();
    let reload = r.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL));
    assert!(complete(&mut r, reload).is_empty());
    assert_eq!(r.state_kind(), RunnerStateKind::Detail);
    assert_eq!(r.title(), "Notes");
}

#[test]
fn missing_page_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut r = CommandRunner::from_file(dir.path().join("gone.json"));
    let effects = r.init();
    let effects = complete(&mut r, effects);
    assert!(
        matches!(effects.as_slice(), [Effect::Error(m)] if m.starts_with("read ")),
        "{:?}",
        effects
    );
}
