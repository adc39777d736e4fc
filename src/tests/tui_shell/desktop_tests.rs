use super::*;

fn has_display() -> bool {
    cfg!(not(target_os = "linux"))
        || std::env::var_os("DISPLAY").is_some()
        || std::env::var_os("WAYLAND_DISPLAY").is_some()
}

#[test]
fn copied_text_stays_readable_while_the_desktop_lives() {
    if !has_display() {
        eprintln!("skipping: no display server");
        return;
    }
    let desktop = SystemDesktop::default();
    let text = format!("sunbeam clipboard check {}", std::process::id());
    if let Err(err) = desktop.copy_text(&text) {
        eprintln!("skipping: clipboard unavailable: {:#}", err);
        return;
    }

    let mut reader = arboard::Clipboard::new().unwrap();
    assert_eq!(reader.get_text().unwrap(), text);
    assert_eq!(
        desktop.held.lock().unwrap().as_ref().map(|h| h.text.as_str()),
        Some(text.as_str())
    );
}

#[test]
fn settle_without_a_copy_returns_at_once() {
    let desktop = SystemDesktop::default();
    let started = std::time::Instant::now();
    desktop.settle();
    assert!(started.elapsed() < std::time::Duration::from_secs(1));
}
