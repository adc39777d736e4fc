use crossterm::event::KeyModifiers;

use super::*;

fn press(view: &mut DetailView, code: KeyCode) {
    view.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
}

#[test]
fn scrolling_clamps_to_the_last_page_of_very_long_text() {
    let mut view = DetailView::new("Log", "");
    view.set_size(80, 24);
    view.set_text("line\n".repeat(70_000));

    for _ in 0..4_000 {
        press(&mut view, KeyCode::PageDown);
    }
    press(&mut view, KeyCode::Down);
    assert_eq!(view.scroll, u16::MAX - 20);

    press(&mut view, KeyCode::PageUp);
    assert_eq!(view.scroll, u16::MAX - 40);
}

#[test]
fn short_text_does_not_scroll() {
    let mut view = DetailView::new("Note", "");
    view.set_size(80, 24);
    view.set_text("one\ntwo");
    press(&mut view, KeyCode::Down);
    press(&mut view, KeyCode::PageDown);
    assert_eq!(view.scroll, 0);
}
