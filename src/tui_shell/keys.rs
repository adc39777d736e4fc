use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Parses a shortcut like `ctrl+y`, `enter` or `alt+shift+k`.
pub(super) fn parse_shortcut(shortcut: &str) -> Option<(KeyModifiers, KeyCode)> {
    let mut mods = KeyModifiers::NONE;
    let mut code = None;
    for part in shortcut.split('+').map(|p| p.trim().to_ascii_lowercase()) {
        match part.as_str() {
            "ctrl" | "control" => mods |= KeyModifiers::CONTROL,
            "alt" | "opt" => mods |= KeyModifiers::ALT,
            "shift" => mods |= KeyModifiers::SHIFT,
            "enter" | "return" => code = Some(KeyCode::Enter),
            "tab" => code = Some(KeyCode::Tab),
            "esc" | "escape" => code = Some(KeyCode::Esc),
            "space" => code = Some(KeyCode::Char(' ')),
            "backspace" => code = Some(KeyCode::Backspace),
            "delete" => code = Some(KeyCode::Delete),
            "up" => code = Some(KeyCode::Up),
            "down" => code = Some(KeyCode::Down),
            "left" => code = Some(KeyCode::Left),
            "right" => code = Some(KeyCode::Right),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => code = Some(KeyCode::Char(c)),
                    _ => return None,
                }
            }
        }
    }
    code.map(|c| (mods, c))
}

pub(super) fn matches(shortcut: &str, key: &KeyEvent) -> bool {
    let Some((mods, code)) = parse_shortcut(shortcut) else {
        return false;
    };
    let key_code = match key.code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    };
    // Terminals report shifted letters as uppercase chars, with or without SHIFT.
    let key_mods = match key.code {
        KeyCode::Char(c) if c.is_ascii_uppercase() => key.modifiers | KeyModifiers::SHIFT,
        _ => key.modifiers,
    };
    key_code == code && key_mods == mods
}

/// True for keys that should be checked against action shortcuts before text entry.
pub(super) fn is_command_key(key: &KeyEvent) -> bool {
    key.modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        || !matches!(key.code, KeyCode::Char(_))
}

pub(super) fn is_ctrl(key: &KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(c)
}

#[cfg(test)]
#[path = "../tests/tui_shell/keys_tests.rs"]
mod tests;
