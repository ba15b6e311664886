use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use vidctl_core::{Focus, Key, KeyInput, Modifiers};

/// Translate a terminal key event into the controller's backend-neutral form
pub fn to_key_input(event: &KeyEvent, focus: Focus) -> KeyInput {
    let key = match event.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        _ => Key::Other,
    };

    KeyInput::new(key)
        .with_modifiers(to_modifiers(event.modifiers))
        .with_focus(focus)
}

fn to_modifiers(modifiers: KeyModifiers) -> Modifiers {
    Modifiers {
        shift: modifiers.contains(KeyModifiers::SHIFT),
        ctrl: modifiers.contains(KeyModifiers::CONTROL),
        alt: modifiers.contains(KeyModifiers::ALT),
        meta: modifiers.intersects(KeyModifiers::META | KeyModifiers::SUPER),
    }
}
