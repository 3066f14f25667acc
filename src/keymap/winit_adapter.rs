//! Adapter to convert winit key events to [`RawKeyEvent`]
//!
//! The key code comes from the physical key so that bindings follow the
//! keyboard position; the character comes from the logical key and is used
//! for layouts where the two disagree.

use winit::event::ElementState;
use winit::keyboard::{Key, KeyCode as WinitKeyCode, ModifiersState, NamedKey, PhysicalKey};

use super::event::{RawEventKind, RawKeyEvent};
use super::types::{KeyCode, Modifiers};

/// Convert winit key event data to a raw leader event
pub fn raw_key_event_from_winit(
    state: ElementState,
    logical_key: &Key,
    physical_key: PhysicalKey,
    modifiers: ModifiersState,
) -> RawKeyEvent {
    let kind = match state {
        ElementState::Pressed => RawEventKind::Down,
        ElementState::Released => RawEventKind::Up,
    };
    let mods = Modifiers::new(
        modifiers.control_key(),
        modifiers.shift_key(),
        modifiers.alt_key(),
        modifiers.super_key(),
    );

    let code = match physical_key {
        PhysicalKey::Code(code) => key_code_from_physical(code),
        PhysicalKey::Unidentified(_) => KeyCode::Unidentified,
    };

    RawKeyEvent::new(kind, code, mods, character_from_logical(logical_key))
}

/// The single character a logical key produces, if any
fn character_from_logical(key: &Key) -> Option<char> {
    match key {
        Key::Character(s) => {
            let mut chars = s.chars();
            let c = chars.next()?;
            chars.next().is_none().then_some(c)
        }
        Key::Named(NamedKey::Space) => Some(' '),
        _ => None,
    }
}

fn key_code_from_physical(code: WinitKeyCode) -> KeyCode {
    if let Some(c) = char_from_physical(code) {
        return KeyCode::Char(c);
    }
    if let Some(n) = function_key_number(code) {
        return KeyCode::F(n);
    }

    match code {
        WinitKeyCode::Space => KeyCode::Space,
        WinitKeyCode::Enter | WinitKeyCode::NumpadEnter => KeyCode::Enter,
        WinitKeyCode::Escape => KeyCode::Escape,
        WinitKeyCode::Tab => KeyCode::Tab,
        WinitKeyCode::Backspace => KeyCode::Backspace,
        WinitKeyCode::Delete => KeyCode::Delete,

        WinitKeyCode::ArrowUp => KeyCode::Up,
        WinitKeyCode::ArrowDown => KeyCode::Down,
        WinitKeyCode::ArrowLeft => KeyCode::Left,
        WinitKeyCode::ArrowRight => KeyCode::Right,

        WinitKeyCode::Home => KeyCode::Home,
        WinitKeyCode::End => KeyCode::End,
        WinitKeyCode::PageUp => KeyCode::PageUp,
        WinitKeyCode::PageDown => KeyCode::PageDown,
        WinitKeyCode::Insert => KeyCode::Insert,

        WinitKeyCode::ShiftLeft | WinitKeyCode::ShiftRight => KeyCode::Shift,
        WinitKeyCode::ControlLeft | WinitKeyCode::ControlRight => KeyCode::Control,
        WinitKeyCode::AltLeft | WinitKeyCode::AltRight => KeyCode::Alt,
        WinitKeyCode::SuperLeft | WinitKeyCode::SuperRight => KeyCode::Meta,

        _ => KeyCode::Unidentified,
    }
}

/// Base character of a US-layout character key
fn char_from_physical(code: WinitKeyCode) -> Option<char> {
    let c = match code {
        WinitKeyCode::KeyA => 'a',
        WinitKeyCode::KeyB => 'b',
        WinitKeyCode::KeyC => 'c',
        WinitKeyCode::KeyD => 'd',
        WinitKeyCode::KeyE => 'e',
        WinitKeyCode::KeyF => 'f',
        WinitKeyCode::KeyG => 'g',
        WinitKeyCode::KeyH => 'h',
        WinitKeyCode::KeyI => 'i',
        WinitKeyCode::KeyJ => 'j',
        WinitKeyCode::KeyK => 'k',
        WinitKeyCode::KeyL => 'l',
        WinitKeyCode::KeyM => 'm',
        WinitKeyCode::KeyN => 'n',
        WinitKeyCode::KeyO => 'o',
        WinitKeyCode::KeyP => 'p',
        WinitKeyCode::KeyQ => 'q',
        WinitKeyCode::KeyR => 'r',
        WinitKeyCode::KeyS => 's',
        WinitKeyCode::KeyT => 't',
        WinitKeyCode::KeyU => 'u',
        WinitKeyCode::KeyV => 'v',
        WinitKeyCode::KeyW => 'w',
        WinitKeyCode::KeyX => 'x',
        WinitKeyCode::KeyY => 'y',
        WinitKeyCode::KeyZ => 'z',

        WinitKeyCode::Digit0 => '0',
        WinitKeyCode::Digit1 => '1',
        WinitKeyCode::Digit2 => '2',
        WinitKeyCode::Digit3 => '3',
        WinitKeyCode::Digit4 => '4',
        WinitKeyCode::Digit5 => '5',
        WinitKeyCode::Digit6 => '6',
        WinitKeyCode::Digit7 => '7',
        WinitKeyCode::Digit8 => '8',
        WinitKeyCode::Digit9 => '9',

        WinitKeyCode::Backquote => '`',
        WinitKeyCode::Minus => '-',
        WinitKeyCode::Equal => '=',
        WinitKeyCode::BracketLeft => '[',
        WinitKeyCode::BracketRight => ']',
        WinitKeyCode::Backslash => '\\',
        WinitKeyCode::Semicolon => ';',
        WinitKeyCode::Quote => '\'',
        WinitKeyCode::Comma => ',',
        WinitKeyCode::Period => '.',
        WinitKeyCode::Slash => '/',

        _ => return None,
    };
    Some(c)
}

fn function_key_number(code: WinitKeyCode) -> Option<u8> {
    let n = match code {
        WinitKeyCode::F1 => 1,
        WinitKeyCode::F2 => 2,
        WinitKeyCode::F3 => 3,
        WinitKeyCode::F4 => 4,
        WinitKeyCode::F5 => 5,
        WinitKeyCode::F6 => 6,
        WinitKeyCode::F7 => 7,
        WinitKeyCode::F8 => 8,
        WinitKeyCode::F9 => 9,
        WinitKeyCode::F10 => 10,
        WinitKeyCode::F11 => 11,
        WinitKeyCode::F12 => 12,
        WinitKeyCode::F13 => 13,
        WinitKeyCode::F14 => 14,
        WinitKeyCode::F15 => 15,
        WinitKeyCode::F16 => 16,
        WinitKeyCode::F17 => 17,
        WinitKeyCode::F18 => 18,
        WinitKeyCode::F19 => 19,
        WinitKeyCode::F20 => 20,
        WinitKeyCode::F21 => 21,
        WinitKeyCode::F22 => 22,
        WinitKeyCode::F23 => 23,
        WinitKeyCode::F24 => 24,
        _ => return None,
    };
    Some(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::event::normalize_key_event;
    use crate::keymap::types::{KeyDescriptor, KeyPhase};

    #[test]
    fn test_character_key() {
        let event = raw_key_event_from_winit(
            ElementState::Released,
            &Key::Character("f".into()),
            PhysicalKey::Code(WinitKeyCode::KeyF),
            ModifiersState::empty(),
        );

        assert_eq!(event.kind, RawEventKind::Up);
        assert_eq!(event.code, KeyCode::Char('f'));
        assert_eq!(event.character, Some('f'));
        assert!(event.mods.is_empty());
    }

    #[test]
    fn test_shifted_symbol_uses_physical_key() {
        let event = raw_key_event_from_winit(
            ElementState::Pressed,
            &Key::Character("?".into()),
            PhysicalKey::Code(WinitKeyCode::Slash),
            ModifiersState::SHIFT,
        );

        assert_eq!(
            normalize_key_event(&event),
            Some(KeyDescriptor::new(KeyCode::Char('/'), Modifiers::SHIFT, KeyPhase::Press))
        );
        assert_eq!(event.character, Some('?'));
    }

    #[test]
    fn test_named_keys() {
        let escape = raw_key_event_from_winit(
            ElementState::Pressed,
            &Key::Named(NamedKey::Escape),
            PhysicalKey::Code(WinitKeyCode::Escape),
            ModifiersState::empty(),
        );
        assert!(normalize_key_event(&escape).unwrap().is_escape());

        let f2 = raw_key_event_from_winit(
            ElementState::Released,
            &Key::Named(NamedKey::F2),
            PhysicalKey::Code(WinitKeyCode::F2),
            ModifiersState::empty(),
        );
        assert_eq!(f2.code, KeyCode::F(2));
        assert_eq!(f2.character, None);
    }

    #[test]
    fn test_modifier_keys() {
        let event = raw_key_event_from_winit(
            ElementState::Pressed,
            &Key::Named(NamedKey::Shift),
            PhysicalKey::Code(WinitKeyCode::ShiftRight),
            ModifiersState::SHIFT,
        );
        assert_eq!(event.code, KeyCode::Shift);
        assert_eq!(normalize_key_event(&event), None);
    }

    #[test]
    fn test_multi_char_logical_key_has_no_character() {
        assert_eq!(character_from_logical(&Key::Character("ab".into())), None);
        assert_eq!(character_from_logical(&Key::Named(NamedKey::Space)), Some(' '));
    }

    #[test]
    fn test_all_modifiers() {
        let event = raw_key_event_from_winit(
            ElementState::Pressed,
            &Key::Character("a".into()),
            PhysicalKey::Code(WinitKeyCode::KeyA),
            ModifiersState::CONTROL | ModifiersState::ALT | ModifiersState::SUPER,
        );
        assert!(event.mods.ctrl());
        assert!(event.mods.alt());
        assert!(event.mods.meta());
        assert!(!event.mods.shift());
    }
}
