//! Single-character key table
//!
//! Maps a printable character to the physical key that produces it and the
//! modifiers needed, assuming a US layout. Both the config parser and the
//! raw event synthesizers go through this table, so a label and the
//! keystroke that types it always agree.

use super::types::{KeyCode, Modifiers};

/// Base key and modifiers producing `c`, or `None` if `c` has no key
pub fn key_for_char(c: char) -> Option<(KeyCode, Modifiers)> {
    if c == ' ' {
        return Some((KeyCode::Space, Modifiers::NONE));
    }

    if c.is_ascii_lowercase() || c.is_ascii_digit() {
        return Some((KeyCode::Char(c), Modifiers::NONE));
    }

    if c.is_ascii_uppercase() {
        return Some((KeyCode::Char(c.to_ascii_lowercase()), Modifiers::SHIFT));
    }

    if let Some(base) = shifted_symbol_base(c) {
        return Some((KeyCode::Char(base), Modifiers::SHIFT));
    }

    if matches!(
        c,
        '`' | '-' | '=' | '[' | ']' | '\\' | ';' | '\'' | ',' | '.' | '/'
    ) {
        return Some((KeyCode::Char(c), Modifiers::NONE));
    }

    // Non-ASCII letters: assume a dedicated key, shifted for upper case
    if c.is_alphabetic() {
        let mut lower = c.to_lowercase();
        let base = lower.next()?;
        if lower.next().is_some() {
            return None;
        }
        let mods = if c.is_uppercase() {
            Modifiers::SHIFT
        } else {
            Modifiers::NONE
        };
        return Some((KeyCode::Char(base), mods));
    }

    None
}

/// Unshifted key under a shifted symbol on a US keyboard
fn shifted_symbol_base(c: char) -> Option<char> {
    let base = match c {
        '~' => '`',
        '!' => '1',
        '@' => '2',
        '#' => '3',
        '$' => '4',
        '%' => '5',
        '^' => '6',
        '&' => '7',
        '*' => '8',
        '(' => '9',
        ')' => '0',
        '_' => '-',
        '+' => '=',
        '{' => '[',
        '}' => ']',
        '|' => '\\',
        ':' => ';',
        '"' => '\'',
        '<' => ',',
        '>' => '.',
        '?' => '/',
        _ => return None,
    };
    Some(base)
}
