//! Toolkit-free raw key events and their normalization into descriptors
//!
//! Hosts translate their native keyboard events into [`RawKeyEvent`] at the
//! boundary (see `winit_adapter` for one such translation); everything past
//! this point only sees [`KeyDescriptor`]s.

use super::layout::key_for_char;
use super::types::{KeyCode, KeyDescriptor, KeyPhase, Modifiers};

const ESC: char = '\u{1b}';

/// What happened to the key
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RawEventKind {
    Down,
    Up,
    /// A character was produced (no physical key information)
    Typed,
}

/// A keyboard event as delivered by the host
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawKeyEvent {
    pub kind: RawEventKind,
    pub code: KeyCode,
    /// Modifiers held while the event was generated
    pub mods: Modifiers,
    /// The character the event resolved to, if any
    pub character: Option<char>,
}

impl RawKeyEvent {
    pub const fn new(
        kind: RawEventKind,
        code: KeyCode,
        mods: Modifiers,
        character: Option<char>,
    ) -> Self {
        Self {
            kind,
            code,
            mods,
            character,
        }
    }

    /// Key-down of a non-character key
    pub const fn press(code: KeyCode, mods: Modifiers) -> Self {
        Self::new(RawEventKind::Down, code, mods, None)
    }

    /// Key-up of a non-character key
    pub const fn release(code: KeyCode, mods: Modifiers) -> Self {
        Self::new(RawEventKind::Up, code, mods, None)
    }

    /// A character-typed event
    pub const fn typed(c: char) -> Self {
        Self::new(RawEventKind::Typed, KeyCode::Unidentified, Modifiers::NONE, Some(c))
    }

    /// Key-down of the key that types `c`, with the modifiers it needs
    pub fn press_char(c: char) -> Self {
        Self::for_char(RawEventKind::Down, c)
    }

    /// Key-up of the key that types `c`, with the modifiers it needs
    pub fn release_char(c: char) -> Self {
        Self::for_char(RawEventKind::Up, c)
    }

    fn for_char(kind: RawEventKind, c: char) -> Self {
        let (code, mods) = key_for_char(c).unwrap_or((KeyCode::Unidentified, Modifiers::NONE));
        Self::new(kind, code, mods, Some(c))
    }
}

/// Convert a raw event into a descriptor comparable with binding keys
///
/// Returns `None` for events with nothing to dispatch: bare modifier keys,
/// typed events without a character, and unidentified keys whose character
/// has no entry in the keyboard table.
pub fn normalize_key_event(event: &RawKeyEvent) -> Option<KeyDescriptor> {
    let phase = match event.kind {
        RawEventKind::Typed => {
            let c = event.character?;
            if c == ESC {
                return Some(KeyDescriptor::pressed(KeyCode::Escape, Modifiers::NONE));
            }
            return Some(KeyDescriptor::pressed(KeyCode::Character(c), Modifiers::NONE));
        }
        RawEventKind::Down => KeyPhase::Press,
        RawEventKind::Up => KeyPhase::Release,
    };

    let code = match event.code {
        code if code.is_modifier() => return None,
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        KeyCode::Unidentified => {
            let (code, mods) = key_for_char(event.character?)?;
            return Some(KeyDescriptor::new(code, mods.union(event.mods), phase));
        }
        code => code,
    };

    Some(KeyDescriptor::new(code, event.mods, phase))
}
