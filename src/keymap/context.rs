//! Focus state that decides whether the leader key may open
//!
//! The leader gesture is usually a plain character key, so it must stay
//! inert while the user is typing into a text field or filtering a popup.

/// Snapshot of the host's focus state at the time of the trigger
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusContext {
    /// A text component (editor, input field) owns keyboard focus
    pub text_input_focused: bool,
    /// A popup's speed-search filter is capturing characters
    pub speed_search_active: bool,
}

impl FocusContext {
    /// Nothing is capturing text
    pub fn idle() -> Self {
        Self::default()
    }

    /// Focus is in a text component
    pub fn text_input() -> Self {
        Self {
            text_input_focused: true,
            ..Self::default()
        }
    }

    /// A speed-search filter is active
    pub fn speed_search() -> Self {
        Self {
            speed_search_active: true,
            ..Self::default()
        }
    }

    pub fn leader_enabled(&self) -> bool {
        !self.text_input_focused && !self.speed_search_active
    }
}
