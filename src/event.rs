//! Values passed between a block's editor and the document.
//!
//! A block editor never reaches into its siblings. It reports what a key did
//! through a [`KeyOutcome`], and the document decides what a
//! [`NavigationIntent`] means for the block sequence.

/// A key, already stripped of the host's event representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    /// Insert a character at the caret.
    Char(char),
    Enter,
    Backspace,
    Delete,
    /// Indent the caret's line.
    Tab,
    /// Outdent the caret's line (Shift+Tab).
    BackTab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    WordLeft,
    WordRight,
}

/// Which sibling a navigation intent points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Previous,
    Next,
}

/// A request from a block editor to move focus to an adjacent block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationIntent {
    pub direction: NavDirection,
    /// Insert a fresh empty block between the current one and the target.
    pub create_next: bool,
    /// Remove the current block instead of rendering it.
    pub delete_current: bool,
}

impl NavigationIntent {
    /// Plain focus move with no structural change.
    pub const fn focus(direction: NavDirection) -> Self {
        Self {
            direction,
            create_next: false,
            delete_current: false,
        }
    }

    /// Move focus into a newly created block.
    pub const fn create(direction: NavDirection) -> Self {
        Self {
            direction,
            create_next: true,
            delete_current: false,
        }
    }
}

/// What a single key did to a block.
///
/// Both fields may be set: Enter can edit the text and still ask to move.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyOutcome {
    /// The block's new raw text, present only when the key changed it.
    pub text_changed: Option<String>,
    /// Navigation request for the document.
    pub intent: Option<NavigationIntent>,
}

impl KeyOutcome {
    /// The key only moved the caret, or did nothing.
    pub const fn none() -> Self {
        Self {
            text_changed: None,
            intent: None,
        }
    }

    pub const fn navigate(intent: NavigationIntent) -> Self {
        Self {
            text_changed: None,
            intent: Some(intent),
        }
    }

    pub const fn edited(text: String) -> Self {
        Self {
            text_changed: Some(text),
            intent: None,
        }
    }
}
