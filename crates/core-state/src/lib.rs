//! Editor state for the active input surface: mode, sticky column, clipboard
//! and the small pieces of bookkeeping the engine carries between key events.
//!
//! Lifecycle:
//! - One [`EditorState`] exists per session and describes whichever surface
//!   currently has focus. Focus changes call [`EditorState::reset`].
//! - Undo history is the exception: it is keyed per surface in
//!   [`HistoryStore`] and survives focus changes until the surface is detached.
//!
//! The buffer and selection themselves are not stored here; they live behind
//! the surface's `TextAccessor`.

use std::fmt;

pub mod undo;
pub use undo::{DEFAULT_HISTORY_DEPTH, HistoryRing, HistoryStore, Snapshot};

/// Editor modes.
///
/// `Command` is reserved: no binding requires it and nothing enters it yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Raw typing passthrough (vim insert mode). Initial mode of a fresh surface.
    #[default]
    Edit,
    /// Caret is a one character selection (vim normal mode).
    General,
    /// Range selection grown and shrunk by motions.
    Visual,
    Command,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Edit => "edit",
            Mode::General => "general",
            Mode::Visual => "visual",
            Mode::Command => "command",
        }
    }

    /// Modes in which key events are routed through the binding table.
    pub fn is_command_mode(&self) -> bool {
        matches!(self, Mode::General | Mode::Visual)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single clipboard slot.
///
/// `linewise` marks content yanked or deleted as whole lines; paste then
/// inserts it as new lines instead of inline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Clipboard {
    pub text: Option<String>,
    pub linewise: bool,
}

impl Clipboard {
    pub fn set(&mut self, text: impl Into<String>, linewise: bool) {
        self.text = Some(text.into());
        self.linewise = linewise;
    }

    pub fn get(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

#[derive(Debug, Clone, Default)]
pub struct EditorState {
    pub mode: Mode,
    /// Sticky column for vertical motions, 0-based. `None` recomputes from the caret;
    /// `Some(usize::MAX)` sticks to line ends.
    pub sticky_column: Option<usize>,
    pub clipboard: Clipboard,
    /// Offset of an empty-line placeholder the engine inserted and nothing has typed into.
    pub placeholder: Option<usize>,
    /// Set by `r`: the next printable key replaces the caret cell.
    pub replace_pending: bool,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything tied to the previously focused surface.
    pub fn reset(&mut self) {
        tracing::debug!(target: "state", mode = %self.mode, "state_reset");
        *self = Self::default();
    }
}
