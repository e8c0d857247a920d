//! Modal editing engine: mode transitions, motions, edits and key dispatch.
//!
//! Everything operates on an [`EditorContext`]: the focused surface's
//! [`TextAccessor`], the session's [`EditorState`] and the surface's undo
//! [`HistoryRing`]. Handlers are plain generic functions grouped by concern
//! under [`dispatcher`]; the [`Dispatcher`] owns the route table and pending
//! key state and decides which handler a key event runs.
//!
//! Selection conventions (see `core_text` for the directional model):
//! * General mode: the selection is exactly one character, the caret cell.
//! * Visual mode: anchor cell through caret cell, inclusive, either direction.
//! * Edit mode: a collapsed caret; the host types into the surface.

pub mod dispatcher;
pub mod repeat;

pub use dispatcher::{DispatchResult, Dispatcher, edit, mode, motion, undo};
pub use repeat::repeat_action;

use core_state::{EditorState, HistoryRing, Mode};
use core_text::TextAccessor;

/// Borrowed view of everything a handler may touch.
pub struct EditorContext<'a, T: TextAccessor> {
    pub text: &'a mut T,
    pub state: &'a mut EditorState,
    pub history: &'a mut HistoryRing,
}

impl<'a, T: TextAccessor> EditorContext<'a, T> {
    pub fn new(text: &'a mut T, state: &'a mut EditorState, history: &'a mut HistoryRing) -> Self {
        Self {
            text,
            state,
            history,
        }
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    /// Snapshot the buffer and caret into history.
    pub fn record(&mut self) {
        self.record_at(self.text.cursor());
    }

    pub fn record_at(&mut self, position: usize) {
        self.history.push(self.text.text(), position);
    }
}
