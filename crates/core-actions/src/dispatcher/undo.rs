//! Undo: restore the most recent history snapshot of the focused surface.
//!
//! Snapshots are pushed by recorded bindings (and by Edit mode typing in the
//! session) before the buffer changes. Restoring replaces the whole value and
//! selects the character cell at the recorded caret offset. There is no redo.

use super::select_cell;
use crate::EditorContext;
use core_text::TextAccessor;

/// `u`. Returns `false` when the history is empty.
pub fn back_to_history<T: TextAccessor>(cx: &mut EditorContext<'_, T>) -> bool {
    let Some(snapshot) = cx.history.pop() else {
        tracing::trace!(target: "actions.undo", "history_empty");
        return false;
    };
    cx.text.set_text(&snapshot.text);
    cx.state.placeholder = None;
    let cell = select_cell(cx, snapshot.position);
    tracing::trace!(
        target: "actions.undo",
        position = snapshot.position,
        cell,
        remaining = cx.history.len(),
        "restored"
    );
    true
}
