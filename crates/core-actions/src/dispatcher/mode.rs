//! Mode transitions.
//!
//! Entering General or Visual normalises the selection to a one character
//! caret cell (adding the empty-line placeholder when needed); entering Edit
//! collapses the selection to an insertion caret. Switching to the current
//! mode is a no-op, so a second `switch_mode_to(General)` never moves the
//! selection.

use super::select_cell;
use crate::EditorContext;
use core_state::Mode;
use core_text::TextAccessor;

pub fn switch_mode_to<T: TextAccessor>(cx: &mut EditorContext<'_, T>, next: Mode) {
    let current = cx.state.mode;
    if current == next {
        return;
    }
    match next {
        Mode::General | Mode::Visual => {
            let cell = caret_cell(cx, current);
            select_cell(cx, cell);
            cx.state.sticky_column = None;
        }
        Mode::Edit => {
            let sel = cx.text.selection();
            if !sel.is_collapsed() {
                let caret = if sel.start < sel.end { sel.end - 1 } else { sel.end };
                cx.text.select(caret, caret);
            }
        }
        Mode::Command => {}
    }
    cx.state.mode = next;
    let sel = cx.text.selection();
    tracing::debug!(target: "actions.mode", from = %current, to = %next, start = sel.start, end = sel.end, "mode_switch");
}

/// `v`: enter Visual, or go back to General when already there.
pub fn switch_mode_to_visual<T: TextAccessor>(cx: &mut EditorContext<'_, T>) {
    let next = if cx.state.mode == Mode::Visual {
        Mode::General
    } else {
        Mode::Visual
    };
    switch_mode_to(cx, next);
}

/// Cell the caret occupies before a switch into General/Visual.
fn caret_cell<T: TextAccessor>(cx: &EditorContext<'_, T>, from: Mode) -> usize {
    let sel = cx.text.selection();
    match from {
        Mode::General | Mode::Visual => sel.caret_cell(),
        Mode::Edit | Mode::Command => {
            if sel.is_backward() || cx.text.is_line_start(sel.end) {
                sel.end
            } else {
                sel.end - 1
            }
        }
    }
}
