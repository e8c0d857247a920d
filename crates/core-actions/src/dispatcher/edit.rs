//! Text mutation: entering Edit mode, deletes, yanks, pastes, replace and the
//! native typing path used while the surface is in Edit mode.
//!
//! Handlers that can be repeated by a count (`x`, `X`, `dd`, `dw`) return the
//! removed text as `Option<String>` and are driven by
//! [`repeat_action`](crate::repeat_action), which folds the pieces into the
//! clipboard. `None` means the iteration was a no-op.
//!
//! Placeholder rule: an empty line the engine padded with a
//! [`PLACEHOLDER`](core_text::PLACEHOLDER) is treated as content-free. It is
//! never copied, `x`/`dw` refuse to delete it and the first real edit on the
//! line replaces it.

use super::{motion, on_tracked_placeholder, select_cell};
use crate::EditorContext;
use core_state::Mode;
use core_text::{InsertPlacement, TextAccessor};

/// Delete `[from, to)`, tracking the placeholder the surface leaves behind
/// when the whole buffer goes.
fn delete_range<T: TextAccessor>(cx: &mut EditorContext<'_, T>, from: usize, to: usize) -> String {
    let whole = from == 0 && to >= cx.text.len();
    let removed = cx.text.delete(from, to);
    cx.state.placeholder = whole.then_some(0);
    removed
}

/// Drop the tracked placeholder under the caret. Returns whether one was removed.
fn take_placeholder<T: TextAccessor>(cx: &mut EditorContext<'_, T>) -> bool {
    if !on_tracked_placeholder(cx) {
        return false;
    }
    cx.state.placeholder = None;
    cx.text.remove_empty_line_placeholder()
}

/// Text of the line holding `pos`, empty when that line is a tracked placeholder.
fn line_content<T: TextAccessor>(cx: &EditorContext<'_, T>, pos: usize) -> String {
    let start = cx.text.line_start(pos);
    if cx.state.placeholder == Some(start) && cx.text.line_len(start) == 1 {
        return String::new();
    }
    cx.text.line_text(pos)
}

/// Lines from the caret line to the end of the buffer, inclusive.
pub fn lines_from_caret<T: TextAccessor>(cx: &EditorContext<'_, T>) -> u32 {
    let start = cx.text.line_start(cx.text.cursor());
    let rest = cx.text.slice(start, cx.text.len());
    let lines = rest.matches('\n').count() + 1;
    u32::try_from(lines).unwrap_or(u32::MAX)
}

/// `a`: caret after the selection.
pub fn append<T: TextAccessor>(cx: &mut EditorContext<'_, T>) {
    if take_placeholder(cx) {
        return;
    }
    let sel = cx.text.selection();
    let after = sel.hi().max(sel.lo() + 1).min(cx.text.len());
    cx.text.select(after, after);
}

/// `A`.
pub fn append_line_tail<T: TextAccessor>(cx: &mut EditorContext<'_, T>) {
    motion::move_to_current_line_tail(cx);
    append(cx);
}

/// `i` / Insert: caret before the selection.
pub fn insert<T: TextAccessor>(cx: &mut EditorContext<'_, T>) {
    if take_placeholder(cx) {
        return;
    }
    let lo = cx.text.cursor();
    cx.text.select(lo, lo);
}

/// `I`.
pub fn insert_line_head<T: TextAccessor>(cx: &mut EditorContext<'_, T>) {
    motion::move_to_current_line_head(cx);
    insert(cx);
}

/// `o`: open a line below. The new line carries a tracked placeholder that
/// the first typed character replaces.
pub fn append_new_line<T: TextAccessor>(cx: &mut EditorContext<'_, T>) {
    take_placeholder(cx);
    let at = cx.text.line_end(cx.text.cursor());
    cx.text.insert(at, "\n ", InsertPlacement::CaretAfter);
    cx.text.select(at + 1, at + 2);
    cx.state.placeholder = Some(at + 1);
    tracing::trace!(target: "actions.edit", op = "append_new_line", at, "open_line");
}

/// `O`: open a line above.
pub fn insert_new_line<T: TextAccessor>(cx: &mut EditorContext<'_, T>) {
    take_placeholder(cx);
    let at = cx.text.line_start(cx.text.cursor());
    cx.text.insert(at, " \n", InsertPlacement::CaretAfter);
    cx.text.select(at, at + 1);
    cx.state.placeholder = Some(at);
    tracing::trace!(target: "actions.edit", op = "insert_new_line", at, "open_line");
}

/// `x` / Delete in General, `d` in Visual.
pub fn delete_selected<T: TextAccessor>(cx: &mut EditorContext<'_, T>) -> Option<String> {
    if cx.state.mode != Mode::Visual && on_tracked_placeholder(cx) {
        return None;
    }
    let sel = cx.text.selection();
    if sel.is_collapsed() {
        return None;
    }
    let removed = delete_range(cx, sel.lo(), sel.hi());
    select_cell(cx, sel.lo());
    cx.state.clipboard.linewise = false;
    Some(removed)
}

/// `X`: delete the character before the caret cell on the same line.
pub fn delete_previous<T: TextAccessor>(cx: &mut EditorContext<'_, T>) -> Option<String> {
    let caret = cx.text.cursor();
    if caret == 0 || cx.text.prev_symbol(caret) == Some('\n') {
        return None;
    }
    let removed = delete_range(cx, caret - 1, caret);
    select_cell(cx, caret - 1);
    cx.state.clipboard.linewise = false;
    Some(removed)
}

/// `dd`: remove the caret line with its line break. Returns the line plus `\n`.
pub fn del_curr_line<T: TextAccessor>(cx: &mut EditorContext<'_, T>) -> Option<String> {
    let caret = cx.text.cursor();
    let start = cx.text.line_start(caret);
    let end = cx.text.line_end(caret);
    let line = line_content(cx, caret);
    let len = cx.text.len();
    if end < len {
        delete_range(cx, start, end + 1);
    } else if start > 0 {
        delete_range(cx, start - 1, end);
    } else {
        delete_range(cx, start, end);
    }
    let len = cx.text.len();
    let target = if start < len {
        start
    } else {
        cx.text.line_start(len)
    };
    select_cell(cx, target);
    cx.state.clipboard.linewise = true;
    tracing::trace!(target: "actions.edit", op = "delete_line", start, end, "delete");
    Some(format!("{line}\n"))
}

/// `dw`: delete to the next word start, never past the line end.
pub fn delete_word<T: TextAccessor>(cx: &mut EditorContext<'_, T>) -> Option<String> {
    if on_tracked_placeholder(cx) {
        return None;
    }
    let caret = cx.text.cursor();
    let line_end = cx.text.line_end(caret);
    let (_, next) = cx.text.word_span(caret);
    let end = next.map_or(line_end, |n| n.min(line_end));
    if end <= caret {
        return None;
    }
    let removed = delete_range(cx, caret, end);
    select_cell(cx, caret);
    cx.state.clipboard.linewise = false;
    Some(removed)
}

/// `y` in Visual.
pub fn copy_char<T: TextAccessor>(cx: &mut EditorContext<'_, T>) {
    let text = cx.text.selected_text();
    cx.state.clipboard.set(text, false);
}

/// `yy`: yank `count` lines starting at the caret line, capped at the last line.
pub fn copy_current_line<T: TextAccessor>(cx: &mut EditorContext<'_, T>, count: u32) {
    let count = count.min(lines_from_caret(cx));
    let mut pos = Some(cx.text.cursor());
    crate::repeat_action(cx, count, |cx| {
        let at = pos?;
        let line = line_content(cx, at);
        pos = cx.text.next_line_start(at);
        Some(format!("{line}\n"))
    });
    cx.state.clipboard.linewise = true;
}

/// `yw`: yank `count` words from the caret; the last word stops at its line end.
pub fn copy_word<T: TextAccessor>(cx: &mut EditorContext<'_, T>, count: u32) {
    if on_tracked_placeholder(cx) {
        return;
    }
    let start = cx.text.cursor();
    let len = cx.text.len();
    let times = count.max(1);
    let mut end = start;
    for i in 0..times {
        let next = cx.text.word_span(end).1.unwrap_or(len);
        end = if i + 1 == times {
            next.min(cx.text.line_end(end))
        } else {
            next
        };
    }
    if end > start {
        let text = cx.text.slice(start, end);
        cx.state.clipboard.set(text, false);
    }
}

fn clipboard_text<T: TextAccessor>(cx: &EditorContext<'_, T>) -> Option<String> {
    cx.state
        .clipboard
        .get()
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}

/// `p`: linewise content goes below the caret line, charwise after the caret
/// cell. The caret lands on the first pasted line or the last pasted char.
pub fn paste_after<T: TextAccessor>(cx: &mut EditorContext<'_, T>) -> bool {
    let Some(clip) = clipboard_text(cx) else {
        return false;
    };
    let replaced = take_placeholder(cx);
    let caret = cx.text.cursor();
    if cx.state.clipboard.linewise {
        let at = cx.text.line_end(caret);
        cx.text.insert(at, &format!("\n{clip}"), InsertPlacement::CaretAfter);
        cx.state.placeholder = None;
        select_cell(cx, at + 1);
    } else {
        let at = if replaced {
            caret
        } else {
            (caret + 1).min(cx.text.len())
        };
        cx.text.insert(at, &clip, InsertPlacement::CaretAfter);
        cx.state.placeholder = None;
        select_cell(cx, at + clip.chars().count() - 1);
    }
    tracing::trace!(target: "actions.edit", op = "paste_after", linewise = cx.state.clipboard.linewise, "paste");
    true
}

/// `P`: linewise content goes above the caret line, charwise at the caret cell.
pub fn paste_before<T: TextAccessor>(cx: &mut EditorContext<'_, T>) -> bool {
    let Some(clip) = clipboard_text(cx) else {
        return false;
    };
    take_placeholder(cx);
    let caret = cx.text.cursor();
    if cx.state.clipboard.linewise {
        let at = cx.text.line_start(caret);
        cx.text.insert(at, &format!("{clip}\n"), InsertPlacement::CaretAfter);
        cx.state.placeholder = None;
        select_cell(cx, at);
    } else {
        cx.text.insert(caret, &clip, InsertPlacement::CaretAfter);
        cx.state.placeholder = None;
        select_cell(cx, caret + clip.chars().count() - 1);
    }
    tracing::trace!(target: "actions.edit", op = "paste_before", linewise = cx.state.clipboard.linewise, "paste");
    true
}

/// `s`: remove `count` chars (or the Visual range) into the clipboard and
/// leave a collapsed caret for Edit mode.
pub fn substitute<T: TextAccessor>(cx: &mut EditorContext<'_, T>, count: u32) {
    if take_placeholder(cx) {
        return;
    }
    let sel = cx.text.selection();
    let from = sel.lo();
    let to = if cx.state.mode == Mode::Visual {
        sel.hi()
    } else {
        (from + count.max(1) as usize).min(cx.text.line_end(from))
    };
    if to > from {
        let removed = delete_range(cx, from, to);
        cx.state.clipboard.set(removed, false);
    }
    cx.text.select(from, from);
}

/// `r{ch}`: overwrite the caret cell (General) or every non-newline char of
/// the range (Visual, which then returns to General).
pub fn replace_with<T: TextAccessor>(cx: &mut EditorContext<'_, T>, ch: char) -> bool {
    let sel = cx.text.selection();
    let (lo, hi) = match cx.state.mode {
        Mode::Visual => (sel.lo(), sel.hi()),
        _ => (sel.lo(), sel.lo() + 1),
    };
    let original = cx.text.slice(lo, hi);
    if original.is_empty() || original == "\n" {
        return false;
    }
    cx.record();
    let replacement: String = original
        .chars()
        .map(|c| if c == '\n' { c } else { ch })
        .collect();
    let width = replacement.chars().count();
    cx.text.insert(lo, &replacement, InsertPlacement::CaretAfter);
    cx.text.delete(lo + width, hi + width);
    cx.state.placeholder = None;
    cx.text.select(lo, lo + 1);
    if cx.state.mode == Mode::Visual {
        super::mode::switch_mode_to(cx, Mode::General);
    }
    tracing::trace!(target: "actions.edit", op = "replace", lo, hi, "replace");
    true
}

/// Edit mode typing: replaces a non-empty selection or a tracked placeholder.
pub fn insert_typed<T: TextAccessor>(cx: &mut EditorContext<'_, T>, text: &str) {
    let width = text.chars().count();
    if width == 0 {
        return;
    }
    let sel = cx.text.selection();
    if !sel.is_collapsed() {
        delete_range(cx, sel.lo(), sel.hi());
    }
    let caret = cx.text.cursor();
    if on_tracked_placeholder(cx) {
        let start = cx.text.line_start(caret);
        cx.text.insert(start, text, InsertPlacement::CaretAfter);
        cx.text.delete(start + width, start + width + 1);
        cx.text.select(start + width, start + width);
    } else {
        cx.text.insert(caret, text, InsertPlacement::CaretAfter);
    }
    cx.state.placeholder = None;
}

/// Edit mode Backspace.
pub fn backspace<T: TextAccessor>(cx: &mut EditorContext<'_, T>) -> bool {
    let sel = cx.text.selection();
    if !sel.is_collapsed() {
        delete_range(cx, sel.lo(), sel.hi());
        return true;
    }
    take_placeholder(cx);
    let caret = cx.text.cursor();
    if caret == 0 {
        return false;
    }
    delete_range(cx, caret - 1, caret);
    cx.text.select(caret - 1, caret - 1);
    true
}

/// Edit mode Delete.
pub fn forward_delete<T: TextAccessor>(cx: &mut EditorContext<'_, T>) -> bool {
    let sel = cx.text.selection();
    if !sel.is_collapsed() {
        delete_range(cx, sel.lo(), sel.hi());
        return true;
    }
    if take_placeholder(cx) {
        return true;
    }
    let caret = cx.text.cursor();
    if caret >= cx.text.len() {
        return false;
    }
    delete_range(cx, caret, caret + 1);
    cx.text.select(caret, caret);
    true
}
