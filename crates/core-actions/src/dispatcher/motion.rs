//! Caret and range motions.
//!
//! Every motion reads the current selection and mode, checks its own bounds
//! and either writes a new selection or leaves everything untouched (returning
//! `false`). No motion ever fails.
//!
//! General mode moves the one character caret cell. Visual mode moves the
//! caret cell of the range and reconciles it against the anchor with
//! [`determine_cursor_in_visual_mode`], so the anchor character stays selected
//! whichever side of it the caret travels to.
//!
//! Sticky column: horizontal motions refresh `EditorState::sticky_column`,
//! head and tail pin it to `0` / `usize::MAX`, vertical motions keep it.

use super::mode::switch_mode_to;
use super::{release_placeholder, select_cell};
use crate::EditorContext;
use core_state::Mode;
use core_text::{PlaceholderOutcome, Selection, TextAccessor};

/// Range covering the anchor cell of `sel` and the new caret cell `caret`.
///
/// A caret at or after the anchor yields a forward range ending after the
/// caret; a caret before it yields a backward range starting after the
/// anchor. The result is never empty.
pub fn determine_cursor_in_visual_mode(sel: Selection, caret: usize) -> Selection {
    let anchor = sel.anchor_cell();
    if caret >= anchor {
        Selection::new(anchor, caret + 1)
    } else {
        Selection::new(anchor + 1, caret)
    }
}

fn move_visual_caret<T: TextAccessor>(cx: &mut EditorContext<'_, T>, caret: usize) {
    let next = determine_cursor_in_visual_mode(cx.text.selection(), caret);
    cx.text.select(next.start, next.end);
}

/// Offset of the cell the caret occupies in the current mode.
fn caret_of<T: TextAccessor>(cx: &EditorContext<'_, T>) -> usize {
    let sel = cx.text.selection();
    match cx.state.mode {
        Mode::Visual => sel.caret_cell(),
        _ => sel.lo(),
    }
}

/// 0-based column of the caret cell.
pub fn calc_offset_of_line_start<T: TextAccessor>(cx: &EditorContext<'_, T>) -> usize {
    let caret = caret_of(cx);
    caret - cx.text.line_start(caret)
}

fn update_offset_of_line_start<T: TextAccessor>(cx: &mut EditorContext<'_, T>) {
    cx.state.sticky_column = Some(calc_offset_of_line_start(cx));
}

pub fn select_next_character<T: TextAccessor>(cx: &mut EditorContext<'_, T>) -> bool {
    let len = cx.text.len();
    if cx.state.mode == Mode::Visual {
        let caret = caret_of(cx);
        if caret + 1 >= len || cx.text.symbol(caret) == Some('\n') {
            return false;
        }
        move_visual_caret(cx, caret + 1);
    } else {
        let caret = cx.text.cursor();
        if caret + 1 >= len || cx.text.symbol(caret + 1) == Some('\n') {
            return false;
        }
        cx.text.select(caret + 1, caret + 2);
    }
    update_offset_of_line_start(cx);
    true
}

pub fn select_prev_character<T: TextAccessor>(cx: &mut EditorContext<'_, T>) -> bool {
    let caret = caret_of(cx);
    if caret == 0 || cx.text.prev_symbol(caret) == Some('\n') {
        return false;
    }
    if cx.state.mode == Mode::Visual {
        move_visual_caret(cx, caret - 1);
    } else {
        cx.text.select(caret - 1, caret);
    }
    update_offset_of_line_start(cx);
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Vertical {
    Up,
    Down,
}

pub fn select_next_line<T: TextAccessor>(cx: &mut EditorContext<'_, T>) -> bool {
    select_line(cx, Vertical::Down)
}

pub fn select_prev_line<T: TextAccessor>(cx: &mut EditorContext<'_, T>) -> bool {
    select_line(cx, Vertical::Up)
}

fn select_line<T: TextAccessor>(cx: &mut EditorContext<'_, T>, dir: Vertical) -> bool {
    let caret = caret_of(cx);
    let target = match dir {
        Vertical::Down => cx.text.next_line_start(caret),
        Vertical::Up => cx.text.prev_line_start(caret),
    };
    let Some(target) = target else {
        return false;
    };
    let column = cx
        .state
        .sticky_column
        .unwrap_or_else(|| caret - cx.text.line_start(caret));
    cx.state.sticky_column = Some(column);
    let moved = if cx.state.mode == Mode::Visual {
        visual_line(cx, target, column)
    } else {
        general_line(cx, target, column)
    };
    tracing::trace!(target: "actions.motion", ?dir, column, moved, "vertical");
    moved
}

fn general_line<T: TextAccessor>(cx: &mut EditorContext<'_, T>, target: usize, column: usize) -> bool {
    let target = release_placeholder(cx, target);
    if cx.text.is_empty_line(target) {
        select_cell(cx, target);
        return true;
    }
    let len = cx.text.line_len(target);
    let cell = target + column.min(len - 1);
    cx.text.select(cell, cell + 1);
    true
}

fn visual_line<T: TextAccessor>(cx: &mut EditorContext<'_, T>, target: usize, column: usize) -> bool {
    if cx.text.is_empty_line(target) {
        let sel = cx.text.selection();
        if cx.text.maybe_add_empty_line_placeholder(target) == PlaceholderOutcome::Added {
            let shift = |p: usize| if p > target { p + 1 } else { p };
            cx.text.select(shift(sel.start), shift(sel.end));
            cx.state.placeholder = Some(target);
        }
        move_visual_caret(cx, target);
        return true;
    }
    let last = cx.text.len().saturating_sub(1);
    let cell = (target + column.min(cx.text.line_len(target))).min(last);
    move_visual_caret(cx, cell);
    true
}

/// `w`: caret to the start of the next word.
pub fn move_to_next_word<T: TextAccessor>(cx: &mut EditorContext<'_, T>) -> bool {
    let caret = caret_of(cx);
    let (_, next) = cx.text.word_span(caret);
    let Some(next) = next else {
        return false;
    };
    if cx.state.mode == Mode::Visual {
        move_visual_caret(cx, next);
    } else {
        let next = release_placeholder(cx, next);
        cx.text.select(next, next + 1);
    }
    update_offset_of_line_start(cx);
    true
}

/// `0` / Home.
pub fn move_to_current_line_head<T: TextAccessor>(cx: &mut EditorContext<'_, T>) {
    let caret = caret_of(cx);
    let head = cx.text.line_start(caret);
    if cx.state.mode == Mode::Visual {
        move_visual_caret(cx, head);
    } else {
        cx.text.select(head, head + 1);
    }
    cx.state.sticky_column = Some(0);
}

/// `$` / End.
pub fn move_to_current_line_tail<T: TextAccessor>(cx: &mut EditorContext<'_, T>) {
    let caret = caret_of(cx);
    let head = cx.text.line_start(caret);
    let tail = cx.text.line_end(caret).saturating_sub(1).max(head);
    if cx.state.mode == Mode::Visual {
        move_visual_caret(cx, tail);
    } else if tail < cx.text.line_end(caret) {
        cx.text.select(tail, tail + 1);
    }
    cx.state.sticky_column = Some(usize::MAX);
}

/// `gg`.
pub fn move_to_first_line<T: TextAccessor>(cx: &mut EditorContext<'_, T>) {
    if cx.state.mode == Mode::Visual {
        move_visual_caret(cx, 0);
    } else {
        let target = release_placeholder(cx, 0);
        select_cell(cx, target);
    }
    update_offset_of_line_start(cx);
}

/// `G`: start of the line holding the final character.
pub fn move_to_last_line<T: TextAccessor>(cx: &mut EditorContext<'_, T>) {
    if cx.state.mode == Mode::Visual {
        let target = cx.text.last_line_start();
        move_visual_caret(cx, target);
    } else {
        let target = cx.text.last_line_start();
        let target = release_placeholder(cx, target);
        let target = cx.text.line_start(target);
        select_cell(cx, target);
    }
    update_offset_of_line_start(cx);
}

/// Pointer placement at `offset`. A tracked placeholder on the line being
/// left is dropped; command modes land in General on the resulting cell.
pub fn place_caret<T: TextAccessor>(cx: &mut EditorContext<'_, T>, offset: usize) {
    let offset = release_placeholder(cx, offset.min(cx.text.len()));
    cx.text.select(offset, offset);
    cx.state.sticky_column = None;
    if cx.state.mode.is_command_mode() {
        cx.state.mode = Mode::Edit;
        switch_mode_to(cx, Mode::General);
    }
    tracing::trace!(target: "actions.motion", offset, mode = %cx.state.mode, "place_caret");
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_state::{EditorState, HistoryRing};
    use core_text::TextArea;

    #[test]
    fn reconcile_keeps_anchor_cell() {
        let fwd = Selection::new(25, 26);
        assert_eq!(determine_cursor_in_visual_mode(fwd, 24), Selection::new(26, 24));
        assert_eq!(determine_cursor_in_visual_mode(fwd, 27), Selection::new(25, 28));
        assert_eq!(determine_cursor_in_visual_mode(fwd, 25), Selection::new(25, 26));
        let back = Selection::new(26, 23);
        assert_eq!(determine_cursor_in_visual_mode(back, 25), Selection::new(25, 26));
        assert_eq!(determine_cursor_in_visual_mode(back, 30), Selection::new(25, 31));
    }

    #[test]
    fn tail_on_last_line_without_newline() {
        let mut text = TextArea::new("ab\ncde");
        let mut state = EditorState::new();
        state.mode = Mode::General;
        let mut history = HistoryRing::default();
        text.select(3, 4);
        let mut cx = EditorContext::new(&mut text, &mut state, &mut history);
        move_to_current_line_tail(&mut cx);
        assert_eq!(cx.text.selected_text(), "e");
        assert_eq!(cx.state.sticky_column, Some(usize::MAX));
        assert!(select_prev_line(&mut cx));
        assert_eq!(cx.text.selected_text(), "b");
    }

    #[test]
    fn vertical_motion_at_edges_is_noop() {
        let mut text = TextArea::new("ab\ncd");
        let mut state = EditorState::new();
        state.mode = Mode::General;
        let mut history = HistoryRing::default();
        text.select(0, 1);
        let mut cx = EditorContext::new(&mut text, &mut state, &mut history);
        assert!(!select_prev_line(&mut cx));
        assert_eq!(cx.text.selection(), Selection::new(0, 1));
        cx.text.select(4, 5);
        assert!(!select_next_line(&mut cx));
        assert_eq!(cx.text.selection(), Selection::new(4, 5));
    }

    #[test]
    fn passing_through_empty_line_leaves_no_placeholder() {
        let mut text = TextArea::new("abc\n\nxyz");
        let mut state = EditorState::new();
        state.mode = Mode::General;
        let mut history = HistoryRing::default();
        text.select(1, 2);
        let mut cx = EditorContext::new(&mut text, &mut state, &mut history);
        assert!(select_next_line(&mut cx));
        assert_eq!(cx.text.text(), "abc\n \nxyz");
        assert_eq!(cx.text.selection(), Selection::new(4, 5));
        assert!(select_next_line(&mut cx));
        assert_eq!(cx.text.text(), "abc\n\nxyz");
        assert_eq!(cx.text.selected_text(), "y");
        assert!(select_prev_line(&mut cx));
        assert!(select_prev_line(&mut cx));
        assert_eq!(cx.text.text(), "abc\n\nxyz");
        assert_eq!(cx.text.selected_text(), "b");
    }

    #[test]
    fn click_drops_untouched_placeholder_and_lands_in_general() {
        let mut text = TextArea::new("abc\n\nxyz");
        let mut state = EditorState::new();
        state.mode = Mode::General;
        let mut history = HistoryRing::default();
        text.select(1, 2);
        let mut cx = EditorContext::new(&mut text, &mut state, &mut history);
        assert!(select_next_line(&mut cx));
        assert_eq!(cx.text.text(), "abc\n \nxyz");
        place_caret(&mut cx, 8);
        assert_eq!(cx.text.text(), "abc\n\nxyz");
        assert_eq!(cx.state.mode, Mode::General);
        assert_eq!(cx.text.selected_text(), "y");
    }

    #[test]
    fn word_motion_crosses_lines() {
        let mut text = TextArea::new("foo bar\n  baz");
        let mut state = EditorState::new();
        state.mode = Mode::General;
        let mut history = HistoryRing::default();
        text.select(4, 5);
        let mut cx = EditorContext::new(&mut text, &mut state, &mut history);
        assert!(move_to_next_word(&mut cx));
        assert_eq!(cx.text.selection(), Selection::new(10, 11));
        assert_eq!(cx.state.sticky_column, Some(2));
        assert!(!move_to_next_word(&mut cx));
    }
}
