//! Key dispatch and the handler modules it drives.
//!
//! Sub-modules:
//! * `mode`   - mode transitions and their selection normalisation
//! * `motion` - caret and range movement (General and Visual semantics)
//! * `edit`   - text mutation, clipboard, Edit-mode typing
//! * `undo`   - history restore
//!
//! Dispatch order for one key event (General/Visual only; Edit and Command
//! keys belong to the host surface):
//! 1. `Escape` resets pending state and forces General. A pending `r`
//!    consumes the key as its replacement character.
//! 2. The chord tracker turns the code into `<prev>_<code>` when that chord
//!    is bound.
//! 3. Unshifted digits feed the count (a lone `0` is the line-head binding).
//! 4. The count is taken, except for `d` and `y` which leave it for the
//!    chord they start. If that chord window runs out first, the count is
//!    dropped with it.
//! 5. Lookup, mode check, shift resolution, optional history snapshot,
//!    handler, optional `mode_after`.
//! 6. The count is reset; a key that ran a handler cannot start a chord.

use crate::{EditorContext, repeat_action};
use core_events::KeyEvent;
use core_keymap::{
    ActionId, ActionToken, ChordTracker, CountAccumulator, RouteError, Router, default_router,
};
use core_state::Mode;
use core_text::{PlaceholderOutcome, TextAccessor};
use std::time::Duration;

pub mod edit;
pub mod mode;
pub mod motion;
pub mod undo;

/// Keys that leave the pending count for the chord they start.
const COUNT_CARRIERS: [&str; 2] = ["d", "y"];

/// Outcome of dispatching a single key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    /// A binding (or Escape, or a count digit) consumed the key.
    pub handled: bool,
    /// Buffer text may have changed.
    pub dirty: bool,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            handled: true,
            dirty: true,
        }
    }
    pub fn clean() -> Self {
        Self {
            handled: true,
            dirty: false,
        }
    }
    pub fn ignored() -> Self {
        Self {
            handled: false,
            dirty: false,
        }
    }
}

/// Route table plus the pending numeric prefix and chord state.
#[derive(Debug)]
pub struct Dispatcher {
    router: Router,
    chords: ChordTracker,
    count: CountAccumulator,
}

impl Dispatcher {
    pub fn new(router: Router, chord_window: Option<Duration>) -> Self {
        Self {
            router,
            chords: ChordTracker::new(chord_window),
            count: CountAccumulator::default(),
        }
    }

    /// Built-in table with the given chord window.
    pub fn with_default_routes(chord_window: Option<Duration>) -> Result<Self, RouteError> {
        Ok(Self::new(default_router()?, chord_window))
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn pending_count(&self) -> u32 {
        self.count.peek()
    }

    /// Forget pending count and chord (focus change).
    pub fn reset(&mut self) {
        self.count.reset();
        self.chords.reset();
    }

    pub fn handle_key<T: TextAccessor>(
        &mut self,
        key: &KeyEvent,
        cx: &mut EditorContext<'_, T>,
    ) -> DispatchResult {
        if key.is_escape() {
            self.reset();
            cx.state.replace_pending = false;
            mode::switch_mode_to(cx, Mode::General);
            tracing::trace!(target: "actions.dispatch", op = "escape", mode = %cx.mode(), "escape");
            return DispatchResult::clean();
        }
        let mode = cx.mode();
        if !mode.is_command_mode() {
            return DispatchResult::ignored();
        }
        if cx.state.replace_pending {
            cx.state.replace_pending = false;
            self.reset();
            let Some(ch) = key.printable() else {
                tracing::trace!(target: "actions.dispatch", key = %key, "replace_cancelled");
                return DispatchResult::clean();
            };
            return if edit::replace_with(cx, ch) {
                DispatchResult::dirty()
            } else {
                DispatchResult::clean()
            };
        }

        if let Some(prefix) = self.chords.expired_prefix(key.timestamp)
            && COUNT_CARRIERS.contains(&prefix)
            && !self.count.is_empty()
        {
            tracing::trace!(target: "actions.dispatch", prefix, count = self.count.peek(), "count_expired");
            self.count.reset();
        }
        let code = self
            .chords
            .resolve(&key.code(), key.shifted(), key.timestamp, &self.router);
        let is_chord = code.contains('_');
        if !is_chord
            && let Some(digit) = key.digit()
            && !(digit == 0 && self.count.is_empty())
        {
            self.count.push_digit(digit);
            return DispatchResult::clean();
        }
        let count = if COUNT_CARRIERS.contains(&code.as_str()) {
            0
        } else {
            self.count.take()
        };

        let Some(binding) = self.router.get(&code) else {
            tracing::trace!(target: "actions.dispatch", code = %code, "unbound");
            return DispatchResult::ignored();
        };
        if !binding.applies_in(mode) {
            tracing::trace!(target: "actions.dispatch", code = %code, mode = %mode, "inapplicable_mode");
            return DispatchResult::ignored();
        }
        let token = ActionToken::from_shift(key.shifted());
        let Some(bound) = binding.resolve(token) else {
            return DispatchResult::ignored();
        };
        tracing::debug!(
            target: "actions.dispatch",
            code = %code,
            action = %binding.action_name(token),
            handler = bound.action.name(),
            count,
            record = binding.record,
            "dispatch"
        );
        if binding.record {
            cx.record();
        }
        let result = run_action(bound.action, count, cx);
        if let Some(next) = bound.mode_after {
            mode::switch_mode_to(cx, next);
        }
        self.count.reset();
        if !is_chord {
            self.chords.reset();
        }
        result
    }
}

/// Run one handler with a repeat count (0 means none).
pub fn run_action<T: TextAccessor>(
    action: ActionId,
    count: u32,
    cx: &mut EditorContext<'_, T>,
) -> DispatchResult {
    let times = count.max(1);
    match action {
        ActionId::SelectPrevCharacter => repeat_motion(times, cx, motion::select_prev_character),
        ActionId::SelectNextCharacter => repeat_motion(times, cx, motion::select_next_character),
        ActionId::SelectPrevLine => repeat_motion(times, cx, motion::select_prev_line),
        ActionId::SelectNextLine => repeat_motion(times, cx, motion::select_next_line),
        ActionId::MoveToNextWord => repeat_motion(times, cx, motion::move_to_next_word),
        ActionId::MoveToCurrentLineHead => {
            motion::move_to_current_line_head(cx);
            DispatchResult::clean()
        }
        ActionId::MoveToCurrentLineTail => {
            motion::move_to_current_line_tail(cx);
            DispatchResult::clean()
        }
        ActionId::MoveToFirstLine => {
            motion::move_to_first_line(cx);
            DispatchResult::clean()
        }
        ActionId::MoveToLastLine => {
            motion::move_to_last_line(cx);
            DispatchResult::clean()
        }
        ActionId::SwitchModeToVisual => {
            mode::switch_mode_to_visual(cx);
            DispatchResult::clean()
        }
        ActionId::Append => {
            edit::append(cx);
            DispatchResult::dirty()
        }
        ActionId::AppendLineTail => {
            edit::append_line_tail(cx);
            DispatchResult::dirty()
        }
        ActionId::Insert => {
            edit::insert(cx);
            DispatchResult::dirty()
        }
        ActionId::InsertLineHead => {
            edit::insert_line_head(cx);
            DispatchResult::dirty()
        }
        ActionId::AppendNewLine => {
            edit::append_new_line(cx);
            DispatchResult::dirty()
        }
        ActionId::InsertNewLine => {
            edit::insert_new_line(cx);
            DispatchResult::dirty()
        }
        ActionId::DeleteSelected => {
            repeat_action(cx, count, edit::delete_selected);
            DispatchResult::dirty()
        }
        ActionId::DeletePrevious => {
            repeat_action(cx, count, edit::delete_previous);
            DispatchResult::dirty()
        }
        ActionId::DeleteCurrentLine => {
            let count = count.min(edit::lines_from_caret(cx));
            repeat_action(cx, count, edit::del_curr_line);
            DispatchResult::dirty()
        }
        ActionId::DeleteWord => {
            repeat_action(cx, count, edit::delete_word);
            DispatchResult::dirty()
        }
        ActionId::CopyChar => {
            edit::copy_char(cx);
            DispatchResult::clean()
        }
        ActionId::CopyCurrentLine => {
            edit::copy_current_line(cx, count);
            DispatchResult::clean()
        }
        ActionId::CopyWord => {
            edit::copy_word(cx, count);
            DispatchResult::clean()
        }
        ActionId::PasteAfter => {
            for _ in 0..times {
                if !edit::paste_after(cx) {
                    break;
                }
            }
            DispatchResult::dirty()
        }
        ActionId::PasteBefore => {
            for _ in 0..times {
                if !edit::paste_before(cx) {
                    break;
                }
            }
            DispatchResult::dirty()
        }
        ActionId::BackToHistory => {
            if undo::back_to_history(cx) {
                DispatchResult::dirty()
            } else {
                DispatchResult::clean()
            }
        }
        ActionId::ReplaceChar => {
            cx.state.replace_pending = true;
            DispatchResult::clean()
        }
        ActionId::Substitute => {
            edit::substitute(cx, count);
            DispatchResult::dirty()
        }
    }
}

fn repeat_motion<T, F>(times: u32, cx: &mut EditorContext<'_, T>, step: F) -> DispatchResult
where
    T: TextAccessor,
    F: Fn(&mut EditorContext<'_, T>) -> bool,
{
    for _ in 0..times {
        if !step(cx) {
            break;
        }
    }
    DispatchResult::clean()
}

/// Select the one character cell at `pos`.
///
/// A position on a newline or past the end steps back onto the line's last
/// character; an empty line receives a tracked placeholder which becomes the
/// cell. Returns the selected offset.
pub(crate) fn select_cell<T: TextAccessor>(cx: &mut EditorContext<'_, T>, pos: usize) -> usize {
    let pos = pos.min(cx.text.len());
    let start = cx.text.line_start(pos);
    if cx.text.maybe_add_empty_line_placeholder(pos) == PlaceholderOutcome::Added {
        cx.state.placeholder = Some(start);
        cx.text.select(start, start + 1);
        return start;
    }
    let cell = match cx.text.symbol(pos) {
        Some('\n') | None if pos > start => pos - 1,
        _ => pos,
    };
    cx.text.select(cell, cell + 1);
    cell
}

/// Whether the caret line is the untouched placeholder the engine inserted.
pub(crate) fn on_tracked_placeholder<T: TextAccessor>(cx: &EditorContext<'_, T>) -> bool {
    let caret = cx.text.cursor();
    let start = cx.text.line_start(caret);
    cx.state.placeholder == Some(start)
        && cx.text.line_len(start) == 1
        && cx.text.symbol(start) == Some(core_text::PLACEHOLDER)
}

/// Remove the tracked placeholder under the caret before the caret leaves its
/// line. Returns `target` shifted to account for the removed character.
pub(crate) fn release_placeholder<T: TextAccessor>(
    cx: &mut EditorContext<'_, T>,
    target: usize,
) -> usize {
    if !on_tracked_placeholder(cx) {
        cx.state.placeholder = None;
        return target;
    }
    let start = cx.text.line_start(cx.text.cursor());
    if cx.text.line_start(target) == start {
        return target;
    }
    cx.text.remove_empty_line_placeholder();
    cx.state.placeholder = None;
    if target > start { target - 1 } else { target }
}
