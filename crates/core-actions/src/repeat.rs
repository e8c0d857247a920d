//! Count-driven repetition of text-producing handlers.

use crate::EditorContext;
use core_text::TextAccessor;

/// Run `action` `count` times (at least once) and collect what it produced
/// into the clipboard text.
///
/// The clipboard is replaced only when some iteration produced non-empty
/// text. The final iteration's piece loses one trailing newline so `3dd`
/// yields `"a\nb\nc"`; when the final iteration produced nothing the
/// collected text is kept as is. The linewise flag is left to the handler.
pub fn repeat_action<T, F>(cx: &mut EditorContext<'_, T>, count: u32, mut action: F)
where
    T: TextAccessor,
    F: FnMut(&mut EditorContext<'_, T>) -> Option<String>,
{
    let times = count.max(1);
    let mut collected: Option<String> = None;
    let mut productive = 0u32;
    for i in 0..times {
        let Some(mut piece) = action(cx).filter(|p| !p.is_empty()) else {
            continue;
        };
        if i + 1 == times && piece.ends_with('\n') {
            piece.pop();
        }
        collected.get_or_insert_with(String::new).push_str(&piece);
        productive += 1;
    }
    let Some(text) = collected else {
        tracing::trace!(target: "actions.repeat", times, "repeat_noop");
        return;
    };
    tracing::trace!(target: "actions.repeat", times, productive, chars = text.chars().count(), "repeat_collected");
    cx.state.clipboard.text = Some(text);
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_state::{EditorState, HistoryRing};
    use core_text::TextArea;
    use pretty_assertions::assert_eq;

    fn run(count: u32, produce: &[Option<&str>]) -> Option<String> {
        let mut text = TextArea::new("abc");
        let mut state = EditorState::default();
        state.clipboard.set("old", true);
        let mut history = HistoryRing::default();
        let mut cx = EditorContext::new(&mut text, &mut state, &mut history);
        let mut pieces = produce.iter();
        repeat_action(&mut cx, count, |_| {
            pieces.next().copied().flatten().map(str::to_owned)
        });
        assert!(cx.state.clipboard.linewise);
        cx.state.clipboard.text.clone()
    }

    #[test]
    fn joins_pieces_and_drops_final_newline() {
        let got = run(3, &[Some("X\n"), Some("X\n"), Some("X\n")]);
        assert_eq!(got.as_deref(), Some("X\nX\nX"));
    }

    #[test]
    fn zero_count_runs_once() {
        let got = run(0, &[Some("a"), Some("b")]);
        assert_eq!(got.as_deref(), Some("a"));
    }

    #[test]
    fn noop_iterations_keep_clipboard() {
        let got = run(2, &[None, None]);
        assert_eq!(got.as_deref(), Some("old"));
    }

    #[test]
    fn trailing_noops_keep_last_newline() {
        let got = run(4, &[Some("l1\n"), Some("l2\n"), None, None]);
        assert_eq!(got.as_deref(), Some("l1\nl2\n"));
    }

    #[test]
    fn empty_pieces_are_not_productive() {
        let got = run(2, &[Some(""), Some("")]);
        assert_eq!(got.as_deref(), Some("old"));
        let got = run(3, &[Some(""), Some("a\n"), Some("")]);
        assert_eq!(got.as_deref(), Some("a\n"));
    }
}
