use core_events::{SurfaceEvent, SurfaceId};
use core_input::parse_keys;
use core_model::{KeyOutcome, Session, SessionOptions};
use core_state::Mode;
use core_text::{TextAccessor, TextArea};
use pretty_assertions::assert_eq;

const FORM: SurfaceId = SurfaceId(10);
const NOTES: SurfaceId = SurfaceId(11);

fn replay(session: &mut Session<TextArea>, script: &str) -> Vec<KeyOutcome> {
    parse_keys(script)
        .expect("script")
        .into_iter()
        .filter_map(|key| session.handle(SurfaceEvent::Key(key)))
        .collect()
}

fn text(session: &Session<TextArea>, id: SurfaceId) -> String {
    session.surface(id).map(|t| t.text()).unwrap_or_default()
}

fn session() -> Session<TextArea> {
    let mut s = Session::new(SessionOptions::default()).expect("session");
    s.attach(FORM, TextArea::with_caret("first\nsecond\nthird", 0));
    s.attach(NOTES, TextArea::with_caret("note", 0));
    s
}

#[test]
fn keys_without_focus_pass_through() {
    let mut s = session();
    assert_eq!(replay(&mut s, "x"), [KeyOutcome::PassThrough]);
    assert_eq!(text(&s, FORM), "first\nsecond\nthird");
}

#[test]
fn delete_line_and_undo_through_events() {
    let mut s = session();
    s.handle(SurfaceEvent::Focus(FORM));
    s.handle(SurfaceEvent::Click {
        surface: FORM,
        offset: 8,
    });
    let outcomes = replay(&mut s, "<Esc>dd");
    assert!(outcomes.iter().all(|o| *o == KeyOutcome::Consumed));
    assert_eq!(text(&s, FORM), "first\nthird");
    replay(&mut s, "u");
    assert_eq!(text(&s, FORM), "first\nsecond\nthird");
}

#[test]
fn typing_is_undone_one_key_at_a_time() {
    let mut s = session();
    s.handle(SurfaceEvent::Focus(NOTES));
    replay(&mut s, "<End>s!<Esc>");
    assert_eq!(text(&s, NOTES), "notes!");
    assert_eq!(s.mode(), Mode::General);
    replay(&mut s, "u");
    assert_eq!(text(&s, NOTES), "notes");
    replay(&mut s, "u");
    assert_eq!(text(&s, NOTES), "note");
}

#[test]
fn history_is_kept_per_surface() {
    let mut s = session();
    s.handle(SurfaceEvent::Focus(FORM));
    replay(&mut s, "<Esc>x");
    s.handle(SurfaceEvent::Focus(NOTES));
    replay(&mut s, "<Esc>u");
    assert_eq!(text(&s, NOTES), "note");
    s.handle(SurfaceEvent::Focus(FORM));
    assert_eq!(s.mode(), Mode::Edit);
    replay(&mut s, "<Esc>u");
    assert_eq!(text(&s, FORM), "first\nsecond\nthird");
}

#[test]
fn clipboard_does_not_cross_surfaces() {
    let mut s = session();
    s.handle(SurfaceEvent::Focus(FORM));
    replay(&mut s, "<Esc>yy");
    s.handle(SurfaceEvent::Focus(NOTES));
    replay(&mut s, "<Esc>p");
    assert_eq!(text(&s, NOTES), "note");
}

#[test]
fn ime_rejection_posts_one_message_per_burst() {
    let mut s = session();
    let messages = s.messages();
    s.handle(SurfaceEvent::Focus(FORM));
    let outcomes = replay(&mut s, "<Esc><Ime><Ime>l<Ime>");
    assert_eq!(
        outcomes,
        [
            KeyOutcome::Consumed,
            KeyOutcome::Rejected,
            KeyOutcome::Rejected,
            KeyOutcome::Consumed,
            KeyOutcome::Rejected,
        ]
    );
    assert_eq!(messages.try_iter().count(), 2);
}

#[test]
fn passthrough_and_blur() {
    let mut s = session();
    s.handle(SurfaceEvent::Focus(FORM));
    assert_eq!(
        replay(&mut s, "<Esc><Tab><F1>"),
        [
            KeyOutcome::Consumed,
            KeyOutcome::PassThrough,
            KeyOutcome::PassThrough
        ]
    );
    s.handle(SurfaceEvent::Blur(FORM));
    assert_eq!(s.active(), None);
    assert_eq!(s.mode(), Mode::Edit);
    assert_eq!(replay(&mut s, "x"), [KeyOutcome::PassThrough]);
}

#[test]
fn detach_drops_history() {
    let mut s = session();
    s.handle(SurfaceEvent::Focus(FORM));
    replay(&mut s, "<Esc>x");
    assert_eq!(s.history_len(FORM), 1);
    let detached = s.detach(FORM).expect("attached");
    assert_eq!(detached.text(), "irst\nsecond\nthird");
    assert_eq!(s.history_len(FORM), 0);
    assert_eq!(s.active(), None);
}
