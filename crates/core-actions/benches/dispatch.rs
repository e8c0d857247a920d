use core_actions::{Dispatcher, EditorContext, mode::switch_mode_to};
use core_events::{KeyEvent, NamedKey};
use core_keymap::DEFAULT_CHORD_WINDOW;
use core_state::{EditorState, HistoryRing, Mode};
use core_text::{TextAccessor, TextArea};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn buffer(lines: usize) -> String {
    (0..lines)
        .map(|i| format!("line {i}: the quick brown fox, jumps over the lazy dog."))
        .collect::<Vec<_>>()
        .join("\n")
}

fn bench_motions(c: &mut Criterion) {
    let content = buffer(2_000);
    let keys: Vec<KeyEvent> = "jjjjwwwwllllkkkk"
        .chars()
        .map(KeyEvent::char)
        .chain(std::iter::once(KeyEvent::named(NamedKey::End)))
        .collect();
    c.bench_function("dispatch_motion_burst", |b| {
        let mut text = TextArea::with_caret(&content, 0);
        let mut state = EditorState::new();
        let mut history = HistoryRing::default();
        let mut dispatcher = match Dispatcher::with_default_routes(Some(DEFAULT_CHORD_WINDOW)) {
            Ok(d) => d,
            Err(e) => panic!("default routes: {e}"),
        };
        let mut cx = EditorContext::new(&mut text, &mut state, &mut history);
        switch_mode_to(&mut cx, Mode::General);
        b.iter(|| {
            for key in &keys {
                black_box(dispatcher.handle_key(key, &mut cx));
            }
        });
    });
}

fn bench_line_delete_undo(c: &mut Criterion) {
    let content = buffer(2_000);
    c.bench_function("dd_then_undo", |b| {
        let mut text = TextArea::with_caret(&content, 30_000);
        let mut state = EditorState::new();
        let mut history = HistoryRing::default();
        let mut dispatcher = match Dispatcher::with_default_routes(None) {
            Ok(d) => d,
            Err(e) => panic!("default routes: {e}"),
        };
        let mut cx = EditorContext::new(&mut text, &mut state, &mut history);
        switch_mode_to(&mut cx, Mode::General);
        let (d, u) = (KeyEvent::char('d'), KeyEvent::char('u'));
        b.iter(|| {
            dispatcher.handle_key(&d, &mut cx);
            dispatcher.handle_key(&d, &mut cx);
            dispatcher.handle_key(&u, &mut cx);
            black_box(cx.text.len())
        });
    });
}

criterion_group!(benches, bench_motions, bench_line_delete_undo);
criterion_main!(benches);
