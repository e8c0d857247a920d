//! Structured trace events emitted by the dispatcher.

mod common;

use common::Harness;
use core_state::Mode;
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::Subscriber;
use tracing::dispatcher::Dispatch;
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::registry::Registry;

#[derive(Clone, Default)]
struct Capture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

#[derive(Clone, Debug)]
struct CapturedEvent {
    target: String,
    fields: Vec<(String, String)>,
}

impl CapturedEvent {
    fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Default)]
struct FieldCollector {
    fields: Vec<(String, String)>,
}

impl Visit for FieldCollector {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.fields
            .push((field.name().to_string(), format!("{:?}", value)));
    }
}

impl<S> Layer<S> for Capture
where
    S: Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut collector = FieldCollector::default();
        event.record(&mut collector);
        self.events.lock().unwrap().push(CapturedEvent {
            target: event.metadata().target().to_string(),
            fields: collector.fields,
        });
    }
}

fn capture(f: impl FnOnce()) -> Vec<CapturedEvent> {
    let capture = Capture::default();
    let events = capture.events.clone();
    let dispatch = Dispatch::new(Registry::default().with(capture));
    tracing::dispatcher::with_default(&dispatch, f);
    let events = events.lock().unwrap();
    events
        .iter()
        .filter(|e| e.target == "actions.dispatch")
        .cloned()
        .collect()
}

#[test]
fn counted_delete_reports_handler_and_count() {
    let mut h = Harness::in_mode("abcdef", 0, Mode::General);
    let events = capture(|| h.type_keys("3x"));
    let dispatched: Vec<_> = events
        .iter()
        .filter(|e| e.field("message") == Some("dispatch"))
        .collect();
    assert_eq!(dispatched.len(), 1);
    assert_eq!(dispatched[0].field("handler"), Some("\"delete_selected\""));
    assert_eq!(dispatched[0].field("count"), Some("3"));
    assert_eq!(dispatched[0].field("record"), Some("true"));
    assert_eq!(h.value(), "def");
}

#[test]
fn unbound_keys_are_traced() {
    let mut h = Harness::in_mode("abc", 0, Mode::General);
    let events = capture(|| {
        h.type_keys("q");
    });
    assert!(
        events
            .iter()
            .any(|e| e.field("message") == Some("unbound") && e.field("code") == Some("q"))
    );
}
