//! Scripted key replay against a single in-memory surface.

use anyhow::{Context, Result};
use core_events::{MessageKind, StatusMessage, SurfaceEvent, SurfaceId};
use core_input::parse_keys;
use core_model::{KeyOutcome, Session, SessionOptions};
use core_state::Mode;
use core_text::{TextAccessor, TextArea};
use tracing::{debug, info};

const SURFACE: SurfaceId = SurfaceId(1);

/// Final state of a replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayReport {
    pub text: String,
    pub mode: Mode,
    pub messages: Vec<StatusMessage>,
    /// Keys handed back to the host instead of being handled.
    pub passed_through: usize,
}

impl ReplayReport {
    pub fn failures(&self) -> impl Iterator<Item = &StatusMessage> {
        self.messages
            .iter()
            .filter(|m| m.kind == MessageKind::Failure)
    }
}

/// Focus a surface holding `content` with the caret at `caret`, press every
/// key of `script`, and report what the surface ends up with.
pub fn replay(
    content: &str,
    caret: usize,
    script: &str,
    options: SessionOptions,
) -> Result<ReplayReport> {
    let keys = parse_keys(script).with_context(|| format!("invalid key script {script:?}"))?;
    let mut session = Session::new(options).context("building key routes")?;
    let messages = session.messages();
    session.attach(SURFACE, TextArea::with_caret(content, caret));
    session.handle(SurfaceEvent::Focus(SURFACE));

    let mut passed_through = 0;
    for key in keys {
        let outcome = session.handle(SurfaceEvent::Key(key));
        if outcome == Some(KeyOutcome::PassThrough) {
            passed_through += 1;
            debug!(target: "replay", key = %key, "key_passed_through");
        }
    }

    let text = session
        .surface(SURFACE)
        .map(|t| t.text())
        .unwrap_or_default();
    let report = ReplayReport {
        text,
        mode: session.mode(),
        messages: messages.try_iter().collect(),
        passed_through,
    };
    info!(
        target: "replay",
        chars = report.text.chars().count(),
        mode = %report.mode,
        messages = report.messages.len(),
        passed_through,
        "replay_complete"
    );
    Ok(report)
}
