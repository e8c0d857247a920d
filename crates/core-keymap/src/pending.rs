//! Pending input state between key events: numeric prefix and chord window.

use crate::Router;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Chord window used when configuration does not override it.
pub const DEFAULT_CHORD_WINDOW: Duration = Duration::from_millis(600);

const COUNT_MAX: u32 = 999_999;

/// Running numeric prefix (`3` in `3j`). Zero means "no count supplied".
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CountAccumulator {
    value: u32,
}

impl CountAccumulator {
    pub fn push_digit(&mut self, digit: u32) {
        self.value = self
            .value
            .saturating_mul(10)
            .saturating_add(digit)
            .min(COUNT_MAX);
        debug!(target: "keymap.count", count = self.value, digit, "count_extend");
    }

    pub fn peek(&self) -> u32 {
        self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value == 0
    }

    /// Return the accumulated count and reset.
    pub fn take(&mut self) -> u32 {
        std::mem::take(&mut self.value)
    }

    pub fn reset(&mut self) {
        self.value = 0;
    }
}

/// Two-key chord detection (`dd`, `gg`, `yw`).
///
/// The previous unshifted code is remembered with its timestamp. When the next
/// unshifted code arrives inside the window and `<prev>_<code>` is bound, the
/// chord code is returned and the remembered key is consumed, so `ddd` reads
/// as `dd` followed by a fresh `d`. Shifted keys never take part in chords.
#[derive(Debug, Clone)]
pub struct ChordTracker {
    window: Option<Duration>,
    prev: Option<(String, Instant)>,
}

impl Default for ChordTracker {
    fn default() -> Self {
        Self::new(Some(DEFAULT_CHORD_WINDOW))
    }
}

impl ChordTracker {
    /// `None` disables the time limit.
    pub fn new(window: Option<Duration>) -> Self {
        Self { window, prev: None }
    }

    pub fn window(&self) -> Option<Duration> {
        self.window
    }

    /// Code to dispatch for `code` pressed at `at`.
    pub fn resolve(&mut self, code: &str, shifted: bool, at: Instant, router: &Router) -> String {
        if shifted {
            self.prev = None;
            return code.to_string();
        }
        if let Some((prev, prev_at)) = self.prev.take()
            && self.within_window(prev_at, at)
        {
            let chord = format!("{prev}_{code}");
            if router.contains(&chord) {
                trace!(target: "keymap.chord", chord = %chord, "chord_matched");
                return chord;
            }
        }
        self.prev = Some((code.to_string(), at));
        code.to_string()
    }

    pub fn reset(&mut self) {
        self.prev = None;
    }

    /// The remembered prefix, if its window has run out by `at`.
    pub fn expired_prefix(&self, at: Instant) -> Option<&str> {
        let (prev, prev_at) = self.prev.as_ref()?;
        (!self.within_window(*prev_at, at)).then_some(prev.as_str())
    }

    fn within_window(&self, prev_at: Instant, at: Instant) -> bool {
        match self.window {
            Some(window) => at.saturating_duration_since(prev_at) <= window,
            None => true,
        }
    }
}
