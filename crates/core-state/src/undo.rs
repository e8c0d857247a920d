//! Bounded undo history.
//!
//! Each input surface owns a [`HistoryRing`]: a FIFO of `{text, position}`
//! snapshots pushed before destructive edits and popped by undo. When the ring
//! is full the oldest snapshot is evicted. There is no redo.

use core_events::SurfaceId;
use std::collections::{HashMap, VecDeque};
use tracing::trace;

/// Snapshots retained per surface unless configured otherwise.
pub const DEFAULT_HISTORY_DEPTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub text: String,
    /// Caret offset (low end of the selection) when the snapshot was taken.
    pub position: usize,
}

#[derive(Debug, Clone)]
pub struct HistoryRing {
    entries: VecDeque<Snapshot>,
    capacity: usize,
    skipped: u64,
}

impl Default for HistoryRing {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_DEPTH)
    }
}

impl HistoryRing {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            skipped: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Snapshots not stored because they matched the newest entry.
    pub fn snapshots_skipped(&self) -> u64 {
        self.skipped
    }

    pub fn push(&mut self, text: String, position: usize) {
        if let Some(last) = self.entries.back()
            && last.position == position
            && last.text == text
        {
            self.skipped += 1;
            trace!(target: "state.history", depth = self.entries.len(), "snapshot_dedupe_skip");
            return;
        }
        self.entries.push_back(Snapshot { text, position });
        trace!(target: "state.history", depth = self.entries.len(), position, "push_snapshot");
        if self.entries.len() > self.capacity {
            let _ = self.entries.pop_front();
            trace!(target: "state.history", "history_trimmed");
        }
    }

    pub fn pop(&mut self) -> Option<Snapshot> {
        let snap = self.entries.pop_back();
        trace!(target: "state.history", depth = self.entries.len(), hit = snap.is_some(), "pop_snapshot");
        snap
    }
}

/// Histories for every attached surface.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    rings: HashMap<SurfaceId, HistoryRing>,
    depth: usize,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH)
    }
}

impl HistoryStore {
    pub fn new(depth: usize) -> Self {
        Self {
            rings: HashMap::new(),
            depth,
        }
    }

    /// Ring for `surface`, created empty on first use.
    pub fn ring_mut(&mut self, surface: SurfaceId) -> &mut HistoryRing {
        let depth = self.depth;
        self.rings
            .entry(surface)
            .or_insert_with(|| HistoryRing::with_capacity(depth))
    }

    pub fn ring(&self, surface: SurfaceId) -> Option<&HistoryRing> {
        self.rings.get(&surface)
    }

    /// Destroy the history of a detached surface.
    pub fn remove(&mut self, surface: SurfaceId) -> Option<HistoryRing> {
        self.rings.remove(&surface)
    }
}
