//! Keys the engine must leave to the host.

use core_events::KeyEvent;
use std::collections::HashSet;

/// White-list of route codes that always reach the surface untouched
/// (focus traversal, function keys), whatever the mode.
#[derive(Debug, Clone, Default)]
pub struct Passthrough {
    codes: HashSet<String>,
}

impl Passthrough {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let codes = codes
            .into_iter()
            .map(|c| c.as_ref().trim().to_ascii_lowercase())
            .filter(|c| !c.is_empty())
            .collect();
        Self { codes }
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Whether `key` bypasses the engine. Modifiers are ignored.
    pub fn allows(&self, key: &KeyEvent) -> bool {
        let code = key.code();
        let hit = self.codes.contains(&code);
        if hit {
            tracing::trace!(target: "input.filter", code = %code, "passthrough");
        }
        hit
    }
}
