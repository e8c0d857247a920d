//! Rope-backed in-memory text surface.

use crate::{InsertPlacement, PLACEHOLDER, Selection, TextAccessor};
use ropey::Rope;
use std::fmt;

/// A text input surface backed by a `ropey::Rope` plus a directional selection.
#[derive(Clone, Default)]
pub struct TextArea {
    rope: Rope,
    selection: Selection,
}

impl TextArea {
    /// Construct a surface with a collapsed caret at offset 0.
    pub fn new(content: &str) -> Self {
        Self {
            rope: Rope::from_str(content),
            selection: Selection::default(),
        }
    }

    /// Construct a surface with a collapsed caret at `caret` (clamped).
    pub fn with_caret(content: &str, caret: usize) -> Self {
        let mut area = Self::new(content);
        area.select(caret, caret);
        area
    }
}

impl fmt::Debug for TextArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextArea")
            .field("len", &self.rope.len_chars())
            .field("selection", &self.selection)
            .finish()
    }
}

impl fmt::Display for TextArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.rope.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}

impl TextAccessor for TextArea {
    fn text(&self) -> String {
        self.rope.to_string()
    }

    fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        let Selection { start, end } = self.selection;
        self.select(start, end);
    }

    fn len(&self) -> usize {
        self.rope.len_chars()
    }

    fn symbol(&self, pos: usize) -> Option<char> {
        self.rope.get_char(pos)
    }

    fn slice(&self, start: usize, end: usize) -> String {
        let total = self.rope.len_chars();
        let s = start.min(end).min(total);
        let e = start.max(end).min(total);
        if s >= e {
            return String::new();
        }
        self.rope.slice(s..e).to_string()
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    fn select(&mut self, start: usize, end: usize) {
        let total = self.rope.len_chars();
        self.selection = Selection::new(start.min(total), end.min(total));
        tracing::trace!(target: "text.select", start = self.selection.start, end = self.selection.end, "select");
    }

    fn insert(&mut self, pos: usize, text: &str, placement: InsertPlacement) {
        let at = pos.min(self.rope.len_chars());
        self.rope.insert(at, text);
        let n = text.chars().count();
        match placement {
            InsertPlacement::SelectInserted => self.select(at, at + n),
            InsertPlacement::CaretAfter => self.select(at + n, at + n),
        }
    }

    fn delete(&mut self, start: usize, end: usize) -> String {
        let total = self.rope.len_chars();
        let s = start.min(end).min(total);
        let e = start.max(end).min(total);
        let removed = if s < e {
            let removed = self.rope.slice(s..e).to_string();
            self.rope.remove(s..e);
            removed
        } else {
            String::new()
        };
        if self.rope.len_chars() == 0 {
            self.rope.insert_char(0, PLACEHOLDER);
        }
        self.select(s, s);
        removed
    }

    fn find_symbol_before<P>(&self, pos: usize, pred: P) -> usize
    where
        P: Fn(char) -> bool,
    {
        let mut i = pos.min(self.rope.len_chars());
        let mut chars = self.rope.chars_at(i);
        while let Some(c) = chars.prev() {
            if pred(c) {
                return i;
            }
            i -= 1;
        }
        0
    }

    fn find_symbol_after<P>(&self, pos: usize, pred: P) -> usize
    where
        P: Fn(char) -> bool,
    {
        let total = self.rope.len_chars();
        if pos >= total {
            return total;
        }
        self.rope
            .chars_at(pos)
            .position(pred)
            .map_or(total, |offset| pos + offset)
    }
}
