//! Text surface abstraction consumed by the modal engine.
//!
//! The engine never touches a concrete widget. Everything it needs from a
//! text input surface is expressed by [`TextAccessor`]: the full value, a
//! directional selection, single symbol lookups and a handful of primitive
//! mutations. Line geometry and word scanning are provided methods layered on
//! top of those primitives, parametrised by an arbitrary char offset rather
//! than the live caret, so motions can inspect neighbouring lines before
//! committing a new selection.
//!
//! Offsets are char indices (not bytes). A position equal to `len()` is the
//! end of the buffer; `symbol(len())` is `None`.
//!
//! Selection direction:
//! * `start` is the anchor side and `end` the moving side. They are stored
//!   exactly as given (clamped to `0..=len`), never swapped.
//! * Forward (`start < end`): the caret cell is `end - 1`.
//! * Backward (`start > end`): the caret cell is `end`.
//!
//! [`TextArea`] is the in-memory implementation backed by `ropey`.

mod area;
pub mod symbol;

pub use area::TextArea;
pub use symbol::SymbolClass;

/// Single space standing in for an otherwise unselectable empty line.
pub const PLACEHOLDER: char = ' ';

/// Directional selection over char offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// One character wide selection starting at `pos`.
    pub const fn cell(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos + 1,
        }
    }

    pub fn lo(&self) -> usize {
        self.start.min(self.end)
    }

    pub fn hi(&self) -> usize {
        self.start.max(self.end)
    }

    pub fn width(&self) -> usize {
        self.hi() - self.lo()
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    pub fn is_backward(&self) -> bool {
        self.start > self.end
    }

    /// Cell the moving edge currently covers.
    pub fn caret_cell(&self) -> usize {
        if self.start < self.end {
            self.end - 1
        } else {
            self.end
        }
    }

    /// Cell that stays selected while the moving edge travels.
    pub fn anchor_cell(&self) -> usize {
        if self.start > self.end {
            self.start - 1
        } else {
            self.start
        }
    }
}

/// How the selection is left after [`TextAccessor::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPlacement {
    /// The inserted span becomes the selection.
    SelectInserted,
    /// A collapsed caret is placed right after the inserted span.
    CaretAfter,
}

/// Result of [`TextAccessor::maybe_add_empty_line_placeholder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderOutcome {
    NotEmptyLine,
    AlreadyHasPlaceholder,
    Added,
}

/// Primitive operations over a text input surface plus derived geometry.
pub trait TextAccessor {
    /// Full buffer value.
    fn text(&self) -> String;
    /// Replace the full buffer value. The selection is clamped to the new length.
    fn set_text(&mut self, text: &str);
    /// Length in chars.
    fn len(&self) -> usize;
    /// Char at `pos`, `None` past the end.
    fn symbol(&self, pos: usize) -> Option<char>;
    /// Text in `[start, end)`; arguments may be given in either order and are clamped.
    fn slice(&self, start: usize, end: usize) -> String;
    fn selection(&self) -> Selection;
    /// Set the selection, clamping each endpoint to `0..=len` and keeping direction.
    fn select(&mut self, start: usize, end: usize);
    /// Insert `text` at `pos` (clamped) and place the selection per `placement`.
    fn insert(&mut self, pos: usize, text: &str, placement: InsertPlacement);
    /// Delete `[start, end)` and return the removed text. A buffer that would
    /// become empty receives a single [`PLACEHOLDER`] instead. The selection
    /// collapses to the low boundary.
    fn delete(&mut self, start: usize, end: usize) -> String;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Low boundary of the selection; the caret in Edit and General modes.
    fn cursor(&self) -> usize {
        self.selection().lo()
    }

    fn selected_text(&self) -> String {
        let sel = self.selection();
        self.slice(sel.start, sel.end)
    }

    fn prev_symbol(&self, pos: usize) -> Option<char> {
        pos.checked_sub(1).and_then(|p| self.symbol(p))
    }

    /// Scan backward from `pos - 1`; returns one past the first match, or 0.
    fn find_symbol_before<P>(&self, pos: usize, pred: P) -> usize
    where
        P: Fn(char) -> bool,
        Self: Sized,
    {
        let mut i = pos.min(self.len());
        while i > 0 {
            if self.symbol(i - 1).is_some_and(&pred) {
                return i;
            }
            i -= 1;
        }
        0
    }

    /// Scan forward from `pos`; returns the first match, or `len()`.
    fn find_symbol_after<P>(&self, pos: usize, pred: P) -> usize
    where
        P: Fn(char) -> bool,
        Self: Sized,
    {
        let len = self.len();
        (pos..len)
            .find(|&i| self.symbol(i).is_some_and(&pred))
            .unwrap_or(len)
    }

    fn line_start(&self, pos: usize) -> usize
    where
        Self: Sized,
    {
        self.find_symbol_before(pos, |c| c == '\n')
    }

    /// Offset of the line's `\n`, or `len()` on the final line.
    fn line_end(&self, pos: usize) -> usize
    where
        Self: Sized,
    {
        self.find_symbol_after(pos.min(self.len()), |c| c == '\n')
    }

    /// Chars on the line excluding its newline.
    fn line_len(&self, pos: usize) -> usize
    where
        Self: Sized,
    {
        self.line_end(pos) - self.line_start(pos)
    }

    /// 1-based column of `pos` within its line.
    fn column(&self, pos: usize) -> usize
    where
        Self: Sized,
    {
        pos.min(self.len()) - self.line_start(pos) + 1
    }

    fn line_text(&self, pos: usize) -> String
    where
        Self: Sized,
    {
        self.slice(self.line_start(pos), self.line_end(pos))
    }

    fn is_line_start(&self, pos: usize) -> bool {
        pos == 0 || self.prev_symbol(pos) == Some('\n')
    }

    fn is_empty_line(&self, pos: usize) -> bool
    where
        Self: Sized,
    {
        self.line_start(pos) == self.line_end(pos)
    }

    /// Start of the following line, `None` on the final line.
    fn next_line_start(&self, pos: usize) -> Option<usize>
    where
        Self: Sized,
    {
        let end = self.line_end(pos);
        (end < self.len()).then_some(end + 1)
    }

    fn next_line_end(&self, pos: usize) -> Option<usize>
    where
        Self: Sized,
    {
        self.next_line_start(pos).map(|start| self.line_end(start))
    }

    /// Newline terminating the previous line, `None` on the first line.
    fn prev_line_end(&self, pos: usize) -> Option<usize>
    where
        Self: Sized,
    {
        self.line_start(pos).checked_sub(1)
    }

    fn prev_line_start(&self, pos: usize) -> Option<usize>
    where
        Self: Sized,
    {
        self.prev_line_end(pos).map(|end| self.line_start(end))
    }

    /// Start of the line holding the final character.
    fn last_line_start(&self) -> usize
    where
        Self: Sized,
    {
        self.line_start(self.len().saturating_sub(1))
    }

    /// Insert a [`PLACEHOLDER`] if the line containing `pos` is empty.
    fn maybe_add_empty_line_placeholder(&mut self, pos: usize) -> PlaceholderOutcome
    where
        Self: Sized,
    {
        let start = self.line_start(pos);
        let end = self.line_end(pos);
        if start == end {
            let sel = self.selection();
            self.insert(start, &PLACEHOLDER.to_string(), InsertPlacement::CaretAfter);
            self.select(sel.start, sel.end);
            tracing::trace!(target: "text.placeholder", at = start, "placeholder_added");
            PlaceholderOutcome::Added
        } else if end - start == 1 && self.symbol(start) == Some(PLACEHOLDER) {
            PlaceholderOutcome::AlreadyHasPlaceholder
        } else {
            PlaceholderOutcome::NotEmptyLine
        }
    }

    /// Delete the placeholder under the caret, leaving a collapsed caret where it was.
    fn remove_empty_line_placeholder(&mut self) -> bool
    where
        Self: Sized,
    {
        let caret = self.cursor();
        let start = self.line_start(caret);
        if self.line_end(caret) - start == 1 && self.symbol(start) == Some(PLACEHOLDER) {
            self.delete(start, start + 1);
            self.select(start, start);
            tracing::trace!(target: "text.placeholder", at = start, "placeholder_removed");
            return true;
        }
        false
    }

    /// Word scan used by `w`: returns `(pos, next_word_start)`.
    ///
    /// From a word or punctuation char the scan stops at the first non-blank
    /// char of the other class, unless a blank run comes first, in which case
    /// it stops at the first non-blank after that run. From a blank it stops at
    /// the next non-blank. `None` when the scan reaches the end of the buffer.
    fn word_span(&self, pos: usize) -> (usize, Option<usize>)
    where
        Self: Sized,
    {
        let class = self.symbol(pos).map(SymbolClass::of);
        let next = match class {
            Some(class @ (SymbolClass::Word | SymbolClass::Punctuation)) => {
                let other_class = self.find_symbol_after(pos, |c| {
                    let c = SymbolClass::of(c);
                    c != class && c != SymbolClass::Blank
                });
                let first_blank = self.find_symbol_after(pos, char::is_whitespace);
                let first_visible = self.find_symbol_after(first_blank, |c| !c.is_whitespace());
                if other_class - pos < first_blank - pos {
                    other_class
                } else {
                    first_visible
                }
            }
            _ => self.find_symbol_after(pos, |c| !c.is_whitespace()),
        };
        (pos, (next < self.len()).then_some(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = "0123456789\na-b+c,d.e/\nf{g}h[i]?j\nk(l)m_n=o*\np&q^r%s#t@\nu~v!w:x;yz";

    #[test]
    fn selection_cells_follow_direction() {
        let fwd = Selection::new(25, 28);
        assert_eq!(fwd.anchor_cell(), 25);
        assert_eq!(fwd.caret_cell(), 27);
        let back = Selection::new(26, 23);
        assert_eq!(back.anchor_cell(), 25);
        assert_eq!(back.caret_cell(), 23);
        assert_eq!(back.lo(), 23);
        assert_eq!(back.width(), 3);
    }

    #[test]
    fn line_geometry_around_fixture() {
        let t = TextArea::new(FIXTURE);
        assert_eq!(t.line_start(26), 22);
        assert_eq!(t.line_end(26), 32);
        assert_eq!(t.line_end(32), 32);
        assert_eq!(t.line_len(26), 10);
        assert_eq!(t.column(26), 5);
        assert_eq!(t.next_line_start(26), Some(33));
        assert_eq!(t.next_line_end(26), Some(43));
        assert_eq!(t.prev_line_end(26), Some(21));
        assert_eq!(t.prev_line_start(26), Some(11));
        assert_eq!(t.prev_line_start(3), None);
        assert_eq!(t.next_line_start(60), None);
        assert_eq!(t.last_line_start(), 55);
        assert!(t.is_line_start(22));
        assert!(!t.is_line_start(23));
    }

    #[test]
    fn word_span_classes() {
        let t = TextArea::new("foo.bar  baz\nqux");
        assert_eq!(t.word_span(0), (0, Some(3)));
        assert_eq!(t.word_span(3), (3, Some(4)));
        assert_eq!(t.word_span(4), (4, Some(9)));
        assert_eq!(t.word_span(9), (9, Some(13)));
        assert_eq!(t.word_span(13), (13, None));
    }

    #[test]
    fn word_span_treats_cjk_as_word_and_pipe_as_symbol() {
        let t = TextArea::new("中文|x");
        assert_eq!(t.word_span(0), (0, Some(2)));
        assert_eq!(t.word_span(2), (2, Some(3)));
    }

    #[test]
    fn placeholder_added_once_and_removed() {
        let mut t = TextArea::new("a\n\nb");
        assert_eq!(t.maybe_add_empty_line_placeholder(2), PlaceholderOutcome::Added);
        assert_eq!(t.text(), "a\n \nb");
        assert_eq!(
            t.maybe_add_empty_line_placeholder(2),
            PlaceholderOutcome::AlreadyHasPlaceholder
        );
        assert_eq!(t.maybe_add_empty_line_placeholder(0), PlaceholderOutcome::NotEmptyLine);
        t.select(2, 3);
        assert!(t.remove_empty_line_placeholder());
        assert_eq!(t.text(), "a\n\nb");
        assert_eq!(t.selection(), Selection::new(2, 2));
        assert!(!t.remove_empty_line_placeholder());
    }

    #[test]
    fn placeholder_on_trailing_empty_line() {
        let mut t = TextArea::new("ab\n");
        assert!(t.is_empty_line(3));
        assert_eq!(t.maybe_add_empty_line_placeholder(3), PlaceholderOutcome::Added);
        assert_eq!(t.text(), "ab\n ");
    }
}
