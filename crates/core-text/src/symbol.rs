//! Symbol classification used by word motions.
//!
//! Three classes: word characters (ASCII `\w` plus the CJK unified ideograph
//! block `U+4E00..=U+9FA5`), punctuation (anything visible that is not a word
//! character) and blanks (whitespace, newline included). `|` is always
//! punctuation.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolClass {
    Word,
    Punctuation,
    Blank,
}

impl SymbolClass {
    pub fn of(c: char) -> Self {
        if is_word(c) {
            SymbolClass::Word
        } else if c.is_whitespace() {
            SymbolClass::Blank
        } else {
            SymbolClass::Punctuation
        }
    }
}

pub fn is_word(c: char) -> bool {
    c != '|' && (c.is_ascii_alphanumeric() || c == '_' || ('\u{4e00}'..='\u{9fa5}').contains(&c))
}
