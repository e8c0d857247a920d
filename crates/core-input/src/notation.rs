//! Vim-style key notation.
//!
//! A script is a sequence of plain characters and `<Name>` groups:
//!
//! * plain characters press themselves; uppercase letters and the shifted
//!   digit symbols (`!@#$%^&*()`) are stored as their base key plus SHIFT,
//!   matching how a keyboard reports them;
//! * `<Esc>` `<CR>` `<Enter>` `<BS>` `<Tab>` `<Del>` `<Insert>` `<Home>`
//!   `<End>` `<Up>` `<Down>` `<Left>` `<Right>` `<PageUp>` `<PageDown>`
//!   `<F1>`..`<F12>` name special keys (case-insensitive);
//! * `<S-x>` / `<S-Left>` add SHIFT explicitly;
//! * `<Ime>` is an input-method composition event;
//! * `<lt>` is a literal `<`.

use core_events::{KeyEvent, KeyToken, ModMask, NamedKey, SHIFTED_DIGITS};
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyParseError {
    #[error("unterminated key name starting at offset {offset}")]
    Unterminated { offset: usize },
    #[error("unknown key name <{name}>")]
    UnknownName { name: String },
    #[error("empty key name at offset {offset}")]
    EmptyName { offset: usize },
}

/// Key event for a typed character, with shift made explicit.
pub fn key_for_char(c: char) -> KeyEvent {
    let (token, mods) = split_char(c);
    KeyEvent::with_mods(token, mods)
}

fn split_char(c: char) -> (KeyToken, ModMask) {
    if c.is_ascii_uppercase() {
        return (KeyToken::Char(c.to_ascii_lowercase()), ModMask::SHIFT);
    }
    if let Some(digit) = SHIFTED_DIGITS.iter().position(|&s| s == c)
        && let Some(base) = char::from_digit(digit as u32, 10)
    {
        return (KeyToken::Char(base), ModMask::SHIFT);
    }
    (KeyToken::Char(c), ModMask::empty())
}

fn named(name: &str) -> Option<NamedKey> {
    let lower = name.to_ascii_lowercase();
    let key = match lower.as_str() {
        "esc" | "escape" => NamedKey::Esc,
        "cr" | "enter" | "return" => NamedKey::Enter,
        "bs" | "backspace" => NamedKey::Backspace,
        "tab" => NamedKey::Tab,
        "del" | "delete" => NamedKey::Delete,
        "insert" | "ins" => NamedKey::Insert,
        "home" => NamedKey::Home,
        "end" => NamedKey::End,
        "up" => NamedKey::Up,
        "down" => NamedKey::Down,
        "left" => NamedKey::Left,
        "right" => NamedKey::Right,
        "pageup" => NamedKey::PageUp,
        "pagedown" => NamedKey::PageDown,
        "ime" => NamedKey::Process,
        other => {
            let n: u8 = other.strip_prefix('f')?.parse().ok()?;
            if !(1..=12).contains(&n) {
                return None;
            }
            NamedKey::F(n)
        }
    };
    Some(key)
}

fn parse_group(name: &str, offset: usize) -> Result<(KeyToken, ModMask), KeyParseError> {
    if name.is_empty() {
        return Err(KeyParseError::EmptyName { offset });
    }
    if name.eq_ignore_ascii_case("lt") {
        return Ok((KeyToken::Char('<'), ModMask::empty()));
    }
    if let Some(rest) = name.strip_prefix("S-").or_else(|| name.strip_prefix("s-")) {
        let mut chars = rest.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            let (token, _) = split_char(c);
            return Ok((token, ModMask::SHIFT));
        }
        let (token, _) = parse_group(rest, offset)?;
        return Ok((token, ModMask::SHIFT));
    }
    named(name)
        .map(|key| (KeyToken::Named(key), ModMask::empty()))
        .ok_or_else(|| KeyParseError::UnknownName {
            name: name.to_string(),
        })
}

/// Parse `script` into key events stamped `step` apart starting at `start`.
pub fn parse_keys_at(
    script: &str,
    start: Instant,
    step: Duration,
) -> Result<Vec<KeyEvent>, KeyParseError> {
    let chars: Vec<char> = script.chars().collect();
    let mut parts = Vec::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '<' {
            let Some(close) = chars[i + 1..].iter().position(|&c| c == '>') else {
                return Err(KeyParseError::Unterminated { offset: i });
            };
            let name: String = chars[i + 1..i + 1 + close].iter().collect();
            parts.push(parse_group(&name, i)?);
            i += close + 2;
        } else {
            parts.push(split_char(c));
            i += 1;
        }
    }
    let mut at = start;
    let events = parts
        .into_iter()
        .map(|(token, mods)| {
            let key = KeyEvent::from_parts(token, mods, at);
            at += step;
            key
        })
        .collect::<Vec<_>>();
    tracing::debug!(target: "input.notation", keys = events.len(), "script_parsed");
    Ok(events)
}

/// Parse `script` with every key stamped now.
pub fn parse_keys(script: &str) -> Result<Vec<KeyEvent>, KeyParseError> {
    parse_keys_at(script, Instant::now(), Duration::ZERO)
}
