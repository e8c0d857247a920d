//! Core event types and the status message channel.
//!
//! Hosts translate whatever their toolkit produces into these types before
//! handing them to a session: keys become [`KeyEvent`] (logical token plus a
//! modifier mask and the instant it was observed), focus changes and clicks
//! become [`SurfaceEvent`] variants addressed by [`SurfaceId`].
//!
//! User-visible feedback flows the other way over a `crossbeam-channel`
//! ([`message_channel`]); the session never blocks on it.

use crossbeam_channel::{Receiver, Sender};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Message shown when an input method interferes with General/Visual mode.
pub const IME_FAILURE_MESSAGE: &str = "Execution failure — use direct ASCII input";

/// Characters a US layout produces for Shift + digit, indexed by digit.
pub const SHIFTED_DIGITS: [char; 10] = [')', '!', '@', '#', '$', '%', '^', '&', '*', '('];

pub static MESSAGES_SENT: AtomicU64 = AtomicU64::new(0);
pub static MESSAGES_DROPPED: AtomicU64 = AtomicU64::new(0);

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ModMask: u16 { const CTRL=1; const ALT=2; const SHIFT=4; const META=8; }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Enter,
    Esc,
    Backspace,
    Tab,
    F(u8),
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,
    /// IME composition sentinel (`keyCode == 229`).
    Process,
}

impl NamedKey {
    /// Lowercase identifier used as route code.
    pub fn code(&self) -> String {
        match self {
            NamedKey::Enter => "enter".into(),
            NamedKey::Esc => "escape".into(),
            NamedKey::Backspace => "backspace".into(),
            NamedKey::Tab => "tab".into(),
            NamedKey::F(n) => format!("f{n}"),
            NamedKey::Up => "arrowup".into(),
            NamedKey::Down => "arrowdown".into(),
            NamedKey::Left => "arrowleft".into(),
            NamedKey::Right => "arrowright".into(),
            NamedKey::Home => "home".into(),
            NamedKey::End => "end".into(),
            NamedKey::PageUp => "pageup".into(),
            NamedKey::PageDown => "pagedown".into(),
            NamedKey::Insert => "insert".into(),
            NamedKey::Delete => "delete".into(),
            NamedKey::Process => "process".into(),
        }
    }
}

/// Logical key: a printable character or a named key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyToken {
    Char(char),
    Named(NamedKey),
}

/// A normalized key press.
///
/// * `token`: logical key. Letters are stored lowercase; shift lives in `mods`.
/// * `timestamp`: instant the binder observed the press (chord window input).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub token: KeyToken,
    pub mods: ModMask,
    pub timestamp: Instant,
}

impl KeyEvent {
    /// Unmodified key observed now.
    pub fn new(token: KeyToken) -> Self {
        Self::from_parts(token, ModMask::empty(), Instant::now())
    }

    pub fn with_mods(token: KeyToken, mods: ModMask) -> Self {
        Self::from_parts(token, mods, Instant::now())
    }

    /// Caller supplied timestamp (primarily for tests and replay).
    pub fn from_parts(token: KeyToken, mods: ModMask, timestamp: Instant) -> Self {
        Self {
            token,
            mods,
            timestamp,
        }
    }

    pub fn char(c: char) -> Self {
        Self::new(KeyToken::Char(c))
    }

    pub fn named(key: NamedKey) -> Self {
        Self::new(KeyToken::Named(key))
    }

    pub fn shifted(&self) -> bool {
        self.mods.contains(ModMask::SHIFT)
    }

    /// Lowercase route code: `"d"`, `"4"`, `"escape"`, `"arrowleft"`.
    pub fn code(&self) -> String {
        match self.token {
            KeyToken::Char(c) => c.to_lowercase().collect(),
            KeyToken::Named(named) => named.code(),
        }
    }

    pub fn is_escape(&self) -> bool {
        self.token == KeyToken::Named(NamedKey::Esc)
    }

    pub fn is_ime_composition(&self) -> bool {
        self.token == KeyToken::Named(NamedKey::Process)
    }

    /// Character the key would type, with shift applied to letters and digits.
    pub fn printable(&self) -> Option<char> {
        let KeyToken::Char(c) = self.token else {
            return None;
        };
        if !self.shifted() {
            return Some(c);
        }
        match c.to_digit(10) {
            Some(d) => Some(SHIFTED_DIGITS[d as usize]),
            None => Some(c.to_ascii_uppercase()),
        }
    }

    /// Unmodified ASCII digit value, if any.
    pub fn digit(&self) -> Option<u32> {
        match self.token {
            KeyToken::Char(c) if !self.shifted() => c.to_digit(10),
            _ => None,
        }
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.token {
            KeyToken::Char(c) => c.to_string(),
            KeyToken::Named(named) => named.code(),
        };
        if self.shifted() {
            write!(f, "<S-{name}>")
        } else if matches!(self.token, KeyToken::Named(_)) {
            write!(f, "<{name}>")
        } else {
            f.write_str(&name)
        }
    }
}

/// Identifier of an attached input surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u32);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// Events a host forwards to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    Focus(SurfaceId),
    Blur(SurfaceId),
    /// Pointer placed the caret at char `offset`.
    Click { surface: SurfaceId, offset: usize },
    Key(KeyEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Failure,
}

/// User-visible message produced by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl StatusMessage {
    pub fn failure(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Failure,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Info,
            text: text.into(),
        }
    }
}

/// Sending half of the status channel. Sends never block and never fail the caller.
#[derive(Debug, Clone)]
pub struct MessageSender {
    tx: Sender<StatusMessage>,
}

impl MessageSender {
    pub fn send(&self, msg: StatusMessage) {
        match self.tx.send(msg) {
            Ok(()) => {
                MESSAGES_SENT.fetch_add(1, Ordering::Relaxed);
            }
            Err(err) => {
                MESSAGES_DROPPED.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(target: "events.message", text = %err.0.text, "message_dropped_no_receiver");
            }
        }
    }
}

/// Create the unbounded status channel.
pub fn message_channel() -> (MessageSender, Receiver<StatusMessage>) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (MessageSender { tx }, rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_event_display() {
        assert_eq!(KeyEvent::char('x').to_string(), "x");
        assert_eq!(
            KeyEvent::with_mods(KeyToken::Char('g'), ModMask::SHIFT).to_string(),
            "<S-g>"
        );
        assert_eq!(KeyEvent::named(NamedKey::Esc).to_string(), "<escape>");
    }

    #[test]
    fn route_codes_are_lowercase() {
        assert_eq!(KeyEvent::char('G').code(), "g");
        assert_eq!(KeyEvent::named(NamedKey::Left).code(), "arrowleft");
        assert_eq!(KeyEvent::named(NamedKey::F(12)).code(), "f12");
    }

    #[test]
    fn digits_ignore_shifted_keys() {
        assert_eq!(KeyEvent::char('7').digit(), Some(7));
        assert_eq!(
            KeyEvent::with_mods(KeyToken::Char('4'), ModMask::SHIFT).digit(),
            None
        );
        assert_eq!(KeyEvent::char('x').digit(), None);
    }

    #[test]
    fn printable_applies_shift() {
        assert_eq!(
            KeyEvent::with_mods(KeyToken::Char('g'), ModMask::SHIFT).printable(),
            Some('G')
        );
        assert_eq!(
            KeyEvent::with_mods(KeyToken::Char('4'), ModMask::SHIFT).printable(),
            Some('$')
        );
        assert_eq!(KeyEvent::char('?').printable(), Some('?'));
        assert_eq!(KeyEvent::named(NamedKey::Enter).printable(), None);
    }

    #[test]
    fn from_parts_keeps_timestamp() {
        let ts = Instant::now();
        let evt = KeyEvent::from_parts(KeyToken::Named(NamedKey::Enter), ModMask::empty(), ts);
        assert_eq!(evt.timestamp, ts);
        assert!(!evt.shifted());
    }

    #[test]
    fn message_channel_delivers_and_tolerates_closed_receiver() {
        let (tx, rx) = message_channel();
        tx.send(StatusMessage::failure(IME_FAILURE_MESSAGE));
        let got = rx.try_recv().expect("message");
        assert_eq!(got.kind, MessageKind::Failure);
        assert_eq!(got.text, IME_FAILURE_MESSAGE);
        drop(rx);
        let before = MESSAGES_DROPPED.load(Ordering::Relaxed);
        tx.send(StatusMessage::info("late"));
        assert!(MESSAGES_DROPPED.load(Ordering::Relaxed) > before);
    }
}
