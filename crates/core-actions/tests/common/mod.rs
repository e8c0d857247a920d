#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use core_actions::{DispatchResult, Dispatcher, EditorContext, mode::switch_mode_to};
use core_events::{KeyEvent, KeyToken, ModMask, NamedKey};
use core_keymap::DEFAULT_CHORD_WINDOW;
use core_state::{EditorState, HistoryRing, Mode};
use core_text::{Selection, TextAccessor, TextArea};

/// Six lines of mixed word and punctuation characters.
/// Newlines at 10, 21, 32, 43, 54; line starts 0, 11, 22, 33, 44, 55.
pub const FIXTURE: &str = "0123456789\na-b+c,d.e/\nf{g}h[i]?j\nk(l)m_n=o*\np&q^r%s#t@\nu~v!w:x;yz";

/// One focused surface with its session state, driven key by key.
pub struct Harness {
    pub text: TextArea,
    pub state: EditorState,
    pub history: HistoryRing,
    pub dispatcher: Dispatcher,
}

impl Harness {
    /// Edit mode with a collapsed caret at `caret`.
    pub fn new(content: &str, caret: usize) -> Self {
        let dispatcher = Dispatcher::with_default_routes(Some(DEFAULT_CHORD_WINDOW))
            .expect("default routes");
        Self {
            text: TextArea::with_caret(content, caret),
            state: EditorState::new(),
            history: HistoryRing::default(),
            dispatcher,
        }
    }

    /// Caret collapsed at `caret`, then switched to `mode` the way a user would.
    pub fn in_mode(content: &str, caret: usize, mode: Mode) -> Self {
        let mut h = Self::new(content, caret);
        h.switch(mode);
        h
    }

    pub fn with<R>(&mut self, f: impl FnOnce(&mut EditorContext<'_, TextArea>) -> R) -> R {
        let mut cx = EditorContext::new(&mut self.text, &mut self.state, &mut self.history);
        f(&mut cx)
    }

    pub fn switch(&mut self, mode: Mode) {
        self.with(|cx| switch_mode_to(cx, mode));
    }

    pub fn key(&mut self, key: KeyEvent) -> DispatchResult {
        let Self {
            text,
            state,
            history,
            dispatcher,
        } = self;
        let mut cx = EditorContext::new(text, state, history);
        dispatcher.handle_key(&key, &mut cx)
    }

    /// Press each char of `keys`; uppercase letters carry shift.
    pub fn type_keys(&mut self, keys: &str) {
        for c in keys.chars() {
            self.key(char_key(c));
        }
    }

    pub fn named(&mut self, key: NamedKey) -> DispatchResult {
        self.key(KeyEvent::named(key))
    }

    pub fn shift(&mut self, c: char) -> DispatchResult {
        self.key(KeyEvent::with_mods(KeyToken::Char(c), ModMask::SHIFT))
    }

    pub fn selected(&self) -> String {
        self.text.selected_text()
    }

    pub fn selection(&self) -> Selection {
        self.text.selection()
    }

    pub fn value(&self) -> String {
        self.text.text()
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }
}

pub fn char_key(c: char) -> KeyEvent {
    if c.is_ascii_uppercase() {
        KeyEvent::with_mods(KeyToken::Char(c.to_ascii_lowercase()), ModMask::SHIFT)
    } else {
        KeyEvent::char(c)
    }
}
