use core_actions::{Dispatcher, EditorContext, edit, motion::place_caret};
use core_events::{
    IME_FAILURE_MESSAGE, KeyEvent, KeyToken, MessageSender, ModMask, NamedKey, StatusMessage,
    SurfaceEvent, SurfaceId, message_channel,
};
use core_input::Passthrough;
use core_keymap::{DEFAULT_CHORD_WINDOW, RouteError};
use core_state::{DEFAULT_HISTORY_DEPTH, EditorState, HistoryStore, Mode};
use core_text::TextAccessor;
use crossbeam_channel::Receiver;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Construction parameters, normally derived from the loaded config.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// `None` lets a chord prefix wait forever.
    pub chord_window: Option<Duration>,
    pub history_depth: usize,
    /// Route codes left to the host in every mode.
    pub passthrough: Vec<String>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            chord_window: Some(DEFAULT_CHORD_WINDOW),
            history_depth: DEFAULT_HISTORY_DEPTH,
            passthrough: std::iter::once("tab".to_string())
                .chain((1..=12).map(|n| format!("f{n}")))
                .collect(),
        }
    }
}

/// What the host should do with the key it forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The session handled the key; suppress the native behaviour.
    Consumed,
    /// Not ours; let the surface apply its default behaviour.
    PassThrough,
    /// Refused (input method in a command mode); suppress and show the message.
    Rejected,
}

/// One editing session shared by every attached surface.
///
/// Invariants:
/// * `active`, when set, names an attached surface.
/// * Mode, clipboard, sticky column and pending keys belong to the focused
///   surface and are reset whenever focus moves.
/// * Undo history is per surface and survives focus changes until detach.
#[derive(Debug)]
pub struct Session<T: TextAccessor> {
    surfaces: BTreeMap<SurfaceId, T>,
    active: Option<SurfaceId>,
    state: EditorState,
    history: HistoryStore,
    dispatcher: Dispatcher,
    passthrough: Passthrough,
    messages: MessageSender,
    receiver: Receiver<StatusMessage>,
    ime_reported: bool,
}

impl<T: TextAccessor> Session<T> {
    pub fn new(options: SessionOptions) -> Result<Self, RouteError> {
        let dispatcher = Dispatcher::with_default_routes(options.chord_window)?;
        let (messages, receiver) = message_channel();
        debug!(
            target: "model.session",
            history_depth = options.history_depth,
            passthrough = options.passthrough.len(),
            chord_window_ms = window_millis(options.chord_window),
            "session_created"
        );
        Ok(Self {
            surfaces: BTreeMap::new(),
            active: None,
            state: EditorState::new(),
            history: HistoryStore::new(options.history_depth),
            dispatcher,
            passthrough: Passthrough::new(&options.passthrough),
            messages,
            receiver,
            ime_reported: false,
        })
    }

    /// Status messages produced by the session (IME failures).
    pub fn messages(&self) -> Receiver<StatusMessage> {
        self.receiver.clone()
    }

    /// Attach `surface` under `id`, returning any surface it replaced.
    pub fn attach(&mut self, id: SurfaceId, surface: T) -> Option<T> {
        let previous = self.surfaces.insert(id, surface);
        if previous.is_some() {
            self.history.remove(id);
            if self.active == Some(id) {
                self.reset_focus_state();
            }
        }
        debug!(target: "model.session", surface = %id, replaced = previous.is_some(), "attach");
        previous
    }

    /// Detach `id`, dropping its history. Detaching the focused surface blurs it.
    pub fn detach(&mut self, id: SurfaceId) -> Option<T> {
        let surface = self.surfaces.remove(&id)?;
        self.history.remove(id);
        if self.active == Some(id) {
            self.active = None;
            self.reset_focus_state();
        }
        debug!(target: "model.session", surface = %id, "detach");
        Some(surface)
    }

    pub fn surface(&self, id: SurfaceId) -> Option<&T> {
        self.surfaces.get(&id)
    }

    pub fn surface_mut(&mut self, id: SurfaceId) -> Option<&mut T> {
        self.surfaces.get_mut(&id)
    }

    pub fn active(&self) -> Option<SurfaceId> {
        self.active
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Snapshots stored for `id`.
    pub fn history_len(&self, id: SurfaceId) -> usize {
        self.history.ring(id).map_or(0, |ring| ring.len())
    }

    /// Focus `id`. Moving focus starts over in Edit mode with an empty clipboard.
    pub fn focus(&mut self, id: SurfaceId) -> bool {
        if !self.surfaces.contains_key(&id) {
            warn!(target: "model.session", surface = %id, "focus_unknown_surface");
            return false;
        }
        if self.active == Some(id) {
            return true;
        }
        self.reset_focus_state();
        self.active = Some(id);
        debug!(target: "model.session", surface = %id, "focus");
        true
    }

    pub fn blur(&mut self, id: SurfaceId) {
        if self.active != Some(id) {
            return;
        }
        self.active = None;
        self.reset_focus_state();
        debug!(target: "model.session", surface = %id, "blur");
    }

    /// Pointer placed the caret at char `offset` of `id` (focusing it first).
    pub fn click(&mut self, id: SurfaceId, offset: usize) -> bool {
        if !self.focus(id) {
            return false;
        }
        let Some((mut cx, _)) = self.context() else {
            return false;
        };
        place_caret(&mut cx, offset);
        true
    }

    /// Route a host event. Key events report what the host should do with
    /// the native behaviour; other events return `None`.
    pub fn handle(&mut self, event: SurfaceEvent) -> Option<KeyOutcome> {
        match event {
            SurfaceEvent::Focus(id) => {
                self.focus(id);
                None
            }
            SurfaceEvent::Blur(id) => {
                self.blur(id);
                None
            }
            SurfaceEvent::Click { surface, offset } => {
                self.click(surface, offset);
                None
            }
            SurfaceEvent::Key(key) => Some(self.handle_key(&key)),
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> KeyOutcome {
        if self.active.is_none() || self.passthrough.allows(key) {
            return KeyOutcome::PassThrough;
        }
        let mode = self.state.mode;
        if mode.is_command_mode() {
            if key.is_ime_composition() {
                if !self.ime_reported {
                    self.messages.send(StatusMessage::failure(IME_FAILURE_MESSAGE));
                    self.ime_reported = true;
                    warn!(target: "model.session", mode = %mode, "ime_input_rejected");
                }
                return KeyOutcome::Rejected;
            }
            self.ime_reported = false;
        }
        let Some((mut cx, dispatcher)) = self.context() else {
            return KeyOutcome::PassThrough;
        };
        if mode.is_command_mode() || key.is_escape() {
            let result = dispatcher.handle_key(key, &mut cx);
            trace!(
                target: "model.session",
                key = %key,
                handled = result.handled,
                dirty = result.dirty,
                "key_dispatched"
            );
            return KeyOutcome::Consumed;
        }
        type_into(&mut cx, key)
    }

    fn context(&mut self) -> Option<(EditorContext<'_, T>, &mut Dispatcher)> {
        let id = self.active?;
        let Self {
            surfaces,
            state,
            history,
            dispatcher,
            ..
        } = self;
        let text = surfaces.get_mut(&id)?;
        let ring = history.ring_mut(id);
        Some((EditorContext::new(text, state, ring), dispatcher))
    }

    fn reset_focus_state(&mut self) {
        self.state.reset();
        self.dispatcher.reset();
        self.ime_reported = false;
    }
}

/// Chord window in whole milliseconds for logging, saturating at `u64::MAX`.
fn window_millis(window: Option<Duration>) -> Option<u64> {
    window.map(|w| u64::try_from(w.as_millis()).unwrap_or(u64::MAX))
}

/// Edit mode: apply the native behaviour of `key` to the surface. A change
/// is recorded with the cell left of the caret so undo lands where General
/// mode would have put the caret.
fn type_into<T: TextAccessor>(cx: &mut EditorContext<'_, T>, key: &KeyEvent) -> KeyOutcome {
    if key
        .mods
        .intersects(ModMask::CTRL | ModMask::ALT | ModMask::META)
    {
        return KeyOutcome::PassThrough;
    }
    let before = cx.text.text();
    let position = cx.text.cursor().saturating_sub(1);
    match key.token {
        KeyToken::Char(_) => {
            let Some(ch) = key.printable() else {
                return KeyOutcome::PassThrough;
            };
            edit::insert_typed(cx, ch.encode_utf8(&mut [0; 4]));
        }
        KeyToken::Named(NamedKey::Enter) => edit::insert_typed(cx, "\n"),
        KeyToken::Named(NamedKey::Backspace) => {
            edit::backspace(cx);
        }
        KeyToken::Named(NamedKey::Delete) => {
            edit::forward_delete(cx);
        }
        KeyToken::Named(named @ (NamedKey::Left | NamedKey::Right | NamedKey::Home | NamedKey::End)) => {
            move_native_caret(cx, named);
            return KeyOutcome::Consumed;
        }
        KeyToken::Named(_) => return KeyOutcome::PassThrough,
    }
    if cx.text.text() != before {
        cx.history.push(before, position);
    }
    KeyOutcome::Consumed
}

fn move_native_caret<T: TextAccessor>(cx: &mut EditorContext<'_, T>, key: NamedKey) {
    let sel = cx.text.selection();
    let caret = sel.end;
    let next = match key {
        NamedKey::Left if !sel.is_collapsed() => sel.lo(),
        NamedKey::Right if !sel.is_collapsed() => sel.hi(),
        NamedKey::Left => caret.saturating_sub(1),
        NamedKey::Right => (caret + 1).min(cx.text.len()),
        NamedKey::Home => cx.text.line_start(caret),
        NamedKey::End => cx.text.line_end(caret),
        _ => caret,
    };
    cx.text.select(next, next);
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::MessageKind;
    use core_text::{Selection, TextArea};
    use pretty_assertions::assert_eq;

    const A: SurfaceId = SurfaceId(1);
    const B: SurfaceId = SurfaceId(2);

    fn session_with(text: &str) -> Session<TextArea> {
        let mut s = Session::new(SessionOptions::default()).expect("routes");
        s.attach(A, TextArea::with_caret(text, text.chars().count()));
        assert!(s.focus(A));
        s
    }

    fn press(s: &mut Session<TextArea>, keys: &str) {
        for c in keys.chars() {
            s.handle_key(&core_input::key_for_char(c));
        }
    }

    #[test]
    fn chord_window_millis_saturate() {
        assert_eq!(window_millis(None), None);
        assert_eq!(window_millis(Some(Duration::from_millis(600))), Some(600));
        assert_eq!(window_millis(Some(Duration::MAX)), Some(u64::MAX));
        let options = SessionOptions {
            chord_window: Some(Duration::MAX),
            ..SessionOptions::default()
        };
        assert!(Session::<TextArea>::new(options).is_ok());
    }

    #[test]
    fn typing_then_escape_then_undo() {
        let mut s = session_with("");
        press(&mut s, "hi");
        assert_eq!(s.surface(A).map(|t| t.text()), Some("hi".to_string()));
        assert_eq!(s.history_len(A), 2);
        s.handle_key(&KeyEvent::named(NamedKey::Esc));
        assert_eq!(s.mode(), Mode::General);
        press(&mut s, "u");
        assert_eq!(s.surface(A).map(|t| t.text()), Some("h".to_string()));
        assert_eq!(s.surface(A).map(|t| t.selection()), Some(Selection::new(0, 1)));
    }

    #[test]
    fn ime_in_general_mode_reports_once() {
        let mut s = session_with("abc");
        let rx = s.messages();
        s.handle_key(&KeyEvent::named(NamedKey::Esc));
        let ime = KeyEvent::named(NamedKey::Process);
        assert_eq!(s.handle_key(&ime), KeyOutcome::Rejected);
        assert_eq!(s.handle_key(&ime), KeyOutcome::Rejected);
        let msg = rx.try_recv().expect("failure message");
        assert_eq!(msg.kind, MessageKind::Failure);
        assert_eq!(msg.text, IME_FAILURE_MESSAGE);
        assert!(rx.try_recv().is_err());
        assert_eq!(s.surface(A).map(|t| t.text()), Some("abc".to_string()));
    }

    #[test]
    fn ime_in_edit_mode_passes_through() {
        let mut s = session_with("abc");
        let ime = KeyEvent::named(NamedKey::Process);
        assert_eq!(s.handle_key(&ime), KeyOutcome::PassThrough);
    }

    #[test]
    fn passthrough_keys_are_never_handled() {
        let mut s = session_with("abc");
        s.handle_key(&KeyEvent::named(NamedKey::Esc));
        assert_eq!(s.handle_key(&KeyEvent::named(NamedKey::Tab)), KeyOutcome::PassThrough);
        assert_eq!(s.handle_key(&KeyEvent::named(NamedKey::F(5))), KeyOutcome::PassThrough);
        assert_eq!(s.handle_key(&KeyEvent::char('q')), KeyOutcome::Consumed);
    }

    #[test]
    fn focus_change_resets_mode_and_clipboard_but_keeps_history() {
        let mut s = session_with("one");
        s.attach(B, TextArea::new("two"));
        s.handle_key(&KeyEvent::named(NamedKey::Esc));
        press(&mut s, "yyx");
        assert_eq!(s.state().clipboard.get(), Some("e"));
        assert_eq!(s.history_len(A), 1);
        assert!(s.focus(B));
        assert_eq!(s.mode(), Mode::Edit);
        assert_eq!(s.state().clipboard.get(), None);
        assert!(s.focus(A));
        assert_eq!(s.history_len(A), 1);
        assert_eq!(s.history_len(B), 0);
    }

    #[test]
    fn detach_focused_surface_blurs() {
        let mut s = session_with("abc");
        assert!(s.detach(A).is_some());
        assert_eq!(s.active(), None);
        assert_eq!(s.handle_key(&KeyEvent::char('x')), KeyOutcome::PassThrough);
        assert!(!s.focus(A));
    }

    #[test]
    fn click_in_general_mode_selects_cell() {
        let mut s = session_with("hello\nworld");
        s.handle_key(&KeyEvent::named(NamedKey::Esc));
        assert!(s.click(A, 8));
        assert_eq!(s.mode(), Mode::General);
        assert_eq!(s.surface(A).map(|t| t.selected_text()), Some("o".to_string()));
    }

    #[test]
    fn edit_mode_named_keys() {
        let mut s = session_with("ab");
        s.handle_key(&KeyEvent::named(NamedKey::Home));
        press(&mut s, "X");
        assert_eq!(s.surface(A).map(|t| t.text()), Some("Xab".to_string()));
        s.handle_key(&KeyEvent::named(NamedKey::End));
        s.handle_key(&KeyEvent::named(NamedKey::Enter));
        s.handle_key(&KeyEvent::named(NamedKey::Backspace));
        s.handle_key(&KeyEvent::named(NamedKey::Left));
        s.handle_key(&KeyEvent::named(NamedKey::Delete));
        assert_eq!(s.surface(A).map(|t| t.text()), Some("Xa".to_string()));
        assert_eq!(
            s.handle_key(&KeyEvent::with_mods(KeyToken::Char('c'), ModMask::CTRL)),
            KeyOutcome::PassThrough
        );
    }
}
