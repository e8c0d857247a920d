//! Route table: key code → binding record.
//!
//! Codes are lowercase key identifiers (`"d"`, `"4"`, `"arrowleft"`) or two
//! codes joined by `_` for chords (`"g_g"`). A binding may require a mode,
//! may ask for a history snapshot before it runs (`record`) and maps the
//! plain and shifted invocation of the key to separate actions, each with an
//! optional mode to enter afterwards.
//!
//! Tables are assembled through [`Router::code`], which hands back a
//! [`RouteBuilder`] borrowing the new entry. Every builder step either
//! returns the builder or a [`RouteError`]; nothing is dropped silently.

use crate::ActionId;
use core_state::Mode;
use smallvec::SmallVec;
use std::collections::HashMap;
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("route code must not be empty")]
    EmptyCode,
    #[error("chord `{0}` joins more than two keys")]
    ChordTooLong(String),
    #[error("route code `{0}` is already bound")]
    DuplicateCode(String),
    #[error("route `{code}` already binds the {token:?} action")]
    DuplicateAction { code: String, token: ActionToken },
}

/// Plain or shift-modified invocation of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionToken {
    Plain,
    Shift,
}

impl ActionToken {
    pub fn from_shift(shifted: bool) -> Self {
        if shifted {
            ActionToken::Shift
        } else {
            ActionToken::Plain
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundAction {
    pub action: ActionId,
    pub mode_after: Option<Mode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    pub code: String,
    pub name: String,
    pub required_mode: Option<Mode>,
    pub record: bool,
    actions: SmallVec<[(ActionToken, BoundAction); 2]>,
}

impl KeyBinding {
    fn new(code: &str, name: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            required_mode: None,
            record: false,
            actions: SmallVec::new(),
        }
    }

    pub fn resolve(&self, token: ActionToken) -> Option<BoundAction> {
        self.actions
            .iter()
            .find(|(t, _)| *t == token)
            .map(|(_, bound)| *bound)
    }

    /// Display name for `token`: `G` style when the name has a case, else `shift_<name>`.
    pub fn action_name(&self, token: ActionToken) -> String {
        match token {
            ActionToken::Plain => self.name.clone(),
            ActionToken::Shift => {
                let upper = self.name.to_uppercase();
                if upper == self.name {
                    format!("shift_{}", self.name)
                } else {
                    upper
                }
            }
        }
    }

    pub fn applies_in(&self, mode: Mode) -> bool {
        self.required_mode.is_none_or(|required| required == mode)
    }
}

#[derive(Debug, Default, Clone)]
pub struct Router {
    bindings: HashMap<String, KeyBinding>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new binding for `code`.
    pub fn code(&mut self, code: &str, name: &str) -> Result<RouteBuilder<'_>, RouteError> {
        let code = code.to_lowercase();
        if code.is_empty() || code.split('_').any(str::is_empty) {
            return Err(RouteError::EmptyCode);
        }
        if code.split('_').count() > 2 {
            return Err(RouteError::ChordTooLong(code));
        }
        if self.bindings.contains_key(&code) {
            return Err(RouteError::DuplicateCode(code));
        }
        trace!(target: "keymap.router", code = %code, name, "route_added");
        let binding = self
            .bindings
            .entry(code.clone())
            .or_insert_with(|| KeyBinding::new(&code, name));
        Ok(RouteBuilder { binding })
    }

    pub fn get(&self, code: &str) -> Option<&KeyBinding> {
        self.bindings.get(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.bindings.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Fluent builder over one binding.
#[derive(Debug)]
pub struct RouteBuilder<'a> {
    binding: &'a mut KeyBinding,
}

impl<'a> RouteBuilder<'a> {
    /// Only dispatch while `mode` is active.
    pub fn mode(self, mode: Mode) -> Self {
        self.binding.required_mode = Some(mode);
        self
    }

    /// Snapshot history before running.
    pub fn record(self) -> Self {
        self.binding.record = true;
        self
    }

    pub fn action(self, token: ActionToken, action: ActionId) -> Result<Self, RouteError> {
        self.bind(token, action, None)
    }

    /// Bind `action` and switch to `mode_after` once it has run.
    pub fn action_then(
        self,
        token: ActionToken,
        action: ActionId,
        mode_after: Mode,
    ) -> Result<Self, RouteError> {
        self.bind(token, action, Some(mode_after))
    }

    fn bind(
        self,
        token: ActionToken,
        action: ActionId,
        mode_after: Option<Mode>,
    ) -> Result<Self, RouteError> {
        if self.binding.resolve(token).is_some() {
            return Err(RouteError::DuplicateAction {
                code: self.binding.code.clone(),
                token,
            });
        }
        self.binding
            .actions
            .push((token, BoundAction { action, mode_after }));
        Ok(self)
    }
}
