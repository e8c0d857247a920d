//! core-keymap: route table and pending key state.
//!
//! Pieces:
//! - [`Router`]: lowercase key codes (and `a_b` chords) mapped to binding
//!   records, assembled through a fallible builder.
//! - [`ActionId`]: the closed set of handlers a binding can name.
//! - [`CountAccumulator`] and [`ChordTracker`]: state carried between key
//!   events while a numeric prefix or a two-key chord is being typed.
//! - [`default_router`]: the built-in vim-style table.
//!
//! Nothing here touches text. Resolution is deterministic given the table,
//! the previous code and the timestamps; logging stays at TRACE/DEBUG.

mod action;
mod pending;
mod router;
mod routes;

pub use action::ActionId;
pub use pending::{ChordTracker, CountAccumulator, DEFAULT_CHORD_WINDOW};
pub use router::{ActionToken, BoundAction, KeyBinding, RouteBuilder, RouteError, Router};
pub use routes::default_router;
