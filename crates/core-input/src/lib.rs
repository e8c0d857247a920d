//! Key input helpers shared by hosts: the textual key notation used for
//! scripted replay and the passthrough filter applied before dispatch.

pub mod filter;
pub mod notation;

pub use filter::Passthrough;
pub use notation::{KeyParseError, key_for_char, parse_keys, parse_keys_at};
