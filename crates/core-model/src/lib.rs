//! Editing session: the host-facing surface of the modal engine.
//!
//! A [`Session`] owns every attached input surface, the single editor state
//! shared between them, and the per-surface undo history. Hosts forward
//! focus, blur, pointer and key events; each key comes back with a
//! [`KeyOutcome`] telling the host whether to suppress its native handling.
//!
//! Core invariants (must hold after every public call):
//! * At most one surface is focused, and only an attached one.
//! * Mode, clipboard and any pending count or chord belong to the focused
//!   surface. Focus changes reset them; undo history is kept until detach.
//! * In General and Visual mode every non-passthrough key is consumed or
//!   rejected, never handed back to the host.

mod session;

pub use session::{KeyOutcome, Session, SessionOptions};
