//! Edit commands and the machinery that applies them.
//!
//! A [`Command`] arrives already decoded by the input layer. The dispatcher
//! compiles it against the current cursor and line topology into an
//! [`OpChain`] (structural, text, sync, cursor ops, in that order) and then
//! executes the chain against the model. Boundary cases compile to Hold ops;
//! anything the executor rejects is a compiler bug surfaced as `EditError`.
//!
//! `io_ops` holds the persistence boundary (load on startup, save on exit).

pub mod dispatcher;
pub mod io_ops;
pub mod ops;

pub use dispatcher::{DispatchResult, dispatch};
pub use ops::{CursorOp, Op, OpChain, StructuralOp, SyncOp, TextOp};

/// Cursor movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// One decoded edit intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    InsertChar(char),
    InsertNewline,
    /// Backspace.
    Delete,
    Exit,
}
