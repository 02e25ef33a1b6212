//! Editor state: the line list, the cursor, and the error taxonomy for edits.
//!
//! Ownership model:
//! - `LineList` owns every `LineNode` through an arena of slots; neighbours
//!   are linked by `LineId` rather than pointers, so splicing stays O(1)
//!   without self-referential borrows.
//! - Each node exclusively owns its `PieceTable` and (lazily) its
//!   `RenderCache`.
//! - `Cursor` names its line by `LineId` directly. A stale id (the slot was
//!   freed, maybe reused) is detected through the id's generation.
//!
//! Concurrency contract: none of these types are safe for concurrent
//! commands. They are `!Send` because sliced piece tables share their edit
//! buffer through `Rc`; one command is compiled and executed to completion
//! before the next is accepted.

pub mod cursor;
pub mod document;
pub mod lines;

pub use cursor::Cursor;
pub use document::{join_lines, split_lines};
pub use lines::{LineId, LineIter, LineList, LineNode};

use core_text::TextError;

/// Contract violations surfaced while applying edits.
///
/// Any of these escaping the executor means the command compiler emitted an
/// operation that is invalid against current state; callers treat it as fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error(transparent)]
    Text(#[from] TextError),
    #[error("line {0} no longer exists")]
    StaleLine(LineId),
    #[error("line {0} has no next line to merge with")]
    NoNextLine(LineId),
    #[error("line {0} has no neighbour in the requested direction")]
    NoNeighbour(LineId),
    #[error("the last remaining line cannot be removed")]
    EmptyDocument,
    #[error("cursor inset {inset} is outside a line of length {len}")]
    InsetOutOfRange { inset: usize, len: usize },
}
