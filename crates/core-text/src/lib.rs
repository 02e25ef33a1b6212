//! Per-line text storage backed by a piece table.
//!
//! Every document line owns one [`PieceTable`]. Offsets throughout this crate
//! are *character* offsets (one `char` per position); grapheme clustering is
//! not modeled.
//!
//! Sharing model:
//! * The original text of a table is an immutable `Rc<[char]>`.
//! * The edit buffer is append-only and shared between tables produced by
//!   [`PieceTable::slice_at`], so splitting a line copies no characters.
//!   Appending never moves previously written characters, which keeps every
//!   existing span valid no matter which half writes next.
//! * Tables are `!Send`; the editing core is strictly single-threaded.

pub mod piece_table;

pub use piece_table::{PieceTable, Span, SpanSource};

/// Contract violations raised by piece table edits.
///
/// These indicate a caller bug (the command compiler is responsible for never
/// emitting an out-of-range edit); they are not recoverable runtime states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    #[error("offset {offset} is past the end of a line of length {len}")]
    OffsetOutOfRange { offset: usize, len: usize },
    #[error("delete cursor {cursor} is past the end of a line of length {len}")]
    DeleteOutOfRange { cursor: usize, len: usize },
}
