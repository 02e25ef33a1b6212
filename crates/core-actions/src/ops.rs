//! Typed operations produced by the command compiler.
//!
//! A chain is built fresh per command, consumed once by the executor, then
//! dropped. Ops are stored in phase order (structural, text, sync, cursor);
//! `OpChain::push` refuses to go backwards in debug builds.

use core_state::LineId;
use smallvec::SmallVec;

/// Line topology changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralOp {
    /// New empty line before `before` (at the head when `None`).
    InsertLine { before: Option<LineId> },
    DeleteLine(LineId),
    SliceLine { line: LineId, offset: usize },
    /// Append the next line onto `line` and drop the next line.
    MergeWithNext(LineId),
    /// No topology change; names the line the text op edits.
    ModifyLine(LineId),
    Hold,
}

/// Character edits on the line selected by the structural op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextOp {
    InsertChar { at: usize, ch: char },
    /// Remove the character left of `before`.
    DeleteChar { before: usize },
    Hold,
}

/// Which render caches must be regenerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOp {
    /// The line and its previous neighbour.
    NotifyInserted(LineId),
    /// The line and the new next line.
    NotifySliced(LineId),
    NotifyModified(LineId),
    /// The line is gone; nothing to refresh.
    NotifyDeleted(LineId),
    Hold,
}

/// Cursor movement rules, resolved against post-edit topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorOp {
    /// Previous line, inset clamped to its length.
    Up,
    /// Next line, inset clamped to its length.
    Down,
    Left,
    Right,
    /// End of the previous line.
    UpToLineEnd,
    /// Start of the next line.
    DownToLineStart,
    LineStart,
    LineEnd,
    Hold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Structural(StructuralOp),
    Text(TextOp),
    Sync(SyncOp),
    Cursor(CursorOp),
}

impl Op {
    fn phase(&self) -> u8 {
        match self {
            Op::Structural(_) => 0,
            Op::Text(_) => 1,
            Op::Sync(_) => 2,
            Op::Cursor(_) => 3,
        }
    }

    /// True for ops that change text or topology.
    pub fn mutates(&self) -> bool {
        matches!(
            self,
            Op::Structural(
                StructuralOp::InsertLine { .. }
                    | StructuralOp::DeleteLine(_)
                    | StructuralOp::SliceLine { .. }
                    | StructuralOp::MergeWithNext(_)
            ) | Op::Text(TextOp::InsertChar { .. } | TextOp::DeleteChar { .. })
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpChain {
    ops: SmallVec<[Op; 4]>,
}

impl OpChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// The full four-phase chain most edits compile to.
    pub fn edit(structural: StructuralOp, text: TextOp, sync: SyncOp, cursor: CursorOp) -> Self {
        let mut chain = Self::new();
        chain.push(Op::Structural(structural));
        chain.push(Op::Text(text));
        chain.push(Op::Sync(sync));
        chain.push(Op::Cursor(cursor));
        chain
    }

    /// Every phase held: nothing changes, the cursor is redrawn in place.
    pub fn hold() -> Self {
        Self::edit(
            StructuralOp::Hold,
            TextOp::Hold,
            SyncOp::Hold,
            CursorOp::Hold,
        )
    }

    pub fn cursor_only(op: CursorOp) -> Self {
        let mut chain = Self::new();
        chain.push(Op::Cursor(op));
        chain
    }

    pub fn push(&mut self, op: Op) {
        debug_assert!(
            self.ops.last().is_none_or(|last| last.phase() <= op.phase()),
            "op {op:?} pushed out of phase order"
        );
        self.ops.push(op);
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn mutates(&self) -> bool {
        self.ops.iter().any(Op::mutates)
    }

    /// The cursor op, if the chain carries one.
    pub fn cursor_op(&self) -> Option<CursorOp> {
        self.ops.iter().rev().find_map(|op| match op {
            Op::Cursor(c) => Some(*c),
            _ => None,
        })
    }
}

impl<'a> IntoIterator for &'a OpChain {
    type Item = &'a Op;
    type IntoIter = std::slice::Iter<'a, Op>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}
