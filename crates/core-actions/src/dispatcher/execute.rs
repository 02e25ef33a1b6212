//! Operation executor: applies a compiled chain to the model's parts.
//!
//! Ops run strictly in chain order. The structural op selects the target line
//! for the text op; sync ops repaint render caches; the cursor op runs last so
//! it sees post-edit topology. The first failing op aborts the rest.

use core_model::{EditParts, refresh_line};
use core_state::{EditError, LineId, LineList};
use core_text::TextError;
use tracing::trace;

use crate::ops::{CursorOp, Op, OpChain, StructuralOp, SyncOp, TextOp};

/// Apply `chain`. Returns whether text or topology changed.
pub fn execute(chain: &OpChain, parts: EditParts<'_>) -> Result<bool, EditError> {
    let EditParts {
        lines,
        cursor,
        surface,
        glyphs,
    } = parts;
    let mut target: Option<LineId> = None;
    for op in chain {
        trace!(target: "actions.execute", ?op, "apply");
        match *op {
            Op::Structural(s) => target = apply_structural(s, lines)?,
            Op::Text(t) => {
                let line = target.unwrap_or_else(|| cursor.line());
                apply_text(t, line, lines)?;
            }
            Op::Sync(s) => {
                for id in refresh_set(s, lines) {
                    refresh_line(lines, id, surface, glyphs)?;
                }
            }
            Op::Cursor(c) => {
                let (line, inset) = resolve_cursor(c, cursor.coordinate(), lines)?;
                cursor.move_to(lines, line, inset, surface)?;
            }
        }
    }
    Ok(chain.mutates())
}

/// Returns the line later text ops apply to, if any survives.
fn apply_structural(op: StructuralOp, lines: &mut LineList) -> Result<Option<LineId>, EditError> {
    match op {
        StructuralOp::InsertLine { before } => lines.insert_before(before, "").map(Some),
        StructuralOp::DeleteLine(id) => lines.delete(id).map(|()| None),
        StructuralOp::SliceLine { line, offset } => lines.slice_at(line, offset).map(|_| Some(line)),
        StructuralOp::MergeWithNext(id) => lines.merge_with_next(id).map(|_| Some(id)),
        StructuralOp::ModifyLine(id) => {
            if lines.contains(id) {
                Ok(Some(id))
            } else {
                Err(EditError::StaleLine(id))
            }
        }
        StructuralOp::Hold => Ok(None),
    }
}

fn apply_text(op: TextOp, line: LineId, lines: &mut LineList) -> Result<(), EditError> {
    match op {
        TextOp::InsertChar { at, ch } => {
            let table = lines.table_mut(line)?;
            let len = table.len();
            if at > len {
                return Err(TextError::OffsetOutOfRange { offset: at, len }.into());
            }
            table.insert_char(at, ch);
        }
        TextOp::DeleteChar { before } => {
            lines.table_mut(line)?.delete_char(before)?;
        }
        TextOp::Hold => {}
    }
    Ok(())
}

/// Lines whose render cache a sync op regenerates.
fn refresh_set(op: SyncOp, lines: &LineList) -> Vec<LineId> {
    match op {
        SyncOp::NotifyInserted(id) => std::iter::once(id).chain(lines.prev(id)).collect(),
        SyncOp::NotifySliced(id) => std::iter::once(id).chain(lines.next(id)).collect(),
        SyncOp::NotifyModified(id) => vec![id],
        SyncOp::NotifyDeleted(_) | SyncOp::Hold => Vec::new(),
    }
}

/// Target coordinate for a cursor op from `(line, inset)`.
fn resolve_cursor(
    op: CursorOp,
    (line, inset): (LineId, usize),
    lines: &LineList,
) -> Result<(LineId, usize), EditError> {
    let prev = || lines.prev(line).ok_or(EditError::NoNeighbour(line));
    let next = || lines.next(line).ok_or(EditError::NoNeighbour(line));
    Ok(match op {
        CursorOp::Up => {
            let up = prev()?;
            (up, inset.min(lines.line_len(up)?))
        }
        CursorOp::Down => {
            let down = next()?;
            (down, inset.min(lines.line_len(down)?))
        }
        CursorOp::Left => (line, inset.saturating_sub(1)),
        CursorOp::Right => (line, inset + 1),
        CursorOp::UpToLineEnd => {
            let up = prev()?;
            (up, lines.line_len(up)?)
        }
        CursorOp::DownToLineStart => (next()?, 0),
        CursorOp::LineStart => (line, 0),
        CursorOp::LineEnd => (line, lines.line_len(line)?),
        CursorOp::Hold => (line, inset),
    })
}
