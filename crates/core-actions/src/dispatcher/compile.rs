//! Command compiler: `(Command, cursor line, inset)` -> `OpChain`.
//!
//! Pure decision apart from one side effect: when a structural op is about
//! to remove or absorb the cursor's line, the cursor is relocated onto the
//! surviving line *before* the chain is returned, so the cursor op later
//! resolves against a line that still exists.
//!
//! Decision table (`*` marks pre-relocation):
//!
//! | Command   | Condition                  | Structural          | Text        | Sync              | Cursor          |
//! |-----------|----------------------------|---------------------|-------------|-------------------|-----------------|
//! | Delete    | empty, topmost             | Hold                | Hold        | Hold              | Hold            |
//! | Delete    | empty, not topmost         | DeleteLine(cur) *   | Hold        | NotifyDeleted     | LineEnd         |
//! | Delete    | inset 0, topmost           | Hold                | Hold        | Hold              | Hold            |
//! | Delete    | inset 0, not topmost       | MergeWithNext(prev)*| Hold        | NotifyModified    | Hold            |
//! | Delete    | inset > 0                  | ModifyLine(cur)     | DeleteChar  | NotifyModified    | Left            |
//! | Newline   | any                        | SliceLine(cur)      | Hold        | NotifySliced      | DownToLineStart |
//! | Char      | any                        | ModifyLine(cur)     | InsertChar  | NotifyModified    | Right           |
//! | Up/Down   | neighbour exists / not     |                     |             |                   | Up/Down / Hold  |
//! | Left      | inset > 0 / 0 + prev / 0   |                     |             |                   | Left / UpToLineEnd / Hold |
//! | Right     | inset < len / end + next / end |                 |             |                   | Right / DownToLineStart / Hold |

use core_state::{Cursor, EditError, LineList};
use tracing::trace;

use crate::ops::{CursorOp, OpChain, StructuralOp, SyncOp, TextOp};
use crate::{Command, Direction};

/// Compiler outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compiled {
    /// The caller should terminate; nothing was compiled.
    Exit,
    Chain(OpChain),
}

/// Compile `command` against the cursor's current coordinate.
///
/// The cursor must not be painted when a relocating branch is taken; the
/// dispatcher clears it first.
pub fn compile(
    command: Command,
    lines: &LineList,
    cursor: &mut Cursor,
) -> Result<Compiled, EditError> {
    let (line, inset) = cursor.coordinate();
    let len = lines.line_len(line)?;
    let prev = lines.prev(line);
    let next = lines.next(line);

    let chain = match command {
        Command::Exit => return Ok(Compiled::Exit),
        Command::Delete => match prev {
            None if len == 0 || inset == 0 => OpChain::hold(),
            Some(prev) if len == 0 => {
                let prev_len = lines.line_len(prev)?;
                cursor.relocate(prev, prev_len);
                OpChain::edit(
                    StructuralOp::DeleteLine(line),
                    TextOp::Hold,
                    SyncOp::NotifyDeleted(line),
                    CursorOp::LineEnd,
                )
            }
            Some(prev) if inset == 0 => {
                let join = lines.line_len(prev)?;
                cursor.relocate(prev, join);
                OpChain::edit(
                    StructuralOp::MergeWithNext(prev),
                    TextOp::Hold,
                    SyncOp::NotifyModified(prev),
                    CursorOp::Hold,
                )
            }
            _ => OpChain::edit(
                StructuralOp::ModifyLine(line),
                TextOp::DeleteChar { before: inset },
                SyncOp::NotifyModified(line),
                CursorOp::Left,
            ),
        },
        Command::InsertNewline | Command::InsertChar('\n' | '\r') => OpChain::edit(
            StructuralOp::SliceLine {
                line,
                offset: inset,
            },
            TextOp::Hold,
            SyncOp::NotifySliced(line),
            CursorOp::DownToLineStart,
        ),
        Command::InsertChar(ch) => OpChain::edit(
            StructuralOp::ModifyLine(line),
            TextOp::InsertChar { at: inset, ch },
            SyncOp::NotifyModified(line),
            CursorOp::Right,
        ),
        Command::Move(direction) => OpChain::cursor_only(move_op(
            direction,
            inset,
            len,
            prev.is_some(),
            next.is_some(),
        )),
    };
    trace!(target: "actions.compile", ?command, line = %line, inset, len, ops = ?chain.ops(), "compiled");
    Ok(Compiled::Chain(chain))
}

/// Cursor-only rules. Document boundaries hold.
fn move_op(direction: Direction, inset: usize, len: usize, has_prev: bool, has_next: bool) -> CursorOp {
    match direction {
        Direction::Up if has_prev => CursorOp::Up,
        Direction::Down if has_next => CursorOp::Down,
        Direction::Left if inset > 0 => CursorOp::Left,
        Direction::Left if has_prev => CursorOp::UpToLineEnd,
        Direction::Right if inset < len => CursorOp::Right,
        Direction::Right if has_next => CursorOp::DownToLineStart,
        _ => CursorOp::Hold,
    }
}
