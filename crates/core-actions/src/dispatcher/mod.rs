//! Dispatcher applying a `Command` to the editor model.
//!
//! Each dispatch runs one command to completion:
//! 1. clear the cursor overlay (it is always redrawn, never moved in place),
//! 2. `compile` the command into an `OpChain` (may relocate the cursor);
//!    `Exit` stops here with the overlay put back as it was,
//! 3. `execute` the chain against the model.
//!
//! An `Err` means the compiler emitted an op that is invalid for the current
//! state. The rest of the chain was abandoned and the model should not be
//! edited further.

use core_model::EditorModel;
use core_state::EditError;

use crate::Command;

pub mod compile;
pub mod execute;

pub use compile::{Compiled, compile};
pub use execute::execute;

/// Result of dispatching a single `Command`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    /// Text or line topology changed.
    pub dirty: bool,
    pub quit: bool,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            quit: false,
        }
    }
    pub fn clean() -> Self {
        Self {
            dirty: false,
            quit: false,
        }
    }
    pub fn quit() -> Self {
        Self {
            dirty: false,
            quit: true,
        }
    }
}

pub fn dispatch(command: Command, model: &mut EditorModel) -> Result<DispatchResult, EditError> {
    let parts = model.parts_mut();
    let before = parts.cursor.coordinate();
    let was_visible = parts.cursor.is_visible();
    parts.cursor.clear(parts.lines);
    let chain = match compile(command, parts.lines, parts.cursor)? {
        Compiled::Chain(chain) => chain,
        Compiled::Exit => {
            // Exit never relocates; put the overlay back exactly as it was.
            if was_visible {
                parts.cursor.redraw(parts.lines, parts.surface)?;
            }
            tracing::debug!(target: "actions.dispatch", "exit");
            return Ok(DispatchResult::quit());
        }
    };
    let dirty = execute(&chain, parts)?;
    let after = model.cursor().coordinate();
    tracing::trace!(
        target: "actions.dispatch",
        ?command,
        line = %before.0,
        inset = before.1,
        to_line = %after.0,
        to_inset = after.1,
        dirty,
        "dispatch"
    );
    Ok(if dirty {
        DispatchResult::dirty()
    } else {
        DispatchResult::clean()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Direction;
    use core_render::{GlyphTable, Surface};
    use core_state::LineList;

    fn model(lines: &[&str]) -> EditorModel {
        EditorModel::new(
            LineList::from_lines(lines.iter().copied(), 0),
            Surface::default(),
            GlyphTable::placeholder(),
        )
        .unwrap()
    }

    #[test]
    fn exit_quits_without_touching_state() {
        let mut m = model(&["abc"]);
        let before: Vec<_> = m.lines().map(|v| v.cache.cloned()).collect();
        let res = dispatch(Command::Exit, &mut m).unwrap();
        assert!(res.quit);
        assert!(!res.dirty);
        let after: Vec<_> = m.lines().map(|v| v.cache.cloned()).collect();
        assert_eq!(before, after);
        assert!(m.cursor().is_visible());
    }

    #[test]
    fn exit_keeps_a_hidden_cursor_hidden() {
        let mut m = model(&["abc"]);
        assert!(!m.toggle_cursor().unwrap());
        let before: Vec<_> = m.lines().map(|v| v.cache.cloned()).collect();
        assert_eq!(dispatch(Command::Exit, &mut m).unwrap(), DispatchResult::quit());
        let after: Vec<_> = m.lines().map(|v| v.cache.cloned()).collect();
        assert_eq!(before, after);
        assert!(!m.cursor().is_visible());
    }

    #[test]
    fn moves_are_clean_edits_are_dirty() {
        let mut m = model(&["abc"]);
        assert_eq!(
            dispatch(Command::Move(Direction::Right), &mut m).unwrap(),
            DispatchResult::clean()
        );
        assert_eq!(
            dispatch(Command::InsertChar('z'), &mut m).unwrap(),
            DispatchResult::dirty()
        );
        assert_eq!(m.texts(), vec!["azbc"]);
        assert_eq!(m.cursor().inset(), 2);
        assert!(m.cursor().is_visible());
    }

    #[test]
    fn held_command_redraws_cursor_in_place() {
        let mut m = model(&["abc"]);
        let before: Vec<_> = m.lines().map(|v| v.cache.cloned()).collect();
        let res = dispatch(Command::Delete, &mut m).unwrap();
        assert_eq!(res, DispatchResult::clean());
        let after: Vec<_> = m.lines().map(|v| v.cache.cloned()).collect();
        assert_eq!(before, after);
    }
}
