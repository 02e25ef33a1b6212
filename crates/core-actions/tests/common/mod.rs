#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use core_actions::{Command, DispatchResult, Direction, dispatch};
use core_model::EditorModel;
use core_render::{GlyphTable, Surface};
use core_state::LineList;

pub fn model(lines: &[&str]) -> EditorModel {
    EditorModel::new(
        LineList::from_lines(lines.iter().copied(), 0),
        Surface::default(),
        GlyphTable::placeholder(),
    )
    .expect("model should initialize")
}

/// Model with the cursor moved to `(row, inset)` through ordinary commands.
pub fn model_at(lines: &[&str], row: usize, inset: usize) -> EditorModel {
    let mut m = model(lines);
    for _ in 0..row {
        run(&mut m, Command::Move(Direction::Down));
    }
    for _ in 0..inset {
        run(&mut m, Command::Move(Direction::Right));
    }
    assert_eq!(position(&m), (row, inset), "setup position");
    m
}

pub fn run(m: &mut EditorModel, command: Command) -> DispatchResult {
    dispatch(command, m).expect("dispatch should not violate a contract")
}

/// `(line index, inset)` of the cursor.
pub fn position(m: &EditorModel) -> (usize, usize) {
    (
        m.cursor_line_index().expect("cursor line is live"),
        m.cursor().inset(),
    )
}
