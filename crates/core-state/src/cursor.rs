//! Cursor position plus the pixel overlay that makes it visible.
//!
//! The overlay is always cleared before it is drawn again; painting at a new
//! coordinate while the old bar is still up would leave its saved pixels
//! describing the wrong rectangle.

use core_render::{CursorOverlay, Surface};
use tracing::trace;

use crate::{EditError, LineId, LineList};

#[derive(Debug)]
pub struct Cursor {
    line: LineId,
    inset: usize,
    overlay: CursorOverlay,
    /// Line whose cache currently carries the painted overlay.
    painted: Option<LineId>,
}

impl Cursor {
    /// Unpainted cursor at the start of `line`.
    pub fn new(line: LineId, surface: &Surface) -> Self {
        Self {
            line,
            inset: 0,
            overlay: CursorOverlay::new(surface),
            painted: None,
        }
    }

    pub fn coordinate(&self) -> (LineId, usize) {
        (self.line, self.inset)
    }

    pub fn line(&self) -> LineId {
        self.line
    }

    pub fn inset(&self) -> usize {
        self.inset
    }

    pub fn is_visible(&self) -> bool {
        self.painted.is_some()
    }

    /// Reposition without painting.
    ///
    /// Used before a structural edit invalidates the current line; the caller
    /// has already cleared the overlay and paints once the edit is applied.
    pub fn relocate(&mut self, line: LineId, inset: usize) {
        debug_assert!(!self.is_visible(), "relocating a painted cursor");
        trace!(target: "state.cursor", from = %self.line, to = %line, inset, "relocate");
        self.line = line;
        self.inset = inset;
    }

    /// Restore the pixels under the overlay. No-op when not visible.
    ///
    /// If the painted line (or its cache) is gone the saved pixels are dropped.
    pub fn clear(&mut self, lines: &mut LineList) {
        let Some(painted) = self.painted.take() else {
            return;
        };
        match lines.get_mut(painted).and_then(|n| n.cache_mut()) {
            Some(cache) => self.overlay.restore(cache),
            None => self.overlay.discard(),
        }
    }

    /// Clear, move to `(line, inset)`, and paint there.
    pub fn move_to(
        &mut self,
        lines: &mut LineList,
        line: LineId,
        inset: usize,
        surface: &Surface,
    ) -> Result<(), EditError> {
        self.clear(lines);
        let len = lines.line_len(line)?;
        if inset > len {
            return Err(EditError::InsetOutOfRange { inset, len });
        }
        self.line = line;
        self.inset = inset;
        self.redraw(lines, surface)
    }

    /// Paint the overlay at the current coordinate, clearing any old one first.
    pub fn redraw(&mut self, lines: &mut LineList, surface: &Surface) -> Result<(), EditError> {
        self.clear(lines);
        let (row, col) = surface.cursor_origin(self.inset);
        let cache = lines.render_cache_or_init(self.line, surface)?;
        self.overlay.paint(cache, row, col);
        self.painted = Some(self.line);
        trace!(target: "state.cursor", line = %self.line, inset = self.inset, "painted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_render::{Palette, RenderCache};

    fn surface() -> Surface {
        Surface::new(
            64,
            16,
            2,
            Palette {
                foreground: 1,
                background: 0,
                cursor: 9,
            },
        )
    }

    fn cache_of(lines: &LineList, id: LineId) -> RenderCache {
        lines.get(id).unwrap().cache().unwrap().clone()
    }

    #[test]
    fn move_paints_and_clear_restores() {
        let s = surface();
        let mut lines = LineList::from_lines(["abc", "de"], 0);
        let first = lines.first().unwrap();
        lines.render_cache_or_init(first, &s).unwrap();
        let blank = cache_of(&lines, first);

        let mut cur = Cursor::new(first, &s);
        cur.move_to(&mut lines, first, 2, &s).unwrap();
        assert!(cur.is_visible());
        assert_eq!(cur.coordinate(), (first, 2));
        let (row, col) = s.cursor_origin(2);
        assert_eq!(cache_of(&lines, first).get(row, col), Some(9));

        cur.clear(&mut lines);
        assert!(!cur.is_visible());
        assert_eq!(cache_of(&lines, first), blank);
        // Second clear is a no-op.
        cur.clear(&mut lines);
        assert_eq!(cache_of(&lines, first), blank);
    }

    #[test]
    fn moving_between_lines_restores_the_old_one() {
        let s = surface();
        let mut lines = LineList::from_lines(["abc", "de"], 0);
        let (first, second) = (lines.id_at(0).unwrap(), lines.id_at(1).unwrap());
        let mut cur = Cursor::new(first, &s);
        cur.move_to(&mut lines, first, 1, &s).unwrap();
        let before = {
            let mut c = cache_of(&lines, first);
            c.fill(0);
            c
        };
        cur.move_to(&mut lines, second, 2, &s).unwrap();
        assert_eq!(cache_of(&lines, first), before);
        assert_eq!(cur.line(), second);
    }

    #[test]
    fn out_of_range_inset_is_rejected() {
        let s = surface();
        let mut lines = LineList::from_lines(["ab"], 0);
        let first = lines.first().unwrap();
        let mut cur = Cursor::new(first, &s);
        assert_eq!(
            cur.move_to(&mut lines, first, 3, &s),
            Err(EditError::InsetOutOfRange { inset: 3, len: 2 })
        );
        assert!(!cur.is_visible());
    }

    #[test]
    fn clear_after_line_deleted_discards() {
        let s = surface();
        let mut lines = LineList::from_lines(["a", ""], 0);
        let second = lines.id_at(1).unwrap();
        let mut cur = Cursor::new(second, &s);
        cur.redraw(&mut lines, &s).unwrap();
        lines.delete(second).unwrap();
        cur.clear(&mut lines);
        assert!(!cur.is_visible());
        let first = lines.first().unwrap();
        cur.relocate(first, 1);
        assert_eq!(cur.coordinate(), (first, 1));
    }
}
