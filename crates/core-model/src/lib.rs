//! High-level editor model: the line list, the cursor, and the fixed render
//! inputs (surface geometry + glyph table) they are drawn with.
//!
//! `EditorModel` is the unit the dispatcher mutates and the external
//! rasterizer reads. Keeping the four parts behind one owner lets the
//! dispatcher borrow them disjointly (`parts_mut`) without the cursor ever
//! holding a reference into the list.
//!
//! Core invariants (must hold after every public call):
//! * The line list is never empty.
//! * The cursor names a live line and its inset is within `[0, len]`.
//! * Every line the cursor has visited carries a render cache; every line has
//!   one after `new`.
//! * When the cursor is visible its overlay is painted on exactly one cache,
//!   the cursor line's.
//!
//! Outbound render interface:
//! * `lines()` yields a [`LineView`] per line in document order: id, current
//!   text, and the render cache (pixels addressed by `(row, column)`).
//!
//! Not safe for concurrent commands: the model is `!Send` and every call runs
//! to completion before the next one starts.

use core_config::Config;
use core_render::{GlyphTable, Palette, RenderCache, Surface, paint_line};
use core_state::{Cursor, EditError, LineId, LineList};
use tracing::{debug, trace};

/// One line as seen by the rasterizer.
#[derive(Debug, Clone)]
pub struct LineView<'a> {
    pub id: LineId,
    pub text: String,
    pub cache: Option<&'a RenderCache>,
}

/// Disjoint mutable access to the model's parts.
pub struct EditParts<'a> {
    pub lines: &'a mut LineList,
    pub cursor: &'a mut Cursor,
    pub surface: &'a Surface,
    pub glyphs: &'a GlyphTable,
}

#[derive(Debug)]
pub struct EditorModel {
    lines: LineList,
    cursor: Cursor,
    surface: Surface,
    glyphs: GlyphTable,
}

impl EditorModel {
    /// Paint every line and place a visible cursor at the start of the first.
    pub fn new(mut lines: LineList, surface: Surface, glyphs: GlyphTable) -> Result<Self, EditError> {
        let first = match lines.first() {
            Some(id) => id,
            None => lines.push_back(""),
        };
        let ids: Vec<LineId> = lines.iter().map(|(id, _)| id).collect();
        for id in ids {
            refresh_line(&mut lines, id, &surface, &glyphs)?;
        }
        let mut cursor = Cursor::new(first, &surface);
        cursor.redraw(&mut lines, &surface)?;
        debug!(target: "state.lines", lines = lines.len(), glyphs = glyphs.len(), "model_ready");
        Ok(Self {
            lines,
            cursor,
            surface,
            glyphs,
        })
    }

    pub fn line_list(&self) -> &LineList {
        &self.lines
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn glyphs(&self) -> &GlyphTable {
        &self.glyphs
    }

    pub fn parts_mut(&mut self) -> EditParts<'_> {
        EditParts {
            lines: &mut self.lines,
            cursor: &mut self.cursor,
            surface: &self.surface,
            glyphs: &self.glyphs,
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = LineView<'_>> {
        self.lines.iter().map(|(id, node)| LineView {
            id,
            text: node.text(),
            cache: node.cache(),
        })
    }

    pub fn texts(&self) -> Vec<String> {
        self.lines.texts()
    }

    pub fn serialize(&self) -> String {
        self.lines.serialize()
    }

    /// Zero-based index of the cursor line (O(n)).
    pub fn cursor_line_index(&self) -> Option<usize> {
        self.lines.index_of(self.cursor.line())
    }

    /// Repaint one line, keeping the cursor overlay consistent if it sits there.
    pub fn refresh_line(&mut self, id: LineId) -> Result<(), EditError> {
        let on_cursor_line = self.cursor.is_visible() && self.cursor.line() == id;
        if on_cursor_line {
            self.cursor.clear(&mut self.lines);
        }
        refresh_line(&mut self.lines, id, &self.surface, &self.glyphs)?;
        if on_cursor_line {
            self.cursor.redraw(&mut self.lines, &self.surface)?;
        }
        Ok(())
    }

    /// Blink: clear the cursor when visible, paint it otherwise.
    /// Returns the new visibility.
    pub fn toggle_cursor(&mut self) -> Result<bool, EditError> {
        if self.cursor.is_visible() {
            self.cursor.clear(&mut self.lines);
        } else {
            self.cursor.redraw(&mut self.lines, &self.surface)?;
        }
        Ok(self.cursor.is_visible())
    }
}

/// Re-derive `id`'s text from its piece table and repaint its render cache.
///
/// The cache is created on first use. Callers clear a cursor overlay painted
/// on `id` beforehand.
pub fn refresh_line(
    lines: &mut LineList,
    id: LineId,
    surface: &Surface,
    glyphs: &GlyphTable,
) -> Result<(), EditError> {
    let text = lines.text(id)?;
    let cache = lines.render_cache_or_init(id, surface)?;
    let cells = paint_line(cache, &text, glyphs, surface);
    trace!(target: "state.lines", line = %id, cells, "line_refreshed");
    Ok(())
}

/// Surface geometry and palette from the clamped config values.
pub fn surface_from_config(config: &Config) -> Surface {
    let viewport = config.viewport();
    let colors = config.file.colors;
    Surface::new(
        viewport.width,
        viewport.line_height,
        viewport.cursor_width,
        Palette {
            foreground: colors.foreground,
            background: colors.background,
            cursor: colors.cursor,
        },
    )
}
