//! Per-line render caches and the pixel-level primitives that fill them.
//!
//! Scope: everything between a line's logical text and the opaque pixel
//! array an external rasterizer blits to the window. Window-system
//! connection and blitting live outside this crate.
//!
//! Exposed Components:
//! - `cache`: [`RenderCache`], a fixed `line_height x width` `u32` array
//!   addressed by `(row, column)`, stamped with a [`RenderHandle`].
//! - `glyph`: [`GlyphTable`], an immutable char -> 8x8 bitmap lookup built
//!   once and injected; never global state.
//! - `paint`: [`paint_line`], background fill + left-to-right glyph drawing.
//! - `overlay`: [`CursorOverlay`], capture/paint/restore of the pixels under
//!   the cursor bar so blinking never needs a full line repaint.
//!
//! Invariants:
//! - A cache's pixel array length is always `width * height`.
//! - Out-of-range pixel writes are ignored, out-of-range reads yield `None`.
//! - An overlay restores exactly the pixels it captured, at the origin it
//!   captured them from.

pub mod cache;
pub mod glyph;
pub mod overlay;
pub mod paint;

pub use cache::{RenderCache, RenderHandle};
pub use glyph::{GLYPH_HEIGHT, GLYPH_WIDTH, Glyph, GlyphTable};
pub use overlay::CursorOverlay;
pub use paint::paint_line;

/// ARGB colors used when painting lines and the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub foreground: u32,
    pub background: u32,
    pub cursor: u32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            foreground: 0xFF00_0000,
            background: 0xFFFF_FFFF,
            cursor: 0xFF00_0000,
        }
    }
}

/// Fixed geometry shared by every line render cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Surface {
    /// Pixels per cache row.
    pub width: usize,
    /// Rows per line cache.
    pub line_height: usize,
    pub glyph_width: usize,
    pub glyph_height: usize,
    pub cursor_width: usize,
    pub palette: Palette,
}

impl Surface {
    pub fn new(width: usize, line_height: usize, cursor_width: usize, palette: Palette) -> Self {
        Self {
            width,
            line_height,
            glyph_width: GLYPH_WIDTH,
            glyph_height: GLYPH_HEIGHT,
            cursor_width,
            palette,
        }
    }

    /// Top row of a vertically centred glyph cell.
    pub fn glyph_top(&self) -> usize {
        self.line_height.saturating_sub(self.glyph_height) / 2
    }

    /// `(row, column)` of the cursor bar's top-left pixel for a char inset.
    pub fn cursor_origin(&self, inset: usize) -> (usize, usize) {
        (self.glyph_top(), inset.saturating_mul(self.glyph_width))
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::new(800, 16, 2, Palette::default())
    }
}
