//! Line painting: text -> render cache pixels.

use crate::glyph::row_bits;
use crate::{GlyphTable, RenderCache, Surface};

/// Repaint `cache` from scratch with `text`.
///
/// The background is filled first, then one glyph cell per character from the
/// left edge, vertically centred. Characters without a glyph leave their cell
/// blank. Painting stops at the first cell starting past the right edge.
/// Returns the number of cells painted.
pub fn paint_line(
    cache: &mut RenderCache,
    text: &str,
    glyphs: &GlyphTable,
    surface: &Surface,
) -> usize {
    cache.fill(surface.palette.background);
    let top = surface.glyph_top();
    let mut x = 0usize;
    let mut cells = 0usize;
    for ch in text.chars() {
        if x >= cache.width() {
            break;
        }
        if let Some(glyph) = glyphs.get(ch) {
            for (dy, bits) in glyph.iter().enumerate() {
                for dx in row_bits(*bits) {
                    cache.set(top + dy, x + dx, surface.palette.foreground);
                }
            }
        }
        cells += 1;
        x += surface.glyph_width;
    }
    cells
}
