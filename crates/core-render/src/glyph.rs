//! Immutable glyph lookup injected at the rendering boundary.
//!
//! Each glyph is an 8x8 bitmap: one byte per row, most significant bit is the
//! leftmost column. The table is built once at startup and only read after.

use std::collections::HashMap;

pub const GLYPH_WIDTH: usize = 8;
pub const GLYPH_HEIGHT: usize = 8;

pub type Glyph = [u8; GLYPH_HEIGHT];

/// Hollow box used by [`GlyphTable::placeholder`].
const BOX: Glyph = [
    0b0000_0000,
    0b0111_1110,
    0b0100_0010,
    0b0100_0010,
    0b0100_0010,
    0b0100_0010,
    0b0111_1110,
    0b0000_0000,
];

#[derive(Debug, Clone, Default)]
pub struct GlyphTable {
    glyphs: HashMap<char, Glyph>,
}

impl GlyphTable {
    pub fn new(glyphs: HashMap<char, Glyph>) -> Self {
        Self { glyphs }
    }

    /// A box for every printable ASCII character; space stays blank.
    pub fn placeholder() -> Self {
        ('!'..='~').map(|c| (c, BOX)).collect()
    }

    pub fn get(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(&ch)
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

impl FromIterator<(char, Glyph)> for GlyphTable {
    fn from_iter<I: IntoIterator<Item = (char, Glyph)>>(iter: I) -> Self {
        Self {
            glyphs: iter.into_iter().collect(),
        }
    }
}

/// Columns set in one glyph row, left to right.
pub(crate) fn row_bits(bits: u8) -> impl Iterator<Item = usize> {
    (0..GLYPH_WIDTH).filter(move |col| bits & (0x80 >> col) != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_covers_printable_ascii() {
        let t = GlyphTable::placeholder();
        assert_eq!(t.len(), 94);
        assert!(t.get('a').is_some());
        assert!(t.get(' ').is_none());
        assert!(t.get('é').is_none());
    }

    #[test]
    fn row_bits_msb_first() {
        let cols: Vec<usize> = row_bits(0b1000_0001).collect();
        assert_eq!(cols, vec![0, 7]);
    }
}
