//! Cursor overlay: a bar painted over a line cache with the covered pixels saved.
//!
//! The overlay never repaints in place. Callers restore first and paint again
//! at the new origin, otherwise the saved region would describe pixels that
//! are no longer underneath the bar.

use crate::{RenderCache, Surface};

#[derive(Debug, Clone)]
pub struct CursorOverlay {
    width: usize,
    height: usize,
    color: u32,
    saved: Vec<u32>,
    /// Origin of the live overlay; `None` when nothing is painted.
    origin: Option<(usize, usize)>,
}

impl CursorOverlay {
    pub fn new(surface: &Surface) -> Self {
        Self {
            width: surface.cursor_width,
            height: surface.glyph_height,
            color: surface.palette.cursor,
            saved: Vec::with_capacity(surface.cursor_width * surface.glyph_height),
            origin: None,
        }
    }

    pub fn is_painted(&self) -> bool {
        self.origin.is_some()
    }

    pub fn origin(&self) -> Option<(usize, usize)> {
        self.origin
    }

    pub fn saved(&self) -> &[u32] {
        &self.saved
    }

    /// Capture the rectangle at `(row, col)` and paint the bar over it.
    ///
    /// Pixels outside the cache capture as 0 and are never written.
    pub fn paint(&mut self, cache: &mut RenderCache, row: usize, col: usize) {
        debug_assert!(self.origin.is_none(), "overlay painted twice without restore");
        self.saved.clear();
        for dy in 0..self.height {
            for dx in 0..self.width {
                self.saved.push(cache.get(row + dy, col + dx).unwrap_or(0));
                cache.set(row + dy, col + dx, self.color);
            }
        }
        self.origin = Some((row, col));
    }

    /// Put the captured pixels back. No-op when nothing is painted.
    pub fn restore(&mut self, cache: &mut RenderCache) {
        let Some((row, col)) = self.origin.take() else {
            return;
        };
        let mut saved = self.saved.iter();
        for dy in 0..self.height {
            for dx in 0..self.width {
                if let Some(&px) = saved.next() {
                    cache.set(row + dy, col + dx, px);
                }
            }
        }
    }

    /// Forget the live overlay without touching any cache (its cache is gone).
    pub fn discard(&mut self) {
        if self.origin.take().is_some() {
            tracing::trace!(target: "render.overlay", "overlay_discarded");
        }
        self.saved.clear();
    }
}
