//! Line render cache storage.

/// Identity stamped on a cache when it is created.
///
/// Handles are never reused within one document, so a handle outlives any
/// confusion between a destroyed cache and a freshly created one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderHandle(pub u64);

/// Pixel storage for one rendered line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderCache {
    handle: RenderHandle,
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl RenderCache {
    pub fn new(handle: RenderHandle, width: usize, height: usize, fill: u32) -> Self {
        Self {
            handle,
            width,
            height,
            pixels: vec![fill; width * height],
        }
    }

    pub fn handle(&self) -> RenderHandle {
        self.handle
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.height && col < self.width).then(|| row * self.width + col)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u32> {
        self.index(row, col).map(|i| self.pixels[i])
    }

    /// Write one pixel. Returns false (and writes nothing) when out of range.
    pub fn set(&mut self, row: usize, col: usize, color: u32) -> bool {
        match self.index(row, col) {
            Some(i) => {
                self.pixels[i] = color;
                true
            }
            None => false,
        }
    }

    pub fn fill(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    /// One row of pixels, for blitting.
    pub fn row(&self, row: usize) -> Option<&[u32]> {
        (row < self.height).then(|| &self.pixels[row * self.width..(row + 1) * self.width])
    }
}
