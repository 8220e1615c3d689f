//! Document collaborator: what the palette chooser reads and drives.
//!
//! The editor's real document (grid, glyph cache, renderer) lives outside this
//! crate. [`Document`] is the slice of it the chooser needs. [`TextDoc`] is a
//! complete in-memory implementation used by tests and the demo binary: a
//! grid of [`Cell`]s, a per-index color cache, render counters, and a simple
//! ZX attribute-clash rule for cell pairs.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::consts::{BRIGHT_OFFSET, DEFAULT_BACKGROUND, DEFAULT_FOREGROUND, MAX_DOCUMENT_CELLS};
use crate::palette::{PaletteName, Rgb};

/// One character cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub code: u8,
    pub fg: u8,
    pub bg: u8,
}

impl Default for Cell {
    fn default() -> Self {
        Self { code: b' ', fg: DEFAULT_FOREGROUND, bg: DEFAULT_BACKGROUND }
    }
}

/// The document surface consumed by the palette chooser.
pub trait Document {
    /// Active palette, indexed by cell attributes.
    fn palette(&self) -> &[Rgb];

    /// Replace the active palette wholesale.
    fn set_palette(&mut self, palette: Vec<Rgb>);

    /// Document-wide background for palettes that have one.
    fn global_background(&self) -> Option<u8>;

    fn set_global_background(&mut self, value: Option<u8>);

    /// Whether ZX attribute restrictions are in force.
    fn has_zx_restriction(&self) -> bool;

    fn set_zx_restriction(&mut self, enabled: bool);

    /// Rebuild the cached glyph colors for one palette index.
    fn replace_cache_at(&mut self, index: usize, rgb: Rgb);

    /// Full re-render of every cell.
    fn rerender(&mut self);

    /// Request an incremental render pass.
    fn start_rendering(&mut self);

    fn columns(&self) -> usize;

    fn rows(&self) -> usize;

    /// Resolve attribute clash for the cell pair starting at `(x, y)`.
    fn apply_zx_restrictions(&mut self, x: usize, y: usize);

    fn cell(&self, x: usize, y: usize) -> Option<Cell>;
}

// =============================================================================
// IN-MEMORY DOCUMENT
// =============================================================================

/// In-memory document grid.
#[derive(Debug, Clone)]
pub struct TextDoc {
    columns: usize,
    rows: usize,
    cells: Vec<Cell>,
    palette: Vec<Rgb>,
    global_background: Option<u8>,
    zx_restriction: bool,
    color_cache: HashMap<usize, Rgb>,
    full_renders: usize,
    render_requests: usize,
}

impl TextDoc {
    /// Blank document with the default palette and a warm color cache.
    ///
    /// A grid over [`MAX_DOCUMENT_CELLS`] (or one whose size overflows) is
    /// logged and replaced by an empty 0x0 grid.
    #[must_use]
    pub fn new(columns: usize, rows: usize) -> Self {
        let (columns, rows) = match columns.checked_mul(rows) {
            Some(cells) if cells <= MAX_DOCUMENT_CELLS => (columns, rows),
            _ => {
                warn!(columns, rows, "document grid too large; using an empty grid");
                (0, 0)
            }
        };
        let palette = PaletteName::Default.colors();
        let color_cache = palette.iter().copied().enumerate().collect();
        Self {
            columns,
            rows,
            cells: vec![Cell::default(); columns * rows],
            palette,
            global_background: None,
            zx_restriction: false,
            color_cache,
            full_renders: 0,
            render_requests: 0,
        }
    }

    /// Builder: start with a specific palette.
    #[must_use]
    pub fn with_palette(mut self, palette: Vec<Rgb>) -> Self {
        self.color_cache = palette.iter().copied().enumerate().collect();
        self.palette = palette;
        self
    }

    /// Builder: start with a stored global background.
    #[must_use]
    pub fn with_global_background(mut self, value: u8) -> Self {
        self.global_background = Some(value);
        self
    }

    /// Builder: start with the ZX restriction flag set.
    #[must_use]
    pub fn with_zx_restriction(mut self) -> Self {
        self.zx_restriction = true;
        self
    }

    /// Overwrite one cell. Out-of-range coordinates are ignored.
    pub fn set_cell(&mut self, x: usize, y: usize, cell: Cell) {
        if let Some(slot) = self.index_of(x, y).and_then(|i| self.cells.get_mut(i)) {
            *slot = cell;
        }
    }

    /// Cached color for a palette index, if the cache holds one.
    #[must_use]
    pub fn cached_color(&self, index: usize) -> Option<Rgb> {
        self.color_cache.get(&index).copied()
    }

    /// Number of entries in the color cache.
    #[must_use]
    pub fn cache_len(&self) -> usize {
        self.color_cache.len()
    }

    /// Number of full re-renders performed.
    #[must_use]
    pub fn full_renders(&self) -> usize {
        self.full_renders
    }

    /// Number of incremental render requests.
    #[must_use]
    pub fn render_requests(&self) -> usize {
        self.render_requests
    }

    fn index_of(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.columns && y < self.rows).then(|| y * self.columns + x)
    }
}

/// Move a color index into the low or bright half.
fn into_half(index: u8, bright: bool) -> u8 {
    let low = index % BRIGHT_OFFSET;
    if bright { low + BRIGHT_OFFSET } else { low }
}

impl Document for TextDoc {
    fn palette(&self) -> &[Rgb] {
        &self.palette
    }

    fn set_palette(&mut self, palette: Vec<Rgb>) {
        let len = palette.len();
        self.color_cache.retain(|index, _| *index < len);
        self.palette = palette;
    }

    fn global_background(&self) -> Option<u8> {
        self.global_background
    }

    fn set_global_background(&mut self, value: Option<u8>) {
        self.global_background = value;
    }

    fn has_zx_restriction(&self) -> bool {
        self.zx_restriction
    }

    fn set_zx_restriction(&mut self, enabled: bool) {
        self.zx_restriction = enabled;
    }

    fn replace_cache_at(&mut self, index: usize, rgb: Rgb) {
        self.color_cache.insert(index, rgb);
    }

    fn rerender(&mut self) {
        self.full_renders += 1;
    }

    fn start_rendering(&mut self) {
        self.render_requests += 1;
    }

    fn columns(&self) -> usize {
        self.columns
    }

    fn rows(&self) -> usize {
        self.rows
    }

    /// A pair shares one brightness bit, taken from the left cell's foreground.
    fn apply_zx_restrictions(&mut self, x: usize, y: usize) {
        let Some(left) = self.cell(x, y) else {
            return;
        };
        let bright = left.fg >= BRIGHT_OFFSET;
        for cx in [x, x + 1] {
            if let Some(mut cell) = self.cell(cx, y) {
                cell.fg = into_half(cell.fg, bright);
                cell.bg = into_half(cell.bg, bright);
                self.set_cell(cx, y, cell);
            }
        }
    }

    fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        self.index_of(x, y).and_then(|i| self.cells.get(i)).copied()
    }
}
