//! Recording view ports.
//!
//! [`HeadlessSwatches`] and [`HeadlessChat`] keep everything a real UI would
//! show as plain data, so the controllers can be driven and inspected without
//! a display. The chat log has a pixel scroll model (fixed line height,
//! fixed viewport) that mirrors how a scrolling DOM element behaves.

#[cfg(test)]
#[path = "headless_test.rs"]
mod headless_test;

use std::collections::HashMap;

use crate::palette::Rgb;
use crate::view::{ChatView, Highlight, LogEntry, SwatchView, UserStatus};

// =============================================================================
// SWATCHES
// =============================================================================

/// Handle to a headless swatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SwatchId(u64);

/// An attached swatch as the user would see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwatchRecord {
    pub id: SwatchId,
    pub index: usize,
    pub color: Rgb,
    /// CSS fill as a browser swatch would carry it.
    pub style: String,
    pub selected_fg: bool,
    pub selected_bg: bool,
}

/// Swatch strip kept in memory.
#[derive(Debug, Default)]
pub struct HeadlessSwatches {
    next_id: u64,
    attached: Vec<SwatchRecord>,
    indicators: HashMap<Highlight, Rgb>,
    removed: usize,
}

impl HeadlessSwatches {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attached swatches in strip order.
    #[must_use]
    pub fn attached(&self) -> &[SwatchRecord] {
        &self.attached
    }

    /// Palette indices currently carrying `highlight`.
    #[must_use]
    pub fn highlighted(&self, highlight: Highlight) -> Vec<usize> {
        self.attached
            .iter()
            .filter(|s| match highlight {
                Highlight::Foreground => s.selected_fg,
                Highlight::Background => s.selected_bg,
            })
            .map(|s| s.index)
            .collect()
    }

    #[must_use]
    pub fn indicator(&self, highlight: Highlight) -> Option<Rgb> {
        self.indicators.get(&highlight).copied()
    }

    /// Total swatches detached so far.
    #[must_use]
    pub fn removed(&self) -> usize {
        self.removed
    }
}

impl SwatchView for HeadlessSwatches {
    type Handle = SwatchId;

    fn create_swatch(&mut self, index: usize, color: Rgb) -> SwatchId {
        let id = SwatchId(self.next_id);
        self.next_id += 1;
        let style = color.to_css();
        self.attached.push(SwatchRecord { id, index, color, style, selected_fg: false, selected_bg: false });
        id
    }

    fn remove_swatch(&mut self, handle: SwatchId) {
        let before = self.attached.len();
        self.attached.retain(|s| s.id != handle);
        self.removed += before - self.attached.len();
    }

    fn set_highlight(&mut self, handle: &SwatchId, highlight: Highlight, on: bool) {
        if let Some(swatch) = self.attached.iter_mut().find(|s| s.id == *handle) {
            match highlight {
                Highlight::Foreground => swatch.selected_fg = on,
                Highlight::Background => swatch.selected_bg = on,
            }
        }
    }

    fn set_indicator(&mut self, highlight: Highlight, color: Rgb) {
        self.indicators.insert(highlight, color);
    }
}

// =============================================================================
// CHAT
// =============================================================================

/// Handle to a headless roster row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowId(u64);

/// A roster row as the user would see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRecord {
    pub id: RowId,
    pub label: String,
    pub status_icon: Option<&'static str>,
}

/// Chat panel kept in memory.
#[derive(Debug)]
pub struct HeadlessChat {
    next_row: u64,
    rows: Vec<RowRecord>,
    entries: Vec<LogEntry>,
    line_height: u32,
    viewport_height: u32,
    scroll_top: u32,
    layout: HashMap<String, u32>,
    input_focused: bool,
    input_clears: usize,
}

impl HeadlessChat {
    /// Empty panel whose log viewport is `viewport_height` pixels tall.
    #[must_use]
    pub fn new(line_height: u32, viewport_height: u32) -> Self {
        Self {
            next_row: 0,
            rows: Vec::new(),
            entries: Vec::new(),
            line_height,
            viewport_height,
            scroll_top: 0,
            layout: HashMap::new(),
            input_focused: false,
            input_clears: 0,
        }
    }

    #[must_use]
    pub fn rows(&self) -> &[RowRecord] {
        &self.rows
    }

    /// Roster labels in row order.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.label.as_str()).collect()
    }

    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Total log height in pixels.
    #[must_use]
    pub fn content_height(&self) -> u32 {
        let lines: usize = self.entries.iter().map(LogEntry::line_count).sum();
        u32::try_from(lines).unwrap_or(u32::MAX).saturating_mul(self.line_height)
    }

    #[must_use]
    pub fn scroll_top(&self) -> u32 {
        self.scroll_top
    }

    /// User scroll: move the viewport top to `y`, clamped to the content.
    pub fn scroll_to(&mut self, y: u32) {
        self.scroll_top = y.min(self.max_scroll());
    }

    #[must_use]
    pub fn layout_var(&self, name: &str) -> Option<u32> {
        self.layout.get(name).copied()
    }

    #[must_use]
    pub fn input_focused(&self) -> bool {
        self.input_focused
    }

    /// How many times the input box was cleared.
    #[must_use]
    pub fn input_clears(&self) -> usize {
        self.input_clears
    }

    fn max_scroll(&self) -> u32 {
        self.content_height().saturating_sub(self.viewport_height)
    }
}

impl ChatView for HeadlessChat {
    type Row = RowId;

    fn create_row(&mut self, label: &str) -> RowId {
        let id = RowId(self.next_row);
        self.next_row += 1;
        self.rows.push(RowRecord { id, label: label.to_owned(), status_icon: None });
        id
    }

    fn set_row_label(&mut self, row: &RowId, label: &str) {
        if let Some(record) = self.rows.iter_mut().find(|r| r.id == *row) {
            label.clone_into(&mut record.label);
        }
    }

    fn set_row_status(&mut self, row: &RowId, status: UserStatus) {
        if let Some(record) = self.rows.iter_mut().find(|r| r.id == *row) {
            record.status_icon = Some(status.icon());
        }
    }

    fn remove_row(&mut self, row: RowId) {
        self.rows.retain(|r| r.id != row);
    }

    fn append(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    fn is_scrolled_to_bottom(&self) -> bool {
        self.content_height() <= self.viewport_height || self.scroll_top >= self.max_scroll()
    }

    fn scroll_to_bottom(&mut self) {
        self.scroll_top = self.max_scroll();
    }

    fn set_layout_var(&mut self, name: &str, px: u32) {
        self.layout.insert(name.to_owned(), px);
    }

    fn clear_input(&mut self) {
        self.input_clears += 1;
    }

    fn focus_input(&mut self) {
        self.input_focused = true;
    }

    fn blur_input(&mut self) {
        self.input_focused = false;
    }
}
