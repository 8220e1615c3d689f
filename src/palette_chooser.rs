//! Palette chooser: foreground/background selection over the document palette.
//!
//! SYSTEM CONTEXT
//! ==============
//! Driven by four inputs: host bus frames ([`BusEvent`]), keyboard shortcuts
//! ([`Shortcut`]), document lifecycle notifications ([`DocEvent`]) and pointer
//! clicks on swatches. Publishes `set_fg` / `set_bg` to in-process observers,
//! menu-state notifications to the host, and background changes to an
//! optional collaboration peer.
//!
//! DESIGN
//! ======
//! - Selection is two bounded counters. The next value comes from the pure
//!   rules in [`crate::selection`]; `set_foreground` / `set_background` are
//!   the only places that apply one (highlight, indicator, notification).
//! - Palettes whose family keeps the background in one global register
//!   (C64) mirror every background change into the document.
//! - Swatch handles are index-aligned with the document palette and fully
//!   rebuilt on any palette change.

#[cfg(test)]
#[path = "palette_chooser_test.rs"]
mod palette_chooser_test;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::bus::{Emitter, HostBus};
use crate::consts::{BRIGHT_OFFSET, DEFAULT_BACKGROUND, DEFAULT_FOREGROUND, ZX_PAIR_STEP};
use crate::doc::Document;
use crate::error::BusError;
use crate::events::{BusEvent, ChooserEvent, DocEvent, Shortcut, syscall};
use crate::frame::{Data, Frame};
use crate::input::{Button, Modifiers, SwatchTarget, swatch_target};
use crate::palette::{PaletteFamily, PaletteName};
use crate::remote::RemoteChannel;
use crate::selection::{Selection, cycle_next, cycle_previous, toggle_bright};
use crate::view::{Highlight, SwatchView};

/// Foreground/background chooser bound to one document and one swatch strip.
pub struct PaletteChooser<D, V: SwatchView, H> {
    doc: D,
    view: V,
    host: H,
    remote: Option<Box<dyn RemoteChannel>>,
    selection: Selection,
    swatches: Vec<V::Handle>,
    emitter: Emitter<ChooserEvent>,
}

impl<D: Document, V: SwatchView, H: HostBus> PaletteChooser<D, V, H> {
    /// Create a chooser with the default selection (7 on 0). No swatches are
    /// attached until the first [`rebuild_swatches`](Self::rebuild_swatches)
    /// or [`on_new_document`](Self::on_new_document).
    pub fn new(doc: D, view: V, host: H) -> Self {
        Self {
            doc,
            view,
            host,
            remote: None,
            selection: Selection::default(),
            swatches: Vec::new(),
            emitter: Emitter::new(),
        }
    }

    // --- Observers ---

    /// Register an observer for `set_fg` or `set_bg`.
    pub fn on(&mut self, name: &'static str, handler: impl FnMut(&ChooserEvent) + 'static) {
        self.emitter.on(name, handler);
    }

    /// Attach or detach the collaboration channel.
    pub fn set_remote(&mut self, remote: Option<Box<dyn RemoteChannel>>) {
        self.remote = remote;
    }

    // --- Queries ---

    #[must_use]
    pub fn foreground(&self) -> u8 {
        self.selection.fg
    }

    #[must_use]
    pub fn background(&self) -> u8 {
        self.selection.bg
    }

    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection
    }

    #[must_use]
    pub fn swatch_count(&self) -> usize {
        self.swatches.len()
    }

    #[must_use]
    pub fn doc(&self) -> &D {
        &self.doc
    }

    pub fn doc_mut(&mut self) -> &mut D {
        &mut self.doc
    }

    #[must_use]
    pub fn view(&self) -> &V {
        &self.view
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    // --- Selection ---

    /// Select the drawing color. Indices outside the palette are ignored.
    /// Returns whether the selection was applied.
    pub fn set_foreground(&mut self, index: u8) -> bool {
        if !self.in_palette(index) {
            warn!(index, len = self.doc.palette().len(), "foreground index outside palette");
            return false;
        }
        let previous = self.selection.fg;
        self.selection.fg = index;
        self.repaint(Highlight::Foreground, previous, index);
        debug!(fg = index, "foreground selected");
        self.emitter.emit(&ChooserEvent::SetFg(index));
        true
    }

    /// Select the fill color. On palettes with a global background register
    /// the document attribute follows and a render pass is requested.
    pub fn set_background(&mut self, index: u8) -> bool {
        if !self.in_palette(index) {
            warn!(index, len = self.doc.palette().len(), "background index outside palette");
            return false;
        }
        let previous = self.selection.bg;
        self.selection.bg = index;
        self.repaint(Highlight::Background, previous, index);
        debug!(bg = index, "background selected");
        self.emitter.emit(&ChooserEvent::SetBg(index));
        if self.family().has_global_background() {
            self.doc.set_global_background(Some(index));
            self.doc.start_rendering();
        }
        true
    }

    pub fn cycle_foreground_previous(&mut self) {
        self.set_foreground(cycle_previous(self.selection.fg));
    }

    pub fn cycle_foreground_next(&mut self) {
        self.set_foreground(cycle_next(self.selection.fg));
    }

    pub fn cycle_background_previous(&mut self) {
        self.set_background(cycle_previous(self.selection.bg));
        self.propagate_background();
    }

    pub fn cycle_background_next(&mut self) {
        self.set_background(cycle_next(self.selection.bg));
        self.propagate_background();
    }

    /// Exchange foreground and background. Both notifications fire.
    pub fn swap_foreground_background(&mut self) {
        let swapped = self.selection.swapped();
        self.set_foreground(swapped.fg);
        self.set_background(swapped.bg);
        self.propagate_background();
    }

    /// Quick-access key `base` (`0..8`) for the foreground.
    pub fn toggle_foreground(&mut self, base: u8) {
        if base >= BRIGHT_OFFSET {
            warn!(base, "toggle key outside 0..8");
            return;
        }
        self.set_foreground(toggle_bright(self.selection.fg, base));
    }

    /// Quick-access key `base` (`0..8`) for the background.
    pub fn toggle_background(&mut self, base: u8) {
        if base >= BRIGHT_OFFSET {
            warn!(base, "toggle key outside 0..8");
            return;
        }
        self.set_background(toggle_bright(self.selection.bg, base));
        // Propagates after both the low and the bright switch.
        self.propagate_background();
    }

    /// Reset to light grey on black.
    pub fn default_color(&mut self) {
        self.set_foreground(DEFAULT_FOREGROUND);
        self.set_background(DEFAULT_BACKGROUND);
        self.propagate_background();
    }

    /// Ask the host to open its attribute dialog, seeded with the current
    /// selection and palette. Blocks until the host replies.
    ///
    /// # Errors
    ///
    /// Returns the [`BusError`] from the host round-trip.
    pub fn select_attribute(&self) -> Result<Frame, BusError> {
        let palette: Vec<_> = self
            .doc
            .palette()
            .iter()
            .map(|c| json!({ "r": c.r, "g": c.g, "b": c.b }))
            .collect();
        let mut data = Data::new();
        data.insert("foreground".into(), json!(self.selection.fg));
        data.insert("background".into(), json!(self.selection.bg));
        data.insert("palette".into(), json!(palette));

        self.host
            .send_sync(Frame::request(syscall::SELECT_ATTRIBUTE, data))
            .inspect_err(|e| warn!(error = %e, "attribute dialog request failed"))
    }

    // --- Palettes ---

    /// Install a palette by name (`"default"` or `"zx"`). Unknown names are
    /// ignored.
    pub fn set_color_palette(&mut self, name: &str) {
        match name.parse::<PaletteName>() {
            Ok(palette) => self.install_palette(palette),
            Err(e) => warn!(error = %e, "palette not installed"),
        }
    }

    pub fn toggle_default_palette(&mut self) {
        self.host.send(Frame::notify(syscall::UNCHECK_ALL_PALETTES));
        self.install_palette(PaletteName::Default);
        self.host.send(Frame::notify(syscall::CHECK_DEFAULT_PALETTE));
    }

    pub fn toggle_zx_spectrum_palette(&mut self) {
        self.host.send(Frame::notify(syscall::UNCHECK_ALL_PALETTES));
        self.install_palette(PaletteName::Zx);
        self.host.send(Frame::notify(syscall::CHECK_ZX_SPECTRUM_PALETTE));
    }

    /// Turn ZX attribute restrictions on or off. Enabling runs the
    /// restriction over every cell pair of the document.
    pub fn toggle_zx_restrictions(&mut self, enabled: bool) {
        if !enabled {
            self.host.send(Frame::notify(syscall::UNCHECK_ZX_RESTRICTIONS));
            self.doc.set_zx_restriction(false);
            self.doc.rerender();
            info!("zx restrictions cleared");
            return;
        }

        self.host.send(Frame::notify(syscall::CHECK_ZX_RESTRICTIONS));
        self.doc.set_zx_restriction(true);
        let (columns, rows) = (self.doc.columns(), self.doc.rows());
        for y in 0..rows {
            for x in (0..columns).step_by(ZX_PAIR_STEP) {
                self.doc.apply_zx_restrictions(x, y);
            }
        }
        info!(columns, rows, "zx restrictions applied");
    }

    fn install_palette(&mut self, name: PaletteName) {
        let colors = name.colors();
        self.doc.set_palette(colors.clone());
        for (index, rgb) in colors.into_iter().enumerate() {
            self.doc.replace_cache_at(index, rgb);
        }
        self.doc.rerender();
        info!(palette = name.as_str(), "palette installed");
        self.rebuild_swatches();
    }

    // --- Swatches ---

    /// Detach every swatch and attach one per current palette entry, then
    /// re-apply the selection. Safe to call repeatedly.
    pub fn rebuild_swatches(&mut self) {
        for handle in self.swatches.drain(..) {
            self.view.remove_swatch(handle);
        }

        let palette = self.doc.palette().to_vec();
        let mut handles = Vec::with_capacity(palette.len());
        for (index, rgb) in palette.iter().enumerate() {
            handles.push(self.view.create_swatch(index, *rgb));
        }
        self.swatches = handles;

        if palette.is_empty() {
            return;
        }
        let last = u8::try_from(palette.len() - 1).unwrap_or(u8::MAX);
        let fg = self.selection.fg.min(last);
        let bg = self.selection.bg.min(last);
        self.set_foreground(fg);
        self.set_background(bg);

        let global = self.family().has_global_background().then_some(bg);
        self.doc.set_global_background(global);
        debug!(count = palette.len(), "swatches rebuilt");
    }

    /// Pointer-down on swatch `index`.
    pub fn on_swatch_pointer_down(&mut self, index: usize, button: Button, modifiers: Modifiers) {
        let Ok(index) = u8::try_from(index) else {
            return;
        };
        match swatch_target(button, modifiers) {
            Some(SwatchTarget::Foreground) => {
                self.set_foreground(index);
            }
            Some(SwatchTarget::Background) => {
                self.set_background(index);
            }
            None => {}
        }
    }

    // --- Documents ---

    /// Reconcile with a freshly loaded document.
    pub fn on_new_document(&mut self) {
        if let Some(bg) = self.doc.global_background() {
            self.selection.bg = bg;
        } else if self.family().has_global_background() {
            if let Some(cell) = self.doc.cell(0, 0) {
                self.selection.bg = cell.bg;
                self.emitter.emit(&ChooserEvent::SetBg(cell.bg));
                self.doc.set_global_background(Some(cell.bg));
            }
        }

        if self.doc.has_zx_restriction() {
            self.toggle_zx_spectrum_palette();
            self.host.send(Frame::notify(syscall::CHECK_ZX_RESTRICTIONS));
        } else {
            self.host.send(Frame::notify(syscall::CHECK_DEFAULT_PALETTE));
            self.host.send(Frame::notify(syscall::UNCHECK_ZX_RESTRICTIONS));
        }
        self.rebuild_swatches();
    }

    // --- Event dispatch ---

    /// React to a host bus event.
    pub fn handle_bus(&mut self, event: BusEvent) {
        match event {
            BusEvent::PreviousForegroundColor => self.cycle_foreground_previous(),
            BusEvent::NextForegroundColor => self.cycle_foreground_next(),
            BusEvent::PreviousBackgroundColor => self.cycle_background_previous(),
            BusEvent::NextBackgroundColor => self.cycle_background_next(),
            BusEvent::DefaultColor => self.default_color(),
            BusEvent::ToggleDefaultPalette => self.toggle_default_palette(),
            BusEvent::ToggleZxSpectrumPalette => self.toggle_zx_spectrum_palette(),
            BusEvent::ToggleZxRestrictions { checked } => self.toggle_zx_restrictions(checked),
            BusEvent::SwitchForegroundBackground => self.swap_foreground_background(),
            BusEvent::SetFg(index) => {
                self.set_foreground(index);
            }
            BusEvent::SetBg(index) => {
                self.set_background(index);
                self.propagate_background();
            }
        }
    }

    /// Parse and handle a raw frame. Returns `false` for frames the chooser
    /// does not consume.
    pub fn handle_frame(&mut self, frame: &Frame) -> bool {
        let Some(event) = BusEvent::from_frame(frame) else {
            return false;
        };
        self.handle_bus(event);
        true
    }

    pub fn handle_shortcut(&mut self, shortcut: Shortcut) {
        match shortcut {
            Shortcut::PreviousForegroundColor => self.cycle_foreground_previous(),
            Shortcut::NextForegroundColor => self.cycle_foreground_next(),
            Shortcut::PreviousBackgroundColor => self.cycle_background_previous(),
            Shortcut::NextBackgroundColor => self.cycle_background_next(),
            Shortcut::ToggleFg(base) => self.toggle_foreground(base),
            Shortcut::ToggleBg(base) => self.toggle_background(base),
        }
    }

    pub fn handle_doc_event(&mut self, event: DocEvent) {
        match event {
            DocEvent::NewDocument => self.on_new_document(),
            DocEvent::UpdateSwatches => self.rebuild_swatches(),
            DocEvent::SetBg(index) => {
                self.set_background(index);
            }
        }
    }

    // --- Internals ---

    fn family(&self) -> PaletteFamily {
        PaletteFamily::of(self.doc.palette())
    }

    fn in_palette(&self, index: u8) -> bool {
        usize::from(index) < self.doc.palette().len()
    }

    /// Move `highlight` from swatch `previous` to swatch `next` and repaint
    /// the matching indicator.
    fn repaint(&mut self, highlight: Highlight, previous: u8, next: u8) {
        if let Some(handle) = self.swatches.get(usize::from(previous)) {
            self.view.set_highlight(handle, highlight, false);
        }
        if let Some(handle) = self.swatches.get(usize::from(next)) {
            self.view.set_highlight(handle, highlight, true);
        }
        if let Some(color) = self.doc.palette().get(usize::from(next)) {
            self.view.set_indicator(highlight, *color);
        }
    }

    fn propagate_background(&self) {
        if let Some(remote) = &self.remote {
            remote.set_bg(self.selection.bg);
        }
    }
}
