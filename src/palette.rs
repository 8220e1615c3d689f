//! Color palettes: RGB triples, the stock tables, and family detection.
//!
//! A document palette is an ordered list of [`Rgb`] values; cell attributes
//! refer to it by index. The stock EGA table is stored with 6-bit channels
//! and converted to the document's 8-bit encoding by [`convert_ega_to_vga`].
//! The ZX Spectrum and C64 tables are stored 8-bit.
//!
//! [`PaletteFamily`] recognises a palette by content so that callers can ask
//! capability questions (is the background a single global register?)
//! instead of comparing tables themselves.

#[cfg(test)]
#[path = "palette_test.rs"]
mod palette_test;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PaletteError;

/// One palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS color string used to paint swatches and indicators.
    #[must_use]
    pub fn to_css(self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

// =============================================================================
// STOCK TABLES
// =============================================================================

/// Standard 16-color EGA palette, 6 bits per channel.
pub const EGA: [Rgb; 16] = [
    Rgb::new(0, 0, 0),
    Rgb::new(0, 0, 42),
    Rgb::new(0, 42, 0),
    Rgb::new(0, 42, 42),
    Rgb::new(42, 0, 0),
    Rgb::new(42, 0, 42),
    Rgb::new(42, 21, 0),
    Rgb::new(42, 42, 42),
    Rgb::new(21, 21, 21),
    Rgb::new(21, 21, 63),
    Rgb::new(21, 63, 21),
    Rgb::new(21, 63, 63),
    Rgb::new(63, 21, 21),
    Rgb::new(63, 21, 63),
    Rgb::new(63, 63, 21),
    Rgb::new(63, 63, 63),
];

/// ZX Spectrum palette in EGA index order, so `n + 8` is the bright variant of `n`.
pub const ZX_SPECTRUM: [Rgb; 16] = [
    Rgb::new(0x00, 0x00, 0x00),
    Rgb::new(0x00, 0x00, 0xD7),
    Rgb::new(0x00, 0xD7, 0x00),
    Rgb::new(0x00, 0xD7, 0xD7),
    Rgb::new(0xD7, 0x00, 0x00),
    Rgb::new(0xD7, 0x00, 0xD7),
    Rgb::new(0xD7, 0xD7, 0x00),
    Rgb::new(0xD7, 0xD7, 0xD7),
    Rgb::new(0x00, 0x00, 0x00),
    Rgb::new(0x00, 0x00, 0xFF),
    Rgb::new(0x00, 0xFF, 0x00),
    Rgb::new(0x00, 0xFF, 0xFF),
    Rgb::new(0xFF, 0x00, 0x00),
    Rgb::new(0xFF, 0x00, 0xFF),
    Rgb::new(0xFF, 0xFF, 0x00),
    Rgb::new(0xFF, 0xFF, 0xFF),
];

/// Commodore 64 palette ("C64 Community Colors"), in VIC-II register order.
pub const C64: [Rgb; 16] = [
    Rgb::new(0x00, 0x00, 0x00), // black
    Rgb::new(0xFF, 0xFF, 0xFF), // white
    Rgb::new(0xAF, 0x2A, 0x29), // red
    Rgb::new(0x62, 0xD8, 0xCC), // cyan
    Rgb::new(0xB0, 0x3F, 0xB6), // violet
    Rgb::new(0x4A, 0xC6, 0x4A), // green
    Rgb::new(0x37, 0x39, 0xC4), // blue
    Rgb::new(0xE4, 0xED, 0x4E), // yellow
    Rgb::new(0xB6, 0x59, 0x1C), // orange
    Rgb::new(0x68, 0x38, 0x08), // brown
    Rgb::new(0xEA, 0x74, 0x6C), // light red
    Rgb::new(0x4D, 0x4D, 0x4D), // dark grey
    Rgb::new(0x84, 0x84, 0x84), // grey
    Rgb::new(0xA6, 0xFA, 0x9E), // light green
    Rgb::new(0x70, 0x7C, 0xE6), // light blue
    Rgb::new(0xB6, 0xB6, 0xB5), // light grey
];

/// Widen one 6-bit channel to 8 bits, replicating the top bits into the low bits.
fn widen_channel(value: u8) -> u8 {
    (value << 2) | ((value & 0x30) >> 4)
}

/// Convert a 6-bit EGA entry to the 8-bit document encoding.
#[must_use]
pub fn convert_ega_to_vga(rgb: Rgb) -> Rgb {
    Rgb::new(widen_channel(rgb.r), widen_channel(rgb.g), widen_channel(rgb.b))
}

// =============================================================================
// NAMED PALETTES
// =============================================================================

/// Palettes that can be installed by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteName {
    /// EGA table converted to 8-bit channels.
    Default,
    /// ZX Spectrum table.
    Zx,
}

impl PaletteName {
    /// Build the palette in document encoding.
    #[must_use]
    pub fn colors(self) -> Vec<Rgb> {
        match self {
            Self::Default => EGA.iter().copied().map(convert_ega_to_vga).collect(),
            Self::Zx => ZX_SPECTRUM.to_vec(),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Zx => "zx",
        }
    }
}

impl FromStr for PaletteName {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "zx" => Ok(Self::Zx),
            other => Err(PaletteError::UnknownPalette(other.to_owned())),
        }
    }
}

// =============================================================================
// FAMILIES
// =============================================================================

/// Hardware family a palette belongs to, recognised by content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteFamily {
    /// Any palette with per-cell foreground and background.
    Standard,
    /// Commodore 64: one background register for the whole screen.
    C64,
    /// ZX Spectrum colors.
    ZxSpectrum,
}

impl PaletteFamily {
    /// Classify a document palette.
    #[must_use]
    pub fn of(palette: &[Rgb]) -> Self {
        if *palette == C64 {
            Self::C64
        } else if *palette == ZX_SPECTRUM {
            Self::ZxSpectrum
        } else {
            Self::Standard
        }
    }

    /// Whether the background color is a single document-wide attribute.
    #[must_use]
    pub fn has_global_background(self) -> bool {
        matches!(self, Self::C64)
    }
}
