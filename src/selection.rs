//! Pure color-index rules behind the palette chooser shortcuts.
//!
//! These compute the next index only; applying it (highlighting, events,
//! document side effects) is the chooser's job.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use crate::consts::{BRIGHT_OFFSET, CYCLE_LEN, DEFAULT_BACKGROUND, DEFAULT_FOREGROUND};

/// Current foreground/background pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub fg: u8,
    pub bg: u8,
}

impl Default for Selection {
    fn default() -> Self {
        Self { fg: DEFAULT_FOREGROUND, bg: DEFAULT_BACKGROUND }
    }
}

impl Selection {
    /// The pair with foreground and background exchanged.
    #[must_use]
    pub fn swapped(self) -> Self {
        Self { fg: self.bg, bg: self.fg }
    }
}

/// Step forward, wrapping 15 → 0.
#[must_use]
pub fn cycle_next(index: u8) -> u8 {
    if index >= CYCLE_LEN - 1 { 0 } else { index + 1 }
}

/// Step backward, wrapping 0 → 15.
#[must_use]
pub fn cycle_previous(index: u8) -> u8 {
    if index == 0 || index >= CYCLE_LEN { CYCLE_LEN - 1 } else { index - 1 }
}

/// High/low toggle for the eight quick-access keys.
///
/// `base` is the requested low color in `0..8`. Returns the bright variant
/// when `current` already equals `base`, or when `current` is some other
/// bright color; otherwise returns `base`.
#[must_use]
pub fn toggle_bright(current: u8, base: u8) -> u8 {
    let bright = base + BRIGHT_OFFSET;
    if current == base || (current >= BRIGHT_OFFSET && current != bright) {
        bright
    } else {
        base
    }
}
