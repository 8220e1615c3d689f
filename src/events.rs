//! Typed events flowing into and out of the palette chooser.
//!
//! SYSTEM CONTEXT
//! ==============
//! Inbound: [`BusEvent`] (frames from the host menu/IPC layer),
//! [`Shortcut`] (keyboard dispatcher) and [`DocEvent`] (document lifecycle).
//! Outbound: [`ChooserEvent`] to in-process observers, plus the host
//! notifications named in [`syscall`].

#[cfg(test)]
#[path = "events_test.rs"]
mod events_test;

use crate::bus::Event;
use crate::frame::{FRAME_CHECKED, FRAME_VALUE, Frame};

/// Bus syscall names.
pub mod syscall {
    // Consumed.
    pub const PREVIOUS_FOREGROUND_COLOR: &str = "previous_foreground_color";
    pub const NEXT_FOREGROUND_COLOR: &str = "next_foreground_color";
    pub const PREVIOUS_BACKGROUND_COLOR: &str = "previous_background_color";
    pub const NEXT_BACKGROUND_COLOR: &str = "next_background_color";
    pub const DEFAULT_COLOR: &str = "default_color";
    pub const TOGGLE_DEFAULT_PALETTE: &str = "toggle_default_palette";
    pub const TOGGLE_ZX_SPECTRUM_PALETTE: &str = "toggle_zx_spectrum_palette";
    pub const TOGGLE_ZX_RESTRICTIONS: &str = "toggle_zx_restrictions";
    pub const SWITCH_FOREGROUND_BACKGROUND: &str = "switch_foreground_background";

    // Consumed and emitted.
    pub const SET_FG: &str = "set_fg";
    pub const SET_BG: &str = "set_bg";

    // Emitted.
    pub const UNCHECK_ALL_PALETTES: &str = "uncheck_all_palettes";
    pub const CHECK_DEFAULT_PALETTE: &str = "check_default_palette";
    pub const CHECK_ZX_SPECTRUM_PALETTE: &str = "check_zx_spectrum_palette";
    pub const UNCHECK_ZX_RESTRICTIONS: &str = "uncheck_zx_restrictions";
    pub const CHECK_ZX_RESTRICTIONS: &str = "check_zx_restrictions";
    pub const SELECT_ATTRIBUTE: &str = "select_attribute";
}

/// A host bus event the chooser reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusEvent {
    PreviousForegroundColor,
    NextForegroundColor,
    PreviousBackgroundColor,
    NextBackgroundColor,
    DefaultColor,
    ToggleDefaultPalette,
    ToggleZxSpectrumPalette,
    ToggleZxRestrictions { checked: bool },
    SwitchForegroundBackground,
    SetFg(u8),
    SetBg(u8),
}

impl BusEvent {
    /// Parse an inbound frame. Unknown syscalls and missing payload fields
    /// yield `None`.
    #[must_use]
    pub fn from_frame(frame: &Frame) -> Option<Self> {
        let event = match frame.syscall.as_str() {
            syscall::PREVIOUS_FOREGROUND_COLOR => Self::PreviousForegroundColor,
            syscall::NEXT_FOREGROUND_COLOR => Self::NextForegroundColor,
            syscall::PREVIOUS_BACKGROUND_COLOR => Self::PreviousBackgroundColor,
            syscall::NEXT_BACKGROUND_COLOR => Self::NextBackgroundColor,
            syscall::DEFAULT_COLOR => Self::DefaultColor,
            syscall::TOGGLE_DEFAULT_PALETTE => Self::ToggleDefaultPalette,
            syscall::TOGGLE_ZX_SPECTRUM_PALETTE => Self::ToggleZxSpectrumPalette,
            syscall::TOGGLE_ZX_RESTRICTIONS => Self::ToggleZxRestrictions { checked: frame.flag(FRAME_CHECKED)? },
            syscall::SWITCH_FOREGROUND_BACKGROUND => Self::SwitchForegroundBackground,
            syscall::SET_FG => Self::SetFg(frame.index(FRAME_VALUE)?),
            syscall::SET_BG => Self::SetBg(frame.index(FRAME_VALUE)?),
            _ => return None,
        };
        Some(event)
    }

    /// Encode as a request frame; inverse of [`BusEvent::from_frame`].
    #[must_use]
    pub fn to_frame(self) -> Frame {
        match self {
            Self::PreviousForegroundColor => Frame::notify(syscall::PREVIOUS_FOREGROUND_COLOR),
            Self::NextForegroundColor => Frame::notify(syscall::NEXT_FOREGROUND_COLOR),
            Self::PreviousBackgroundColor => Frame::notify(syscall::PREVIOUS_BACKGROUND_COLOR),
            Self::NextBackgroundColor => Frame::notify(syscall::NEXT_BACKGROUND_COLOR),
            Self::DefaultColor => Frame::notify(syscall::DEFAULT_COLOR),
            Self::ToggleDefaultPalette => Frame::notify(syscall::TOGGLE_DEFAULT_PALETTE),
            Self::ToggleZxSpectrumPalette => Frame::notify(syscall::TOGGLE_ZX_SPECTRUM_PALETTE),
            Self::ToggleZxRestrictions { checked } => {
                Frame::notify(syscall::TOGGLE_ZX_RESTRICTIONS).with_data(FRAME_CHECKED, checked)
            }
            Self::SwitchForegroundBackground => Frame::notify(syscall::SWITCH_FOREGROUND_BACKGROUND),
            Self::SetFg(value) => Frame::notify(syscall::SET_FG).with_data(FRAME_VALUE, value),
            Self::SetBg(value) => Frame::notify(syscall::SET_BG).with_data(FRAME_VALUE, value),
        }
    }
}

/// Named keyboard shortcuts forwarded by the keyboard dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    PreviousForegroundColor,
    NextForegroundColor,
    PreviousBackgroundColor,
    NextBackgroundColor,
    /// Quick-access key `0..8` for the foreground.
    ToggleFg(u8),
    /// Quick-access key `0..8` for the background.
    ToggleBg(u8),
}

/// Document lifecycle notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocEvent {
    /// A document finished loading.
    NewDocument,
    /// The palette changed outside the chooser.
    UpdateSwatches,
    /// The document asks for a background change.
    SetBg(u8),
}

/// Selection-change notifications emitted by the chooser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChooserEvent {
    SetFg(u8),
    SetBg(u8),
}

impl Event for ChooserEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::SetFg(_) => syscall::SET_FG,
            Self::SetBg(_) => syscall::SET_BG,
        }
    }
}
