//! Pointer input on swatches: which button, which modifiers.

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button.
    Primary,
    /// Middle mouse button.
    Middle,
    /// Right mouse button.
    Secondary,
}

/// Keyboard modifier keys held during a pointer event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// What a pointer-down on a swatch selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwatchTarget {
    Foreground,
    Background,
}

/// Secondary button or ctrl-click picks the background, a plain primary click
/// picks the foreground, anything else does nothing.
#[must_use]
pub fn swatch_target(button: Button, modifiers: Modifiers) -> Option<SwatchTarget> {
    if button == Button::Secondary || modifiers.ctrl {
        Some(SwatchTarget::Background)
    } else if button == Button::Primary {
        Some(SwatchTarget::Foreground)
    } else {
        None
    }
}
