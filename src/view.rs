//! View-port traits: the only way the components touch the screen.
//!
//! A host UI implements these over its widget toolkit. Each method is a single
//! visual effect; the components decide when to call them.

use serde::{Deserialize, Serialize};

use crate::linkify::RichText;
use crate::palette::Rgb;

/// Which selection a swatch highlight or indicator refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Highlight {
    Foreground,
    Background,
}

/// Swatch strip and the current-color indicators.
pub trait SwatchView {
    /// Opaque handle to one on-screen swatch.
    type Handle;

    /// Attach a swatch for palette `index`. Pointer-downs on it are routed
    /// back to the chooser with the same index.
    fn create_swatch(&mut self, index: usize, color: Rgb) -> Self::Handle;

    /// Detach a swatch.
    fn remove_swatch(&mut self, handle: Self::Handle);

    fn set_highlight(&mut self, handle: &Self::Handle, highlight: Highlight, on: bool);

    /// Paint the foreground or background indicator.
    fn set_indicator(&mut self, highlight: Highlight, color: Rgb);
}

/// Presence of a connected user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum UserStatus {
    Active,
    Idle,
    Away,
}

impl UserStatus {
    /// Roster icon image for this status.
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::Active => "active_indicator.png",
            Self::Idle => "idle_indicator.png",
            Self::Away => "away_indicator.png",
        }
    }
}

impl TryFrom<u8> for UserStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Active),
            1 => Ok(Self::Idle),
            2 => Ok(Self::Away),
            other => Err(format!("unknown user status {other}")),
        }
    }
}

impl From<UserStatus> for u8 {
    fn from(status: UserStatus) -> Self {
        match status {
            UserStatus::Active => 0,
            UserStatus::Idle => 1,
            UserStatus::Away => 2,
        }
    }
}

/// One block appended to the chat log.
#[derive(Debug, Clone)]
pub enum LogEntry {
    /// `"{nick} has joined"` and friends.
    Action { text: String },
    /// Sender label line followed by the message body.
    Chat { sender: String, body: RichText },
    /// Styled server notice.
    Welcome { body: RichText },
}

impl LogEntry {
    /// Number of text lines the entry occupies.
    #[must_use]
    pub fn line_count(&self) -> usize {
        match self {
            Self::Action { .. } => 1,
            Self::Chat { body, .. } => 1 + body_lines(body),
            Self::Welcome { body } => body_lines(body),
        }
    }
}

fn body_lines(body: &RichText) -> usize {
    body.plain_text().lines().count().max(1)
}

/// Roster, message log, input box and layout of the chat panel.
pub trait ChatView {
    /// Opaque handle to one roster row.
    type Row;

    fn create_row(&mut self, label: &str) -> Self::Row;

    fn set_row_label(&mut self, row: &Self::Row, label: &str);

    fn set_row_status(&mut self, row: &Self::Row, status: UserStatus);

    fn remove_row(&mut self, row: Self::Row);

    /// Append a block to the bottom of the log.
    fn append(&mut self, entry: LogEntry);

    /// Whether the log is showing its last line, or has nothing to scroll.
    fn is_scrolled_to_bottom(&self) -> bool;

    fn scroll_to_bottom(&mut self);

    /// Set a pixel-valued layout variable.
    fn set_layout_var(&mut self, name: &str, px: u32);

    fn clear_input(&mut self);

    fn focus_input(&mut self);

    fn blur_input(&mut self);
}
