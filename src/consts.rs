//! Shared constants for the palette chooser and chat panel.

// ── Selection ───────────────────────────────────────────────────

/// Foreground index selected at startup and by `default_color`.
pub const DEFAULT_FOREGROUND: u8 = 7;

/// Background index selected at startup and by `default_color`.
pub const DEFAULT_BACKGROUND: u8 = 0;

/// Number of indices the cycle shortcuts wrap around.
pub const CYCLE_LEN: u8 = 16;

/// Offset between a low color and its bright variant.
pub const BRIGHT_OFFSET: u8 = 8;

// ── ZX restriction ──────────────────────────────────────────────

/// Column step of the restriction pass; each pass covers one cell pair.
pub const ZX_PAIR_STEP: usize = 2;

// ── Chat panel ──────────────────────────────────────────────────

/// Height of the chat region in pixels while visible.
pub const CHAT_OPEN_HEIGHT_PX: u32 = 240;

/// Height of one chat log line in the headless scroll model.
pub const LOG_LINE_HEIGHT_PX: u32 = 16;

/// Layout variable resized by show/hide.
pub const CHAT_HEIGHT_VAR: &str = "chat-height";

/// URL scheme used for ticket references inside chat text.
pub const GOTO_SCHEME: &str = "goto://";

// ── Demo document ───────────────────────────────────────────────

/// Default document width in columns.
pub const DEFAULT_COLUMNS: usize = 80;

/// Default document height in rows.
pub const DEFAULT_ROWS: usize = 25;

/// Largest grid the demo document will allocate (`columns * rows`).
pub const MAX_DOCUMENT_CELLS: usize = 1 << 20;
