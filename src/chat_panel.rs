//! Chat panel: roster of connected users plus the message log.
//!
//! Driven by direct calls from the session layer. Every log append goes
//! through one path that applies the autoscroll rule: a reader who has
//! scrolled up keeps their position, a reader at the bottom follows new
//! messages.

#[cfg(test)]
#[path = "chat_panel_test.rs"]
mod chat_panel_test;

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::consts::{CHAT_HEIGHT_VAR, CHAT_OPEN_HEIGHT_PX};
use crate::linkify::{GotoLine, RichText};
use crate::view::{ChatView, LogEntry, UserStatus};

/// Session identifier assigned by the server.
pub type UserId = u64;

/// One connected user.
#[derive(Debug)]
pub struct RosterEntry<R> {
    pub nickname: String,
    /// Empty means no group.
    pub group: String,
    pub status: UserStatus,
    row: R,
}

/// Roster label: `nick` or `nick <group>`.
#[must_use]
pub fn roster_label(nickname: &str, group: &str) -> String {
    if group.is_empty() { nickname.to_owned() } else { format!("{nickname} <{group}>") }
}

/// Sender line above a chat message.
#[must_use]
pub fn sender_label(nickname: &str, group: &str) -> String {
    format!("{}:", roster_label(nickname, group))
}

/// Roster and log bound to one chat view.
pub struct ChatPanel<V: ChatView> {
    view: V,
    roster: HashMap<UserId, RosterEntry<V::Row>>,
    visible: bool,
    open_height: u32,
}

impl<V: ChatView> ChatPanel<V> {
    /// Hidden panel that opens to the standard height.
    pub fn new(view: V) -> Self {
        Self::with_open_height(view, CHAT_OPEN_HEIGHT_PX)
    }

    pub fn with_open_height(view: V, open_height: u32) -> Self {
        Self { view, roster: HashMap::new(), visible: false, open_height }
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Direct access for user-driven view changes (scrolling, resizing).
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    #[must_use]
    pub fn user(&self, id: UserId) -> Option<&RosterEntry<V::Row>> {
        self.roster.get(&id)
    }

    #[must_use]
    pub fn user_count(&self) -> usize {
        self.roster.len()
    }

    // --- Visibility ---

    pub fn toggle(&mut self, focus: bool) {
        if self.visible {
            self.hide();
        } else {
            self.show(focus);
        }
    }

    /// Open the panel with an empty input and the log at its bottom.
    pub fn show(&mut self, focus: bool) {
        self.visible = true;
        self.view.set_layout_var(CHAT_HEIGHT_VAR, self.open_height);
        self.view.clear_input();
        self.view.scroll_to_bottom();
        if focus {
            self.view.focus_input();
        }
        debug!(focus, "chat shown");
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.view.set_layout_var(CHAT_HEIGHT_VAR, 0);
        self.view.blur_input();
        debug!("chat hidden");
    }

    // --- Roster ---

    /// Add a user. An id that is already present has its old row replaced.
    pub fn join(&mut self, id: UserId, nickname: &str, group: &str, status: UserStatus, announce: bool) {
        if announce {
            self.append(LogEntry::Action { text: format!("{nickname} has joined") });
        }
        if let Some(stale) = self.roster.remove(&id) {
            warn!(id, nickname = %stale.nickname, "duplicate join, replacing roster row");
            self.view.remove_row(stale.row);
        }

        let row = self.view.create_row(&roster_label(nickname, group));
        self.view.set_row_status(&row, status);
        self.roster.insert(
            id,
            RosterEntry { nickname: nickname.to_owned(), group: group.to_owned(), status, row },
        );
        debug!(id, nickname, group, "user joined");
    }

    /// Remove a user. Unknown ids are ignored.
    pub fn leave(&mut self, id: UserId) {
        let Some(entry) = self.roster.remove(&id) else {
            debug!(id, "leave for unknown user");
            return;
        };
        self.append(LogEntry::Action { text: format!("{} has left", entry.nickname) });
        self.view.remove_row(entry.row);
        debug!(id, nickname = %entry.nickname, "user left");
    }

    pub fn set_status(&mut self, id: UserId, status: UserStatus) {
        if let Some(entry) = self.roster.get_mut(&id) {
            entry.status = status;
            self.view.set_row_status(&entry.row, status);
        }
    }

    // --- Log ---

    /// Append a chat message. A known sender whose nickname or group
    /// changed has their roster row relabelled.
    pub fn chat(&mut self, id: UserId, nickname: &str, group: &str, text: &str, goto_line: GotoLine) {
        self.append(LogEntry::Chat {
            sender: sender_label(nickname, group),
            body: RichText::new(text, goto_line),
        });

        let Some(entry) = self.roster.get_mut(&id) else {
            return;
        };
        if entry.nickname != nickname || entry.group != group {
            nickname.clone_into(&mut entry.nickname);
            group.clone_into(&mut entry.group);
            self.view.set_row_label(&entry.row, &roster_label(nickname, group));
            debug!(id, nickname, group, "roster entry renamed");
        }
    }

    /// Append a server notice.
    pub fn welcome(&mut self, text: &str, goto_line: GotoLine) {
        self.append(LogEntry::Welcome { body: RichText::new(text, goto_line) });
    }

    /// Announce that a user edited the document's SAUCE record.
    pub fn updated_sauce(&mut self, id: UserId) {
        let Some(entry) = self.roster.get(&id) else {
            return;
        };
        let text = format!("{} has edited the SAUCE record", entry.nickname);
        self.append(LogEntry::Action { text });
    }

    fn append(&mut self, entry: LogEntry) {
        let follow = self.view.is_scrolled_to_bottom();
        self.view.append(entry);
        if follow {
            self.view.scroll_to_bottom();
        }
    }
}
