use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::headless::HeadlessChat;
use crate::linkify::{Activation, ExternalOpener, Fragment};

// =============================================================
// Helpers
// =============================================================

fn panel() -> ChatPanel<HeadlessChat> {
    ChatPanel::new(HeadlessChat::new(10, 30))
}

fn no_goto() -> GotoLine {
    Rc::new(|_| {})
}

fn recording_goto() -> (GotoLine, Rc<RefCell<Vec<u32>>>) {
    let lines = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&lines);
    (Rc::new(move |line| sink.borrow_mut().push(line)), lines)
}

#[derive(Default)]
struct RecordingOpener(Vec<String>);

impl ExternalOpener for RecordingOpener {
    fn open_external(&mut self, href: &str) {
        self.0.push(href.to_owned());
    }
}

fn action_texts(panel: &ChatPanel<HeadlessChat>) -> Vec<String> {
    panel
        .view()
        .entries()
        .iter()
        .filter_map(|e| match e {
            LogEntry::Action { text } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

fn fill_log(panel: &mut ChatPanel<HeadlessChat>, count: usize) {
    for i in 0..count {
        panel.welcome(&format!("line {i}"), no_goto());
    }
}

// =============================================================
// Visibility
// =============================================================

#[test]
fn starts_hidden() {
    let panel = panel();
    assert!(!panel.is_visible());
    assert_eq!(panel.view().layout_var(CHAT_HEIGHT_VAR), None);
}

#[test]
fn show_opens_clears_and_focuses() {
    let mut panel = panel();
    panel.show(true);

    assert!(panel.is_visible());
    assert_eq!(panel.view().layout_var(CHAT_HEIGHT_VAR), Some(CHAT_OPEN_HEIGHT_PX));
    assert_eq!(panel.view().input_clears(), 1);
    assert!(panel.view().input_focused());
}

#[test]
fn show_without_focus_leaves_input_unfocused() {
    let mut panel = panel();
    panel.show(false);
    assert!(panel.is_visible());
    assert!(!panel.view().input_focused());
}

#[test]
fn show_scrolls_log_to_bottom() {
    let mut panel = panel();
    fill_log(&mut panel, 6);
    panel.view_mut().scroll_to(0);

    panel.show(false);

    assert_eq!(panel.view().scroll_top(), 30);
}

#[test]
fn toggle_alternates_and_hide_collapses() {
    let mut panel = ChatPanel::with_open_height(HeadlessChat::new(10, 30), 180);
    panel.toggle(true);
    assert_eq!(panel.view().layout_var(CHAT_HEIGHT_VAR), Some(180));

    panel.toggle(true);
    assert!(!panel.is_visible());
    assert_eq!(panel.view().layout_var(CHAT_HEIGHT_VAR), Some(0));
    assert!(!panel.view().input_focused());
}

// =============================================================
// Roster
// =============================================================

#[test]
fn join_announces_and_adds_row() {
    let mut panel = panel();
    panel.join(1, "ann", "", UserStatus::Active, true);
    panel.join(2, "bob", "mist", UserStatus::Idle, true);

    assert_eq!(action_texts(&panel), vec!["ann has joined", "bob has joined"]);
    assert_eq!(panel.view().labels(), vec!["ann", "bob <mist>"]);
    assert_eq!(panel.view().rows()[1].status_icon, Some("idle_indicator.png"));
    assert_eq!(panel.user_count(), 2);
}

#[test]
fn silent_join_skips_announcement() {
    let mut panel = panel();
    panel.join(1, "ann", "", UserStatus::Active, false);
    assert!(panel.view().entries().is_empty());
    assert_eq!(panel.view().labels(), vec!["ann"]);
}

#[test]
fn duplicate_join_replaces_row() {
    let mut panel = panel();
    panel.join(1, "ann", "", UserStatus::Active, false);
    panel.join(1, "ann", "mist", UserStatus::Away, false);

    assert_eq!(panel.view().labels(), vec!["ann <mist>"]);
    assert_eq!(panel.user_count(), 1);
}

#[test]
fn leave_is_idempotent() {
    let mut panel = panel();
    panel.join(7, "ann", "", UserStatus::Active, false);

    panel.leave(7);
    panel.leave(7);

    assert_eq!(action_texts(&panel), vec!["ann has left"]);
    assert!(panel.view().rows().is_empty());
    assert!(panel.user(7).is_none());
}

#[test]
fn set_status_updates_known_users_only() {
    let mut panel = panel();
    panel.join(1, "ann", "", UserStatus::Active, false);

    panel.set_status(1, UserStatus::Away);
    panel.set_status(99, UserStatus::Idle);

    assert_eq!(panel.user(1).map(|u| u.status), Some(UserStatus::Away));
    assert_eq!(panel.view().rows()[0].status_icon, Some("away_indicator.png"));
}

// =============================================================
// Chat
// =============================================================

#[test]
fn chat_renames_roster_entry() {
    let mut panel = panel();
    panel.join(1, "nick", "", UserStatus::Active, false);

    panel.chat(1, "nick2", "", "hi", no_goto());

    assert_eq!(panel.view().labels(), vec!["nick2"]);
    assert_eq!(panel.user(1).map(|u| u.nickname.as_str()), Some("nick2"));
}

#[test]
fn chat_group_change_relabels_row() {
    let mut panel = panel();
    panel.join(1, "ann", "mist", UserStatus::Active, false);
    panel.chat(1, "ann", "", "left the group", no_goto());
    assert_eq!(panel.view().labels(), vec!["ann"]);
}

#[test]
fn chat_from_unknown_user_still_renders() {
    let mut panel = panel();
    panel.chat(42, "ghost", "void", "boo", no_goto());

    match panel.view().entries() {
        [LogEntry::Chat { sender, body }] => {
            assert_eq!(sender, "ghost <void>:");
            assert_eq!(body.plain_text(), "boo");
        }
        other => panic!("unexpected log: {other:?}"),
    }
    assert_eq!(panel.user_count(), 0);
}

#[test]
fn ticket_reference_navigates_instead_of_opening() {
    let mut panel = panel();
    let (goto, lines) = recording_goto();
    panel.chat(1, "ann", "", "see #123 please", goto);

    let Some(LogEntry::Chat { body, .. }) = panel.view().entries().first() else {
        panic!("chat entry missing");
    };
    let index = body
        .fragments()
        .iter()
        .position(|f| matches!(f, Fragment::Ticket { .. }))
        .expect("ticket fragment");

    let mut opener = RecordingOpener::default();
    assert_eq!(body.activate(index, &mut opener), Some(Activation::GotoLine(123)));
    assert_eq!(*lines.borrow(), vec![123]);
    assert!(opener.0.is_empty());
}

#[test]
fn ordinary_link_opens_externally() {
    let mut panel = panel();
    let (goto, lines) = recording_goto();
    panel.welcome("docs at https://example.org/help", goto);

    let Some(LogEntry::Welcome { body }) = panel.view().entries().first() else {
        panic!("welcome entry missing");
    };
    let mut opener = RecordingOpener::default();
    assert_eq!(body.activate(1, &mut opener), Some(Activation::OpenExternal("https://example.org/help".into())));
    assert_eq!(opener.0, vec!["https://example.org/help"]);
    assert!(lines.borrow().is_empty());
}

#[test]
fn updated_sauce_needs_known_user() {
    let mut panel = panel();
    panel.join(3, "cy", "", UserStatus::Active, false);
    panel.updated_sauce(3);
    panel.updated_sauce(4);
    assert_eq!(action_texts(&panel), vec!["cy has edited the SAUCE record"]);
}

// =============================================================
// Autoscroll
// =============================================================

#[test]
fn reader_at_bottom_follows_new_messages() {
    let mut panel = panel();
    fill_log(&mut panel, 5);
    assert_eq!(panel.view().scroll_top(), 20);

    panel.chat(1, "ann", "", "hello", no_goto());

    assert_eq!(panel.view().content_height(), 70);
    assert_eq!(panel.view().scroll_top(), 40);
    assert!(panel.view().is_scrolled_to_bottom());
}

#[test]
fn reader_scrolled_up_keeps_position() {
    let mut panel = panel();
    fill_log(&mut panel, 5);
    panel.view_mut().scroll_to(5);

    panel.chat(1, "ann", "", "hello", no_goto());
    panel.join(2, "bob", "", UserStatus::Active, true);
    panel.welcome("notice", no_goto());

    assert_eq!(panel.view().scroll_top(), 5);
    assert!(!panel.view().is_scrolled_to_bottom());
}

#[test]
fn short_log_keeps_following_once_it_overflows() {
    let mut panel = panel();
    fill_log(&mut panel, 3);
    assert_eq!(panel.view().scroll_top(), 0);

    fill_log(&mut panel, 1);
    assert_eq!(panel.view().scroll_top(), 10);
}

// =============================================================
// Labels
// =============================================================

#[test]
fn labels_include_group_only_when_present() {
    assert_eq!(roster_label("ann", ""), "ann");
    assert_eq!(roster_label("ann", "mist"), "ann <mist>");
    assert_eq!(sender_label("ann", ""), "ann:");
    assert_eq!(sender_label("ann", "mist"), "ann <mist>:");
}
