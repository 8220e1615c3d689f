use super::*;

fn action(text: &str) -> LogEntry {
    LogEntry::Action { text: text.to_owned() }
}

// =============================================================
// Swatches
// =============================================================

#[test]
fn swatches_track_attach_and_detach() {
    let mut view = HeadlessSwatches::new();
    let a = view.create_swatch(0, Rgb::new(0, 0, 0));
    let b = view.create_swatch(1, Rgb::new(0, 0, 170));
    view.remove_swatch(a);

    assert_eq!(view.attached().len(), 1);
    assert_eq!(view.attached()[0].id, b);
    assert_eq!(view.attached()[0].style, "rgb(0, 0, 170)");
    assert_eq!(view.removed(), 1);
}

#[test]
fn highlight_applies_to_the_handle_only() {
    let mut view = HeadlessSwatches::new();
    let a = view.create_swatch(0, Rgb::new(0, 0, 0));
    let b = view.create_swatch(1, Rgb::new(1, 1, 1));
    view.set_highlight(&b, Highlight::Foreground, true);
    view.set_highlight(&a, Highlight::Background, true);

    assert_eq!(view.highlighted(Highlight::Foreground), vec![1]);
    assert_eq!(view.highlighted(Highlight::Background), vec![0]);
}

#[test]
fn indicators_remember_last_color() {
    let mut view = HeadlessSwatches::new();
    view.set_indicator(Highlight::Foreground, Rgb::new(1, 2, 3));
    view.set_indicator(Highlight::Foreground, Rgb::new(4, 5, 6));
    assert_eq!(view.indicator(Highlight::Foreground), Some(Rgb::new(4, 5, 6)));
    assert_eq!(view.indicator(Highlight::Background), None);
}

// =============================================================
// Chat rows
// =============================================================

#[test]
fn rows_update_in_place() {
    let mut view = HeadlessChat::new(10, 100);
    let row = view.create_row("ann");
    view.set_row_label(&row, "ann <mist>");
    view.set_row_status(&row, UserStatus::Away);

    assert_eq!(view.labels(), vec!["ann <mist>"]);
    assert_eq!(view.rows()[0].status_icon, Some("away_indicator.png"));

    view.remove_row(row);
    assert!(view.rows().is_empty());
}

// =============================================================
// Scroll model
// =============================================================

#[test]
fn short_log_counts_as_bottom() {
    let mut view = HeadlessChat::new(10, 100);
    view.append(action("a"));
    assert_eq!(view.content_height(), 10);
    assert!(view.is_scrolled_to_bottom());
}

#[test]
fn appending_past_viewport_leaves_scroll_behind_until_asked() {
    let mut view = HeadlessChat::new(10, 30);
    for _ in 0..5 {
        view.append(action("x"));
    }
    assert!(!view.is_scrolled_to_bottom());

    view.scroll_to_bottom();
    assert_eq!(view.scroll_top(), 20);
    assert!(view.is_scrolled_to_bottom());
}

#[test]
fn scroll_to_is_clamped() {
    let mut view = HeadlessChat::new(10, 30);
    for _ in 0..5 {
        view.append(action("x"));
    }
    view.scroll_to(500);
    assert_eq!(view.scroll_top(), 20);
}

#[test]
fn layout_and_input_state_are_recorded() {
    let mut view = HeadlessChat::new(10, 30);
    view.set_layout_var("chat-height", 240);
    view.clear_input();
    view.focus_input();
    assert_eq!(view.layout_var("chat-height"), Some(240));
    assert_eq!(view.input_clears(), 1);
    assert!(view.input_focused());

    view.blur_input();
    assert!(!view.input_focused());
}

#[test]
fn user_status_wire_values() {
    assert_eq!(UserStatus::try_from(1), Ok(UserStatus::Idle));
    assert!(UserStatus::try_from(3).is_err());
    assert_eq!(u8::from(UserStatus::Away), 2);
    assert_eq!(serde_json::to_string(&UserStatus::Active).expect("serialize"), "0");
}
