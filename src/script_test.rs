use std::cell::RefCell;

use super::*;
use crate::error::BusError;

// =============================================================
// Helpers
// =============================================================

#[derive(Default)]
struct EchoHost {
    sent: RefCell<Vec<String>>,
}

impl HostBus for EchoHost {
    fn send(&self, frame: Frame) {
        self.sent.borrow_mut().push(frame.syscall);
    }

    fn send_sync(&self, frame: Frame) -> Result<Frame, BusError> {
        let mut data = Data::new();
        for key in ["foreground", "background"] {
            if let Some(value) = frame.data.get(key) {
                data.insert(key.to_owned(), value.clone());
            }
        }
        Ok(frame.done_with(data))
    }
}

fn parse(line: &str) -> Command {
    parse_line(line).expect("parses").expect("not blank")
}

fn session() -> Session<EchoHost> {
    Session::new(&PanelConfig::default(), EchoHost::default())
}

fn run(session: &mut Session<EchoHost>, script: &str) {
    for line in script.lines() {
        if let Some(command) = parse_line(line).expect("script parses") {
            session.apply(command);
        }
    }
}

// =============================================================
// Parsing
// =============================================================

#[test]
fn blank_and_comment_lines_are_skipped() {
    assert!(parse_line("").expect("ok").is_none());
    assert!(parse_line("   ").expect("ok").is_none());
    assert!(parse_line("// setup").expect("ok").is_none());
}

#[test]
fn selection_commands_map_to_events() {
    assert!(matches!(parse("fg 12"), Command::Bus(BusEvent::SetFg(12))));
    assert!(matches!(parse("bg 3"), Command::Bus(BusEvent::SetBg(3))));
    assert!(matches!(parse("toggle-bg 4"), Command::Shortcut(Shortcut::ToggleBg(4))));
    assert!(matches!(parse("zx off"), Command::Bus(BusEvent::ToggleZxRestrictions { checked: false })));
    assert!(matches!(parse("doc-bg 5"), Command::Doc(DocEvent::SetBg(5))));
}

#[test]
fn click_collects_button_and_modifiers() {
    let Command::Click { index, button, modifiers } = parse("click 4 secondary ctrl shift") else {
        panic!("not a click");
    };
    assert_eq!(index, 4);
    assert_eq!(button, Button::Secondary);
    assert!(modifiers.ctrl && modifiers.shift && !modifiers.alt);
}

#[test]
fn join_splits_identity_and_status() {
    let Command::Join { id, nickname, group, status, announce } = parse("join-quiet 9 ann@mist idle") else {
        panic!("not a join");
    };
    assert_eq!((id, nickname.as_str(), group.as_str()), (9, "ann", "mist"));
    assert_eq!(status, UserStatus::Idle);
    assert!(!announce);
}

#[test]
fn say_keeps_text_verbatim() {
    let Command::Say { nickname, group, text, .. } = parse("say 1 bob  see #12,  ok") else {
        panic!("not a say");
    };
    assert_eq!(nickname, "bob");
    assert!(group.is_empty());
    assert_eq!(text, "see #12,  ok");
}

#[test]
fn frame_command_carries_json_payload() {
    let Command::Frame(frame) = parse(r#"frame set_bg {"value": 3}"#) else {
        panic!("not a frame");
    };
    assert_eq!(frame.syscall, "set_bg");
    assert_eq!(frame.index("value"), Some(3));
}

#[test]
fn bad_lines_report_what_is_wrong() {
    assert!(matches!(parse_line("paint 3"), Err(ScriptError::UnknownCommand(c)) if c == "paint"));
    assert!(matches!(parse_line("fg"), Err(ScriptError::MissingArgument { argument: "index", .. })));
    assert!(matches!(parse_line("fg 300"), Err(ScriptError::InvalidArgument { value, .. }) if value == "300"));
    assert!(matches!(parse_line("status 1 sleepy"), Err(ScriptError::InvalidArgument { .. })));
    assert!(matches!(parse_line("frame set_bg {oops"), Err(ScriptError::Frame(_))));
}

#[test]
fn numeric_status_uses_wire_values() {
    assert!(matches!(parse("status 2 2"), Command::Status(2, UserStatus::Away)));
    assert!(parse_line("status 2 3").is_err());
}

// =============================================================
// Session
// =============================================================

#[test]
fn new_session_loads_document_and_swatches() {
    let session = session();
    let state = session.state();
    assert_eq!(state["fg"], 7);
    assert_eq!(state["bg"], 0);
    assert_eq!(state["swatches"], 16);
    assert_eq!(state["family"], "standard");
    assert_eq!(state["chat"]["visible"], false);
}

#[test]
fn zx_config_starts_on_zx_palette() {
    let config = PanelConfig { palette: PaletteName::Zx, ..PanelConfig::default() };
    let session = Session::new(&config, EchoHost::default());
    assert_eq!(session.state()["family"], "zx");
}

#[test]
fn script_drives_chooser() {
    let mut session = session();
    run(&mut session, "fg 12\nbg 3\nswap\nnext-bg\nclick 2 secondary\n");
    let state = session.state();
    assert_eq!(state["fg"], 3);
    assert_eq!(state["bg"], 2);
}

#[test]
fn script_drives_chat() {
    let mut session = session();
    run(
        &mut session,
        "show focus\njoin 1 ann@mist\njoin-quiet 2 bob away\nsay 1 ann hi all\nleave 2\nsauce 1\n",
    );
    let chat = &session.state()["chat"];
    assert_eq!(chat["visible"], true);
    assert_eq!(chat["roster"], json!(["ann"]));
    assert_eq!(chat["entries"], 4);
}

#[test]
fn activating_ticket_requests_goto() {
    let mut session = session();
    run(&mut session, "say 1 ann look at #42\n");

    let report = session.apply(parse("activate 0 1"));

    assert_eq!(report, Some(json!({ "activated": { "goto": 42 } })));
    assert_eq!(session.goto_requests(), vec![42]);
    assert!(session.opener().opened().is_empty());
}

#[test]
fn activating_link_uses_opener() {
    let mut session = session();
    run(&mut session, "welcome mail sysop@example.org\n");

    let report = session.apply(parse("activate 0 1"));

    assert_eq!(report, Some(json!({ "activated": { "open": "mailto:sysop@example.org" } })));
    assert_eq!(session.opener().opened(), ["mailto:sysop@example.org"]);
}

#[test]
fn activating_action_entry_does_nothing() {
    let mut session = session();
    run(&mut session, "join 1 ann\n");
    assert_eq!(session.apply(parse("activate 0 0")), Some(json!({ "activated": null })));
}

#[test]
fn attribute_reports_host_reply() {
    let mut session = session();
    run(&mut session, "fg 14\n");
    let report = session.apply(Command::Attribute);
    assert_eq!(report, Some(json!({ "attribute": { "foreground": 14, "background": 0 } })));
}

#[test]
fn menu_commands_reach_host() {
    let mut session = session();
    run(&mut session, "menu-zx\n");
    let sent = session.chooser().host().sent.borrow().clone();
    assert!(sent.ends_with(&["uncheck_all_palettes".to_owned(), "check_zx_spectrum_palette".to_owned()]));
}
