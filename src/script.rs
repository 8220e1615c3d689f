//! Line-oriented driver scripts for the demo binary.
//!
//! Each non-blank line is one command. `//` starts a comment line (`#` is
//! left alone because chat text uses it for tickets). A [`Session`] owns one
//! chooser and one chat panel over the headless views and applies parsed
//! commands to them.
//!
//! ```text
//! fg 12                     bg 3
//! next-fg / prev-fg         next-bg / prev-bg
//! toggle-fg 2               toggle-bg 2
//! swap                      default
//! palette zx                menu-default / menu-zx
//! zx on|off                 click 4 secondary ctrl
//! new-document              update-swatches        doc-bg 5
//! frame set_bg {"value":3}  attribute
//! show [focus]              hide                   toggle [focus]
//! join 1 ann@mist [idle]    join-quiet 2 bob       leave 1
//! status 1 away             say 1 ann see #12      welcome text
//! sauce 1                   activate 0 1           scroll 40
//! state
//! ```

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

use std::cell::RefCell;
use std::rc::Rc;
use std::str::FromStr;

use serde_json::{Value, json};
use tracing::{info, warn};

use crate::bus::HostBus;
use crate::chat_panel::{ChatPanel, UserId};
use crate::config::PanelConfig;
use crate::consts::LOG_LINE_HEIGHT_PX;
use crate::doc::{Document, TextDoc};
use crate::error::ScriptError;
use crate::events::{BusEvent, DocEvent, Shortcut};
use crate::frame::{Data, Frame};
use crate::headless::{HeadlessChat, HeadlessSwatches};
use crate::input::{Button, Modifiers};
use crate::linkify::{Activation, ExternalOpener, GotoLine};
use crate::palette::{PaletteFamily, PaletteName};
use crate::palette_chooser::PaletteChooser;
use crate::remote::RemoteChannel;
use crate::view::{ChatView, LogEntry, UserStatus};

// =============================================================================
// COMMANDS
// =============================================================================

/// One parsed script line.
#[derive(Debug, Clone)]
pub enum Command {
    Bus(BusEvent),
    Shortcut(Shortcut),
    Doc(DocEvent),
    Frame(Frame),
    Palette(String),
    Click { index: usize, button: Button, modifiers: Modifiers },
    Attribute,
    Show { focus: bool },
    Hide,
    Toggle { focus: bool },
    Join { id: UserId, nickname: String, group: String, status: UserStatus, announce: bool },
    Leave(UserId),
    Status(UserId, UserStatus),
    Say { id: UserId, nickname: String, group: String, text: String },
    Welcome(String),
    Sauce(UserId),
    Activate { entry: usize, fragment: usize },
    Scroll(u32),
    State,
}

/// Parse one line. Blank lines and `//` comments yield `Ok(None)`.
///
/// # Errors
///
/// Returns [`ScriptError`] for unknown commands and bad arguments.
pub fn parse_line(line: &str) -> Result<Option<Command>, ScriptError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with("//") {
        return Ok(None);
    }
    let (name, rest) = split_word(line);
    let mut args = Args { command: name, rest };

    let command = match name {
        "fg" => Command::Bus(BusEvent::SetFg(args.parse("index")?)),
        "bg" => Command::Bus(BusEvent::SetBg(args.parse("index")?)),
        "next-fg" => Command::Shortcut(Shortcut::NextForegroundColor),
        "prev-fg" => Command::Shortcut(Shortcut::PreviousForegroundColor),
        "next-bg" => Command::Shortcut(Shortcut::NextBackgroundColor),
        "prev-bg" => Command::Shortcut(Shortcut::PreviousBackgroundColor),
        "toggle-fg" => Command::Shortcut(Shortcut::ToggleFg(args.parse("key")?)),
        "toggle-bg" => Command::Shortcut(Shortcut::ToggleBg(args.parse("key")?)),
        "swap" => Command::Bus(BusEvent::SwitchForegroundBackground),
        "default" => Command::Bus(BusEvent::DefaultColor),
        "palette" => Command::Palette(args.word("palette name")?.to_owned()),
        "menu-default" => Command::Bus(BusEvent::ToggleDefaultPalette),
        "menu-zx" => Command::Bus(BusEvent::ToggleZxSpectrumPalette),
        "zx" => Command::Bus(BusEvent::ToggleZxRestrictions { checked: args.on_off()? }),
        "click" => parse_click(&mut args)?,
        "new-document" => Command::Doc(DocEvent::NewDocument),
        "update-swatches" => Command::Doc(DocEvent::UpdateSwatches),
        "doc-bg" => Command::Doc(DocEvent::SetBg(args.parse("index")?)),
        "frame" => {
            let syscall = args.word("syscall")?.to_owned();
            let data: Data = if args.rest.is_empty() { Data::new() } else { serde_json::from_str(args.rest)? };
            Command::Frame(Frame::request(syscall, data))
        }
        "attribute" => Command::Attribute,
        "show" => Command::Show { focus: args.rest == "focus" },
        "hide" => Command::Hide,
        "toggle" => Command::Toggle { focus: args.rest == "focus" },
        "join" | "join-quiet" => {
            let id = args.parse("user id")?;
            let (nickname, group) = split_identity(args.word("nickname")?);
            let status = if args.rest.is_empty() { UserStatus::Active } else { parse_status(&mut args)? };
            Command::Join { id, nickname, group, status, announce: name == "join" }
        }
        "leave" => Command::Leave(args.parse("user id")?),
        "status" => {
            let id = args.parse("user id")?;
            Command::Status(id, parse_status(&mut args)?)
        }
        "say" => {
            let id = args.parse("user id")?;
            let (nickname, group) = split_identity(args.word("nickname")?);
            Command::Say { id, nickname, group, text: args.rest.to_owned() }
        }
        "welcome" => Command::Welcome(args.rest.to_owned()),
        "sauce" => Command::Sauce(args.parse("user id")?),
        "activate" => Command::Activate { entry: args.parse("entry")?, fragment: args.parse("fragment")? },
        "scroll" => Command::Scroll(args.parse("offset")?),
        "state" => Command::State,
        other => return Err(ScriptError::UnknownCommand(other.to_owned())),
    };
    Ok(Some(command))
}

fn parse_click(args: &mut Args<'_>) -> Result<Command, ScriptError> {
    let index = args.parse("swatch index")?;
    let mut button = Button::Primary;
    let mut modifiers = Modifiers::default();
    while !args.rest.is_empty() {
        match args.word("modifier")? {
            "primary" => button = Button::Primary,
            "middle" => button = Button::Middle,
            "secondary" => button = Button::Secondary,
            "shift" => modifiers.shift = true,
            "ctrl" => modifiers.ctrl = true,
            "alt" => modifiers.alt = true,
            "meta" => modifiers.meta = true,
            other => return Err(args.invalid("button or modifier", other)),
        }
    }
    Ok(Command::Click { index, button, modifiers })
}

fn parse_status(args: &mut Args<'_>) -> Result<UserStatus, ScriptError> {
    match args.word("status")? {
        "active" => Ok(UserStatus::Active),
        "idle" => Ok(UserStatus::Idle),
        "away" => Ok(UserStatus::Away),
        other => {
            let Ok(raw) = other.parse::<u8>() else {
                return Err(args.invalid("status", other));
            };
            UserStatus::try_from(raw).map_err(|_| args.invalid("status", other))
        }
    }
}

/// `nick@group` or plain `nick`.
fn split_identity(word: &str) -> (String, String) {
    match word.split_once('@') {
        Some((nickname, group)) => (nickname.to_owned(), group.to_owned()),
        None => (word.to_owned(), String::new()),
    }
}

fn split_word(s: &str) -> (&str, &str) {
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (s, ""),
    }
}

/// Remaining arguments of one command.
struct Args<'a> {
    command: &'a str,
    rest: &'a str,
}

impl<'a> Args<'a> {
    fn word(&mut self, argument: &'static str) -> Result<&'a str, ScriptError> {
        if self.rest.is_empty() {
            return Err(ScriptError::MissingArgument { command: self.command.to_owned(), argument });
        }
        let (word, rest) = split_word(self.rest);
        self.rest = rest;
        Ok(word)
    }

    fn parse<T: FromStr>(&mut self, argument: &'static str) -> Result<T, ScriptError> {
        let word = self.word(argument)?;
        word.parse::<T>().map_err(|_| self.invalid(argument, word))
    }

    fn on_off(&mut self) -> Result<bool, ScriptError> {
        match self.word("on|off")? {
            "on" => Ok(true),
            "off" => Ok(false),
            other => Err(self.invalid("on|off", other)),
        }
    }

    fn invalid(&self, argument: &'static str, value: &str) -> ScriptError {
        ScriptError::InvalidArgument { command: self.command.to_owned(), argument, value: value.to_owned() }
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// Opener that records links instead of launching anything.
#[derive(Debug, Default)]
pub struct LoggingOpener {
    opened: Vec<String>,
}

impl LoggingOpener {
    #[must_use]
    pub fn opened(&self) -> &[String] {
        &self.opened
    }
}

impl ExternalOpener for LoggingOpener {
    fn open_external(&mut self, href: &str) {
        info!(%href, "open external link");
        self.opened.push(href.to_owned());
    }
}

/// A chooser and chat panel over an in-memory document and headless views.
pub struct Session<H: HostBus> {
    chooser: PaletteChooser<TextDoc, HeadlessSwatches, H>,
    chat: ChatPanel<HeadlessChat>,
    goto_line: GotoLine,
    goto_requests: Rc<RefCell<Vec<u32>>>,
    opener: LoggingOpener,
}

impl<H: HostBus> Session<H> {
    /// Build a session and load its first document.
    pub fn new(config: &PanelConfig, host: H) -> Self {
        let doc = TextDoc::new(config.columns, config.rows);
        let mut chooser = PaletteChooser::new(doc, HeadlessSwatches::new(), host);
        chooser.on_new_document();
        match config.palette {
            PaletteName::Default => {}
            PaletteName::Zx => chooser.toggle_zx_spectrum_palette(),
        }

        let chat_view = HeadlessChat::new(LOG_LINE_HEIGHT_PX, config.chat_height);
        let chat = ChatPanel::with_open_height(chat_view, config.chat_height);

        let goto_requests = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&goto_requests);
        let goto_line: GotoLine = Rc::new(move |line| {
            info!(line, "goto line");
            sink.borrow_mut().push(line);
        });

        Self { chooser, chat, goto_line, goto_requests, opener: LoggingOpener::default() }
    }

    pub fn set_remote(&mut self, remote: Box<dyn RemoteChannel>) {
        self.chooser.set_remote(Some(remote));
    }

    #[must_use]
    pub fn chooser(&self) -> &PaletteChooser<TextDoc, HeadlessSwatches, H> {
        &self.chooser
    }

    #[must_use]
    pub fn chat(&self) -> &ChatPanel<HeadlessChat> {
        &self.chat
    }

    #[must_use]
    pub fn opener(&self) -> &LoggingOpener {
        &self.opener
    }

    /// Line numbers requested through ticket links so far.
    #[must_use]
    pub fn goto_requests(&self) -> Vec<u32> {
        self.goto_requests.borrow().clone()
    }

    /// Apply one command. Commands that produce a report return it.
    pub fn apply(&mut self, command: Command) -> Option<Value> {
        match command {
            Command::Bus(event) => self.chooser.handle_bus(event),
            Command::Shortcut(shortcut) => self.chooser.handle_shortcut(shortcut),
            Command::Doc(event) => self.chooser.handle_doc_event(event),
            Command::Frame(frame) => {
                if !self.chooser.handle_frame(&frame) {
                    warn!(syscall = %frame.syscall, "frame not handled");
                }
            }
            Command::Palette(name) => self.chooser.set_color_palette(&name),
            Command::Click { index, button, modifiers } => {
                self.chooser.on_swatch_pointer_down(index, button, modifiers);
            }
            Command::Attribute => {
                return Some(match self.chooser.select_attribute() {
                    Ok(reply) => json!({ "attribute": reply.data }),
                    Err(e) => json!({ "error": e.to_string() }),
                });
            }
            Command::Show { focus } => self.chat.show(focus),
            Command::Hide => self.chat.hide(),
            Command::Toggle { focus } => self.chat.toggle(focus),
            Command::Join { id, nickname, group, status, announce } => {
                self.chat.join(id, &nickname, &group, status, announce);
            }
            Command::Leave(id) => self.chat.leave(id),
            Command::Status(id, status) => self.chat.set_status(id, status),
            Command::Say { id, nickname, group, text } => {
                self.chat.chat(id, &nickname, &group, &text, Rc::clone(&self.goto_line));
            }
            Command::Welcome(text) => self.chat.welcome(&text, Rc::clone(&self.goto_line)),
            Command::Sauce(id) => self.chat.updated_sauce(id),
            Command::Activate { entry, fragment } => return Some(self.activate(entry, fragment)),
            Command::Scroll(offset) => self.chat.view_mut().scroll_to(offset),
            Command::State => return Some(self.state()),
        }
        None
    }

    fn activate(&mut self, entry: usize, fragment: usize) -> Value {
        let body = match self.chat.view().entries().get(entry) {
            Some(LogEntry::Chat { body, .. } | LogEntry::Welcome { body }) => body,
            Some(LogEntry::Action { .. }) | None => {
                warn!(entry, "no linkified log entry");
                return json!({ "activated": null });
            }
        };
        match body.activate(fragment, &mut self.opener) {
            Some(Activation::GotoLine(line)) => json!({ "activated": { "goto": line } }),
            Some(Activation::OpenExternal(href)) => json!({ "activated": { "open": href } }),
            None => json!({ "activated": null }),
        }
    }

    /// Snapshot of everything a user could see.
    #[must_use]
    pub fn state(&self) -> Value {
        let doc = self.chooser.doc();
        let family = match PaletteFamily::of(doc.palette()) {
            PaletteFamily::Standard => "standard",
            PaletteFamily::C64 => "c64",
            PaletteFamily::ZxSpectrum => "zx",
        };
        let view = self.chat.view();
        json!({
            "fg": self.chooser.foreground(),
            "bg": self.chooser.background(),
            "family": family,
            "swatches": self.chooser.swatch_count(),
            "global_background": doc.global_background(),
            "zx_restrictions": doc.has_zx_restriction(),
            "chat": {
                "visible": self.chat.is_visible(),
                "roster": view.labels(),
                "entries": view.entries().len(),
                "scroll_top": view.scroll_top(),
                "at_bottom": view.is_scrolled_to_bottom(),
            },
        })
    }
}
