//! Palette chooser and chat panel controllers for a text-mode art editor.
//!
//! Both components are view-controllers: they own a small amount of state,
//! react to events from the host (bus frames, keyboard shortcuts, document
//! lifecycle notifications, pointer clicks) and push visual changes through
//! narrow view-port traits. Nothing here draws pixels. A host UI implements
//! [`view::SwatchView`] and [`view::ChatView`]; tests and the demo binary use
//! the recording ports in [`headless`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`palette_chooser`] | Foreground/background selection, swatches, palette switching |
//! | [`chat_panel`] | User roster, message log, autoscroll, visibility |
//! | [`selection`] | Pure cycle/toggle/swap rules for color indices |
//! | [`palette`] | RGB palettes (EGA, ZX Spectrum, C64) and family detection |
//! | [`doc`] | The `Document` collaborator trait and an in-memory `TextDoc` |
//! | [`bus`] | Observer registration and the host bus (`send` / `send_sync`) |
//! | [`events`] | Typed inbound and outbound events |
//! | [`frame`] | The bus message type |
//! | [`remote`] | Best-effort background propagation to a collaboration peer |
//! | [`linkify`] | URL and `#123` ticket detection for chat text |
//! | [`view`] | View-port traits and log entry types |
//! | [`headless`] | Recording view ports with a pixel scroll model |
//! | [`input`] | Pointer buttons and modifier keys |
//! | [`config`] | Environment configuration |
//! | [`script`] | Line-oriented driver scripts and the demo session |
//! | [`consts`] | Shared constants |
//! | [`error`] | Error types |

pub mod bus;
pub mod chat_panel;
pub mod config;
pub mod consts;
pub mod doc;
pub mod error;
pub mod events;
pub mod frame;
pub mod headless;
pub mod input;
pub mod linkify;
pub mod palette;
pub mod palette_chooser;
pub mod remote;
pub mod script;
pub mod selection;
pub mod view;
