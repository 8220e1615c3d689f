//! Autolinking for chat text.
//!
//! Chat and welcome text is split into [`Fragment`]s: plain runs, external
//! links (`http://`, `https://`, `ftp://`, `www.` and bare e-mail addresses)
//! and ticket references (`#123`). A ticket points at a line of the shared
//! document; activating one calls the line handler instead of leaving the
//! editor.

#[cfg(test)]
#[path = "linkify_test.rs"]
mod linkify_test;

use std::fmt;
use std::rc::Rc;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::consts::GOTO_SCHEME;

static LINK_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    let pattern = r#"(?x)
        (?P<url>(?:https?://|ftp://|www\.)[^\s<>"]+)
      | (?P<email>[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)+)
      | (?P<ticket>\#(?P<line>\d+)\b)
    "#;
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!(error = %e, "link pattern failed to compile; chat text stays plain");
            None
        }
    }
});

/// Characters that end a sentence rather than a URL.
const URL_TRAILING: &[char] = &['.', ',', ';', ':', '!', '?', ')', '\'', '"'];

/// Prefixes the url branch of the pattern accepts, longest first.
const URL_PREFIXES: &[&str] = &["https://", "http://", "ftp://", "www."];

/// One piece of linkified text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Text(String),
    Link { text: String, href: String },
    Ticket { text: String, line: u32 },
}

impl Fragment {
    /// Displayed text.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) | Self::Link { text, .. } | Self::Ticket { text, .. } => text,
        }
    }

    /// Link target, `None` for plain text. Tickets use the `goto://` scheme.
    #[must_use]
    pub fn href(&self) -> Option<String> {
        match self {
            Self::Text(_) => None,
            Self::Link { href, .. } => Some(href.clone()),
            Self::Ticket { line, .. } => Some(format!("{GOTO_SCHEME}{line}")),
        }
    }
}

/// Split `text` into plain and linked fragments.
#[must_use]
pub fn linkify(text: &str) -> Vec<Fragment> {
    let mut out = Vec::new();
    let Some(re) = LINK_RE.as_ref() else {
        push_text(&mut out, text);
        return out;
    };

    let mut cursor = 0;
    for caps in re.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let start = whole.start();

        let (fragment, end) = if let Some(url) = caps.name("url") {
            let trimmed = url.as_str().trim_end_matches(URL_TRAILING);
            if !url_boundary(&text[..start]) || !has_host(trimmed) {
                continue;
            }
            let href = if trimmed.starts_with("www.") { format!("http://{trimmed}") } else { trimmed.to_owned() };
            (Fragment::Link { text: trimmed.to_owned(), href }, start + trimmed.len())
        } else if let Some(email) = caps.name("email") {
            let address = email.as_str();
            (Fragment::Link { text: address.to_owned(), href: format!("mailto:{address}") }, whole.end())
        } else if let Some(line) = caps.name("line") {
            if !ticket_boundary(&text[..start]) {
                continue;
            }
            let Ok(line) = line.as_str().parse::<u32>() else {
                continue;
            };
            (Fragment::Ticket { text: whole.as_str().to_owned(), line }, whole.end())
        } else {
            continue;
        };

        push_text(&mut out, &text[cursor..start]);
        out.push(fragment);
        cursor = end;
    }
    push_text(&mut out, &text[cursor..]);
    out
}

/// A URL must not continue a word: `awww.example.com` stays plain.
fn url_boundary(before: &str) -> bool {
    before.chars().next_back().is_none_or(|c| !(c.is_alphanumeric() || c == '_'))
}

/// The text after the scheme or `www.` must start with a host character.
fn has_host(url: &str) -> bool {
    let rest = URL_PREFIXES.iter().find_map(|prefix| url.strip_prefix(prefix)).unwrap_or(url);
    rest.chars().next().is_some_and(char::is_alphanumeric)
}

/// A ticket must start the text or follow whitespace or an opening bracket.
fn ticket_boundary(before: &str) -> bool {
    before
        .chars()
        .next_back()
        .is_none_or(|c| c.is_whitespace() || c == '(' || c == '[')
}

fn push_text(out: &mut Vec<Fragment>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Fragment::Text(last)) = out.last_mut() {
        last.push_str(text);
    } else {
        out.push(Fragment::Text(text.to_owned()));
    }
}

// =============================================================================
// ACTIVATION
// =============================================================================

/// Line-navigation callback supplied by the session layer.
pub type GotoLine = Rc<dyn Fn(u32)>;

/// Opens non-ticket links outside the editor (system browser, mail client).
pub trait ExternalOpener {
    fn open_external(&mut self, href: &str);
}

/// What activating a fragment did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    GotoLine(u32),
    OpenExternal(String),
}

/// Linkified text bound to its line handler, as handed to the log view.
#[derive(Clone)]
pub struct RichText {
    fragments: Vec<Fragment>,
    goto_line: GotoLine,
}

impl RichText {
    #[must_use]
    pub fn new(text: &str, goto_line: GotoLine) -> Self {
        Self { fragments: linkify(text), goto_line }
    }

    #[must_use]
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// The text with link markup removed.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.fragments.iter().map(Fragment::text).collect()
    }

    /// Handle a click on fragment `index`. Tickets go to the line handler,
    /// other links to `opener`, plain text and bad indices do nothing.
    pub fn activate(&self, index: usize, opener: &mut dyn ExternalOpener) -> Option<Activation> {
        match self.fragments.get(index)? {
            Fragment::Text(_) => None,
            Fragment::Ticket { line, .. } => {
                debug!(line, "ticket link activated");
                (self.goto_line)(*line);
                Some(Activation::GotoLine(*line))
            }
            Fragment::Link { href, .. } => {
                opener.open_external(href);
                Some(Activation::OpenExternal(href.clone()))
            }
        }
    }
}

impl fmt::Debug for RichText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RichText").field("fragments", &self.fragments).finish_non_exhaustive()
    }
}
