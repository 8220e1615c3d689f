//! Error types.
//!
//! None of these escape a component operation as a hard failure. Components
//! log them and fall back to the documented no-op; only the blocking
//! attribute request hands its `BusError` back to the caller.

/// Failure talking to the host over the bus.
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    /// The host end of the channel has been dropped.
    #[error("host bus closed")]
    Closed,
    /// The host accepted the request but dropped it without replying.
    #[error("host dropped request `{syscall}` without a reply")]
    NoReply { syscall: String },
    /// The host replied with an error-status frame.
    #[error("host rejected request: {message}")]
    Rejected { message: String },
}

/// Failure resolving a palette by name.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PaletteError {
    #[error("unknown palette: {0}")]
    UnknownPalette(String),
}

/// Failure reading configuration.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

/// Failure parsing one line of a driver script.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("`{command}` needs {argument}")]
    MissingArgument { command: String, argument: &'static str },
    #[error("`{command}`: invalid {argument} {value:?}")]
    InvalidArgument { command: String, argument: &'static str, value: String },
    #[error("invalid frame: {0}")]
    Frame(#[from] serde_json::Error),
}
