#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::thread;

use clap::Parser;
use swatchboard::bus::{ChannelHost, HostMessage};
use swatchboard::config::PanelConfig;
use swatchboard::error::ConfigError;
use swatchboard::events::syscall;
use swatchboard::frame::{Data, Frame};
use swatchboard::palette::PaletteName;
use swatchboard::remote::FrameRemote;
use swatchboard::script::{Session, parse_line};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Queue depth of the collaboration channel.
const REMOTE_QUEUE: usize = 32;

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid --palette: {0}")]
    Palette(#[from] swatchboard::error::PaletteError),
    #[error("script read failed: {0}")]
    Io(#[from] io::Error),
    #[error("state encode failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0} script line(s) failed")]
    Script(usize),
}

#[derive(Parser, Debug)]
#[command(name = "swatchboard", about = "Drive the palette chooser and chat panel from a command script")]
struct Cli {
    /// Command script; stdin when absent.
    script: Option<PathBuf>,

    /// Initial palette (`default` or `zx`).
    #[arg(long)]
    palette: Option<String>,

    /// Open chat height in pixels.
    #[arg(long)]
    chat_height: Option<u32>,

    #[arg(long)]
    columns: Option<usize>,

    #[arg(long)]
    rows: Option<usize>,

    /// Forward background changes to a collaboration peer under this name.
    #[arg(long, env = "SWATCHBOARD_PEER")]
    peer: Option<String>,

    /// Stop at the first bad script line.
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<(), AppError> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("ignoring .env: {e}");
        }
    }

    let cli = Cli::parse();
    let config = apply_overrides(PanelConfig::from_env()?, &cli)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
    info!(palette = config.palette.as_str(), columns = config.columns, rows = config.rows, "swatchboard starting");

    let (host, host_rx) = ChannelHost::new();
    let host_thread = thread::spawn(move || run_host(host_rx));

    let mut session = Session::new(&config, host);
    let mut peer_thread = None;
    if let Some(peer) = cli.peer.as_deref() {
        let (tx, rx) = mpsc::channel(REMOTE_QUEUE);
        session.set_remote(Box::new(FrameRemote::new(tx, peer)));
        peer_thread = Some(thread::spawn(move || run_peer(rx)));
        info!(%peer, "collaboration peer attached");
    }

    let reader: Box<dyn BufRead> = match &cli.script {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(BufReader::new(io::stdin())),
    };
    let failures = run_script(&mut session, reader, cli.strict)?;

    // Dropping the session closes both channels so the worker threads exit.
    drop(session);
    join_worker("host", host_thread);
    if let Some(handle) = peer_thread {
        join_worker("peer", handle);
    }

    if failures > 0 {
        return Err(AppError::Script(failures));
    }
    Ok(())
}

fn apply_overrides(mut config: PanelConfig, cli: &Cli) -> Result<PanelConfig, AppError> {
    if let Some(name) = cli.palette.as_deref() {
        config.palette = name.parse::<PaletteName>()?;
    }
    if let Some(px) = cli.chat_height {
        config.chat_height = px;
    }
    if let Some(columns) = cli.columns {
        config.columns = columns;
    }
    if let Some(rows) = cli.rows {
        config.rows = rows;
    }
    config.validate()?;
    Ok(config)
}

/// Apply every line, printing reports to stdout. Returns the number of
/// lines that failed to parse.
fn run_script(session: &mut Session<ChannelHost>, reader: Box<dyn BufRead>, strict: bool) -> Result<usize, AppError> {
    let mut failures = 0;
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                warn!(line = number + 1, error = %e, "script line skipped");
                failures += 1;
                if strict {
                    break;
                }
                continue;
            }
        };
        if let Some(report) = session.apply(command) {
            println!("{}", serde_json::to_string(&report)?);
        }
    }
    Ok(failures)
}

/// Host stand-in: logs menu notifications and answers attribute requests by
/// accepting the seeded selection. Any other request is refused.
fn run_host(mut rx: mpsc::UnboundedReceiver<HostMessage>) {
    while let Some(message) = rx.blocking_recv() {
        match message {
            HostMessage::Notify(frame) => info!(syscall = %frame.syscall, "host menu"),
            HostMessage::Request { frame, reply } => {
                let answer = accept_request(&frame);
                if reply.send(answer).is_err() {
                    warn!(syscall = %frame.syscall, "requester gone before reply");
                }
            }
        }
    }
}

fn accept_request(frame: &Frame) -> Frame {
    if frame.syscall != syscall::SELECT_ATTRIBUTE {
        return frame.error("unsupported request").with_from("host");
    }
    let mut data = Data::new();
    for key in ["foreground", "background"] {
        if let Some(value) = frame.data.get(key) {
            data.insert(key.to_owned(), value.clone());
        }
    }
    frame.done_with(data).with_from("host")
}

fn run_peer(mut rx: mpsc::Receiver<Frame>) {
    while let Some(frame) = rx.blocking_recv() {
        info!(syscall = %frame.syscall, from = ?frame.from, value = ?frame.index("value"), "peer received");
    }
}

fn join_worker(name: &str, handle: thread::JoinHandle<()>) {
    if handle.join().is_err() {
        warn!(worker = name, "worker thread panicked");
    }
}
