//! Best-effort propagation of background changes to a collaboration peer.
//!
//! When a document is shared, background changes made through the cycle,
//! toggle, swap and default shortcuts are forwarded so the peer's palette
//! follows. Propagation is fire-and-forget: a full or closed channel is logged
//! and otherwise ignored. Local state never depends on it.

#[cfg(test)]
#[path = "remote_test.rs"]
mod remote_test;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::events::syscall;
use crate::frame::{FRAME_VALUE, Frame};

/// An active collaboration connection.
pub trait RemoteChannel {
    fn set_bg(&self, value: u8);
}

/// [`RemoteChannel`] that queues `set_bg` frames on a bounded mpsc.
#[derive(Debug, Clone)]
pub struct FrameRemote {
    tx: mpsc::Sender<Frame>,
    from: String,
}

impl FrameRemote {
    #[must_use]
    pub fn new(tx: mpsc::Sender<Frame>, from: impl Into<String>) -> Self {
        Self { tx, from: from.into() }
    }
}

impl RemoteChannel for FrameRemote {
    fn set_bg(&self, value: u8) {
        let frame = Frame::notify(syscall::SET_BG)
            .with_from(self.from.clone())
            .with_data(FRAME_VALUE, value);
        match self.tx.try_send(frame) {
            Ok(()) => debug!(value, "background propagated"),
            Err(e) => warn!(value, error = %e, "background propagation dropped"),
        }
    }
}
