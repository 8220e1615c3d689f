//! Observer registration and the host bus.
//!
//! DESIGN
//! ======
//! Two separate seams:
//!
//! - [`Emitter`] is owned by a component and delivers its typed
//!   notifications to in-process observers registered with `on`.
//! - [`HostBus`] reaches the host process (menus, dialogs). `send` is
//!   fire-and-forget; `send_sync` blocks the calling thread until the host
//!   replies and is reserved for the one user-driven dialog request.
//!
//! [`ChannelHost`] implements `HostBus` over tokio channels: notifications go
//! down an unbounded mpsc, requests carry a oneshot for the reply.

#[cfg(test)]
#[path = "bus_test.rs"]
mod bus_test;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::error::BusError;
use crate::frame::{Frame, Status};

// =============================================================================
// OBSERVERS
// =============================================================================

/// An event with a stable name observers subscribe to.
pub trait Event {
    fn name(&self) -> &'static str;
}

type Handler<E> = Box<dyn FnMut(&E)>;

/// Typed publish/subscribe owned by a component.
pub struct Emitter<E> {
    handlers: Vec<(&'static str, Handler<E>)>,
}

impl<E: Event> Emitter<E> {
    #[must_use]
    pub fn new() -> Self {
        Self { handlers: Vec::new() }
    }

    /// Register `handler` for events named `name`.
    pub fn on(&mut self, name: &'static str, handler: impl FnMut(&E) + 'static) {
        self.handlers.push((name, Box::new(handler)));
    }

    /// Deliver `event` to every matching handler in registration order.
    /// Returns how many handlers ran.
    pub fn emit(&mut self, event: &E) -> usize {
        let name = event.name();
        let mut delivered = 0;
        for (_, handler) in self.handlers.iter_mut().filter(|(n, _)| *n == name) {
            handler(event);
            delivered += 1;
        }
        delivered
    }
}

impl<E: Event> Default for Emitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// HOST BUS
// =============================================================================

/// Connection to the host process.
pub trait HostBus {
    /// Fire-and-forget notification.
    fn send(&self, frame: Frame);

    /// Blocking request/response.
    ///
    /// # Errors
    ///
    /// Returns [`BusError`] if the host is gone, drops the request, or
    /// answers with an error frame.
    fn send_sync(&self, frame: Frame) -> Result<Frame, BusError>;
}

/// What the host side of a [`ChannelHost`] receives.
#[derive(Debug)]
pub enum HostMessage {
    Notify(Frame),
    Request { frame: Frame, reply: oneshot::Sender<Frame> },
}

/// [`HostBus`] over tokio channels.
#[derive(Debug, Clone)]
pub struct ChannelHost {
    tx: mpsc::UnboundedSender<HostMessage>,
}

impl ChannelHost {
    /// Create a bus and the receiver the host drains.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<HostMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl HostBus for ChannelHost {
    fn send(&self, frame: Frame) {
        let syscall = frame.syscall.clone();
        if self.tx.send(HostMessage::Notify(frame)).is_err() {
            warn!(%syscall, "host bus closed; notification dropped");
            return;
        }
        debug!(%syscall, "host notified");
    }

    /// Must not be called from inside an async runtime: the reply is awaited
    /// with `blocking_recv`.
    fn send_sync(&self, frame: Frame) -> Result<Frame, BusError> {
        let syscall = frame.syscall.clone();
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(HostMessage::Request { frame, reply: reply_tx })
            .map_err(|_| BusError::Closed)?;

        let reply = reply_rx
            .blocking_recv()
            .map_err(|_| BusError::NoReply { syscall: syscall.clone() })?;

        if reply.status == Status::Error {
            let message = reply.message().unwrap_or("unspecified").to_owned();
            return Err(BusError::Rejected { message });
        }
        debug!(%syscall, "host replied");
        Ok(reply)
    }
}
