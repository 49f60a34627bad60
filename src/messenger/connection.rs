use crate::error::TransportError;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Handle to one live creator socket.
///
/// Text frames are queued on an unbounded channel drained by the socket's
/// writer task. Once that task stops (remote close, write error) the channel
/// closes and every further delivery fails.
#[derive(Debug, Clone)]
pub struct Connection {
    id: u64,
    outbound: mpsc::UnboundedSender<String>,
}

impl Connection {
    /// A fresh handle plus the receiving end the writer task drains.
    pub fn open() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (outbound, inbound) = mpsc::unbounded_channel();
        let connection = Self {
            id: NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed),
            outbound,
        };
        (connection, inbound)
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn deliver(&self, text: String) -> Result<(), TransportError> {
        self.outbound
            .send(text)
            .map_err(|_| TransportError::ConnectionClosed { connection: self.id })
    }
}

impl PartialEq for Connection {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Connection {}
