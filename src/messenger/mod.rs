//! Creator command channel.
//!
//! The messenger owns the set of live creator connections, the shared
//! [`SystemState`], and the FIFO of [`QueuedCommand`]s waiting for the
//! orchestrator. State and connections sit behind a single lock that is held
//! for the whole dispatch of a command, so each command's mutation, queue
//! entry, and broadcast are observed atomically by other producers.

mod command;
mod connection;
mod events;

pub use command::{CreatorCommand, NotAnObject, RawCommand, UnknownCommand};
pub use connection::Connection;
pub use events::{QueuedCommand, ServerEvent, SystemState, SystemStatus};

use crate::logging::{AgentLogger, LogLevel};
use serde_json::Map;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;

/// How long [`Messenger::poll_next_command`] waits by default.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_millis(100);

#[derive(Default)]
struct Shared {
    state: SystemState,
    connections: Vec<Connection>,
}

pub struct Messenger {
    shared: Mutex<Shared>,
    queue_tx: mpsc::UnboundedSender<QueuedCommand>,
    queue_rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<QueuedCommand>>,
    logger: Arc<AgentLogger>,
}

impl Messenger {
    pub fn new(logger: Arc<AgentLogger>) -> Self {
        let (queue_tx, queue_rx) = mpsc::unbounded_channel();
        Self {
            shared: Mutex::new(Shared::default()),
            queue_tx,
            queue_rx: tokio::sync::Mutex::new(queue_rx),
            logger,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `connection` and push the current state to it.
    pub fn connect(&self, connection: &Connection) {
        let mut shared = self.lock();
        shared.connections.push(connection.clone());

        self.logger.record(
            "messenger",
            "connection_established",
            LogLevel::Info,
            "Creator connected to WebSocket",
            None,
        );

        self.send(connection, &ServerEvent::system_state(shared.state.clone()));
    }

    /// Remove `connection` if registered. Calling it twice is harmless.
    pub fn disconnect(&self, connection: &Connection) {
        let mut shared = self.lock();
        self.remove_locked(&mut shared, connection.id());
    }

    fn remove_locked(&self, shared: &mut Shared, id: u64) {
        shared.connections.retain(|c| c.id() != id);

        self.logger.record(
            "messenger",
            "connection_closed",
            LogLevel::Info,
            "Creator disconnected from WebSocket",
            None,
        );
    }

    /// Write `event` to one connection. Failures are logged, never returned.
    pub fn send(&self, connection: &Connection, event: &ServerEvent) {
        if let Err(error) = connection.deliver(event.to_json()) {
            self.logger.record(
                "messenger",
                "send_error",
                LogLevel::Error,
                &format!("Failed to send message: {error}"),
                None,
            );
        }
    }

    /// Write `event` to every connection, dropping the ones that fail.
    pub fn broadcast(&self, event: &ServerEvent) {
        let mut shared = self.lock();
        self.broadcast_locked(&mut shared, event);
    }

    fn broadcast_locked(&self, shared: &mut Shared, event: &ServerEvent) {
        if shared.connections.is_empty() {
            return;
        }

        let text = event.to_json();
        let mut failed = Vec::new();
        for connection in &shared.connections {
            if connection.deliver(text.clone()).is_err() {
                failed.push(connection.id());
            }
        }

        tracing::debug!(
            event = event.kind(),
            recipients = shared.connections.len() - failed.len(),
            "broadcast"
        );
        for id in failed {
            self.remove_locked(shared, id);
        }
    }

    fn enqueue(&self, command: QueuedCommand) {
        if let Err(error) = self.queue_tx.send(command) {
            tracing::error!("command queue closed, dropping {:?}", error.0);
        }
    }

    /// Dispatch one creator command.
    ///
    /// `origin` is the requesting connection, or `None` for the REST path.
    /// Returns the reply addressed to the requester alone (`status` snapshot
    /// or unknown-command error), whether or not it could be delivered.
    pub fn handle_command(
        &self,
        origin: Option<&Connection>,
        raw: &RawCommand,
    ) -> Option<ServerEvent> {
        let mut metadata = Map::new();
        metadata.insert("command_data".into(), raw.data.clone());
        self.logger.record(
            "messenger",
            "command_received",
            LogLevel::Info,
            &format!("Received command: {}", raw.label()),
            Some(metadata),
        );

        let mut shared = self.lock();
        match CreatorCommand::parse(raw) {
            Ok(CreatorCommand::Pause) => {
                shared.state.set_paused(true);
                self.enqueue(QueuedCommand::pause());
                self.logger.record(
                    "orchestrator",
                    "system_paused",
                    LogLevel::Warning,
                    "System paused by creator command",
                    None,
                );
                self.broadcast_locked(&mut shared, &ServerEvent::system_paused());
                None
            }
            Ok(CreatorCommand::Resume) => {
                shared.state.set_paused(false);
                self.enqueue(QueuedCommand::resume());
                self.logger.record(
                    "orchestrator",
                    "system_resumed",
                    LogLevel::Success,
                    "System resumed by creator command",
                    None,
                );
                self.broadcast_locked(&mut shared, &ServerEvent::system_resumed());
                None
            }
            Ok(CreatorCommand::Rollback { checkpoint: None }) => {
                self.broadcast_locked(
                    &mut shared,
                    &ServerEvent::error("Rollback command requires checkpoint parameter"),
                );
                None
            }
            Ok(CreatorCommand::Rollback {
                checkpoint: Some(checkpoint),
            }) => {
                self.enqueue(QueuedCommand::rollback(&checkpoint));
                self.logger.record(
                    "orchestrator",
                    "rollback_requested",
                    LogLevel::Warning,
                    &format!("Rollback to checkpoint requested: {checkpoint}"),
                    None,
                );
                self.broadcast_locked(&mut shared, &ServerEvent::rollback_initiated(&checkpoint));
                None
            }
            Ok(CreatorCommand::Message { text }) => {
                self.enqueue(QueuedCommand::message(&text));
                self.logger.record(
                    "orchestrator",
                    "creator_message",
                    LogLevel::Info,
                    &format!("Creator message: {text}"),
                    None,
                );
                self.broadcast_locked(&mut shared, &ServerEvent::creator_message(text));
                None
            }
            Ok(CreatorCommand::Status) => {
                let reply = ServerEvent::system_state(shared.state.clone());
                if let Some(connection) = origin {
                    self.send(connection, &reply);
                }
                Some(reply)
            }
            Err(unknown) => {
                let reply = ServerEvent::error(unknown.to_string());
                if let Some(connection) = origin {
                    self.send(connection, &reply);
                }
                Some(reply)
            }
        }
    }

    /// Pop the oldest queued command, waiting at most `timeout`.
    ///
    /// The wait for a concurrent poller to release the queue counts against
    /// `timeout`.
    pub async fn poll_next_command(&self, timeout: Duration) -> Option<QueuedCommand> {
        tokio::time::timeout(timeout, async {
            let mut queue = self.queue_rx.lock().await;
            queue.recv().await
        })
        .await
        .ok()
        .flatten()
    }

    /// Snapshot of the current state.
    pub fn get_state(&self) -> SystemState {
        self.lock().state.clone()
    }

    pub fn connection_count(&self) -> usize {
        self.lock().connections.len()
    }
}
