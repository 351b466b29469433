//! Transport boundary — the room connection that carries the session.
//!
//! The core never implements the wire protocol. It consumes a `Transport`:
//! an event stream of chat messages, transcription fragments, and agent
//! state changes, plus `send` and `disconnect`. Delivery is best-effort
//! broadcast: a subscriber that falls behind sees `Lagged` and catches up
//! from the next event.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::broadcast;

pub mod sim;

/// Remote agent state as reported by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentLivenessState {
    /// The agent has not joined the room yet.
    Connecting,
    /// Joined and waiting for input.
    Listening,
    /// Processing.
    Thinking,
    /// Producing audio output.
    Speaking,
    /// Gone.
    Disconnected,
}

impl AgentLivenessState {
    /// "Available" means joined and responsive: listening, thinking, or speaking.
    pub fn is_available(self) -> bool {
        matches!(self, Self::Listening | Self::Thinking | Self::Speaking)
    }
}

impl std::fmt::Display for AgentLivenessState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Connecting => "connecting",
            Self::Listening => "listening",
            Self::Thinking => "thinking",
            Self::Speaking => "speaking",
            Self::Disconnected => "disconnected",
        };
        f.write_str(s)
    }
}

/// Events emitted by the transport for observation.
///
/// Payload bodies arrive as raw JSON values — the wire does not promise
/// strings. Coercion to display text happens in the session layer.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// A chat message delivered through the data channel.
    Chat {
        id: String,
        /// True when the local participant authored it.
        from_local: bool,
        body: serde_json::Value,
        timestamp_ms: i64,
    },
    /// A transcription fragment. Repeated events with the same `id` carry
    /// the growing body of one utterance; `is_final` marks the last one.
    Transcription {
        id: String,
        from_local: bool,
        body: serde_json::Value,
        timestamp_ms: i64,
        is_final: bool,
    },
    /// The agent's liveness state changed.
    AgentState(AgentLivenessState),
}

/// Acknowledgment returned by a successful `send`.
///
/// The transport assigns the id and the ordering timestamp — local chat
/// entries only enter the timeline with acknowledged ordering.
#[derive(Debug, Clone)]
pub struct ChatAck {
    pub id: String,
    pub timestamp_ms: i64,
}

/// Errors from transport operations.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("not connected")]
    NotConnected,

    #[error("send rejected: {0}")]
    Rejected(String),

    #[error("connection closed")]
    Closed,
}

/// The room connection, as seen by the session core.
///
/// Injected explicitly into the components that need it — created at
/// session start, torn down at session end.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a chat message. Resolves once the transport acknowledges;
    /// no retry is attempted here — retry policy belongs to the caller.
    async fn send(&self, text: &str) -> Result<ChatAck, TransportError>;

    /// Leave the room. Idempotent.
    async fn disconnect(&self);

    /// Subscribe to the transport's event stream.
    fn subscribe(&self) -> broadcast::Receiver<TransportEvent>;
}
