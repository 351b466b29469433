//! Scripted in-process transport — replays a timed event script.
//!
//! Stands in for a real room connection in demos and tests. The script is
//! a YAML list of steps, each an offset from playback start plus one event.
//! Sends are acknowledged immediately with a fresh id; `disconnect` stops
//! playback and reports the agent as gone.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::broadcast;
use tokio::time::{sleep, Duration, Instant};
use uuid::Uuid;

use super::{AgentLivenessState, ChatAck, Transport, TransportError, TransportEvent};

/// One step of a playback script.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptStep {
    /// Milliseconds after playback start.
    pub at_ms: u64,
    #[serde(flatten)]
    pub action: ScriptAction,
}

/// What a script step does.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptAction {
    /// Report an agent state change.
    AgentState { state: AgentLivenessState },
    /// Deliver a remote chat message.
    Chat {
        id: String,
        #[serde(default)]
        from_local: bool,
        body: serde_json::Value,
    },
    /// Deliver a transcription fragment (repeat ids to stream one utterance).
    Transcription {
        id: String,
        #[serde(default)]
        from_local: bool,
        body: serde_json::Value,
        #[serde(default)]
        is_final: bool,
    },
}

/// Load a playback script from a YAML file.
pub fn load_script(path: &Path) -> anyhow::Result<Vec<ScriptStep>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&raw)?)
}

/// In-process transport that replays a script over a broadcast channel.
pub struct SimTransport {
    tx: broadcast::Sender<TransportEvent>,
    connected: AtomicBool,
}

impl SimTransport {
    pub fn new() -> Arc<Self> {
        let (tx, _) = broadcast::channel(256);
        Arc::new(Self {
            tx,
            connected: AtomicBool::new(true),
        })
    }

    /// Emit one event directly (test hook — bypasses the script clock).
    pub fn emit(&self, event: TransportEvent) {
        // No subscribers is fine; broadcast just drops the event.
        let _ = self.tx.send(event);
    }

    /// Replay a script in a background task. Each step's timestamp is the
    /// wall clock at emit time, mirroring how a live room stamps arrivals.
    pub fn play(self: &Arc<Self>, script: Vec<ScriptStep>) -> tokio::task::JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            let start = Instant::now();
            for step in script {
                let due = start + Duration::from_millis(step.at_ms);
                let now = Instant::now();
                if due > now {
                    sleep(due - now).await;
                }
                if !this.connected.load(Ordering::SeqCst) {
                    break;
                }
                let event = match step.action {
                    ScriptAction::AgentState { state } => TransportEvent::AgentState(state),
                    ScriptAction::Chat {
                        id,
                        from_local,
                        body,
                    } => TransportEvent::Chat {
                        id,
                        from_local,
                        body,
                        timestamp_ms: now_ms(),
                    },
                    ScriptAction::Transcription {
                        id,
                        from_local,
                        body,
                        is_final,
                    } => TransportEvent::Transcription {
                        id,
                        from_local,
                        body,
                        timestamp_ms: now_ms(),
                        is_final,
                    },
                };
                this.emit(event);
            }
        })
    }
}

/// Current wall clock in milliseconds since the Unix epoch.
fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[async_trait]
impl Transport for SimTransport {
    async fn send(&self, _text: &str) -> Result<ChatAck, TransportError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(TransportError::NotConnected);
        }
        Ok(ChatAck {
            id: Uuid::new_v4().to_string(),
            timestamp_ms: now_ms(),
        })
    }

    async fn disconnect(&self) {
        if self.connected.swap(false, Ordering::SeqCst) {
            self.emit(TransportEvent::AgentState(AgentLivenessState::Disconnected));
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<TransportEvent> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_acks_with_fresh_ids() {
        let t = SimTransport::new();
        let a = t.send("one").await.unwrap();
        let b = t.send("two").await.unwrap();
        assert_ne!(a.id, b.id);
        assert!(a.timestamp_ms <= b.timestamp_ms);
    }

    #[tokio::test]
    async fn send_fails_after_disconnect() {
        let t = SimTransport::new();
        t.disconnect().await;
        assert!(matches!(
            t.send("hi").await,
            Err(TransportError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn disconnect_reports_agent_gone_once() {
        let t = SimTransport::new();
        let mut rx = t.subscribe();
        t.disconnect().await;
        t.disconnect().await;
        assert!(matches!(
            rx.recv().await.unwrap(),
            TransportEvent::AgentState(AgentLivenessState::Disconnected)
        ));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn script_parses_from_yaml() {
        let yaml = r#"
- at_ms: 0
  agent_state:
    state: listening
- at_ms: 100
  transcription:
    id: t1
    body: "Hel"
- at_ms: 200
  transcription:
    id: t1
    body: "Hello"
    is_final: true
- at_ms: 300
  chat:
    id: c1
    from_local: true
    body: "hi there"
"#;
        let steps: Vec<ScriptStep> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(steps.len(), 4);
        assert!(matches!(
            steps[0].action,
            ScriptAction::AgentState {
                state: AgentLivenessState::Listening
            }
        ));
        assert!(matches!(
            &steps[2].action,
            ScriptAction::Transcription { is_final: true, .. }
        ));
    }
}
