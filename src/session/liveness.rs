//! Agent liveness monitor.
//!
//! Records the latest transport-reported agent state and arms one watchdog
//! per session: if the agent has not reached an available state when the
//! wait window closes, the session is ended with a user-visible alert and
//! a forced `disconnect()`. The watchdog is disarmed explicitly — on first
//! availability, on session end, and on teardown — so a late arrival
//! followed by a transient state flicker can never produce a stray
//! disconnect.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{info, warn};

use crate::transport::{AgentLivenessState, Transport};

/// How long after session start the agent may take to become available.
pub const DEFAULT_LIVENESS_WINDOW: Duration = Duration::from_secs(20);

/// A user-visible notification. Fire-and-forget; the display side owns
/// presentation and dismissal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub description: String,
}

/// State machine over the remote agent's reported state, plus the
/// wait-for-availability watchdog.
pub struct LivenessMonitor {
    state_tx: watch::Sender<AgentLivenessState>,
    window: Duration,
    watchdog: Option<JoinHandle<()>>,
}

impl LivenessMonitor {
    pub fn new(window: Duration) -> Self {
        let (state_tx, _) = watch::channel(AgentLivenessState::Connecting);
        Self {
            state_tx,
            window,
            watchdog: None,
        }
    }

    /// Latest reported state.
    pub fn state(&self) -> AgentLivenessState {
        *self.state_tx.borrow()
    }

    /// Record a reported state. Idempotent overwrite — any state may follow
    /// any state; fidelity to the exact protocol belongs to the transport.
    pub fn on_agent_state_changed(&self, state: AgentLivenessState) {
        self.state_tx.send_replace(state);
    }

    /// Arm the watchdog for a freshly started session. Any previous
    /// watchdog is disarmed first, so at most one alert and one disconnect
    /// can fire per session.
    pub fn start_session(
        &mut self,
        transport: Arc<dyn Transport>,
        alerts: mpsc::UnboundedSender<Alert>,
    ) {
        self.end_session();

        let mut rx = self.state_tx.subscribe();
        rx.mark_unchanged();
        let deadline = Instant::now() + self.window;

        self.watchdog = Some(tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = sleep_until(deadline) => {
                        let state = *rx.borrow();
                        if state.is_available() {
                            return;
                        }
                        let reason = if state == AgentLivenessState::Connecting {
                            "Agent did not join the room."
                        } else {
                            "Agent connected but did not complete initializing."
                        };
                        warn!(%state, "liveness window expired, ending session");
                        let _ = alerts.send(Alert {
                            title: "Session ended".into(),
                            description: format!("{reason} See the agent quickstart guide."),
                        });
                        transport.disconnect().await;
                        return;
                    }
                    changed = rx.changed() => {
                        if changed.is_err() {
                            return; // monitor dropped
                        }
                        // Disarm on first availability. The timer is keyed
                        // to session start only; a later flicker back to
                        // connecting does not re-arm it.
                        if rx.borrow_and_update().is_available() {
                            info!("agent available, watchdog disarmed");
                            return;
                        }
                    }
                }
            }
        }));
    }

    /// Disarm the watchdog. Required on every exit path — a timer leaked
    /// across session restarts can disconnect the wrong session.
    pub fn end_session(&mut self) {
        if let Some(handle) = self.watchdog.take() {
            handle.abort();
        }
    }
}

impl Drop for LivenessMonitor {
    fn drop(&mut self) {
        self.end_session();
    }
}
