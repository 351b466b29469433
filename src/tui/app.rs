//! App — the TEA model.
//!
//! All display state lives here. Update receives TuiMessages and mutates
//! state; the view reads state to produce ratatui widgets. No side effects
//! in view. The canonical timeline stays inside the message source — the
//! app only ever pulls its ordered projection.

use crate::config::AppConfig;
use crate::session::adapter::MessageSource;
use crate::transport::{AgentLivenessState, TransportEvent};

use super::event::TuiMessage;
use super::scroll::ScrollSync;
use super::toast::ToastState;

/// The main TUI application state.
pub struct App {
    pub config: AppConfig,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Set once the session has been started against the transport.
    pub session_started: bool,
    /// Latest agent state as seen by the view (the liveness monitor keeps
    /// its own copy — the watchdog does not depend on render cadence).
    pub agent_state: AgentLivenessState,
    /// Merged chat + transcription source. Owns the timeline.
    pub source: MessageSource,
    /// Bottom-pinning scroll state for the messages pane.
    pub scroll: ScrollSync,
    /// Alert overlay.
    pub toasts: ToastState,
    /// Input line content.
    pub input: String,
    /// Message pending async send (set on Enter, consumed by the runner).
    pub pending_send: Option<String>,
    /// Viewport height of the messages pane (set by renderer, used by
    /// PageUp/PageDown).
    pub viewport_height: u16,
    /// Bottom offset of the messages pane (set by renderer, used by
    /// manual scrolling and End).
    pub max_scroll: u16,
}

impl App {
    pub fn new(config: AppConfig, source: MessageSource) -> Self {
        Self {
            config,
            should_quit: false,
            session_started: false,
            agent_state: AgentLivenessState::Connecting,
            source,
            scroll: ScrollSync::new(),
            toasts: ToastState::new(),
            input: String::new(),
            pending_send: None,
            viewport_height: 20, // sensible default, updated by renderer
            max_scroll: 0,
        }
    }

    /// Handle a TUI message (TEA update).
    pub fn update(&mut self, msg: TuiMessage) {
        match msg {
            TuiMessage::Input(key) => {
                super::input::handle_key(self, key);
            }
            TuiMessage::Transport(event) => {
                self.handle_transport_event(event);
            }
            TuiMessage::Alert(alert) => {
                self.toasts.push(alert);
            }
            TuiMessage::Tick => {
                self.toasts.expire();
            }
            TuiMessage::Render => {
                self.scroll.tick();
            }
            TuiMessage::Quit => {
                self.should_quit = true;
            }
        }
    }

    fn handle_transport_event(&mut self, event: TransportEvent) {
        if let TransportEvent::AgentState(state) = &event {
            self.agent_state = *state;
        }
        self.source.apply(&event);
    }

    /// Header status line: available states read as online.
    pub fn agent_online(&self) -> bool {
        self.agent_state.is_available()
    }

    /// Show the pre-connect hint while the session is live but silent.
    pub fn show_pre_connect_hint(&self) -> bool {
        self.config.pre_connect_hint && self.session_started && self.source.is_empty()
    }
}
