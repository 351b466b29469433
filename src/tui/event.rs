//! TUI event loop — merges input, transport, alert, tick, and render events.
//!
//! The runner multiplexes:
//! - crossterm keyboard events
//! - transport broadcast events (chat, transcription, agent state)
//! - liveness alerts
//! - tick interval (4Hz — toast expiry, housekeeping)
//! - render interval (30fps — scroll animation + draw)
//!
//! All of it flows through `App::update` as one message type.

use crossterm::event::KeyEvent;

use crate::session::liveness::Alert;
use crate::transport::TransportEvent;

/// Messages that drive the TUI update loop.
#[derive(Debug, Clone)]
pub enum TuiMessage {
    /// Keyboard input.
    Input(KeyEvent),
    /// Raw transport event.
    Transport(TransportEvent),
    /// A fire-and-forget alert to display.
    Alert(Alert),
    /// Tick: housekeeping (toast expiry).
    Tick,
    /// Render: advance animations, then draw a frame.
    Render,
    /// Quit the TUI.
    Quit,
}
