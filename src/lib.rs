//! voxchat — terminal client for live voice-agent sessions.
//!
//! Merges chat and live transcription into one ordered timeline, watches
//! agent liveness with a bounded wait window, and keeps the scrollback
//! pinned to newly arriving content.

pub mod config;
pub mod session;
pub mod transport;
pub mod tui;
