//! Session core — the coordination logic of a live agent conversation.
//!
//! Timeline merge, message source adapter, liveness watchdog, and the
//! per-entry presentation formatter. Everything here is transport-agnostic:
//! the room connection is injected as a `Transport` handle at session start
//! and released at session end.

pub mod adapter;
pub mod format;
pub mod liveness;
pub mod timeline;
