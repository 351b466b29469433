//! Session view — ratatui TUI presentation layer.
//!
//! Renders the merged conversation timeline as a terminal chat view.
//! Read-mostly: the TUI pulls projections from the session core every
//! frame and owns only display state (scroll offset, toasts, input line).
//!
//! ## Architecture (TEA)
//!
//! Model (`App`) + Update (message handler) + View (render). Immediate
//! mode, no retained widget state; the renderer receives lightweight
//! entry views, never the timeline itself.

pub mod app;
pub mod event;
pub mod input;
pub mod layout;
pub mod markdown;
pub mod runner;
pub mod scroll;
pub mod toast;
