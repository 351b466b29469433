//! Toast overlay — fire-and-forget alerts with timed dismissal.
//!
//! The alert collaborator's display side: accepts `{title, description}`
//! and shows it as an overlay for a hold period. Nothing is returned to
//! the sender.

use std::time::{Duration, Instant};

use crate::session::liveness::Alert;

/// How long a toast stays on screen.
const HOLD: Duration = Duration::from_secs(6);

#[derive(Debug, Default)]
pub struct ToastState {
    current: Option<(Alert, Instant)>,
}

impl ToastState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show an alert, replacing any toast already on screen.
    pub fn push(&mut self, alert: Alert) {
        self.current = Some((alert, Instant::now()));
    }

    /// Drop the toast once its hold period has passed. Called on tick.
    pub fn expire(&mut self) {
        if let Some((_, since)) = &self.current {
            if since.elapsed() >= HOLD {
                self.current = None;
            }
        }
    }

    /// The alert to display, if any.
    pub fn active(&self) -> Option<&Alert> {
        self.current.as_ref().map(|(alert, _)| alert)
    }
}
