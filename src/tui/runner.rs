//! TUI runner — main loop that wires everything together.
//!
//! Creates the terminal, starts the session against the transport, and
//! runs the TEA loop. The liveness watchdog and the scroll synchronizer
//! are independent observers; neither orders before the other.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::warn;

use crate::config::AppConfig;
use crate::session::adapter::MessageSource;
use crate::session::liveness::{Alert, LivenessMonitor};
use crate::transport::{Transport, TransportEvent};

use super::app::App;
use super::event::TuiMessage;
use super::layout;

/// Run the TUI main loop. Blocks until quit.
pub async fn run_tui(config: AppConfig, transport: Arc<dyn Transport>) -> anyhow::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config.clone(), MessageSource::new(Arc::clone(&transport)));
    let mut transport_rx = transport.subscribe();

    // Session start: arm the liveness watchdog against this transport.
    let (alert_tx, mut alert_rx) = mpsc::unbounded_channel::<Alert>();
    let mut monitor = LivenessMonitor::new(config.liveness_window());
    monitor.start_session(Arc::clone(&transport), alert_tx);
    app.session_started = true;

    let mut tick_interval = interval(Duration::from_millis(250)); // 4Hz
    let mut render_interval = interval(Duration::from_millis(33)); // ~30fps

    loop {
        tokio::select! {
            _ = tick_interval.tick() => {
                app.update(TuiMessage::Tick);
            }
            _ = render_interval.tick() => {
                app.update(TuiMessage::Render);
                terminal.draw(|f| layout::draw(f, &mut app))?;
            }
            Ok(event) = transport_rx.recv() => {
                // The watchdog keeps its own state copy; feed it before the
                // view so an expiry decision never waits on a render.
                if let TransportEvent::AgentState(state) = &event {
                    monitor.on_agent_state_changed(*state);
                }
                app.update(TuiMessage::Transport(event));
            }
            Some(alert) = alert_rx.recv() => {
                app.update(TuiMessage::Alert(alert));
            }
            // Poll crossterm events (non-blocking via tokio::task::spawn_blocking)
            result = tokio::task::spawn_blocking(|| {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    event::read().ok()
                } else {
                    None
                }
            }) => {
                if let Ok(Some(Event::Key(key))) = result {
                    app.update(TuiMessage::Input(key));
                }
            }
        }

        // Ack-gated send: the entry appears only once the transport accepts.
        if let Some(text) = app.pending_send.take() {
            if let Err(e) = app.source.send(&text).await {
                warn!("send failed: {e}");
                app.update(TuiMessage::Alert(Alert {
                    title: "Message not sent".into(),
                    description: e.to_string(),
                }));
            }
        }

        if app.should_quit {
            break;
        }
    }

    // Session end: disarm the watchdog before tearing the view down.
    monitor.end_session();

    // Restore terminal
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
