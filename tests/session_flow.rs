//! End-to-end session flow over the scripted transport.
//!
//! Exercises the full path a live session takes: transport events feed the
//! adapter, the merged timeline orders across sources, and the liveness
//! watchdog ends an agent-less session exactly once.

use std::time::Duration;

use serde_json::json;
use tokio::sync::mpsc;

use voxchat::session::adapter::MessageSource;
use voxchat::session::liveness::LivenessMonitor;
use voxchat::session::timeline::EntryOrigin;
use voxchat::transport::sim::{ScriptAction, ScriptStep, SimTransport};
use voxchat::transport::{AgentLivenessState, Transport, TransportError, TransportEvent};

fn transcription(id: &str, body: &str, ts: i64, is_final: bool) -> TransportEvent {
    TransportEvent::Transcription {
        id: id.into(),
        from_local: false,
        body: json!(body),
        timestamp_ms: ts,
        is_final,
    }
}

#[tokio::test]
async fn streaming_transcription_merges_ahead_of_later_chat() {
    let transport = SimTransport::new();
    let mut rx = transport.subscribe();
    let mut source = MessageSource::new(transport.clone());

    // Three streaming updates for one utterance, stamped well before the
    // typed reply that follows.
    transport.emit(transcription("t1", "h", 1_000, false));
    transport.emit(transcription("t1", "he", 1_100, false));
    transport.emit(transcription("t1", "hello world", 1_200, true));
    for _ in 0..3 {
        let event = rx.recv().await.unwrap();
        source.apply(&event);
    }

    // The chat entry is acknowledged with a wall-clock timestamp, far
    // after the transcription's creation time.
    source.send("hello").await.unwrap();

    let messages = source.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].body, "hello world");
    assert_eq!(messages[0].origin, EntryOrigin::Remote);
    // Edited on the second and third update, not the first.
    assert!(messages[0].edited_at_ms.is_some());
    assert_eq!(messages[1].body, "hello");
    assert_eq!(messages[1].origin, EntryOrigin::Local);
}

#[tokio::test(start_paused = true)]
async fn script_playback_delivers_in_order() {
    let transport = SimTransport::new();
    let mut rx = transport.subscribe();

    let script = vec![
        ScriptStep {
            at_ms: 100,
            action: ScriptAction::AgentState {
                state: AgentLivenessState::Listening,
            },
        },
        ScriptStep {
            at_ms: 200,
            action: ScriptAction::Transcription {
                id: "t1".into(),
                from_local: false,
                body: json!("hi"),
                is_final: true,
            },
        },
        ScriptStep {
            at_ms: 300,
            action: ScriptAction::Chat {
                id: "c1".into(),
                from_local: false,
                body: json!("typed"),
            },
        },
    ];
    transport.play(script);

    assert!(matches!(
        rx.recv().await.unwrap(),
        TransportEvent::AgentState(AgentLivenessState::Listening)
    ));
    assert!(matches!(
        rx.recv().await.unwrap(),
        TransportEvent::Transcription { .. }
    ));
    assert!(matches!(rx.recv().await.unwrap(), TransportEvent::Chat { .. }));
}

#[tokio::test(start_paused = true)]
async fn silent_agent_ends_the_session_once() {
    let transport = SimTransport::new();
    let mut rx = transport.subscribe();
    let (alert_tx, mut alert_rx) = mpsc::unbounded_channel();

    let mut monitor = LivenessMonitor::new(Duration::from_secs(20));
    monitor.start_session(transport.clone(), alert_tx);

    // The watchdog expires, alerts, and forces a disconnect; the transport
    // reports the agent gone and refuses further sends.
    let alert = alert_rx.recv().await.unwrap();
    assert_eq!(alert.title, "Session ended");
    assert!(alert.description.starts_with("Agent did not join the room."));

    assert!(matches!(
        rx.recv().await.unwrap(),
        TransportEvent::AgentState(AgentLivenessState::Disconnected)
    ));
    assert!(matches!(
        transport.send("too late").await,
        Err(TransportError::NotConnected)
    ));

    // Exactly one alert.
    tokio::time::advance(Duration::from_secs(120)).await;
    assert!(alert_rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn prompt_agent_keeps_the_session_alive() {
    let transport = SimTransport::new();
    let (alert_tx, mut alert_rx) = mpsc::unbounded_channel();

    let mut monitor = LivenessMonitor::new(Duration::from_secs(20));
    monitor.start_session(transport.clone(), alert_tx);

    tokio::time::advance(Duration::from_secs(5)).await;
    monitor.on_agent_state_changed(AgentLivenessState::Listening);

    tokio::time::advance(Duration::from_secs(120)).await;
    assert!(alert_rx.try_recv().is_err());
    assert!(transport.send("still here").await.is_ok());
}
