//! Message source adapter — chat + transcription behind one surface.
//!
//! Owns the canonical timeline. Raw transport events are applied as they
//! arrive from each source; cross-source ordering comes from the timeline's
//! creation-time sort, not arrival order. `send` is ack-gated: the local
//! chat entry appears only after the transport acknowledges, never as an
//! optimistic echo.

use std::sync::Arc;

use tracing::debug;

use crate::transport::{Transport, TransportError, TransportEvent};

use super::timeline::{EntryKind, EntryOrigin, Timeline, TimelineEntry};

/// Coerce a raw payload body to a display string. The wire does not
/// promise strings; anything else degrades silently instead of failing
/// the render.
pub fn coerce_body(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Pull-based view over the merged message sources, plus send.
pub struct MessageSource {
    transport: Arc<dyn Transport>,
    timeline: Timeline,
}

impl MessageSource {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            timeline: Timeline::new(),
        }
    }

    /// Apply one raw transport event to the timeline. Agent state changes
    /// are not message content and pass through untouched.
    ///
    /// Returns true when the timeline visibly changed.
    pub fn apply(&mut self, event: &TransportEvent) -> bool {
        match event {
            TransportEvent::Chat {
                id,
                from_local,
                body,
                timestamp_ms,
            } => self.timeline.upsert(
                id,
                origin_of(*from_local),
                EntryKind::Chat,
                coerce_body(body),
                *timestamp_ms,
            ),
            TransportEvent::Transcription {
                id,
                from_local,
                body,
                timestamp_ms,
                is_final,
            } => {
                let changed = self.timeline.upsert(
                    id,
                    origin_of(*from_local),
                    EntryKind::Transcription,
                    coerce_body(body),
                    *timestamp_ms,
                );
                if *is_final {
                    self.timeline.finalize(id);
                }
                changed
            }
            TransportEvent::AgentState(_) => false,
        }
    }

    /// The merged, ordered, id-unique sequence. Recomputed on every call.
    pub fn messages(&self) -> Vec<&TimelineEntry> {
        self.timeline.ordered()
    }

    pub fn len(&self) -> usize {
        self.timeline.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timeline.is_empty()
    }

    /// Change signal for downstream observers.
    pub fn fingerprint(&self) -> u64 {
        self.timeline.fingerprint()
    }

    /// Send a chat message. On acknowledgment, append the local entry with
    /// the transport-assigned id and ordering timestamp. A rejected send
    /// leaves the timeline untouched; the error is the caller's to handle.
    pub async fn send(&mut self, text: &str) -> Result<(), TransportError> {
        let ack = self.transport.send(text).await?;
        debug!(id = %ack.id, "chat send acknowledged");
        self.timeline.upsert(
            &ack.id,
            EntryOrigin::Local,
            EntryKind::Chat,
            text.to_string(),
            ack.timestamp_ms,
        );
        Ok(())
    }
}

fn origin_of(from_local: bool) -> EntryOrigin {
    if from_local {
        EntryOrigin::Local
    } else {
        EntryOrigin::Remote
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::sim::SimTransport;
    use serde_json::json;

    fn transcription(id: &str, body: serde_json::Value, ts: i64) -> TransportEvent {
        TransportEvent::Transcription {
            id: id.into(),
            from_local: false,
            body,
            timestamp_ms: ts,
            is_final: false,
        }
    }

    #[test]
    fn coerces_non_string_payloads() {
        assert_eq!(coerce_body(&json!("plain")), "plain");
        assert_eq!(coerce_body(&json!(null)), "");
        assert_eq!(coerce_body(&json!(42)), "42");
        assert_eq!(coerce_body(&json!({"a": 1})), "{\"a\":1}");
    }

    #[tokio::test]
    async fn send_appends_acknowledged_entry() {
        let transport = SimTransport::new();
        let mut source = MessageSource::new(transport);
        assert!(source.is_empty());

        source.send("hello").await.unwrap();
        let messages = source.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].body, "hello");
        assert_eq!(messages[0].origin, EntryOrigin::Local);
        assert_eq!(messages[0].kind, EntryKind::Chat);
    }

    #[tokio::test]
    async fn rejected_send_leaves_timeline_untouched() {
        let transport = SimTransport::new();
        transport.disconnect().await;
        let mut source = MessageSource::new(transport);

        let err = source.send("hello").await.unwrap_err();
        assert!(matches!(err, TransportError::NotConnected));
        assert!(source.is_empty());
    }

    #[tokio::test]
    async fn streaming_transcription_updates_in_place() {
        let transport = SimTransport::new();
        let mut source = MessageSource::new(transport);

        assert!(source.apply(&transcription("t1", json!("h"), 100)));
        assert!(source.apply(&transcription("t1", json!("hello"), 120)));
        // Identical body: no visible change.
        assert!(!source.apply(&transcription("t1", json!("hello"), 130)));

        let messages = source.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].body, "hello");
        assert_eq!(messages[0].edited_at_ms, Some(120));
    }

    #[tokio::test]
    async fn agent_state_events_do_not_touch_the_timeline() {
        let transport = SimTransport::new();
        let mut source = MessageSource::new(transport);
        let before = source.fingerprint();
        assert!(!source.apply(&TransportEvent::AgentState(
            crate::transport::AgentLivenessState::Listening
        )));
        assert_eq!(before, source.fingerprint());
    }

    #[tokio::test]
    async fn malformed_body_degrades_to_text() {
        let transport = SimTransport::new();
        let mut source = MessageSource::new(transport);
        source.apply(&transcription("t1", json!({"words": ["a", "b"]}), 100));
        assert_eq!(source.messages()[0].body, "{\"words\":[\"a\",\"b\"]}");
    }
}
