//! Timeline merge & de-duplication.
//!
//! One id-keyed map of entries plus an insertion-order list. Chat and
//! transcription fragments from either source upsert by id; the ordered
//! projection is a stable sort by creation time, so entries sharing a
//! timestamp keep their first-observed relative order and never jitter.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// Who produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOrigin {
    /// The human participant.
    Local,
    /// The remote agent.
    Remote,
}

/// Which source an entry came through. Used only for merge bookkeeping,
/// never for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Chat,
    Transcription,
}

/// One unit of conversational content.
#[derive(Debug, Clone)]
pub struct TimelineEntry {
    /// Stable unique id within the session.
    pub id: String,
    pub origin: EntryOrigin,
    /// Current text. Mutable while the entry is streaming, fixed once final.
    pub body: String,
    /// Milliseconds since the Unix epoch, set at first appearance.
    pub created_at_ms: i64,
    /// Set whenever `body` changes after creation. Presence is the
    /// "edited" flag.
    pub edited_at_ms: Option<i64>,
    pub kind: EntryKind,
    pub(crate) finalized: bool,
}

impl TimelineEntry {
    /// True once a transcription entry will receive no further updates.
    pub fn is_final(&self) -> bool {
        self.finalized
    }
}

/// Merged, id-unique, time-ordered sequence of entries.
#[derive(Debug, Default)]
pub struct Timeline {
    entries: HashMap<String, TimelineEntry>,
    /// Ids in first-observed order — the tie-break for equal timestamps.
    order: Vec<String>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or update the entry with this id. An update to an unseen id
    /// is a fresh insert, not an error — sources may race. Updating an
    /// existing entry's body sets the edited timestamp only when the
    /// content actually differs, and never moves the entry (the sort key
    /// is creation time, which is fixed at insert).
    ///
    /// Returns true when the timeline visibly changed.
    pub fn upsert(
        &mut self,
        id: &str,
        origin: EntryOrigin,
        kind: EntryKind,
        body: String,
        timestamp_ms: i64,
    ) -> bool {
        match self.entries.get_mut(id) {
            Some(existing) => {
                if existing.body == body {
                    return false;
                }
                existing.body = body;
                existing.edited_at_ms = Some(timestamp_ms);
                true
            }
            None => {
                self.order.push(id.to_string());
                self.entries.insert(
                    id.to_string(),
                    TimelineEntry {
                        id: id.to_string(),
                        origin,
                        body,
                        created_at_ms: timestamp_ms,
                        edited_at_ms: None,
                        kind,
                        finalized: false,
                    },
                );
                true
            }
        }
    }

    /// Mark an entry as finalized (no further body updates expected).
    /// Unknown ids are ignored.
    pub fn finalize(&mut self, id: &str) {
        if let Some(entry) = self.entries.get_mut(id) {
            entry.finalized = true;
        }
    }

    /// The ordered projection: every entry, exactly once, sorted by
    /// creation time ascending. Stable over insertion order, recomputable
    /// on every call — this is a restartable view, not a one-shot cursor.
    pub fn ordered(&self) -> Vec<&TimelineEntry> {
        let mut view: Vec<&TimelineEntry> = self
            .order
            .iter()
            .filter_map(|id| self.entries.get(id))
            .collect();
        view.sort_by_key(|e| e.created_at_ms);
        view
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Change signal for the scroll synchronizer: entry count folded with
    /// a hash of every entry's id and current body. Any insert or body
    /// mutation produces a different value.
    pub fn fingerprint(&self) -> u64 {
        let mut h = DefaultHasher::new();
        self.order.len().hash(&mut h);
        for entry in self.ordered() {
            entry.id.hash(&mut h);
            entry.body.hash(&mut h);
        }
        h.finish()
    }
}
