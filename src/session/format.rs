//! Entry presentation formatter.
//!
//! Pure derivation of per-entry view data: display name, local/remote
//! origin, wall-clock time at two precisions, edited marker. No side
//! effects, nothing here touches the timeline.

use chrono::{Local, TimeZone};

use super::timeline::{EntryOrigin, TimelineEntry};

/// Display options for one entry. Name suppression is useful for runs of
/// consecutive entries from the same side.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    pub hide_name: bool,
    pub hide_timestamp: bool,
}

/// Derived view data for one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryView {
    /// "You" for local entries, the agent display name for remote ones.
    /// None when suppressed by the caller.
    pub name: Option<String>,
    /// Hour:minute, for inline display. None when suppressed.
    pub time_short: Option<String>,
    /// Full precision with offset, for the long-form description.
    pub time_full: String,
    /// True when the body changed after creation — rendered as a leading
    /// `*` marker.
    pub edited: bool,
    pub local: bool,
    pub body: String,
}

/// Derive view data for one entry against the local timezone.
pub fn present(entry: &TimelineEntry, agent_name: &str, opts: FormatOptions) -> EntryView {
    let local = entry.origin == EntryOrigin::Local;
    let name = if opts.hide_name {
        None
    } else if local {
        Some("You".to_string())
    } else {
        Some(agent_name.to_string())
    };

    // Out-of-range timestamps clamp to the epoch instead of failing the
    // render; the transport is not trusted to stamp sanely.
    let when = Local
        .timestamp_millis_opt(entry.created_at_ms)
        .single()
        .unwrap_or_else(|| Local.timestamp_millis_opt(0).single().unwrap_or_default());

    EntryView {
        name,
        time_short: if opts.hide_timestamp {
            None
        } else {
            Some(when.format("%H:%M").to_string())
        },
        time_full: when.format("%H:%M:%S %:z").to_string(),
        edited: entry.edited_at_ms.is_some(),
        local,
        body: entry.body.clone(),
    }
}
