use std::collections::BTreeMap;

use huddle_core::{LogEntry, Result};
use huddle_store::ChatStore;
use serde::Serialize;

/// What the log says about one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Participant {
    /// Timestamp of the participant's most recent entry.
    pub last_seen: String,
    pub message_count: usize,
}

/// Everyone who has written to the log, except `system`, keyed by identity.
pub fn list_participants(store: &dyn ChatStore) -> Result<BTreeMap<String, Participant>> {
    Ok(participants_from(&store.all()?))
}

/// Aggregate participants from already-parsed entries.
pub fn participants_from(entries: &[LogEntry]) -> BTreeMap<String, Participant> {
    let mut out: BTreeMap<String, Participant> = BTreeMap::new();
    for entry in entries.iter().filter(|e| !e.is_system()) {
        out.entry(entry.author.clone())
            .and_modify(|p| {
                p.last_seen = entry.timestamp.clone();
                p.message_count += 1;
            })
            .or_insert_with(|| Participant {
                last_seen: entry.timestamp.clone(),
                message_count: 1,
            });
    }
    out
}
