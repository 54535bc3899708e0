use std::fmt;

use serde::{Deserialize, Serialize};

use crate::clock::now_hms;

/// Author reserved for notices written by huddle itself.
pub const SYSTEM_AUTHOR: &str = "system";

/// Default author of the interactive chat console.
pub const HUMAN_AUTHOR: &str = "human";

/// One line of the chat log: `[HH:MM:SS] [author] body`.
///
/// `body` never contains a line break; constructors flatten them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub author: String,
    pub body: String,
}

impl LogEntry {
    pub fn new(
        timestamp: impl Into<String>,
        author: impl Into<String>,
        body: impl AsRef<str>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            author: author.into(),
            body: single_line(body.as_ref()),
        }
    }

    /// Stamp an entry with the current local time.
    pub fn now(author: impl Into<String>, body: impl AsRef<str>) -> Self {
        Self::new(now_hms(), author, body)
    }

    /// A notice from the reserved `system` author.
    pub fn system(body: impl AsRef<str>) -> Self {
        Self::now(SYSTEM_AUTHOR, body)
    }

    pub fn is_system(&self) -> bool {
        self.author == SYSTEM_AUTHOR
    }

    /// Blank entries are never written to the log.
    pub fn is_blank(&self) -> bool {
        self.body.trim().is_empty()
    }

    /// Serialized form, without the trailing newline.
    pub fn to_line(&self) -> String {
        format!("[{}] [{}] {}", self.timestamp, self.author, self.body)
    }

    /// Parse a log line. Returns `None` for lines not in the bracketed format.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        let rest = line.strip_prefix('[')?;
        let ts_end = rest.find(']')?;
        let timestamp = &rest[..ts_end];
        let rest = rest[ts_end + 1..].strip_prefix(" [")?;
        let author_end = rest.find(']')?;
        let author = &rest[..author_end];
        let body = rest[author_end + 1..].strip_prefix(' ')?;
        if timestamp.is_empty() || author.is_empty() {
            return None;
        }
        Some(Self {
            timestamp: timestamp.to_string(),
            author: author.to_string(),
            body: body.to_string(),
        })
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}

/// Replace line breaks with spaces so a body always stays on one log line.
pub fn single_line(body: &str) -> String {
    if !body.contains(['\n', '\r']) {
        return body.to_string();
    }
    body.replace("\r\n", " ").replace(['\n', '\r'], " ")
}
