//! Task tags embedded in log bodies: `[TASK:<id>]`, `[CLAIM:<id>]`, `[DONE:<id>]`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

static TASK_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[TASK:(\d+)\]\s*(.*)").expect("task tag pattern"));

/// Ids are drawn from the low digits of the epoch clock.
const TASK_ID_MODULUS: u64 = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Task,
    Claim,
    Done,
}

impl TagKind {
    fn label(self) -> &'static str {
        match self {
            TagKind::Task => "TASK",
            TagKind::Claim => "CLAIM",
            TagKind::Done => "DONE",
        }
    }
}

/// Derived task status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Open,
    Claimed,
    Done,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            TaskStatus::Open => "open",
            TaskStatus::Claimed => "claimed",
            TaskStatus::Done => "done",
        })
    }
}

/// A task as projected from the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub description: String,
    pub status: TaskStatus,
}

/// Render a tag, e.g. `[CLAIM:42]`.
pub fn format_tag(kind: TagKind, id: &str) -> String {
    format!("[{}:{id}]", kind.label())
}

/// Whether `body` carries the given tag for `id`.
pub fn has_tag(body: &str, kind: TagKind, id: &str) -> bool {
    body.contains(&format_tag(kind, id))
}

/// Extract `(id, description)` from a body carrying a `[TASK:<id>]` tag.
pub fn parse_task(body: &str) -> Option<(String, String)> {
    let caps = TASK_TAG.captures(body)?;
    let id = caps.get(1)?.as_str().to_string();
    let description = caps.get(2).map(|m| m.as_str().trim()).unwrap_or_default();
    Some((id, description.to_string()))
}

/// Check a user-supplied task id.
pub fn validate_task_id(id: &str) -> Result<&str> {
    let id = id.trim();
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::InvalidTaskId(id.to_string()));
    }
    Ok(id)
}

/// Task id for a given epoch second.
pub fn task_id_for(epoch_secs: u64) -> String {
    (epoch_secs % TASK_ID_MODULUS).to_string()
}
