//! Tasks projected from `[TASK:<id>]`, `[CLAIM:<id>]` and `[DONE:<id>]` tags.
//!
//! Status is existence-based: a `DONE` tag anywhere in the log marks the
//! task done, even if it appears before the `TASK` or `CLAIM` entry.
//!
//! Ids wrap every 100000 seconds, so one id can name several `TASK` entries.
//! Each entry is listed; they share whatever status tags carry that id.

use huddle_core::clock::epoch_secs;
use huddle_core::tags::{self, format_tag, has_tag, validate_task_id, TagKind};
use huddle_core::{Error, LogEntry, Result, Task, TaskStatus};
use huddle_store::ChatStore;
use tracing::debug;

/// One task per `TASK` entry, in log order.
pub fn list_tasks(store: &dyn ChatStore) -> Result<Vec<Task>> {
    Ok(project_tasks(&store.all()?))
}

/// Project tasks from already-parsed entries.
pub fn project_tasks(entries: &[LogEntry]) -> Vec<Task> {
    entries
        .iter()
        .filter_map(|entry| tags::parse_task(&entry.body))
        .map(|(id, description)| Task {
            status: status_of(entries, &id),
            id,
            description,
        })
        .collect()
}

fn status_of(entries: &[LogEntry], id: &str) -> TaskStatus {
    if entries.iter().any(|e| has_tag(&e.body, TagKind::Done, id)) {
        TaskStatus::Done
    } else if entries.iter().any(|e| has_tag(&e.body, TagKind::Claim, id)) {
        TaskStatus::Claimed
    } else {
        TaskStatus::Open
    }
}

/// Post a new task. The id comes from the low digits of the epoch clock.
pub fn add_task(store: &dyn ChatStore, author: &str, description: &str) -> Result<String> {
    add_task_at(store, author, description, epoch_secs())
}

/// Post a new task with an id derived from `epoch_secs`.
pub fn add_task_at(
    store: &dyn ChatStore,
    author: &str,
    description: &str,
    epoch_secs: u64,
) -> Result<String> {
    let description = description.trim();
    if description.is_empty() {
        return Err(Error::EmptyBody);
    }
    let id = tags::task_id_for(epoch_secs);
    let body = format!("{} {description}", format_tag(TagKind::Task, &id));
    store.append(&LogEntry::now(author, body))?;
    debug!(task = %id, "posted task");
    Ok(id)
}

/// Announce that `author` is taking task `id`.
pub fn claim_task(store: &dyn ChatStore, author: &str, id: &str, note: Option<&str>) -> Result<()> {
    tag_task(store, author, TagKind::Claim, id, note, "claimed")
}

/// Announce that task `id` is finished.
pub fn complete_task(
    store: &dyn ChatStore,
    author: &str,
    id: &str,
    note: Option<&str>,
) -> Result<()> {
    tag_task(store, author, TagKind::Done, id, note, "done")
}

fn tag_task(
    store: &dyn ChatStore,
    author: &str,
    kind: TagKind,
    id: &str,
    note: Option<&str>,
    fallback: &str,
) -> Result<()> {
    let id = validate_task_id(id)?;
    let note = note.map(str::trim).filter(|n| !n.is_empty()).unwrap_or(fallback);
    let body = format!("{} {note}", format_tag(kind, id));
    store.append(&LogEntry::now(author, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use huddle_store::MemoryChatStore;

    fn find<'a>(tasks: &'a [Task], id: &str) -> &'a Task {
        tasks.iter().find(|t| t.id == id).expect("task present")
    }

    #[test]
    fn add_claim_done_round_trip() {
        let store = MemoryChatStore::new();
        let id = add_task_at(&store, "agent1", "x", 1_760_700_042).unwrap();
        assert_eq!(id, "42");

        let tasks = list_tasks(&store).unwrap();
        assert_eq!(
            tasks,
            vec![Task {
                id: id.clone(),
                description: "x".into(),
                status: TaskStatus::Open
            }]
        );

        claim_task(&store, "agent2", &id, None).unwrap();
        assert_eq!(find(&list_tasks(&store).unwrap(), &id).status, TaskStatus::Claimed);

        complete_task(&store, "agent2", &id, Some("merged")).unwrap();
        assert_eq!(find(&list_tasks(&store).unwrap(), &id).status, TaskStatus::Done);
    }

    #[test]
    fn done_before_claim_still_counts_as_done() {
        let store = MemoryChatStore::with_lines([
            "[09:00:00] [agent2] [DONE:7] already handled",
            "[09:00:01] [agent1] [TASK:7] tidy imports",
            "[09:00:02] [agent3] [CLAIM:7] mine",
        ]);
        let tasks = list_tasks(&store).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].status, TaskStatus::Done);
        assert_eq!(tasks[0].description, "tidy imports");
    }

    #[test]
    fn tasks_listed_in_log_order() {
        let store = MemoryChatStore::with_lines([
            "[09:00:00] [agent1] [TASK:20] second id, first posted",
            "[09:00:01] [agent1] [TASK:10] first id, second posted",
            "[09:00:02] [agent2] [CLAIM:10] on it",
        ]);
        let tasks = list_tasks(&store).unwrap();
        let ids: Vec<_> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["20", "10"]);
        assert_eq!(tasks[0].description, "second id, first posted");
        assert_eq!(tasks[0].status, TaskStatus::Open);
        assert_eq!(tasks[1].status, TaskStatus::Claimed);
    }

    #[test]
    fn reused_id_still_lists_the_new_task() {
        let store = MemoryChatStore::new();
        let old = add_task_at(&store, "agent1", "old job", 1_760_600_042).unwrap();
        let new = add_task_at(&store, "agent2", "new job", 1_760_700_042).unwrap();
        assert_eq!(old, new);

        let tasks = list_tasks(&store).unwrap();
        let descriptions: Vec<_> = tasks.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descriptions, vec!["old job", "new job"]);
        assert!(tasks.iter().all(|t| t.id == "42" && t.status == TaskStatus::Open));
    }

    #[test]
    fn tag_entries_are_written_in_log_format() {
        let store = MemoryChatStore::new();
        claim_task(&store, "agent4", "99", Some("  ")).unwrap();
        complete_task(&store, "agent4", "99", None).unwrap();
        let entries = store.all().unwrap();
        assert_eq!(entries[0].body, "[CLAIM:99] claimed");
        assert_eq!(entries[1].body, "[DONE:99] done");
        assert_eq!(entries[1].author, "agent4");
    }

    #[test]
    fn bad_input_is_rejected() {
        let store = MemoryChatStore::new();
        assert!(matches!(
            add_task(&store, "agent1", "   "),
            Err(Error::EmptyBody)
        ));
        assert!(matches!(
            claim_task(&store, "agent1", "T-1", None),
            Err(Error::InvalidTaskId(_))
        ));
        assert!(store.read_lines().unwrap().is_empty());
    }

    #[test]
    fn task_serializes_with_lowercase_status() {
        let task = Task {
            id: "1".into(),
            description: "d".into(),
            status: TaskStatus::Claimed,
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["status"], "claimed");
    }
}
