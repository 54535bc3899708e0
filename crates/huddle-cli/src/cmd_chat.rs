use std::io::Write;

use huddle_board::list_participants;
use huddle_core::LogEntry;
use huddle_store::ChatStore;

/// `huddle send <body...>`
pub fn send(store: &dyn ChatStore, author: &str, words: &[String]) -> anyhow::Result<()> {
    let body = words.join(" ");
    if body.trim().is_empty() {
        anyhow::bail!("message is empty");
    }
    store.append(&LogEntry::now(author, body))?;
    Ok(())
}

/// `huddle history [n]`: raw lines, so malformed ones stay visible.
pub fn history(store: &dyn ChatStore, n: usize, out: &mut dyn Write) -> anyhow::Result<()> {
    for line in store.tail_lines(n)? {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// `huddle who`
pub fn who(store: &dyn ChatStore, out: &mut dyn Write) -> anyhow::Result<()> {
    let participants = list_participants(store)?;
    if participants.is_empty() {
        writeln!(out, "No participants yet.")?;
        return Ok(());
    }
    let width = participants.keys().map(String::len).max().unwrap_or(0);
    for (identity, p) in &participants {
        writeln!(
            out,
            "{identity:<width$}  {}  {} msgs",
            p.last_seen, p.message_count
        )?;
    }
    Ok(())
}

/// `huddle whoami`
pub fn whoami(identity: &str, out: &mut dyn Write) -> anyhow::Result<()> {
    writeln!(out, "{identity}")?;
    Ok(())
}

/// `huddle clear [--no-archive]`
pub fn clear(store: &dyn ChatStore, archive: bool, out: &mut dyn Write) -> anyhow::Result<()> {
    if let Some(backup) = store.clear(archive)? {
        writeln!(out, "Archived to {}", backup.display())?;
    }
    writeln!(out, "Chat log cleared.")?;
    Ok(())
}
