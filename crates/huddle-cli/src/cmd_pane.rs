//! Commands that act on one pane of the agent session.

use std::io::Write;

use huddle_core::LogEntry;
use huddle_mux::{Multiplexer, PaneRef};
use huddle_store::ChatStore;
use tracing::debug;

/// Text typed into a pane by `ping`.
pub const PING_MESSAGE: &str = "New messages in the team chat. Run `huddle history` to catch up.";

/// `huddle ping [pane]`: nudge one pane, or every pane except `own_pane`.
pub fn ping(
    mux: &dyn Multiplexer,
    session: &str,
    pane: Option<&str>,
    own_pane: Option<&str>,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    if let Some(raw) = pane {
        let target = mux.find_pane(session, &PaneRef::parse(raw))?;
        mux.send_keys(&target.id, PING_MESSAGE, true)?;
        writeln!(out, "Pinged {raw}")?;
        return Ok(());
    }

    mux.require_session(session)?;
    let mut pinged = 0;
    for target in mux.list_panes(session)? {
        if own_pane == Some(target.id.as_str()) {
            debug!(pane = %target.id, "not pinging own pane");
            continue;
        }
        mux.send_keys(&target.id, PING_MESSAGE, true)?;
        pinged += 1;
    }
    writeln!(out, "Pinged {pinged} pane(s)")?;
    Ok(())
}

/// `huddle capture <pane> [lines]`
pub fn capture(
    mux: &dyn Multiplexer,
    session: &str,
    pane: &str,
    lines: usize,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let target = mux.find_pane(session, &PaneRef::parse(pane))?;
    let text = mux.capture(&target.id, lines)?;
    write!(out, "{}", text.trim_end_matches('\n'))?;
    writeln!(out)?;
    Ok(())
}

/// `huddle focus <pane>`
pub fn focus(mux: &dyn Multiplexer, session: &str, pane: &str) -> anyhow::Result<()> {
    let target = mux.find_pane(session, &PaneRef::parse(pane))?;
    mux.select_pane(&target.id)?;
    Ok(())
}

/// `huddle prompt <pane> <message...>`: type into the pane and leave a trace
/// in the chat log.
pub fn prompt(
    mux: &dyn Multiplexer,
    store: &dyn ChatStore,
    session: &str,
    author: &str,
    pane: &str,
    words: &[String],
) -> anyhow::Result<()> {
    let message = words.join(" ");
    if message.trim().is_empty() {
        anyhow::bail!("message is empty");
    }
    let target = mux.find_pane(session, &PaneRef::parse(pane))?;
    mux.send_keys(&target.id, &message, true)?;
    store.append(&LogEntry::now(author, format!("-> {pane}: {message}")))?;
    Ok(())
}

/// `huddle kill <pane>`
pub fn kill(
    mux: &dyn Multiplexer,
    session: &str,
    pane: &str,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let target = mux.find_pane(session, &PaneRef::parse(pane))?;
    mux.kill_pane(&target.id)?;
    writeln!(out, "Killed {pane} ({})", target.id)?;
    Ok(())
}
