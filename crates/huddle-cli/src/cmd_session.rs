use std::io::Write;
use std::path::Path;

use clap::Subcommand;
use huddle_core::LogEntry;
use huddle_mux::{launch, LaunchPlan, Multiplexer, MAIN_WINDOW};
use huddle_store::ChatStore;

#[derive(Subcommand)]
pub enum SessionCmd {
    /// Create a detached tmux session
    Create {
        /// Session name (defaults to the configured session)
        name: Option<String>,
    },
    /// Attach to a running session
    Join {
        /// Session name (defaults to the configured session)
        name: Option<String>,
    },
    /// List running tmux sessions
    List,
}

pub fn run(
    cmd: SessionCmd,
    mux: &dyn Multiplexer,
    default_session: &str,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match cmd {
        SessionCmd::Create { name } => {
            let name = name.as_deref().unwrap_or(default_session);
            if mux.has_session(name)? {
                anyhow::bail!("session '{name}' already exists");
            }
            mux.create_session(name, MAIN_WINDOW, None, &[])?;
            writeln!(out, "Created session {name}")?;
        }
        SessionCmd::Join { name } => {
            let name = name.as_deref().unwrap_or(default_session);
            attach(mux, name)?;
        }
        SessionCmd::List => {
            let sessions = mux.list_sessions()?;
            if sessions.is_empty() {
                writeln!(out, "No tmux sessions.")?;
            }
            for name in sessions {
                let marker = if name == default_session { "*" } else { " " };
                writeln!(out, "{marker} {name}")?;
            }
        }
    }
    Ok(())
}

/// `huddle attach`
pub fn attach(mux: &dyn Multiplexer, session: &str) -> anyhow::Result<()> {
    mux.require_session(session)?;
    mux.attach(session)?;
    Ok(())
}

/// `huddle start <n> [prompt]`: bring up agents and announce them in the log.
pub fn start(
    mux: &dyn Multiplexer,
    store: &dyn ChatStore,
    input: StartInput<'_>,
    out: &mut dyn Write,
) -> anyhow::Result<Vec<String>> {
    let prompt = (!input.prompt.is_empty()).then(|| input.prompt.join(" "));
    let plan = LaunchPlan::new(
        input.session,
        input.count,
        prompt,
        input.agent_command,
        input.chat_log,
    )?;
    let panes = launch(mux, &plan)?;
    store.append(&LogEntry::system(plan.announcement()))?;
    writeln!(
        out,
        "Started {} agent(s) in session {}",
        panes.len(),
        plan.session
    )?;
    Ok(panes)
}

/// Arguments for [`start`].
pub struct StartInput<'a> {
    pub session: &'a str,
    pub count: usize,
    pub prompt: &'a [String],
    pub agent_command: &'a str,
    pub chat_log: &'a Path,
}
