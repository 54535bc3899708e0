//! Spawning a session of agent panes.

use std::borrow::Cow;
use std::path::PathBuf;

use huddle_core::identity::{ENV_CHAT_LOG, ENV_PANE_ID, ENV_USER};
use tracing::{debug, info};

use crate::error::{MuxError, Result};
use crate::pane::agent_title;
use crate::tmux::Multiplexer;

/// Prompt given to agents when `start` is run without one.
pub const DEFAULT_AGENT_PROMPT: &str = "Invoke the multi-agent skill and await instructions in chat.";

/// Name of the window holding the agent panes.
pub const MAIN_WINDOW: &str = "main";

/// Everything needed to bring up `count` agents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub session: String,
    pub count: usize,
    /// User-supplied prompt; `None` means agents wait for instructions.
    pub prompt: Option<String>,
    pub agent_command: String,
    pub chat_log: PathBuf,
}

impl LaunchPlan {
    pub fn new(
        session: impl Into<String>,
        count: usize,
        prompt: Option<String>,
        agent_command: impl Into<String>,
        chat_log: impl Into<PathBuf>,
    ) -> Result<Self> {
        if count == 0 {
            return Err(MuxError::InvalidAgentCount(count));
        }
        Ok(Self {
            session: session.into(),
            count,
            prompt: prompt.filter(|p| !p.trim().is_empty()),
            agent_command: agent_command.into(),
            chat_log: chat_log.into(),
        })
    }

    /// Environment for agent `n` (1-based).
    pub fn agent_env(&self, n: usize) -> Vec<(String, String)> {
        vec![
            (ENV_USER.to_string(), agent_title(n)),
            (ENV_PANE_ID.to_string(), n.to_string()),
            (
                ENV_CHAT_LOG.to_string(),
                self.chat_log.display().to_string(),
            ),
        ]
    }

    /// Shell command run in every agent pane.
    pub fn agent_command_line(&self) -> String {
        let prompt = self.prompt.as_deref().unwrap_or(DEFAULT_AGENT_PROMPT);
        format!(
            "{} {}",
            self.agent_command,
            shell_escape::escape(Cow::Borrowed(prompt))
        )
    }

    /// System notice posted to the chat log when the agents come up.
    pub fn announcement(&self) -> String {
        match &self.prompt {
            Some(p) => format!("Starting {} agents with prompt: {p}", self.count),
            None => format!("Starting {} agents (awaiting instructions)", self.count),
        }
    }
}

/// Replace any session of the same name with a fresh one running the plan.
///
/// Returns the pane ids in agent order.
pub fn launch(mux: &dyn Multiplexer, plan: &LaunchPlan) -> Result<Vec<String>> {
    if mux.has_session(&plan.session)? {
        info!(session = %plan.session, "replacing existing session");
        mux.kill_session(&plan.session)?;
    }

    let command = plan.agent_command_line();
    let mut panes = Vec::with_capacity(plan.count);
    for n in 1..=plan.count {
        let env = plan.agent_env(n);
        let pane = if n == 1 {
            mux.create_session(&plan.session, MAIN_WINDOW, Some(&command), &env)?
        } else {
            let pane = mux.split_pane(&plan.session, Some(&command), &env)?;
            mux.tile(&plan.session)?;
            pane
        };
        mux.set_pane_title(&pane, &agent_title(n))?;
        debug!(agent = n, pane = %pane, "agent pane ready");
        panes.push(pane);
    }
    Ok(panes)
}
