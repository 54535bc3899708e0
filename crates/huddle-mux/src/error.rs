use thiserror::Error;

/// Errors from talking to the terminal multiplexer.
#[derive(Error, Debug)]
pub enum MuxError {
    /// The `tmux` binary could not be started.
    #[error("tmux is not installed or not on PATH")]
    NotInstalled,

    /// The session to act on is not running.
    #[error("no tmux session '{0}' found; use `huddle start` or `huddle session create` to create one")]
    NoSession(String),

    /// No pane matched the given reference.
    #[error("no pane matching '{0}'")]
    PaneNotFound(String),

    /// `start` needs at least one agent.
    #[error("need at least 1 agent (got {0})")]
    InvalidAgentCount(usize),

    /// tmux ran but reported failure.
    #[error("tmux {args} failed: {stderr}")]
    Command { args: String, stderr: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MuxError>;
