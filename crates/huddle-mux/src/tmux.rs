//! The [`Multiplexer`] seam and its tmux implementation.
//!
//! Argument vectors are built by the free `*_args` functions so they can be
//! checked without a tmux server.

use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use tracing::debug;

use crate::error::{MuxError, Result};
use crate::pane::{Pane, PaneRef, PANE_FORMAT};

/// Set by tmux inside a client; attaching from there must switch instead.
pub const ENV_TMUX: &str = "TMUX";

/// Set by tmux to the pane a process runs in.
pub const ENV_TMUX_PANE: &str = "TMUX_PANE";

/// Environment handed to a new pane as `KEY=VALUE` pairs.
pub type PaneEnv = [(String, String)];

/// Operations huddle needs from a terminal multiplexer.
pub trait Multiplexer {
    fn has_session(&self, session: &str) -> Result<bool>;

    /// Start a detached session. Returns the id of its first pane.
    fn create_session(
        &self,
        session: &str,
        window: &str,
        command: Option<&str>,
        env: &PaneEnv,
    ) -> Result<String>;

    /// Split the session's current window. Returns the new pane id.
    fn split_pane(&self, session: &str, command: Option<&str>, env: &PaneEnv) -> Result<String>;

    /// Re-arrange the session's current window into a grid.
    fn tile(&self, session: &str) -> Result<()>;

    fn list_sessions(&self) -> Result<Vec<String>>;

    fn list_panes(&self, session: &str) -> Result<Vec<Pane>>;

    /// Type `text` literally into `target`, then press Enter if asked.
    fn send_keys(&self, target: &str, text: &str, enter: bool) -> Result<()>;

    /// Last `lines` lines of the pane's visible history.
    fn capture(&self, target: &str, lines: usize) -> Result<String>;

    fn select_pane(&self, target: &str) -> Result<()>;

    fn set_pane_title(&self, target: &str, title: &str) -> Result<()>;

    fn kill_pane(&self, target: &str) -> Result<()>;

    fn kill_session(&self, session: &str) -> Result<()>;

    /// Hand the terminal over to the session.
    fn attach(&self, session: &str) -> Result<()>;

    /// Fail with [`MuxError::NoSession`] unless `session` is running.
    fn require_session(&self, session: &str) -> Result<()> {
        if self.has_session(session)? {
            Ok(())
        } else {
            Err(MuxError::NoSession(session.to_string()))
        }
    }

    /// Look up a pane of a running session.
    fn find_pane(&self, session: &str, pane: &PaneRef) -> Result<Pane> {
        self.require_session(session)?;
        let panes = self.list_panes(session)?;
        pane.resolve(&panes)
            .cloned()
            .ok_or_else(|| MuxError::PaneNotFound(pane.to_string()))
    }
}

/// [`Multiplexer`] that shells out to the `tmux` binary.
#[derive(Debug, Clone)]
pub struct Tmux {
    bin: PathBuf,
}

impl Default for Tmux {
    fn default() -> Self {
        Self {
            bin: PathBuf::from("tmux"),
        }
    }
}

impl Tmux {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bin(bin: impl Into<PathBuf>) -> Self {
        Self { bin: bin.into() }
    }

    fn output(&self, args: &[String]) -> Result<Output> {
        debug!(bin = %self.bin.display(), args = ?args, "running tmux");
        Command::new(&self.bin)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(spawn_error)
    }

    /// Run and return stdout, failing on a non-zero exit.
    fn run(&self, args: Vec<String>) -> Result<String> {
        let output = self.output(&args)?;
        if !output.status.success() {
            return Err(MuxError::Command {
                args: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn spawn_error(e: std::io::Error) -> MuxError {
    if e.kind() == std::io::ErrorKind::NotFound {
        MuxError::NotInstalled
    } else {
        MuxError::Io(e)
    }
}

impl Multiplexer for Tmux {
    fn has_session(&self, session: &str) -> Result<bool> {
        Ok(self.output(&has_session_args(session))?.status.success())
    }

    fn create_session(
        &self,
        session: &str,
        window: &str,
        command: Option<&str>,
        env: &PaneEnv,
    ) -> Result<String> {
        let out = self.run(new_session_args(session, window, command, env))?;
        Ok(out.trim().to_string())
    }

    fn split_pane(&self, session: &str, command: Option<&str>, env: &PaneEnv) -> Result<String> {
        let out = self.run(split_window_args(session, command, env))?;
        Ok(out.trim().to_string())
    }

    fn tile(&self, session: &str) -> Result<()> {
        self.run(strings(&["select-layout", "-t", session, "tiled"]))?;
        Ok(())
    }

    fn list_sessions(&self) -> Result<Vec<String>> {
        // With no server running tmux exits non-zero; that just means none.
        let output = self.output(&strings(&["list-sessions", "-F", "#{session_name}"]))?;
        if !output.status.success() {
            return Ok(Vec::new());
        }
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn list_panes(&self, session: &str) -> Result<Vec<Pane>> {
        let out = self.run(list_panes_args(session))?;
        Ok(out.lines().filter_map(Pane::parse).collect())
    }

    fn send_keys(&self, target: &str, text: &str, enter: bool) -> Result<()> {
        for args in send_keys_args(target, text, enter) {
            self.run(args)?;
        }
        Ok(())
    }

    fn capture(&self, target: &str, lines: usize) -> Result<String> {
        self.run(capture_args(target, lines))
    }

    fn select_pane(&self, target: &str) -> Result<()> {
        self.run(strings(&["select-pane", "-t", target]))?;
        Ok(())
    }

    fn set_pane_title(&self, target: &str, title: &str) -> Result<()> {
        self.run(strings(&["select-pane", "-t", target, "-T", title]))?;
        Ok(())
    }

    fn kill_pane(&self, target: &str) -> Result<()> {
        self.run(strings(&["kill-pane", "-t", target]))?;
        Ok(())
    }

    fn kill_session(&self, session: &str) -> Result<()> {
        self.run(strings(&["kill-session", "-t", &exact(session)]))?;
        Ok(())
    }

    fn attach(&self, session: &str) -> Result<()> {
        let inside = std::env::var_os(ENV_TMUX).is_some_and(|v| !v.is_empty());
        let args = attach_args(session, inside);
        debug!(args = ?args, "attaching");
        // Inherit the terminal: the user interacts with tmux directly.
        let status = Command::new(&self.bin)
            .args(&args)
            .status()
            .map_err(spawn_error)?;
        if !status.success() {
            return Err(MuxError::Command {
                args: args.join(" "),
                stderr: format!("exited with {status}"),
            });
        }
        Ok(())
    }
}

// ── argument builders ──

fn strings(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

/// `=name` makes tmux match the session name exactly instead of by prefix.
fn exact(session: &str) -> String {
    format!("={session}")
}

fn push_env(args: &mut Vec<String>, env: &PaneEnv) {
    for (key, value) in env {
        args.push("-e".into());
        args.push(format!("{key}={value}"));
    }
}

pub fn has_session_args(session: &str) -> Vec<String> {
    strings(&["has-session", "-t", &exact(session)])
}

pub fn new_session_args(
    session: &str,
    window: &str,
    command: Option<&str>,
    env: &PaneEnv,
) -> Vec<String> {
    let mut args = strings(&[
        "new-session", "-d", "-s", session, "-n", window, "-P", "-F", "#{pane_id}",
    ]);
    push_env(&mut args, env);
    args.extend(command.map(str::to_string));
    args
}

pub fn split_window_args(session: &str, command: Option<&str>, env: &PaneEnv) -> Vec<String> {
    let mut args = strings(&["split-window", "-t", session, "-P", "-F", "#{pane_id}"]);
    push_env(&mut args, env);
    args.extend(command.map(str::to_string));
    args
}

pub fn list_panes_args(session: &str) -> Vec<String> {
    strings(&["list-panes", "-s", "-t", session, "-F", PANE_FORMAT])
}

/// Text goes in with `-l` so words like `Enter` are typed, not interpreted.
pub fn send_keys_args(target: &str, text: &str, enter: bool) -> Vec<Vec<String>> {
    let mut calls = vec![strings(&["send-keys", "-t", target, "-l", text])];
    if enter {
        calls.push(strings(&["send-keys", "-t", target, "Enter"]));
    }
    calls
}

pub fn capture_args(target: &str, lines: usize) -> Vec<String> {
    let start = format!("-{lines}");
    strings(&["capture-pane", "-p", "-t", target, "-S", &start])
}

pub fn attach_args(session: &str, inside_tmux: bool) -> Vec<String> {
    let verb = if inside_tmux { "switch-client" } else { "attach-session" };
    strings(&[verb, "-t", session])
}
