//! In-process [`Multiplexer`] for handler tests.

use std::cell::RefCell;

use huddle_mux::{Multiplexer, MuxError, Pane};

#[derive(Default)]
pub struct FakeMux {
    pub sessions: Vec<String>,
    pub panes: Vec<Pane>,
    pub captured: String,
    pub calls: RefCell<Vec<String>>,
}

impl FakeMux {
    /// One running session `s` with a pane per title, ids `%1..`.
    pub fn with_panes(session: &str, titles: &[&str]) -> Self {
        let panes = titles
            .iter()
            .enumerate()
            .map(|(i, title)| Pane {
                id: format!("%{}", i + 1),
                index: i,
                title: title.to_string(),
                command: "claude".into(),
            })
            .collect();
        Self {
            sessions: vec![session.to_string()],
            panes,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn log(&self, call: String) -> huddle_mux::Result<()> {
        self.calls.borrow_mut().push(call);
        Ok(())
    }
}

impl Multiplexer for FakeMux {
    fn has_session(&self, session: &str) -> huddle_mux::Result<bool> {
        Ok(self.sessions.iter().any(|s| s == session))
    }

    fn create_session(
        &self,
        session: &str,
        window: &str,
        _command: Option<&str>,
        _env: &[(String, String)],
    ) -> huddle_mux::Result<String> {
        self.log(format!("create {session} {window}"))?;
        Ok("%1".into())
    }

    fn split_pane(
        &self,
        session: &str,
        _command: Option<&str>,
        _env: &[(String, String)],
    ) -> huddle_mux::Result<String> {
        self.log(format!("split {session}"))?;
        Ok("%2".into())
    }

    fn tile(&self, session: &str) -> huddle_mux::Result<()> {
        self.log(format!("tile {session}"))
    }

    fn list_sessions(&self) -> huddle_mux::Result<Vec<String>> {
        Ok(self.sessions.clone())
    }

    fn list_panes(&self, session: &str) -> huddle_mux::Result<Vec<Pane>> {
        if !self.sessions.iter().any(|s| s == session) {
            return Err(MuxError::NoSession(session.to_string()));
        }
        Ok(self.panes.clone())
    }

    fn send_keys(&self, target: &str, text: &str, enter: bool) -> huddle_mux::Result<()> {
        self.log(format!("send {target} {text} enter={enter}"))
    }

    fn capture(&self, target: &str, lines: usize) -> huddle_mux::Result<String> {
        self.log(format!("capture {target} {lines}"))?;
        Ok(self.captured.clone())
    }

    fn select_pane(&self, target: &str) -> huddle_mux::Result<()> {
        self.log(format!("select {target}"))
    }

    fn set_pane_title(&self, target: &str, title: &str) -> huddle_mux::Result<()> {
        self.log(format!("title {target} {title}"))
    }

    fn kill_pane(&self, target: &str) -> huddle_mux::Result<()> {
        self.log(format!("kill-pane {target}"))
    }

    fn kill_session(&self, session: &str) -> huddle_mux::Result<()> {
        self.log(format!("kill-session {session}"))
    }

    fn attach(&self, session: &str) -> huddle_mux::Result<()> {
        self.log(format!("attach {session}"))
    }
}
