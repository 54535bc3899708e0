//! Interactive chat console: transcript, status bar, input line.

mod app;
mod ui;

use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use huddle_core::{LogEntry, HUMAN_AUTHOR};
use huddle_mux::Multiplexer;
use huddle_store::{ChatStore, FileChatStore, Follow};
use tracing::{debug, info};

use crate::context::AppContext;
use app::{Action, App};

/// Lines of history loaded when the console opens.
const HISTORY_ON_OPEN: usize = 100;

pub fn run(ctx: &AppContext, mux: &dyn Multiplexer, no_kill: bool) -> anyhow::Result<()> {
    let user = if ctx.identity.has_override() {
        ctx.identity()
    } else {
        HUMAN_AUTHOR.to_string()
    };
    let store = ctx.chat();
    store.ensure_exists()?;

    let mut app = App::new(user, ctx.session().to_string());
    app.push_lines(store.tail_lines(HISTORY_ON_OPEN)?);
    app.push_lines([started_notice(no_kill)]);
    let interval = ctx.config.poll_interval();
    let mut follow = store.follow(interval)?;

    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut app, &store, &mut follow, interval);
    ratatui::restore();

    let kill_session = result?;
    if kill_session && !no_kill && mux.has_session(ctx.session())? {
        info!(session = %ctx.session(), "closing agent session");
        mux.kill_session(ctx.session())?;
    }
    Ok(())
}

/// Shown locally when the console opens; never written to the log.
fn started_notice(no_kill: bool) -> String {
    let exit = if no_kill {
        "Ctrl-D to exit, Ctrl-C to just exit"
    } else {
        "Ctrl-D to exit and kill session, Ctrl-C to just exit"
    };
    LogEntry::system(format!("Chat UI started. {exit}")).to_line()
}

/// Returns whether the user asked to kill the session on the way out.
fn event_loop(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    store: &FileChatStore,
    follow: &mut Follow,
    interval: Duration,
) -> anyhow::Result<bool> {
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(interval)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match app.handle_key(key) {
                        Action::None => {}
                        Action::Send(body) => {
                            let entry = LogEntry::now(app.user.as_str(), body);
                            app.error = store.append(&entry).err().map(|e| e.to_string());
                        }
                        Action::Redraw => terminal.clear()?,
                        Action::Quit { kill_session } => return Ok(kill_session),
                    }
                }
            }
        }

        match follow.poll_lines() {
            Ok(lines) if !lines.is_empty() => {
                debug!(count = lines.len(), "new chat lines");
                app.push_lines(lines);
            }
            Ok(_) => {}
            Err(e) => app.error = Some(e.to_string()),
        }
    }
}
