use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::warn;

use crate::context::AppContext;

/// `huddle watch`: print entries as they are appended until Ctrl-C.
pub fn execute(ctx: &AppContext) -> anyhow::Result<()> {
    let store = ctx.chat();
    let stop = Arc::new(AtomicBool::new(false));
    let flag = stop.clone();
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))?;

    eprintln!("Watching {} (Ctrl-C to stop)", store.path().display());
    let follow = store.follow(ctx.config.poll_interval())?.with_stop(stop);
    stream(follow, &mut std::io::stdout().lock())
}

/// Copy followed entries to `out` until the follow ends.
pub fn stream(
    follow: impl Iterator<Item = huddle_core::Result<huddle_core::LogEntry>>,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    for entry in follow {
        match entry {
            Ok(entry) => {
                writeln!(out, "{entry}")?;
                out.flush()?;
            }
            Err(e) => warn!(error = %e, "reading chat log"),
        }
    }
    Ok(())
}
