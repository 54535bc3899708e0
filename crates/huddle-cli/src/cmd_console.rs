use huddle_mux::Multiplexer;

use crate::context::AppContext;

/// Open the chat console.
///
/// With the `tui` feature (default): the interactive ratatui console.
/// Without: a plain stream of new entries, as `watch` prints them.
pub fn execute(ctx: &AppContext, mux: &dyn Multiplexer, no_kill: bool) -> anyhow::Result<()> {
    #[cfg(feature = "tui")]
    {
        crate::tui::run(ctx, mux, no_kill)
    }

    #[cfg(not(feature = "tui"))]
    {
        let _ = (mux, no_kill);
        eprintln!("huddle chat (plain mode; rebuild with the `tui` feature for the console)");
        crate::cmd_watch::execute(ctx)
    }
}
