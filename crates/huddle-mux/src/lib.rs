//! Terminal multiplexer control: sessions, panes, and agent launch.

pub mod error;
pub mod launch;
pub mod pane;
pub mod tmux;

pub use error::{MuxError, Result};
pub use launch::{launch, LaunchPlan, DEFAULT_AGENT_PROMPT, MAIN_WINDOW};
pub use pane::{agent_title, Pane, PaneRef};
pub use tmux::{Multiplexer, Tmux, ENV_TMUX_PANE};
