mod cmd_chat;
mod cmd_config;
mod cmd_console;
mod cmd_pane;
mod cmd_session;
mod cmd_status;
mod cmd_task;
mod cmd_watch;
mod context;
#[cfg(test)]
mod fake_mux;
mod logging;
#[cfg(feature = "tui")]
mod tui;

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use huddle_mux::{Tmux, ENV_TMUX_PANE};
use huddle_store::{HuddleConfig, HuddlePaths};

use cmd_config::ConfigCmd;
use cmd_session::{SessionCmd, StartInput};
use cmd_status::StatusCmd;
use cmd_task::TaskCmd;
use context::AppContext;

#[derive(Parser)]
#[command(
    name = "huddle",
    version,
    about = "Shared chat log, task board and file claims for coding agents"
)]
struct Cli {
    #[command(subcommand)]
    cmd: TopCommand,
}

/// `config` runs before the config file is loaded; everything else after.
#[derive(Subcommand)]
enum TopCommand {
    #[command(flatten)]
    Huddle(Command),
    /// Manage huddle configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCmd,
    },
}

#[derive(Subcommand)]
enum Command {
    /// Post a message to the chat log
    Send {
        /// Message text
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        body: Vec<String>,
    },
    /// Print the last lines of the chat log
    History {
        /// Number of lines (default: history_lines from config)
        n: Option<usize>,
    },
    /// Print new messages as they arrive (Ctrl-C to stop)
    Watch,
    /// List everyone who has posted, with last-seen time and message count
    Who,
    /// Print your identity
    Whoami,
    /// Advisory file claims
    Status {
        #[command(subcommand)]
        cmd: StatusCmd,
    },
    /// Task board kept in the chat log
    Task {
        #[command(subcommand)]
        cmd: TaskCmd,
    },
    /// Nudge a pane (or every other pane) to read the chat
    Ping {
        /// Pane: %id, agentN, N, or pane title
        pane: Option<String>,
    },
    /// Manage tmux sessions
    Session {
        #[command(subcommand)]
        cmd: SessionCmd,
    },
    /// Print the last lines shown in a pane
    Capture {
        /// Pane: %id, agentN, N, or pane title
        pane: String,
        /// Number of lines
        #[arg(default_value_t = 50)]
        lines: usize,
    },
    /// Select a pane
    Focus {
        /// Pane: %id, agentN, N, or pane title
        pane: String,
    },
    /// Type a message into a pane and press Enter
    Prompt {
        /// Pane: %id, agentN, N, or pane title
        pane: String,
        /// Message text
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        message: Vec<String>,
    },
    /// Kill a pane
    Kill {
        /// Pane: %id, agentN, N, or pane title
        pane: String,
    },
    /// Empty the chat log
    Clear {
        /// Do not keep a timestamped backup
        #[arg(long)]
        no_archive: bool,
    },
    /// Launch N agents in a fresh session and open the chat console
    Start {
        /// Number of agents
        count: usize,
        /// Initial prompt for every agent
        #[arg(trailing_var_arg = true)]
        prompt: Vec<String>,
    },
    /// Open the chat console
    Chat {
        /// Leave the agent session running on Ctrl-D
        #[arg(long)]
        no_kill: bool,
    },
    /// Attach to the agent session
    Attach,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    // Config commands must work even when the file does not parse.
    let command = match cli.cmd {
        TopCommand::Config { cmd } => {
            logging::init(&HuddleConfig::default().log_level);
            let paths = HuddlePaths::discover(&cwd);
            return cmd_config::run(cmd, &paths.config_json, &mut std::io::stdout().lock());
        }
        TopCommand::Huddle(command) => command,
    };

    let ctx = match AppContext::load(&cwd) {
        Ok(ctx) => ctx,
        Err(e) => {
            logging::init(&HuddleConfig::default().log_level);
            return Err(e);
        }
    };
    logging::init(&ctx.config.log_level);

    let mux = Tmux::new();
    let mut out = std::io::stdout().lock();

    match command {
        Command::Send { body } => cmd_chat::send(&ctx.chat(), &ctx.identity(), &body),
        Command::History { n } => {
            let n = n.unwrap_or(ctx.config.history_lines);
            cmd_chat::history(&ctx.chat(), n, &mut out)
        }
        Command::Watch => {
            drop(out);
            cmd_watch::execute(&ctx)
        }
        Command::Who => cmd_chat::who(&ctx.chat(), &mut out),
        Command::Whoami => cmd_chat::whoami(&ctx.identity(), &mut out),
        Command::Status { cmd } => cmd_status::run(cmd, &ctx.claims(), &ctx.identity(), &mut out),
        Command::Task { cmd } => cmd_task::run(cmd, &ctx.chat(), &ctx.identity(), &mut out),
        Command::Ping { pane } => {
            let own_pane = std::env::var(ENV_TMUX_PANE).ok();
            cmd_pane::ping(
                &mux,
                ctx.session(),
                pane.as_deref(),
                own_pane.as_deref(),
                &mut out,
            )
        }
        Command::Session { cmd } => cmd_session::run(cmd, &mux, ctx.session(), &mut out),
        Command::Capture { pane, lines } => {
            cmd_pane::capture(&mux, ctx.session(), &pane, lines, &mut out)
        }
        Command::Focus { pane } => cmd_pane::focus(&mux, ctx.session(), &pane),
        Command::Prompt { pane, message } => cmd_pane::prompt(
            &mux,
            &ctx.chat(),
            ctx.session(),
            &ctx.identity(),
            &pane,
            &message,
        ),
        Command::Kill { pane } => cmd_pane::kill(&mux, ctx.session(), &pane, &mut out),
        Command::Clear { no_archive } => {
            let archive = ctx.config.archive_on_clear && !no_archive;
            cmd_chat::clear(&ctx.chat(), archive, &mut out)
        }
        Command::Start { count, prompt } => {
            cmd_session::start(
                &mux,
                &ctx.chat(),
                StartInput {
                    session: ctx.session(),
                    count,
                    prompt: &prompt,
                    agent_command: &ctx.config.agent_command,
                    chat_log: &ctx.paths.chat_log,
                },
                &mut out,
            )?;
            drop(out);
            cmd_console::execute(&ctx, &mux, false)
        }
        Command::Chat { no_kill } => {
            drop(out);
            cmd_console::execute(&ctx, &mux, no_kill)
        }
        Command::Attach => cmd_session::attach(&mux, ctx.session()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn send_keeps_every_word() {
        let cli = Cli::try_parse_from(["huddle", "send", "fix", "-v", "flag"]).unwrap();
        match cli.cmd {
            TopCommand::Huddle(Command::Send { body }) => {
                assert_eq!(body, vec!["fix", "-v", "flag"])
            }
            _ => panic!("expected send"),
        }
    }

    #[test]
    fn capture_defaults_to_fifty_lines() {
        let cli = Cli::try_parse_from(["huddle", "capture", "agent2"]).unwrap();
        match cli.cmd {
            TopCommand::Huddle(Command::Capture { pane, lines }) => {
                assert_eq!(pane, "agent2");
                assert_eq!(lines, 50);
            }
            _ => panic!("expected capture"),
        }
    }

    #[test]
    fn config_is_parsed_apart_from_the_rest() {
        let cli = Cli::try_parse_from(["huddle", "config", "get", "history_lines"]).unwrap();
        assert!(matches!(cli.cmd, TopCommand::Config { .. }));
        let cli = Cli::try_parse_from(["huddle", "whoami"]).unwrap();
        assert!(matches!(cli.cmd, TopCommand::Huddle(Command::Whoami)));
    }

    #[test]
    fn missing_argument_is_an_error() {
        assert!(Cli::try_parse_from(["huddle", "send"]).is_err());
        assert!(Cli::try_parse_from(["huddle", "status", "set"]).is_err());
        assert!(Cli::try_parse_from(["huddle", "start"]).is_err());
    }
}
