use std::io::Write;

use clap::Subcommand;
use huddle_board::{add_task, claim_task, complete_task, list_tasks};
use huddle_store::ChatStore;

#[derive(Subcommand)]
pub enum TaskCmd {
    /// Post a new task
    Add {
        /// Task description
        #[arg(required = true, trailing_var_arg = true)]
        description: Vec<String>,
    },
    /// Take a task
    Claim {
        /// Task id
        id: String,
        /// Optional note
        #[arg(trailing_var_arg = true)]
        note: Vec<String>,
    },
    /// Mark a task finished
    Done {
        /// Task id
        id: String,
        /// Optional note
        #[arg(trailing_var_arg = true)]
        note: Vec<String>,
    },
    /// Show all tasks and their status
    List,
}

pub fn run(
    cmd: TaskCmd,
    store: &dyn ChatStore,
    author: &str,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match cmd {
        TaskCmd::Add { description } => {
            let id = add_task(store, author, &description.join(" "))?;
            writeln!(out, "Task {id} added")?;
        }
        TaskCmd::Claim { id, note } => {
            claim_task(store, author, &id, joined(&note).as_deref())?;
            writeln!(out, "Task {id} claimed by {author}")?;
        }
        TaskCmd::Done { id, note } => {
            complete_task(store, author, &id, joined(&note).as_deref())?;
            writeln!(out, "Task {id} done")?;
        }
        TaskCmd::List => {
            let tasks = list_tasks(store)?;
            if tasks.is_empty() {
                writeln!(out, "No tasks.")?;
            }
            for task in tasks {
                writeln!(out, "{:<6} {:<8} {}", task.id, task.status, task.description)?;
            }
        }
    }
    Ok(())
}

fn joined(words: &[String]) -> Option<String> {
    (!words.is_empty()).then(|| words.join(" "))
}
