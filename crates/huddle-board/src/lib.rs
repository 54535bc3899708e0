//! Read-side projections over the chat log: who is around, and what tasks exist.

pub mod participants;
pub mod tasks;

pub use participants::{list_participants, Participant};
pub use tasks::{add_task, claim_task, complete_task, list_tasks};
