pub mod claim;
pub mod clock;
pub mod entry;
pub mod error;
pub mod identity;
pub mod tags;

pub use claim::{Claim, ClaimRegistry};
pub use entry::{LogEntry, HUMAN_AUTHOR, SYSTEM_AUTHOR};
pub use error::{Error, Result};
pub use identity::{resolve_identity, IdentityContext};
pub use tags::{Task, TaskStatus};
