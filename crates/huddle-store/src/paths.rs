use std::path::{Path, PathBuf};

pub use huddle_core::identity::ENV_CHAT_LOG;

/// Chat log location relative to the working directory.
pub const DEFAULT_CHAT_LOG: &str = ".claude/chat.log";

/// All well-known huddle file locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuddlePaths {
    pub chat_log: PathBuf,
    pub store_dir: PathBuf,
    pub claims_json: PathBuf,
    pub config_json: PathBuf,
}

impl HuddlePaths {
    /// Resolve paths for the running process (reads `CC_CHAT_LOG`).
    pub fn discover(cwd: &Path) -> Self {
        let chat_log = std::env::var(ENV_CHAT_LOG).ok();
        Self::new(cwd, chat_log.as_deref(), store_root())
    }

    /// Derive all paths. Pure computation, no I/O.
    pub fn new(cwd: &Path, chat_log_override: Option<&str>, store_dir: PathBuf) -> Self {
        let chat_log = match chat_log_override.map(str::trim).filter(|s| !s.is_empty()) {
            Some(p) => cwd.join(p),
            None => cwd.join(DEFAULT_CHAT_LOG),
        };
        Self {
            chat_log,
            claims_json: store_dir.join("claims.json"),
            config_json: store_dir.join("config.json"),
            store_dir,
        }
    }

    /// Backup location for the chat log, e.g. `chat.log.20261017-110500.bak`.
    pub fn archive_path(&self, stamp: &str) -> PathBuf {
        archive_path(&self.chat_log, stamp)
    }
}

/// Return the per-user store root: `~/.huddle/`.
pub fn store_root() -> PathBuf {
    if let Some(home) = dirs::home_dir() {
        home.join(".huddle")
    } else {
        PathBuf::from(".huddle-store")
    }
}

/// Sibling backup path for `log` carrying `stamp`.
pub fn archive_path(log: &Path, stamp: &str) -> PathBuf {
    let name = log
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "chat.log".to_string());
    log.with_file_name(format!("{name}.{stamp}.bak"))
}
