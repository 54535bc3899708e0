use std::path::Path;

use anyhow::Context as _;
use huddle_core::{resolve_identity, IdentityContext};
use huddle_store::{FileChatStore, FileClaimStore, HuddleConfig, HuddlePaths};

/// Per-invocation state shared by command handlers.
pub struct AppContext {
    pub paths: HuddlePaths,
    pub config: HuddleConfig,
    pub identity: IdentityContext,
}

impl AppContext {
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let paths = HuddlePaths::discover(cwd);
        let config = HuddleConfig::load(&paths.config_json)
            .with_context(|| format!("loading {}", paths.config_json.display()))?;
        Ok(Self {
            paths,
            config,
            identity: IdentityContext::from_env(),
        })
    }

    pub fn identity(&self) -> String {
        resolve_identity(&self.identity)
    }

    pub fn chat(&self) -> FileChatStore {
        FileChatStore::new(&self.paths.chat_log)
    }

    pub fn claims(&self) -> FileClaimStore {
        FileClaimStore::new(&self.paths.claims_json)
    }

    pub fn session(&self) -> &str {
        &self.config.tmux_session
    }
}
