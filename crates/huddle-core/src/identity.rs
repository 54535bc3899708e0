//! Participant identity resolution.
//!
//! Precedence: explicit override > `agent<pane-id>` > `agent<pid>`.
//! Two processes with neither an override nor distinct pane ids can end up
//! with the same identity; nothing here tries to prevent that.

/// Environment variable holding an explicit identity.
pub const ENV_USER: &str = "CC_CHAT_USER";

/// Environment variable holding the pane number assigned at launch.
pub const ENV_PANE_ID: &str = "CC_PANE_ID";

/// Environment variable overriding the chat log location.
pub const ENV_CHAT_LOG: &str = "CC_CHAT_LOG";

/// Identity prefix for derived names.
pub const AGENT_PREFIX: &str = "agent";

/// Inputs to identity resolution, captured once per process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityContext {
    pub override_name: Option<String>,
    pub pane_id: Option<String>,
    pub process_id: u32,
}

impl IdentityContext {
    /// Capture the context of the running process.
    pub fn from_env() -> Self {
        Self {
            override_name: std::env::var(ENV_USER).ok(),
            pane_id: std::env::var(ENV_PANE_ID).ok(),
            process_id: std::process::id(),
        }
    }

    /// Same context with a different override (used by `chat` to default to `human`).
    pub fn with_override(mut self, name: impl Into<String>) -> Self {
        self.override_name = Some(name.into());
        self
    }

    /// Whether a non-empty explicit override is present.
    pub fn has_override(&self) -> bool {
        non_empty(self.override_name.as_deref()).is_some()
    }
}

/// Resolve the identity for a context. Never fails, never empty.
pub fn resolve_identity(ctx: &IdentityContext) -> String {
    if let Some(name) = non_empty(ctx.override_name.as_deref()) {
        return name.to_string();
    }
    if let Some(pane) = non_empty(ctx.pane_id.as_deref()) {
        return format!("{AGENT_PREFIX}{pane}");
    }
    format!("{AGENT_PREFIX}{}", ctx.process_id)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(name: Option<&str>, pane: Option<&str>, pid: u32) -> IdentityContext {
        IdentityContext {
            override_name: name.map(String::from),
            pane_id: pane.map(String::from),
            process_id: pid,
        }
    }

    #[test]
    fn override_wins() {
        assert_eq!(resolve_identity(&ctx(Some("reviewer"), Some("2"), 99)), "reviewer");
    }

    #[test]
    fn pane_beats_pid() {
        assert_eq!(resolve_identity(&ctx(None, Some("3"), 99)), "agent3");
    }

    #[test]
    fn pid_is_last_resort() {
        assert_eq!(resolve_identity(&ctx(None, None, 4242)), "agent4242");
    }

    #[test]
    fn empty_values_are_ignored() {
        assert_eq!(resolve_identity(&ctx(Some(""), Some("  "), 7)), "agent7");
        assert!(!ctx(Some(" "), None, 1).has_override());
    }

    #[test]
    fn with_override_replaces_name() {
        let c = ctx(None, Some("1"), 5).with_override("human");
        assert!(c.has_override());
        assert_eq!(resolve_identity(&c), "human");
    }
}
