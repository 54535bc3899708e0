//! User configuration at `~/.huddle/config.json`.
//!
//! Load order: built-in defaults < config file < environment.

use std::path::Path;
use std::time::Duration;

use huddle_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::write_atomic;

/// Environment variable naming the tmux session.
pub const ENV_TMUX_SESSION: &str = "CC_TMUX_SESSION";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HuddleConfig {
    /// Lines shown by `history` when no count is given.
    pub history_lines: usize,
    /// Keep a timestamped copy of the log when clearing it.
    pub archive_on_clear: bool,
    /// How often `watch` and the console re-check the log.
    pub poll_interval_ms: u64,
    /// tmux session used for agent panes.
    pub tmux_session: String,
    /// Command started in each agent pane.
    pub agent_command: String,
    /// Log filter used when `HUDDLE_LOG` is unset.
    pub log_level: String,
}

impl Default for HuddleConfig {
    fn default() -> Self {
        Self {
            history_lines: 20,
            archive_on_clear: true,
            poll_interval_ms: 250,
            tmux_session: "multi-agent".to_string(),
            agent_command: "claude --dangerously-skip-permissions".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

impl HuddleConfig {
    /// Defaults, overlaid with the config file and then the environment.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = Self::from_file(path)?;
        if let Ok(session) = std::env::var(ENV_TMUX_SESSION) {
            if !session.trim().is_empty() {
                config.tmux_session = session;
            }
        }
        Ok(config)
    }

    /// Defaults overlaid with the config file only. A missing file is fine.
    pub fn from_file(path: &Path) -> Result<Self> {
        let map = read_config(path)?;
        from_map(map)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(10))
    }
}

fn from_map(map: serde_json::Map<String, serde_json::Value>) -> Result<HuddleConfig> {
    serde_json::from_value(serde_json::Value::Object(map)).map_err(|e| Error::Config(e.to_string()))
}

/// Read the raw config object. Returns an empty map if the file doesn't exist.
pub fn read_config(path: &Path) -> Result<serde_json::Map<String, serde_json::Value>> {
    if !path.exists() {
        return Ok(serde_json::Map::new());
    }
    let content = std::fs::read_to_string(path)?;
    match serde_json::from_str(&content) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(_) => Err(Error::Config(format!(
            "{} must contain a JSON object",
            path.display()
        ))),
        Err(e) => Err(Error::Config(format!("{}: {e}", path.display()))),
    }
}

/// Set one key, validating the result against [`HuddleConfig`] before writing.
///
/// A value that parses as a bool or number but belongs to a string field
/// (`tmux_session 2`) is stored as the string.
pub fn set_value(path: &Path, key: &str, raw: &str) -> Result<serde_json::Value> {
    let mut map = read_config(path)?;
    let parsed = parse_value(raw);
    let mut candidates = vec![parsed.clone()];
    if !parsed.is_string() {
        candidates.push(serde_json::Value::String(raw.to_string()));
    }

    let mut first_err = None;
    for value in candidates {
        map.insert(key.to_string(), value.clone());
        match from_map(map.clone()) {
            Ok(_) => {
                let json = serde_json::to_string_pretty(&map)?;
                write_atomic(path, json.as_bytes())?;
                return Ok(value);
            }
            Err(e) => {
                first_err.get_or_insert(e);
            }
        }
    }
    Err(first_err.unwrap_or_else(|| Error::Config(format!("cannot set {key}"))))
}

/// Parse a string value into an appropriate JSON value (bool/number/string).
pub fn parse_value(s: &str) -> serde_json::Value {
    match s {
        "true" => serde_json::Value::Bool(true),
        "false" => serde_json::Value::Bool(false),
        _ => {
            if let Ok(n) = s.parse::<u64>() {
                serde_json::Value::Number(n.into())
            } else {
                serde_json::Value::String(s.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = HuddleConfig::from_file(&tmp.path().join("config.json")).unwrap();
        assert_eq!(cfg, HuddleConfig::default());
        assert_eq!(cfg.history_lines, 20);
        assert!(cfg.archive_on_clear);
        assert_eq!(cfg.tmux_session, "multi-agent");
    }

    #[test]
    fn file_overrides_some_fields() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, r#"{"history_lines": 5, "archive_on_clear": false}"#).unwrap();
        let cfg = HuddleConfig::from_file(&path).unwrap();
        assert_eq!(cfg.history_lines, 5);
        assert!(!cfg.archive_on_clear);
        assert_eq!(cfg.poll_interval_ms, 250);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, r#"{"histroy_lines": 5}"#).unwrap();
        assert!(matches!(HuddleConfig::from_file(&path), Err(Error::Config(_))));
    }

    #[test]
    fn set_value_validates_before_writing() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("config.json");

        assert_eq!(set_value(&path, "history_lines", "50").unwrap(), 50);
        assert!(set_value(&path, "history_lines", "lots").is_err());
        assert!(set_value(&path, "no_such_key", "1").is_err());

        let cfg = HuddleConfig::from_file(&path).unwrap();
        assert_eq!(cfg.history_lines, 50);
    }

    #[test]
    fn numeric_text_for_string_field_is_kept_as_string() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        assert_eq!(set_value(&path, "tmux_session", "2").unwrap(), "2");
        assert_eq!(HuddleConfig::from_file(&path).unwrap().tmux_session, "2");
    }

    #[test]
    fn parse_value_types() {
        assert_eq!(parse_value("true"), serde_json::Value::Bool(true));
        assert_eq!(parse_value("42"), serde_json::json!(42));
        assert_eq!(parse_value("tmux-a"), serde_json::json!("tmux-a"));
    }

    #[test]
    fn poll_interval_has_floor() {
        let cfg = HuddleConfig {
            poll_interval_ms: 0,
            ..HuddleConfig::default()
        };
        assert_eq!(cfg.poll_interval(), Duration::from_millis(10));
    }
}
