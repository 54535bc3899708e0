use std::io::Write;
use std::path::Path;

use clap::Subcommand;
use huddle_store::config::{read_config, set_value};
use huddle_store::HuddleConfig;

// ── CLI Schema ──

#[derive(Subcommand)]
pub enum ConfigCmd {
    /// Set a config value
    Set {
        /// Config key (e.g. history_lines)
        key: String,
        /// Config value (true/false/number/string)
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values, defaults included
    List,
}

// ── Dispatch ──

pub fn run(cmd: ConfigCmd, path: &Path, out: &mut dyn Write) -> anyhow::Result<()> {
    match cmd {
        ConfigCmd::Set { key, value } => set(path, &key, &value, out),
        ConfigCmd::Get { key } => get(path, &key, out),
        ConfigCmd::List => list(path, out),
    }
}

// ── Command Implementations ──

fn set(path: &Path, key: &str, value: &str, out: &mut dyn Write) -> anyhow::Result<()> {
    let stored = set_value(path, key, value)?;
    writeln!(out, "{key} = {stored}")?;
    Ok(())
}

fn get(path: &Path, key: &str, out: &mut dyn Write) -> anyhow::Result<()> {
    let effective = effective(path)?;
    match effective.get(key) {
        Some(value) => writeln!(out, "{}", plain(value))?,
        None => anyhow::bail!("unknown config key '{key}'"),
    }
    Ok(())
}

fn list(path: &Path, out: &mut dyn Write) -> anyhow::Result<()> {
    let file = read_config(path)?;
    for (key, value) in effective(path)? {
        let origin = if file.contains_key(&key) { "" } else { "  (default)" };
        writeln!(out, "{key} = {value}{origin}")?;
    }
    Ok(())
}

/// Defaults overlaid with the file, as a sorted JSON map.
fn effective(path: &Path) -> anyhow::Result<serde_json::Map<String, serde_json::Value>> {
    let config = HuddleConfig::from_file(path)?;
    match serde_json::to_value(config)? {
        serde_json::Value::Object(map) => Ok(map),
        _ => anyhow::bail!("config did not serialize to an object"),
    }
}

/// Strings print without quotes.
fn plain(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exec(path: &Path, cmd: ConfigCmd) -> anyhow::Result<String> {
        let mut buf = Vec::new();
        run(cmd, path, &mut buf)?;
        Ok(String::from_utf8(buf).unwrap())
    }

    #[test]
    fn set_then_get() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        let out = exec(
            &path,
            ConfigCmd::Set {
                key: "tmux_session".into(),
                value: "team".into(),
            },
        )
        .unwrap();
        assert_eq!(out, "tmux_session = \"team\"\n");

        let out = exec(
            &path,
            ConfigCmd::Get {
                key: "tmux_session".into(),
            },
        )
        .unwrap();
        assert_eq!(out, "team\n");
    }

    #[test]
    fn get_default_and_unknown() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        let out = exec(
            &path,
            ConfigCmd::Get {
                key: "history_lines".into(),
            },
        )
        .unwrap();
        assert_eq!(out, "20\n");
        assert!(exec(&path, ConfigCmd::Get { key: "nope".into() }).is_err());
    }

    #[test]
    fn list_marks_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        exec(
            &path,
            ConfigCmd::Set {
                key: "archive_on_clear".into(),
                value: "false".into(),
            },
        )
        .unwrap();
        let out = exec(&path, ConfigCmd::List).unwrap();
        assert!(out.contains("archive_on_clear = false\n"));
        assert!(out.contains("history_lines = 20  (default)\n"));
    }
}
