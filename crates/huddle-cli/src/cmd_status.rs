use std::io::Write;

use clap::Subcommand;
use huddle_store::ClaimStore;

// ── CLI Schema ──

#[derive(Subcommand)]
pub enum StatusCmd {
    /// Claim a file you are editing (replaces your previous claim)
    Set {
        /// Path of the file being edited
        file: String,
    },
    /// Release your claim
    Clear,
    /// Show every claim
    List,
    /// Show who has claimed a file
    Check {
        /// Path to look up
        file: String,
    },
}

// ── Dispatch ──

pub fn run(
    cmd: StatusCmd,
    claims: &dyn ClaimStore,
    identity: &str,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match cmd {
        StatusCmd::Set { file } => set(claims, identity, &file, out),
        StatusCmd::Clear => clear(claims, identity, out),
        StatusCmd::List => list(claims, out),
        StatusCmd::Check { file } => check(claims, &file, out),
    }
}

// ── Command Implementations ──

fn set(claims: &dyn ClaimStore, identity: &str, file: &str, out: &mut dyn Write) -> anyhow::Result<()> {
    if file.trim().is_empty() {
        anyhow::bail!("file path is empty");
    }
    if let Some(holder) = claims.check_claim(file)?.filter(|h| h != identity) {
        writeln!(out, "Note: {file} is also claimed by {holder}")?;
    }
    claims.set_claim(identity, file)?;
    writeln!(out, "{identity} claimed {file}")?;
    Ok(())
}

fn clear(claims: &dyn ClaimStore, identity: &str, out: &mut dyn Write) -> anyhow::Result<()> {
    if claims.clear_claim(identity)? {
        writeln!(out, "{identity} released its claim")?;
    } else {
        writeln!(out, "{identity} had no claim")?;
    }
    Ok(())
}

fn list(claims: &dyn ClaimStore, out: &mut dyn Write) -> anyhow::Result<()> {
    let registry = claims.list_claims()?;
    if registry.is_empty() {
        writeln!(out, "No claims.")?;
        return Ok(());
    }
    let width = registry.iter().map(|(id, _)| id.len()).max().unwrap_or(0);
    for (identity, claim) in registry.iter() {
        writeln!(out, "{identity:<width$}  {}  (since {})", claim.file, claim.since)?;
    }
    Ok(())
}

fn check(claims: &dyn ClaimStore, file: &str, out: &mut dyn Write) -> anyhow::Result<()> {
    match claims.check_claim(file)? {
        Some(holder) => writeln!(out, "{holder}")?,
        None => writeln!(out, "unclaimed")?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use huddle_store::MemoryClaimStore;

    fn exec(claims: &MemoryClaimStore, identity: &str, cmd: StatusCmd) -> String {
        let mut buf = Vec::new();
        run(cmd, claims, identity, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn set_check_clear_cycle() {
        let claims = MemoryClaimStore::new();
        let file = || "src/lib.rs".to_string();

        assert_eq!(exec(&claims, "agent1", StatusCmd::Check { file: file() }), "unclaimed\n");
        exec(&claims, "agent1", StatusCmd::Set { file: file() });
        assert_eq!(exec(&claims, "agent2", StatusCmd::Check { file: file() }), "agent1\n");

        assert_eq!(exec(&claims, "agent1", StatusCmd::Clear), "agent1 released its claim\n");
        assert_eq!(exec(&claims, "agent1", StatusCmd::Clear), "agent1 had no claim\n");
        assert_eq!(exec(&claims, "agent1", StatusCmd::Check { file: file() }), "unclaimed\n");
    }

    #[test]
    fn second_claimant_is_warned_not_blocked() {
        let claims = MemoryClaimStore::new();
        exec(&claims, "agent1", StatusCmd::Set { file: "a.rs".into() });
        let text = exec(&claims, "agent2", StatusCmd::Set { file: "a.rs".into() });
        assert!(text.starts_with("Note: a.rs is also claimed by agent1"));
        assert_eq!(claims.list_claims().unwrap().len(), 2);
    }

    #[test]
    fn list_shows_each_identity() {
        let claims = MemoryClaimStore::new();
        assert_eq!(exec(&claims, "x", StatusCmd::List), "No claims.\n");
        exec(&claims, "agent2", StatusCmd::Set { file: "b.rs".into() });
        exec(&claims, "agent1", StatusCmd::Set { file: "a.rs".into() });
        let text = exec(&claims, "x", StatusCmd::List);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("agent1  a.rs  (since "));
        assert!(lines[1].starts_with("agent2  b.rs"));
    }

    #[test]
    fn empty_path_is_rejected() {
        let claims = MemoryClaimStore::new();
        let mut buf = Vec::new();
        assert!(run(StatusCmd::Set { file: " ".into() }, &claims, "a", &mut buf).is_err());
    }
}
