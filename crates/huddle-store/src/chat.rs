//! The shared chat log.
//!
//! Appends are single `write_all` calls on a file opened in append mode, so
//! concurrent writers interleave whole lines. Nothing orders appends across
//! processes beyond that.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use huddle_core::clock::archive_stamp;
use huddle_core::{Error, LogEntry, Result};
use tracing::debug;

use crate::follow::Follow;
use crate::paths::archive_path;
use crate::write_atomic;

/// Body of the notice left behind by `clear`.
pub const CLEARED_NOTICE: &str = "Chat log cleared";

/// Storage for the chat log.
pub trait ChatStore {
    /// Append one entry. Blank bodies are rejected.
    fn append(&self, entry: &LogEntry) -> Result<()>;

    /// Every raw line, oldest first. A missing log reads as empty.
    fn read_lines(&self) -> Result<Vec<String>>;

    /// Truncate the log, optionally keeping a copy of the old bytes first.
    /// Leaves a single `system` notice. Returns the archive location, if one
    /// was written to disk.
    fn clear(&self, archive: bool) -> Result<Option<PathBuf>>;

    /// Last `n` raw lines, oldest first.
    fn tail_lines(&self, n: usize) -> Result<Vec<String>> {
        let lines = self.read_lines()?;
        let start = lines.len().saturating_sub(n);
        Ok(lines[start..].to_vec())
    }

    /// Last `n` lines that parse as entries, oldest first.
    fn tail(&self, n: usize) -> Result<Vec<LogEntry>> {
        Ok(parse_lines(&self.tail_lines(n)?))
    }

    /// Every parseable entry, oldest first.
    fn all(&self) -> Result<Vec<LogEntry>> {
        Ok(parse_lines(&self.read_lines()?))
    }
}

fn parse_lines(lines: &[String]) -> Vec<LogEntry> {
    lines
        .iter()
        .filter_map(|line| {
            let entry = LogEntry::parse(line);
            if entry.is_none() && !line.trim().is_empty() {
                debug!(line = %line, "skipping malformed chat line");
            }
            entry
        })
        .collect()
}

// ── File backend ──

/// Chat log backed by a plain text file.
#[derive(Debug, Clone)]
pub struct FileChatStore {
    path: PathBuf,
}

impl FileChatStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the log (and its directory) if absent, without writing anything.
    pub fn ensure_exists(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        Ok(())
    }

    /// Copy the log to a fresh sibling backup. A name already taken gets a
    /// `-N` suffix on its stamp, so earlier backups are never overwritten.
    fn archive(&self) -> Result<PathBuf> {
        let stamp = archive_stamp();
        let mut source = fs::File::open(&self.path)?;
        let mut attempt = 0u32;
        loop {
            let backup = match attempt {
                0 => archive_path(&self.path, &stamp),
                n => archive_path(&self.path, &format!("{stamp}-{n}")),
            };
            match fs::OpenOptions::new().write(true).create_new(true).open(&backup) {
                Ok(mut dest) => {
                    std::io::copy(&mut source, &mut dest)?;
                    debug!(backup = %backup.display(), "archived chat log");
                    return Ok(backup);
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Follow entries appended from now on.
    pub fn follow(&self, interval: Duration) -> Result<Follow> {
        Follow::from_end(&self.path, interval)
    }
}

impl ChatStore for FileChatStore {
    fn append(&self, entry: &LogEntry) -> Result<()> {
        if entry.is_blank() {
            return Err(Error::EmptyBody);
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut line = entry.to_line();
        line.push('\n');
        file.write_all(line.as_bytes())?;
        debug!(path = %self.path.display(), author = %entry.author, "appended chat entry");
        Ok(())
    }

    fn read_lines(&self) -> Result<Vec<String>> {
        let content = match fs::read(&self.path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(content.lines().map(str::to_string).collect())
    }

    fn clear(&self, archive: bool) -> Result<Option<PathBuf>> {
        let archived = if archive && self.path.exists() {
            Some(self.archive()?)
        } else {
            None
        };
        // Replaced, not truncated: followers detect the new file.
        let mut line = LogEntry::system(CLEARED_NOTICE).to_line();
        line.push('\n');
        write_atomic(&self.path, line.as_bytes())?;
        Ok(archived)
    }
}

// ── In-memory backend ──

/// Chat log kept in memory; for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryChatStore {
    lines: Mutex<Vec<String>>,
    archives: Mutex<Vec<Vec<String>>>,
}

impl MemoryChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with raw lines (malformed ones included).
    pub fn with_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: Mutex::new(lines.into_iter().map(Into::into).collect()),
            archives: Mutex::default(),
        }
    }

    /// Snapshots taken by `clear(true)`, oldest first.
    pub fn archives(&self) -> Vec<Vec<String>> {
        lock(&self.archives).clone()
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ChatStore for MemoryChatStore {
    fn append(&self, entry: &LogEntry) -> Result<()> {
        if entry.is_blank() {
            return Err(Error::EmptyBody);
        }
        lock(&self.lines).push(entry.to_line());
        Ok(())
    }

    fn read_lines(&self) -> Result<Vec<String>> {
        Ok(lock(&self.lines).clone())
    }

    fn clear(&self, archive: bool) -> Result<Option<PathBuf>> {
        let mut lines = lock(&self.lines);
        if archive {
            lock(&self.archives).push(lines.clone());
        }
        *lines = vec![LogEntry::system(CLEARED_NOTICE).to_line()];
        Ok(None)
    }
}
