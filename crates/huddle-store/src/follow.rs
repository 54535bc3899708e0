//! Tail-follow over the chat log.
//!
//! `Follow` is an infinite, blocking iterator of entries appended after it
//! was created. Dropping it is the only way to stop it, unless a stop flag
//! is attached with [`Follow::with_stop`].
//!
//! `clear` replaces the log file rather than truncating it, so a follower
//! notices a clear by the file identity changing, whatever the new length.

use std::collections::VecDeque;
use std::fs;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use huddle_core::{LogEntry, Result};
use tracing::debug;

pub struct Follow {
    path: PathBuf,
    offset: u64,
    file_id: Option<FileId>,
    pending: Vec<u8>,
    queue: VecDeque<LogEntry>,
    interval: Duration,
    stop: Option<Arc<AtomicBool>>,
}

impl Follow {
    /// Start at the current end of the log (or at 0 if it does not exist yet).
    pub fn from_end(path: &Path, interval: Duration) -> Result<Self> {
        let mut follow = Self::at(path, 0, interval);
        match fs::metadata(path) {
            Ok(meta) => {
                follow.offset = meta.len();
                follow.file_id = file_id(&meta);
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        Ok(follow)
    }

    /// Start at the beginning of the log.
    pub fn from_start(path: &Path, interval: Duration) -> Self {
        Self::at(path, 0, interval)
    }

    fn at(path: &Path, offset: u64, interval: Duration) -> Self {
        Self {
            path: path.to_path_buf(),
            offset,
            file_id: None,
            pending: Vec::new(),
            queue: VecDeque::new(),
            interval,
            stop: None,
        }
    }

    /// End iteration once `flag` is set.
    pub fn with_stop(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop = Some(flag);
        self
    }

    /// Byte offset of the next unread line.
    pub fn offset(&self) -> u64 {
        self.offset - self.pending.len() as u64
    }

    /// Complete raw lines appended since the last call. Never blocks.
    ///
    /// A trailing partial line is held back until its newline arrives. If
    /// the log was replaced or shrank (it was cleared) reading restarts from
    /// the top.
    pub fn poll_lines(&mut self) -> Result<Vec<String>> {
        let meta = match fs::metadata(&self.path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                self.reset();
                self.file_id = None;
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        let len = meta.len();
        let id = file_id(&meta);
        let replaced = self.file_id.is_some() && id != self.file_id;
        if replaced || len < self.offset {
            debug!(path = %self.path.display(), replaced, "chat log cleared, restarting follow");
            self.reset();
        }
        self.file_id = id;
        if len == self.offset {
            return Ok(Vec::new());
        }

        let mut file = fs::File::open(&self.path)?;
        file.seek(SeekFrom::Start(self.offset))?;
        let mut buf = Vec::new();
        let read = file.take(len - self.offset).read_to_end(&mut buf)?;
        self.offset += read as u64;
        self.pending.extend_from_slice(&buf);

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.pending.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw[..raw.len() - 1]);
            lines.push(line.trim_end_matches('\r').to_string());
        }
        Ok(lines)
    }

    /// New entries since the last call; malformed lines are dropped.
    pub fn poll(&mut self) -> Result<Vec<LogEntry>> {
        Ok(self
            .poll_lines()?
            .iter()
            .filter_map(|line| LogEntry::parse(line))
            .collect())
    }

    fn reset(&mut self) {
        self.offset = 0;
        self.pending.clear();
    }

    fn stopped(&self) -> bool {
        self.stop
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

impl Iterator for Follow {
    type Item = Result<LogEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.stopped() {
                return None;
            }
            if let Some(entry) = self.queue.pop_front() {
                return Some(Ok(entry));
            }
            match self.poll() {
                Ok(entries) if entries.is_empty() => std::thread::sleep(self.interval),
                Ok(entries) => self.queue.extend(entries),
                Err(e) => {
                    std::thread::sleep(self.interval);
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Device and inode of a file; `None` where the platform has no such pair.
type FileId = (u64, u64);

#[cfg(unix)]
fn file_id(meta: &fs::Metadata) -> Option<FileId> {
    use std::os::unix::fs::MetadataExt;
    Some((meta.dev(), meta.ino()))
}

#[cfg(not(unix))]
fn file_id(_meta: &fs::Metadata) -> Option<FileId> {
    None
}
