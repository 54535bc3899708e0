//! Advisory file-claim registry.
//!
//! # Concurrency
//!
//! This is a best-effort lock, not mutual exclusion. Every mutation is a
//! load-modify-save cycle with no locking: two processes updating the
//! registry at the same time can race, and the last writer's view wins
//! (the other update is lost). Agents treat claims as a courtesy signal.
//! The final save replaces the file in one rename, so readers never see a
//! half-written document.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use huddle_core::clock::now_rfc3339;
use huddle_core::{ClaimRegistry, Error, Result};
use tracing::debug;

use crate::write_atomic;

/// Tag for stores whose exclusion is advisory only: mutations are unlocked
/// read-modify-write cycles and concurrent callers can lose updates.
pub trait BestEffortLock {}

/// Storage for the claim registry. Implementors supply `load`/`save`;
/// the claim operations are read-modify-write on top of them.
pub trait ClaimStore: BestEffortLock {
    fn load(&self) -> Result<ClaimRegistry>;

    fn save(&self, registry: &ClaimRegistry) -> Result<()>;

    /// Claim `file` for `identity`, replacing any earlier claim it held.
    fn set_claim(&self, identity: &str, file: &str) -> Result<()> {
        let mut registry = self.load()?;
        registry.set(identity, file, &now_rfc3339()?);
        self.save(&registry)
    }

    /// Release the claim of `identity`. Returns whether one existed.
    fn clear_claim(&self, identity: &str) -> Result<bool> {
        let mut registry = self.load()?;
        if registry.clear(identity).is_none() {
            return Ok(false);
        }
        self.save(&registry)?;
        Ok(true)
    }

    fn list_claims(&self) -> Result<ClaimRegistry> {
        self.load()
    }

    /// Who, if anyone, has claimed `file`.
    fn check_claim(&self, file: &str) -> Result<Option<String>> {
        Ok(self.load()?.check(file).map(str::to_string))
    }
}

// ── File backend ──

/// Registry persisted as a JSON object at `~/.huddle/claims.json`.
#[derive(Debug, Clone)]
pub struct FileClaimStore {
    path: PathBuf,
}

impl FileClaimStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BestEffortLock for FileClaimStore {}

impl ClaimStore for FileClaimStore {
    fn load(&self) -> Result<ClaimRegistry> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(ClaimRegistry::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(ClaimRegistry::new());
        }
        serde_json::from_str(&content).map_err(|source| Error::CorruptRegistry {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, registry: &ClaimRegistry) -> Result<()> {
        let data = serde_json::to_string_pretty(registry)?;
        write_atomic(&self.path, data.as_bytes())?;
        debug!(path = %self.path.display(), claims = registry.len(), "saved claim registry");
        Ok(())
    }
}

// ── In-memory backend ──

#[derive(Debug, Default)]
pub struct MemoryClaimStore {
    registry: Mutex<ClaimRegistry>,
}

impl MemoryClaimStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BestEffortLock for MemoryClaimStore {}

impl ClaimStore for MemoryClaimStore {
    fn load(&self) -> Result<ClaimRegistry> {
        Ok(self
            .registry
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone())
    }

    fn save(&self, registry: &ClaimRegistry) -> Result<()> {
        *self.registry.lock().unwrap_or_else(|p| p.into_inner()) = registry.clone();
        Ok(())
    }
}
