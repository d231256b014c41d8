// ABOUTME: Reconcile lock to prevent concurrent runs against the same fleet prefix.
// ABOUTME: Uses atomic file creation with lock info stored in ~/.local/state/stolos/.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::MachineName;

/// Base directory for stolos state files (XDG Base Directory compliant).
const STATE_DIR: &str = ".local/state/stolos";

#[derive(Debug, Error)]
pub enum LockError {
    #[error("reconcile lock for {prefix} held by {holder} (pid {pid}) since {since}")]
    Held {
        prefix: String,
        holder: String,
        pid: u32,
        since: DateTime<Utc>,
    },

    #[error("lock acquired by another process during break")]
    Contended,

    #[error("failed to serialize lock info: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("lock I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Information about who holds a reconcile lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// Hostname of the machine that holds the lock.
    pub holder: String,
    /// Process ID of the lock holder.
    pub pid: u32,
    /// When the lock was acquired.
    pub started_at: DateTime<Utc>,
    /// Machine name prefix being reconciled.
    pub prefix: String,
}

impl LockInfo {
    /// Create new lock info for the current process.
    pub fn new(prefix: &MachineName) -> Self {
        Self {
            holder: gethostname::gethostname().to_string_lossy().into_owned(),
            pid: std::process::id(),
            started_at: Utc::now(),
            prefix: prefix.to_string(),
        }
    }

    /// Check if this lock is stale (older than 1 hour).
    pub fn is_stale(&self) -> bool {
        let age = Utc::now() - self.started_at;
        age.num_hours() >= 1
    }
}

/// A held reconcile lock. Released explicitly; a crashed holder's file
/// survives until the staleness window expires or `--force` breaks it.
#[derive(Debug)]
pub struct ReconcileLock {
    path: PathBuf,
}

impl ReconcileLock {
    /// Acquire the lock for a fleet prefix in the default state directory.
    pub fn acquire(prefix: &MachineName, force: bool) -> Result<Self, LockError> {
        Self::acquire_in(&state_dir(), prefix, force)
    }

    /// Acquire the lock under an explicit state directory.
    ///
    /// Uses atomic create-new for acquisition (no TOCTOU race). Returns
    /// `LockError::Held` if the lock is held by another live process.
    /// Auto-breaks stale locks (>1 hour) with a warning.
    pub fn acquire_in(dir: &Path, prefix: &MachineName, force: bool) -> Result<Self, LockError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("{prefix}.lock"));

        if try_create(&path, prefix)? {
            return Ok(Self { path });
        }

        check_existing(&path, prefix, force)?;

        tracing::debug!(path = %path.display(), "removing stale/forced lock");
        let _ = std::fs::remove_file(&path);

        if try_create(&path, prefix)? {
            return Ok(Self { path });
        }

        Err(LockError::Contended)
    }

    /// Release the lock.
    pub fn release(self) -> Result<(), LockError> {
        std::fs::remove_file(&self.path)?;
        Ok(())
    }
}

/// Atomically create the lock file. Returns false if it already exists.
fn try_create(path: &Path, prefix: &MachineName) -> Result<bool, LockError> {
    let info = LockInfo::new(prefix);
    let json = serde_json::to_string(&info)?;

    match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
    {
        Ok(mut file) => {
            file.write_all(json.as_bytes())?;
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(LockError::Io(e)),
    }
}

/// Decide whether an existing lock may be broken (stale, forced, or
/// corrupted). Errors with `LockError::Held` when it may not.
fn check_existing(path: &Path, prefix: &MachineName, force: bool) -> Result<(), LockError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(_) => {
            tracing::warn!("lock info unreadable, breaking lock");
            return Ok(());
        }
    };

    match serde_json::from_str::<LockInfo>(&raw) {
        Ok(existing) => {
            if force {
                tracing::warn!(
                    "breaking lock held by {} (pid {}) since {}",
                    existing.holder,
                    existing.pid,
                    existing.started_at
                );
                Ok(())
            } else if existing.is_stale() {
                tracing::warn!(
                    "auto-breaking stale lock held by {} (pid {}) since {}",
                    existing.holder,
                    existing.pid,
                    existing.started_at
                );
                Ok(())
            } else {
                Err(LockError::Held {
                    prefix: prefix.to_string(),
                    holder: existing.holder,
                    pid: existing.pid,
                    since: existing.started_at,
                })
            }
        }
        Err(_) => {
            tracing::warn!("lock info corrupted, breaking lock");
            Ok(())
        }
    }
}

fn state_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(STATE_DIR)
}
