//! Swap lease: one state-changing command at a time.
//!
//! # Responsibilities
//! - Take an exclusive advisory lock on the lease file
//! - Record who holds it (run id, pid, command, time)
//! - Report the current holder when the lock is contended
//!
//! # Design Decisions
//! - `flock`-style lock via fs2: released by the OS when the process exits
//! - Never blocks; a second deploy fails fast instead of queueing
//! - The file is left in place; only the lock matters

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use fs2::FileExt;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DeployError;

/// Contents of the lease file while held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseHolder {
    pub run_id: Uuid,
    pub pid: u32,
    pub command: String,
    pub acquired_at: u64,
}

impl std::fmt::Display for LeaseHolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} run {}, pid {}, since {}",
            self.command, self.run_id, self.pid, self.acquired_at
        )
    }
}

/// An acquired lease. Dropping it releases the lock.
#[derive(Debug)]
pub struct SwapLease {
    file: File,
    path: PathBuf,
    holder: LeaseHolder,
}

impl SwapLease {
    /// Try to take the lease without waiting.
    pub fn acquire(path: &Path, run_id: Uuid, command: &str) -> Result<Self, DeployError> {
        let lease_err = |source: io::Error| DeployError::Lease {
            path: path.to_path_buf(),
            source,
        };

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(lease_err)?;

        if let Err(e) = FileExt::try_lock_exclusive(&file) {
            if is_contended(&e) {
                let holder = read_holder(&mut file);
                tracing::warn!(path = %path.display(), holder = ?holder, "Lease is held by another run");
                return Err(DeployError::LeaseHeld {
                    path: path.to_path_buf(),
                    holder: holder.map(|h| h.to_string()),
                });
            }
            return Err(lease_err(e));
        }

        let holder = LeaseHolder {
            run_id,
            pid: std::process::id(),
            command: command.to_string(),
            acquired_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default(),
        };
        write_holder(&mut file, &holder).map_err(lease_err)?;

        tracing::debug!(path = %path.display(), %run_id, "Lease acquired");
        Ok(Self {
            file,
            path: path.to_path_buf(),
            holder,
        })
    }

    pub fn holder(&self) -> &LeaseHolder {
        &self.holder
    }
}

impl Drop for SwapLease {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
        tracing::debug!(path = %self.path.display(), "Lease released");
    }
}

fn is_contended(e: &io::Error) -> bool {
    e.kind() == io::ErrorKind::WouldBlock
        || e.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

fn read_holder(file: &mut File) -> Option<LeaseHolder> {
    let mut content = String::new();
    file.seek(SeekFrom::Start(0)).ok()?;
    file.read_to_string(&mut content).ok()?;
    serde_json::from_str(&content).ok()
}

fn write_holder(file: &mut File, holder: &LeaseHolder) -> io::Result<()> {
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    serde_json::to_writer(&mut *file, holder)?;
    file.flush()
}
