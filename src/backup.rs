//! Timestamped snapshots of the catalog files.
//!
//! A backup is a `backup_<yyyyMMdd_HHmmss>` directory holding verbatim copies
//! of the two catalog files. The fixed-width stamp makes lexicographic order
//! equal chronological order, which is what restore relies on.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use tracing::info;

use crate::persist::{DataFiles, REQUESTS_FILE, USERS_FILE};
use crate::store::RequestStore;

pub const BACKUP_PREFIX: &str = "backup_";
const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Copies the current catalog files into a fresh backup directory and
/// returns its path. Missing catalog files are simply not copied.
pub fn create_backup(files: &DataFiles) -> Result<PathBuf> {
    files.ensure_dir()?;
    let stamp = Utc::now().naive_utc().format(STAMP_FORMAT).to_string();
    let dir = next_free_dir(files.data_dir(), &stamp);
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create backup directory {}", dir.display()))?;
    copy_if_present(&files.users_file(), &dir.join(USERS_FILE))?;
    copy_if_present(&files.requests_file(), &dir.join(REQUESTS_FILE))?;
    info!(dir = %dir.display(), "backup created");
    Ok(dir)
}

// Same-second backups get a zero-padded numeric suffix. Padding keeps string
// order chronological no matter how many snapshots share one second; the
// suffixed name still sorts after the bare stamp and before the next second's.
fn next_free_dir(data_dir: &Path, stamp: &str) -> PathBuf {
    let base = data_dir.join(format!("{}{}", BACKUP_PREFIX, stamp));
    if !base.exists() {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = data_dir.join(format!("{}{}_{:04}", BACKUP_PREFIX, stamp, n));
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

/// Copies the lexicographically latest backup over the live catalog files and
/// reloads the store from them. Fails if no backup directory exists.
pub fn restore_latest(files: &DataFiles, store: &mut RequestStore) -> Result<()> {
    files.ensure_dir()?;
    let latest = match latest_backup_dir(files.data_dir())? {
        Some(dir) => dir,
        None => bail!("no backups found under {}", files.data_dir().display()),
    };
    copy_if_present(&latest.join(USERS_FILE), &files.users_file())?;
    copy_if_present(&latest.join(REQUESTS_FILE), &files.requests_file())?;
    info!(dir = %latest.display(), "backup restored");
    files.load(store)
}

pub fn latest_backup_dir(data_dir: &Path) -> Result<Option<PathBuf>> {
    let entries = fs::read_dir(data_dir)
        .with_context(|| format!("failed to scan {}", data_dir.display()))?;
    let mut latest: Option<PathBuf> = None;
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        let is_backup = path.is_dir()
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .map_or(false, |n| n.starts_with(BACKUP_PREFIX));
        if !is_backup {
            continue;
        }
        // Fixed-width stamps: name order is creation order.
        if latest.as_ref().map_or(true, |l| path.file_name() > l.file_name()) {
            latest = Some(path);
        }
    }
    Ok(latest)
}

fn copy_if_present(src: &Path, dst: &Path) -> Result<()> {
    if src.exists() {
        fs::copy(src, dst)
            .with_context(|| format!("failed to copy {} to {}", src.display(), dst.display()))?;
    }
    Ok(())
}
