//! Catalog file gateway.
//!
//! Two line-oriented files under the data directory, one per entity kind.
//! Saves write each file fully and independently, so a crash mid-write can
//! only affect the file being written. Loads tolerate missing files (first
//! run) and skip malformed lines instead of aborting.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::codec;
use crate::store::RequestStore;

pub const USERS_FILE: &str = "users.txt";
pub const REQUESTS_FILE: &str = "requests.txt";

pub struct DataFiles {
    data_dir: PathBuf,
}

impl DataFiles {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        DataFiles {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn users_file(&self) -> PathBuf {
        self.data_dir.join(USERS_FILE)
    }

    pub fn requests_file(&self) -> PathBuf {
        self.data_dir.join(REQUESTS_FILE)
    }

    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("failed to create data directory {}", self.data_dir.display()))
    }

    /// Writes both catalogs and clears the store's dirty flag.
    pub fn save(&self, store: &mut RequestStore) -> Result<()> {
        self.ensure_dir()?;
        write_lines(&self.users_file(), store.users().iter().map(codec::encode_user))?;
        write_lines(
            &self.requests_file(),
            store.requests().iter().map(codec::encode_request),
        )?;
        store.clear_dirty();
        debug!(
            users = store.users().len(),
            requests = store.requests().len(),
            dir = %self.data_dir.display(),
            "catalog saved"
        );
        Ok(())
    }

    /// Reads both catalogs into the store. A missing file means an empty
    /// collection; the bulk load rebuilds the ticket sequence.
    pub fn load(&self, store: &mut RequestStore) -> Result<()> {
        self.ensure_dir()?;
        let users = read_records(&self.users_file(), codec::decode_user)?;
        let requests = read_records(&self.requests_file(), codec::decode_request)?;
        debug!(
            users = users.len(),
            requests = requests.len(),
            dir = %self.data_dir.display(),
            "catalog loaded"
        );
        store.replace_all(users, requests);
        Ok(())
    }
}

fn write_lines(path: &Path, lines: impl Iterator<Item = String>) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to write {}", path.display()))?;
    let mut out = BufWriter::new(file);
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    out.flush()
        .with_context(|| format!("failed to flush {}", path.display()))
}

fn read_records<T>(path: &Path, decode: impl Fn(&str) -> Option<T>) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let file = File::open(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mut records = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("failed to read {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        match decode(&line) {
            Some(record) => records.push(record),
            None => warn!(file = %path.display(), line = idx + 1, "skipping malformed record"),
        }
    }
    Ok(records)
}
