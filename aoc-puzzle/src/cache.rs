//! Puzzle cache for storing puzzle records locally

use crate::error::CacheError;
use crate::identity::PuzzleIdentity;
use crate::record::PuzzleRecord;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// File-based cache of puzzle records
///
/// Directory structure: `{root}/{year}/day{day:02}.json`, with a sibling
/// `day{day:02}.lock` used to serialize writers across processes.
///
/// Records are replaced atomically (temp file + rename), so readers and
/// interrupted writers only ever see a complete old or new record.
#[derive(Debug, Clone)]
pub struct PuzzleCache {
    root: PathBuf,
}

/// Exclusive advisory lock on one identity, released on drop
struct IdentityLock {
    _file: File,
}

impl PuzzleCache {
    /// Create a cache rooted at `root`; nothing is touched until first write
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the record path for a specific identity
    pub fn path(&self, identity: PuzzleIdentity) -> PathBuf {
        self.year_dir(identity)
            .join(format!("day{:02}.json", identity.day()))
    }

    fn lock_path(&self, identity: PuzzleIdentity) -> PathBuf {
        self.year_dir(identity)
            .join(format!("day{:02}.lock", identity.day()))
    }

    fn year_dir(&self, identity: PuzzleIdentity) -> PathBuf {
        self.root.join(identity.year().to_string())
    }

    /// Check if a record is cached
    pub fn contains(&self, identity: PuzzleIdentity) -> bool {
        self.path(identity).is_file()
    }

    /// Get the cached record, or None if not cached. Never touches the network.
    pub fn get(&self, identity: PuzzleIdentity) -> Result<Option<PuzzleRecord>, CacheError> {
        let path = self.path(identity);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::unavailable(path)(e)),
        };

        let record: PuzzleRecord =
            serde_json::from_str(&content).map_err(|e| CacheError::Corrupt {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        record.validate().map_err(|e| CacheError::Corrupt {
            path,
            reason: e.to_string(),
        })?;
        Ok(Some(record))
    }

    /// Read-through lookup
    ///
    /// Returns the cached record, or calls `fetch` once, stores its result and
    /// returns it. Concurrent callers for the same identity (in this or another
    /// process) wait for the first fetch and then read its result.
    pub fn get_or_fetch<F, E>(&self, identity: PuzzleIdentity, fetch: F) -> Result<PuzzleRecord, E>
    where
        F: FnOnce(PuzzleIdentity) -> Result<PuzzleRecord, E>,
        E: From<CacheError>,
    {
        if let Some(record) = self.get(identity)? {
            debug!(%identity, "cache hit");
            return Ok(record);
        }

        let _lock = self.lock(identity)?;
        // Someone else may have fetched while we waited for the lock
        if let Some(record) = self.get(identity)? {
            debug!(%identity, "cache filled by a concurrent fetch");
            return Ok(record);
        }

        debug!(%identity, "cache miss, fetching");
        let record = fetch(identity)?;
        self.check(identity, &record)?;
        self.write(identity, &record)?;
        Ok(record)
    }

    /// Store a record, replacing any previous one
    pub fn put(&self, identity: PuzzleIdentity, record: &PuzzleRecord) -> Result<(), CacheError> {
        self.check(identity, record)?;
        let _lock = self.lock(identity)?;
        self.write(identity, record)
    }

    /// Atomic read-modify-write of a stored record
    ///
    /// Progress is monotonic: solved parts and recorded answers already stored
    /// survive whatever `mutate` does. Returns the stored result.
    pub fn update<F>(&self, identity: PuzzleIdentity, mutate: F) -> Result<PuzzleRecord, CacheError>
    where
        F: FnOnce(&mut PuzzleRecord),
    {
        let _lock = self.lock(identity)?;
        let previous = self
            .get(identity)?
            .ok_or(CacheError::NotCached(identity))?;

        let mut next = previous.clone();
        mutate(&mut next);
        next.fill_from(&previous);
        self.check(identity, &next)?;

        if next != previous {
            self.write(identity, &next)?;
        }
        Ok(next)
    }

    fn check(&self, identity: PuzzleIdentity, record: &PuzzleRecord) -> Result<(), CacheError> {
        record
            .validate()
            .map_err(|violation| CacheError::Invalid {
                identity,
                violation,
            })
    }

    fn lock(&self, identity: PuzzleIdentity) -> Result<IdentityLock, CacheError> {
        let path = self.lock_path(identity);
        self.ensure_year_dir(identity)?;

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(CacheError::unavailable(&path))?;
        file.lock().map_err(CacheError::unavailable(&path))?;
        Ok(IdentityLock { _file: file })
    }

    fn ensure_year_dir(&self, identity: PuzzleIdentity) -> Result<(), CacheError> {
        let dir = self.year_dir(identity);
        fs::create_dir_all(&dir).map_err(CacheError::unavailable(dir))
    }

    /// Replace the stored record atomically; caller holds the identity lock
    fn write(&self, identity: PuzzleIdentity, record: &PuzzleRecord) -> Result<(), CacheError> {
        let path = self.path(identity);
        let dir = self.year_dir(identity);
        self.ensure_year_dir(identity)?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(CacheError::unavailable(&dir))?;
        serde_json::to_writer_pretty(&mut tmp, record)
            .map_err(std::io::Error::from)
            .and_then(|()| tmp.write_all(b"\n"))
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(CacheError::unavailable(tmp.path()))?;
        tmp.persist(&path)
            .map_err(|e| CacheError::unavailable(&path)(e.error))?;

        debug!(%identity, path = %path.display(), "stored puzzle record");
        Ok(())
    }
}
