//! Collection locks
//!
//! A mutating operation is a full read-modify-write cycle over one collection.
//! Holding a [`CollectionLock`] for the whole cycle keeps two writers from
//! both validating against the same stale snapshot.
//!
//! Two layers:
//! - [`LockTable`]: serializes threads of one process sharing a store handle.
//! - [`LockFile`]: a `<file>.lock` sibling created with create-new semantics,
//!   serializing separate processes that share a data directory.
//!
//! A lock file records its owner's pid. A waiter reclaims the file when that
//! process is gone, or, when the owner cannot be determined, once the file is
//! older than [`STALE_AFTER`].

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::{Duration, Instant, SystemTime};

use tracing::{debug, warn};

use super::error::{StorageError, StorageResult};

const INITIAL_BACKOFF: Duration = Duration::from_millis(5);
const MAX_BACKOFF: Duration = Duration::from_millis(100);

/// Age past which a lock file with an unknown owner is treated as abandoned
pub const STALE_AFTER: Duration = Duration::from_secs(60);

/// In-process table of held lock scopes
#[derive(Debug, Default)]
pub struct LockTable {
    held: Mutex<HashSet<String>>,
    released: Condvar,
}

impl LockTable {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Block until `scope` is free, then mark it held
    pub fn acquire(self: &Arc<Self>, scope: &str) -> CollectionLock {
        let mut held = self.held.lock().unwrap_or_else(|e| e.into_inner());
        while held.contains(scope) {
            held = self
                .released
                .wait(held)
                .unwrap_or_else(|e| e.into_inner());
        }
        held.insert(scope.to_string());

        CollectionLock {
            table: Arc::clone(self),
            scope: scope.to_string(),
            file: None,
        }
    }

    /// Check whether a scope is currently held
    pub fn is_held(&self, scope: &str) -> bool {
        self.held
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(scope)
    }

    fn release(&self, scope: &str) {
        let mut held = self.held.lock().unwrap_or_else(|e| e.into_inner());
        held.remove(scope);
        self.released.notify_all();
    }
}

/// Exclusive access to one collection, released on drop
#[derive(Debug)]
pub struct CollectionLock {
    table: Arc<LockTable>,
    scope: String,
    file: Option<LockFile>,
}

impl CollectionLock {
    /// Name of the locked collection
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Attach a cross-process lock file to this guard
    pub(crate) fn with_file(mut self, file: LockFile) -> Self {
        self.file = Some(file);
        self
    }
}

impl Drop for CollectionLock {
    fn drop(&mut self) {
        // Remove the lock file before waking local waiters
        self.file.take();
        self.table.release(&self.scope);
    }
}

/// A lock file that exists for as long as this value lives
#[derive(Debug)]
pub struct LockFile {
    path: PathBuf,
}

impl LockFile {
    /// Create `path` exclusively, retrying until `timeout` elapses
    pub fn acquire(path: &Path, timeout: Duration) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let started = Instant::now();
        let mut backoff = INITIAL_BACKOFF;
        let mut contended = false;

        loop {
            match OpenOptions::new().write(true).create_new(true).open(path) {
                Ok(mut file) => {
                    // Dropped on a failed pid write, removing the file
                    let lock = Self {
                        path: path.to_path_buf(),
                    };
                    writeln!(file, "{}", std::process::id())
                        .map_err(|e| StorageError::from_io(e, path.to_path_buf()))?;
                    if contended {
                        debug!(path = %path.display(), waited_ms = started.elapsed().as_millis() as u64, "acquired contended lock");
                    }
                    return Ok(lock);
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    if reclaim_stale(path) {
                        continue;
                    }
                    if !contended {
                        warn!(path = %path.display(), "collection is locked by another writer, waiting");
                        contended = true;
                    }
                    if started.elapsed() >= timeout {
                        return Err(StorageError::LockTimeout {
                            path: path.to_path_buf(),
                        });
                    }
                    thread::sleep(backoff);
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                }
                Err(e) => return Err(StorageError::from_io(e, path.to_path_buf())),
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Remove `path` if its owner is gone, returning whether it was removed
///
/// The file is first renamed aside and its contents compared with what was
/// judged stale. If another waiter reclaimed it and a live owner took the
/// lock in between, that owner's file is linked back into place.
fn reclaim_stale(path: &Path) -> bool {
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    let Ok(metadata) = fs::metadata(path) else {
        return false;
    };
    let age = metadata
        .modified()
        .ok()
        .and_then(|modified| SystemTime::now().duration_since(modified).ok())
        .unwrap_or_default();

    let owner = contents.trim().parse::<u32>().ok();
    if !is_stale(owner, age) {
        return false;
    }

    let aside = path.with_extension(format!("lock.stale-{}", std::process::id()));
    if fs::rename(path, &aside).is_err() {
        return false;
    }

    let moved = fs::read_to_string(&aside).unwrap_or_default();
    if moved != contents {
        // Not the file we judged; hand it back unless the slot is taken again
        let _ = fs::hard_link(&aside, path);
        let _ = fs::remove_file(&aside);
        return false;
    }

    let _ = fs::remove_file(&aside);
    warn!(path = %path.display(), owner = ?owner, age_secs = age.as_secs(), "reclaimed stale lock file");
    true
}

fn is_stale(owner: Option<u32>, age: Duration) -> bool {
    match owner.and_then(process_alive) {
        Some(alive) => !alive,
        None => age >= STALE_AFTER,
    }
}

/// Whether process `pid` exists, if that can be determined on this platform
#[cfg(target_os = "linux")]
fn process_alive(pid: u32) -> Option<bool> {
    Some(Path::new("/proc").join(pid.to_string()).exists())
}

#[cfg(not(target_os = "linux"))]
fn process_alive(_pid: u32) -> Option<bool> {
    None
}

impl Drop for LockFile {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "failed to remove lock file");
        }
    }
}
