use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Name of the lock file inside the data directory
const LOCK_FILE: &str = ".lock";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
const RETRY_EVERY: Duration = Duration::from_millis(10);

/// Advisory lock held for a whole load-dispatch-save cycle, so two `td`
/// processes never interleave their read-then-overwrite of the store.
///
/// The lock is released when the guard is dropped. The lock file stays on
/// disk; removing it would let a waiter lock an unlinked inode.
#[derive(Debug)]
pub struct StoreLock {
    _held: File,
}

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not open lock file {path}: {source}")]
    Open { path: PathBuf, source: io::Error },
    #[error("timed out waiting for {path}: another td process is writing")]
    Timeout { path: PathBuf },
}

impl StoreLock {
    /// Take the exclusive lock on `data_dir`, retrying until `timeout` passes.
    pub fn acquire(data_dir: &Path, timeout: Duration) -> Result<StoreLock, LockError> {
        let path = data_dir.join(LOCK_FILE);
        let file = File::options()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| LockError::Open {
                path: path.clone(),
                source,
            })?;

        let deadline = Instant::now() + timeout;
        let mut logged = false;
        while !try_exclusive(&file) {
            if Instant::now() >= deadline {
                return Err(LockError::Timeout { path });
            }
            if !logged {
                tracing::debug!(path = %path.display(), "store is locked, waiting");
                logged = true;
            }
            std::thread::sleep(RETRY_EVERY);
        }
        Ok(StoreLock { _held: file })
    }

    pub fn acquire_default(data_dir: &Path) -> Result<StoreLock, LockError> {
        StoreLock::acquire(data_dir, DEFAULT_TIMEOUT)
    }
}

/// Non-blocking `flock(LOCK_EX)`. Any failure counts as "held elsewhere".
#[cfg(unix)]
fn try_exclusive(file: &File) -> bool {
    use std::os::fd::AsRawFd;
    // SAFETY: the descriptor is owned by `file` and open for the whole call.
    unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) == 0 }
}

#[cfg(not(unix))]
fn try_exclusive(_file: &File) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn released_on_drop() {
        let dir = TempDir::new().unwrap();
        let first = StoreLock::acquire_default(dir.path()).unwrap();
        assert!(dir.path().join(LOCK_FILE).exists());
        drop(first);
        let again = StoreLock::acquire(dir.path(), Duration::from_millis(50));
        assert!(again.is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn contended_lock_times_out() {
        let dir = TempDir::new().unwrap();
        let _held = StoreLock::acquire_default(dir.path()).unwrap();
        let started = Instant::now();
        let waiter = StoreLock::acquire(dir.path(), Duration::from_millis(50));
        assert!(matches!(waiter, Err(LockError::Timeout { .. })));
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn missing_directory_is_open_error() {
        let dir = TempDir::new().unwrap();
        let gone = dir.path().join("nope");
        assert!(matches!(
            StoreLock::acquire_default(&gone),
            Err(LockError::Open { .. })
        ));
    }
}
