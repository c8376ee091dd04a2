//! Handle to the isolated environment modules are installed into
//!
//! ## Layout
//!
//! ```text
//! .venv/
//! ├── bin/ (Scripts/ on Windows)   # executables, including entry points
//! └── .stackup/
//!     ├── lock                     # advisory lock held during installs
//!     └── installed/               # one marker per installed module
//! ```
//!
//! Creating the environment is left to whatever bootstraps it; stackup
//! only locates it.

use std::fs;
use std::path::{Path, PathBuf};

use fslock::LockFile;

use crate::error::{Result, StackupError};

/// Directory inside the environment owned by stackup
pub const STATE_DIR: &str = ".stackup";

/// Lock file name inside [`STATE_DIR`]
pub const LOCK_FILE: &str = "lock";

/// Executable directory name inside an environment on this platform
#[cfg(windows)]
pub const BIN_DIR: &str = "Scripts";
#[cfg(not(windows))]
pub const BIN_DIR: &str = "bin";

/// The isolated environment
#[derive(Debug, Clone)]
pub struct Environment {
    root: PathBuf,
}

/// RAII guard for the environment
///
/// Holds an exclusive advisory lock so only one process installs into the
/// environment at a time. The lock is released on drop.
#[derive(Debug)]
pub struct EnvironmentGuard {
    lock: LockFile,
    lock_path: PathBuf,
}

impl Environment {
    /// Describe an environment rooted at `root` without touching disk
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Open an existing environment
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let env = Self::at(root);
        if !env.exists() {
            return Err(StackupError::EnvironmentNotFound {
                path: env.root.display().to_string(),
            });
        }
        Ok(env)
    }

    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the environment's executables
    pub fn bin_dir(&self) -> PathBuf {
        self.root.join(BIN_DIR)
    }

    /// The environment's interpreter
    pub fn python(&self) -> PathBuf {
        self.bin_dir()
            .join(format!("python{}", std::env::consts::EXE_SUFFIX))
    }

    /// Directory for stackup's own bookkeeping
    pub fn state_dir(&self) -> PathBuf {
        self.root.join(STATE_DIR)
    }

    /// Acquire the install lock, failing immediately if another process holds it
    pub fn lock(&self) -> Result<EnvironmentGuard> {
        EnvironmentGuard::try_acquire(&self.state_dir())?.ok_or(StackupError::EnvironmentLocked)
    }
}

impl EnvironmentGuard {
    /// Try to acquire the lock without blocking
    pub fn try_acquire(state_dir: &Path) -> Result<Option<Self>> {
        fs::create_dir_all(state_dir).map_err(|e| StackupError::EnvironmentLockFailed {
            reason: format!("Failed to create {}: {}", state_dir.display(), e),
        })?;
        let lock_path = state_dir.join(LOCK_FILE);

        let mut lock =
            LockFile::open(&lock_path).map_err(|e| StackupError::EnvironmentLockFailed {
                reason: format!("Failed to open lock file: {e}"),
            })?;

        let acquired = lock
            .try_lock()
            .map_err(|e| StackupError::EnvironmentLockFailed {
                reason: format!("Failed to try lock: {e}"),
            })?;

        if acquired {
            Ok(Some(Self { lock, lock_path }))
        } else {
            Ok(None)
        }
    }

    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }
}

impl Drop for EnvironmentGuard {
    fn drop(&mut self) {
        let _ = self.lock.unlock();
    }
}
