//! Versioned on-disk cache
//!
//! A value is stored as the bincode encoding of `(version, value)`. Loading a
//! file with another version, or one that fails to decode, deletes it and
//! reports a miss so the caller recomputes.

use crate::error::{MastermindError, Result};
use bincode::config;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Location and schema version of a cached value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageSpec {
    pub version: u32,
    pub path: PathBuf,
}

impl StorageSpec {
    /// `<dir>/<prefix>.v<version>.bin`
    #[must_use]
    pub fn new(dir: &Path, prefix: &str, version: u32) -> Self {
        Self {
            version,
            path: dir.join(format!("{prefix}.v{version}.bin")),
        }
    }
}

/// Typed handle on one cache file
pub struct VersionedCache<T> {
    spec: StorageSpec,
    check: fn(&T) -> bool,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> VersionedCache<T> {
    #[must_use]
    pub fn new(spec: StorageSpec) -> Self {
        Self {
            spec,
            check: |_| true,
            _marker: PhantomData,
        }
    }

    /// Treat loaded values failing `check` as corrupt
    #[must_use]
    pub fn with_check(mut self, check: fn(&T) -> bool) -> Self {
        self.check = check;
        self
    }

    #[must_use]
    pub const fn spec(&self) -> &StorageSpec {
        &self.spec
    }

    /// Load the cached value
    ///
    /// A missing file is a plain miss. A corrupt or stale file is logged,
    /// deleted, and also reported as a miss.
    #[must_use]
    pub fn load(&self) -> Option<T> {
        let path = &self.spec.path;
        if !path.exists() {
            debug!("cache miss: {}", path.display());
            return None;
        }

        match self.read() {
            Ok(value) => {
                info!("loaded {}", path.display());
                Some(value)
            }
            Err(e) => {
                warn!("discarding {}: {e}", path.display());
                if let Err(e) = fs::remove_file(path) {
                    warn!("cannot remove {}: {e}", path.display());
                }
                None
            }
        }
    }

    fn read(&self) -> Result<T> {
        let bytes = fs::read(&self.spec.path)?;
        let corrupt = |e: bincode::error::DecodeError| MastermindError::CacheCorruption(e.to_string());

        let (version, _): (u32, usize) =
            bincode::serde::decode_from_slice(&bytes, config::standard()).map_err(corrupt)?;
        if version != self.spec.version {
            return Err(MastermindError::CacheCorruption(format!(
                "version {version}, expected {}",
                self.spec.version
            )));
        }

        let ((_, value), _): ((u32, T), usize) =
            bincode::serde::decode_from_slice(&bytes, config::standard()).map_err(corrupt)?;
        if !(self.check)(&value) {
            return Err(MastermindError::CacheCorruption(
                "content failed validation".to_string(),
            ));
        }
        Ok(value)
    }

    /// Write `value`, rotating any existing file out of the way
    ///
    /// The new file is made read-only.
    ///
    /// # Errors
    /// Returns `Io` on filesystem failures and `CacheCorruption` if the value
    /// cannot be encoded.
    pub fn store(&self, value: &T) -> Result<()> {
        let path = &self.spec.path;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        if path.exists() {
            let rotated = rotation_target(path);
            debug!("rotating {} to {}", path.display(), rotated.display());
            fs::rename(path, &rotated)?;
        }

        let bytes = bincode::serde::encode_to_vec((self.spec.version, value), config::standard())
            .map_err(|e| MastermindError::CacheCorruption(e.to_string()))?;
        fs::write(path, bytes)?;

        let mut perms = fs::metadata(path)?.permissions();
        perms.set_readonly(true);
        fs::set_permissions(path, perms)?;

        info!("stored {}", path.display());
        Ok(())
    }

    /// Load the value, or build and store it
    ///
    /// A failed store is logged; the freshly built value is still returned.
    pub fn get_or_compute(&self, make: impl FnOnce() -> T) -> T {
        if let Some(value) = self.load() {
            return value;
        }
        let value = make();
        if let Err(e) = self.store(&value) {
            warn!("cannot cache {}: {e}", self.spec.path.display());
        }
        value
    }
}

/// `<path>.<n>` for the smallest unused `n >= 1`
fn rotation_target(path: &Path) -> PathBuf {
    (1u32..)
        .map(|n| {
            let mut name = path.as_os_str().to_owned();
            name.push(format!(".{n}"));
            PathBuf::from(name)
        })
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| path.with_extension("old"))
}
