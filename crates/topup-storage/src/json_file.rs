//! JSON file storage adapter.
//!
//! Persists the record as a single JSON document. Writes go to a sibling
//! temporary file that is then renamed over the original, so a crash mid-write
//! leaves the previous version intact.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use parking_lot::Mutex;

use crate::adapter::DataStore;
use crate::error::StorageResult;
use crate::types::{DataUpdate, UserData};

/// File-backed store.
///
/// A missing or unreadable document loads as the fallback record, so a fresh
/// deployment starts from zero holdings.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    fallback: UserData,
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Opens a store at `path`, creating the parent directory if needed.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Self::open_with_fallback(path, UserData::default())
    }

    /// Opens a store whose missing document loads as `fallback`.
    pub fn open_with_fallback(path: impl AsRef<Path>, fallback: UserData) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        debug!("opened JSON store at {}", path.display());
        Ok(Self {
            path,
            fallback,
            lock: Mutex::new(()),
        })
    }

    /// Location of the backing document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn read(&self) -> StorageResult<UserData> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(self.fallback.clone()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&content) {
            Ok(data) => Ok(data),
            Err(e) => {
                warn!(
                    "ignoring unreadable data file {}: {}",
                    self.path.display(),
                    e
                );
                Ok(self.fallback.clone())
            }
        }
    }

    fn write(&self, data: &UserData) -> StorageResult<()> {
        let bytes = serde_json::to_vec(data)?;
        let tmp = self.temp_path();
        let written = File::create(&tmp)
            .and_then(|mut file| {
                file.write_all(&bytes)?;
                file.sync_all()
            })
            .and_then(|()| fs::rename(&tmp, &self.path));

        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                if cleanup.kind() != ErrorKind::NotFound {
                    warn!("could not remove {}: {}", tmp.display(), cleanup);
                }
            }
            return Err(e.into());
        }
        Ok(())
    }
}

impl DataStore for JsonFileStore {
    fn backend_name(&self) -> &'static str {
        "json-file"
    }

    fn load(&self) -> StorageResult<UserData> {
        let _guard = self.lock.lock();
        self.read()
    }

    fn save(&self, data: &UserData) -> StorageResult<()> {
        let _guard = self.lock.lock();
        self.write(data)
    }

    fn update(&self, update: DataUpdate) -> StorageResult<UserData> {
        let _guard = self.lock.lock();
        let mut data = self.read()?;
        data.merge(update);
        self.write(&data)?;
        Ok(data)
    }

    fn modify(
        &self,
        f: &mut dyn FnMut(&UserData) -> Option<UserData>,
    ) -> StorageResult<UserData> {
        let _guard = self.lock.lock();
        let current = self.read()?;
        match f(&current) {
            Some(next) => {
                self.write(&next)?;
                Ok(next)
            }
            None => Ok(current),
        }
    }
}
