//! File-backed store for native front ends.
//!
//! The whole key-value map lives in one JSON object on disk:
//!
//! ```json
//! {
//!   "isdstore.auth": "{\"accessToken\":\"...\",\"refreshToken\":\"...\"}",
//!   "isdstore.profile": "{\"email\":\"alice@example.com\"}"
//! }
//! ```
//!
//! Each write serializes the full map to a sibling `.tmp` file and renames it
//! over the original, so a crash mid-write leaves either the old or the new
//! map, never a torn one. On Unix the file is created with mode 0600 since it
//! holds bearer tokens.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write as _};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{Storage, StorageError};

type Items = BTreeMap<String, String>;

#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: Mutex<Items>,
}

impl FileStorage {
    /// Open the store at `path`, loading any map already on disk.
    ///
    /// A missing file starts an empty store. A file that is not a JSON
    /// string map is treated like a missing one and is replaced by the next
    /// write.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let items = match fs::read_to_string(&path) {
            Ok(contents) => parse_items(&path, &contents),
            Err(e) if e.kind() == ErrorKind::NotFound => Items::new(),
            Err(source) => return Err(StorageError::Io { path, source }),
        };
        Ok(Self { path, items: Mutex::new(items) })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn items(&self) -> MutexGuard<'_, Items> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Persist `next` and, only once it is on disk, make it the live map.
    fn commit(&self, items: &mut Items, next: Items) -> Result<(), StorageError> {
        self.write_to_disk(&next)?;
        *items = next;
        Ok(())
    }

    fn write_to_disk(&self, items: &Items) -> Result<(), StorageError> {
        let contents = serde_json::to_string_pretty(items)?;
        let io_err = |source| StorageError::Io { path: self.path.clone(), source };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        let mut file = open_private(&tmp).map_err(io_err)?;
        file.write_all(contents.as_bytes()).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
        drop(file);

        fs::rename(&tmp, &self.path).map_err(io_err)
    }
}

/// Open `path` for writing, readable by the owner only from the moment it
/// exists. A leftover file from an interrupted write is narrowed too.
#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = fs::OpenOptions::new().write(true).create(true).truncate(true).mode(0o600).open(path)?;
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    fs::OpenOptions::new().write(true).create(true).truncate(true).open(path)
}

fn parse_items(path: &Path, contents: &str) -> Items {
    if contents.trim().is_empty() {
        return Items::new();
    }
    match serde_json::from_str(contents) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable storage file");
            Items::new()
        }
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items();
        let mut next = items.clone();
        next.insert(key.to_owned(), value.to_owned());
        self.commit(&mut items, next)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items();
        if !items.contains_key(key) {
            return Ok(());
        }
        let mut next = items.clone();
        next.remove(key);
        self.commit(&mut items, next)
    }
}

#[cfg(test)]
#[path = "file_test.rs"]
mod file_test;
