use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use gpa_core::store::{KeyValueStore, StoreError};

/// Store backed by a single JSON object on disk.
///
/// The whole file is read once on open and rewritten after every mutation.
/// Rewrites go to a sibling `.tmp` file that is then renamed over the
/// original, so a crash mid-write leaves the previous contents in place.
/// A file that is not a JSON object of strings is treated as empty and
/// replaced on the next write.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "store file is not a JSON object; starting empty");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StoreError::Io(format!("{}: {e}", path.display()))),
        };

        tracing::debug!(path = %path.display(), entries = entries.len(), "opened file store");
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| StoreError::Io(format!("{}: {e}", parent.display())))?;
        }

        let contents = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        let temp_path = self.temp_path();
        let io_error = |path: &Path, e: std::io::Error| StoreError::Io(format!("{}: {e}", path.display()));

        let mut file = File::create(&temp_path).map_err(|e| io_error(&temp_path, e))?;
        file.write_all(contents.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(|e| io_error(&temp_path, e))?;
        drop(file);

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            io_error(&self.path, e)
        })
    }

    /// `state.json` is staged as `state.json.tmp` in the same directory.
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("store"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(
        &self,
        key: &str,
    ) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(
        &mut self,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(
        &mut self,
        key: &str,
    ) -> Result<(), StoreError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.entries.clear();
        self.flush()
    }
}
