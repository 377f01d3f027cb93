//! Durable persistence of generated-thumbnail records.
//!
//! The store is an injected repository, not ambient global state. The single
//! implementation keeps the whole record list as one JSON blob on disk under
//! a fixed filename, most-recent-first. Reads are fail-soft: missing or
//! unparseable data is an empty list, never an error.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::error::{ThumbforgeError, ThumbforgeResult};
use crate::model::GeneratedThumbnail;

/// Fixed filename of the persisted blob, from the original storage key.
pub const STORE_FILENAME: &str = "creator_thumb_saved.json";

pub trait ThumbnailStore {
    /// Prepend a record; the list stays most-recent-first.
    fn save(&self, record: &GeneratedThumbnail) -> ThumbforgeResult<()>;

    /// All records, most-recent-first. Never fails: corrupt or missing data
    /// yields an empty list.
    fn list(&self) -> Vec<GeneratedThumbnail>;

    /// Remove the record with the given id; no-op when absent.
    fn delete_by_id(&self, id: &str) -> ThumbforgeResult<()>;

    fn find_by_id(&self, id: &str) -> Option<GeneratedThumbnail> {
        self.list().into_iter().find(|r| r.id == id)
    }
}

/// The on-disk JSON store.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store rooted in a data directory, using the fixed blob filename.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(STORE_FILENAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_all(&self, records: &[GeneratedThumbnail]) -> ThumbforgeResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create store dir '{}'", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(records)
            .map_err(|e| ThumbforgeError::serde(e.to_string()))?;

        // Write-then-rename keeps the blob intact if we die mid-write.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .with_context(|| format!("write store temp '{}'", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("replace store '{}'", self.path.display()))?;
        Ok(())
    }
}

impl ThumbnailStore for JsonFileStore {
    fn save(&self, record: &GeneratedThumbnail) -> ThumbforgeResult<()> {
        let mut records = self.list();
        records.insert(0, record.clone());
        self.write_all(&records)
    }

    fn list(&self) -> Vec<GeneratedThumbnail> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %self.path.display(), error = %err, "store unreadable; treating as empty");
                }
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "store blob unparseable; treating as empty");
                Vec::new()
            }
        }
    }

    fn delete_by_id(&self, id: &str) -> ThumbforgeResult<()> {
        let mut records = self.list();
        records.retain(|r| r.id != id);
        self.write_all(&records)
    }
}

/// Default store location under the user data directory.
pub fn default_store_path() -> ThumbforgeResult<PathBuf> {
    let base = dirs::data_dir()
        .ok_or_else(|| ThumbforgeError::storage("no user data directory available"))?;
    Ok(base.join("thumbforge").join(STORE_FILENAME))
}
