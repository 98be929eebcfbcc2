use crate::domain::empty_document;
use crate::domain::errors::StorageError;
use crate::domain::identifier::DocumentId;
use crate::domain::Document;
use crate::ports::outbound::DocumentStore;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

/// File-backed document store.
///
/// Each document lives in `<data_dir>/data_<id>.json` as pretty-printed JSON.
/// Writes go to a hidden temp file which is fsynced and renamed over the
/// target, so readers never see a torn document.
#[derive(Debug, Clone)]
pub struct FileDocumentStore {
    data_dir: PathBuf,
}

impl FileDocumentStore {
    const FILE_PREFIX: &'static str = "data_";
    const FILE_SUFFIX: &'static str = ".json";

    /// Open a store rooted at `data_dir`, creating the directory if needed.
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self, StorageError> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir).map_err(|e| StorageError::io(&data_dir, e))?;
        debug!(dir = %data_dir.display(), "document store opened");
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the record for `id`.
    pub fn path_for(&self, id: &DocumentId) -> PathBuf {
        self.data_dir
            .join(format!("{}{}{}", Self::FILE_PREFIX, id, Self::FILE_SUFFIX))
    }

    fn temp_path_for(&self, id: &DocumentId) -> PathBuf {
        self.data_dir
            .join(format!(".{}{}{}.tmp", Self::FILE_PREFIX, id, Self::FILE_SUFFIX))
    }

    /// Recover the identifier from a record file name, if it is one.
    fn id_from_file_name(name: &str) -> Option<DocumentId> {
        let raw = name
            .strip_prefix(Self::FILE_PREFIX)?
            .strip_suffix(Self::FILE_SUFFIX)?;
        DocumentId::parse(raw).ok()
    }
}

impl DocumentStore for FileDocumentStore {
    fn read(&self, id: &DocumentId) -> Result<Document, StorageError> {
        let path = self.path_for(id);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(empty_document()),
            Err(e) => return Err(StorageError::io(path, e)),
        };

        if bytes.is_empty() {
            return Ok(empty_document());
        }

        serde_json::from_slice(&bytes).map_err(|source| StorageError::Corrupt { path, source })
    }

    fn write(&self, id: &DocumentId, document: &Document) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(document).map_err(StorageError::Serialize)?;
        let target = self.path_for(id);
        let temp = self.temp_path_for(id);

        let written = (|| {
            let mut file = fs::File::create(&temp)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
            fs::rename(&temp, &target)
        })();

        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&temp) {
                if cleanup.kind() != ErrorKind::NotFound {
                    warn!(path = %temp.display(), error = %cleanup, "failed to remove temp file");
                }
            }
            return Err(StorageError::io(target, e));
        }

        debug!(id = %id, bytes = bytes.len(), "document written");
        Ok(())
    }

    fn exists(&self, id: &DocumentId) -> bool {
        self.path_for(id).is_file()
    }

    fn modified_at(&self, id: &DocumentId) -> Option<SystemTime> {
        fs::metadata(self.path_for(id)).and_then(|m| m.modified()).ok()
    }

    fn stale(&self, max_age: Duration) -> Result<Vec<DocumentId>, StorageError> {
        let entries = fs::read_dir(&self.data_dir).map_err(|e| StorageError::io(&self.data_dir, e))?;
        let now = SystemTime::now();
        let mut stale = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| StorageError::io(&self.data_dir, e))?;
            let Some(id) = entry.file_name().to_str().and_then(Self::id_from_file_name) else {
                continue;
            };

            let modified = match entry.metadata().and_then(|m| m.modified()) {
                Ok(modified) => modified,
                Err(e) => {
                    warn!(id = %id, error = %e, "cannot stat document, skipping");
                    continue;
                }
            };

            // A modification time in the future counts as fresh.
            if now.duration_since(modified).map_or(false, |age| age > max_age) {
                stale.push(id);
            }
        }

        Ok(stale)
    }

    fn remove(&self, id: &DocumentId) -> Result<(), StorageError> {
        let path = self.path_for(id);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io(path, e)),
        }
    }
}
