// File-backed record store - the device's flash-preferences analogue
use crate::application::record_store::RecordStore;
use crate::domain::error::PanelError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One file per key under a single directory. Writes land in a temp file
/// next to the target and are renamed into place, so a key is either its
/// old record or its new one, never a torn mix. That makes the cache's
/// blob-then-flag ordering meaningful across power loss.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: &Path) -> Result<Self, PanelError> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    fn write_atomic(&self, key: &str, bytes: &[u8]) -> Result<(), PanelError> {
        let target = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.tmp"));
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &target)?;
        debug!(key, len = bytes.len(), "record written");
        Ok(())
    }
}

impl RecordStore for FileStore {
    fn get_u32(&self, key: &str) -> Option<u32> {
        let bytes = fs::read(self.path_for(key)).ok()?;
        let raw: [u8; 4] = bytes.as_slice().try_into().ok()?;
        Some(u32::from_le_bytes(raw))
    }

    fn put_u32(&self, key: &str, value: u32) -> Result<(), PanelError> {
        self.write_atomic(key, &value.to_le_bytes())
    }

    fn get_blob(&self, key: &str) -> Option<Vec<u8>> {
        fs::read(self.path_for(key)).ok()
    }

    fn put_blob(&self, key: &str, bytes: &[u8]) -> Result<(), PanelError> {
        self.write_atomic(key, bytes)
    }
}
