//! File-backed key-value store: one file per key under a data directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::kv::KeyValue;

#[derive(Debug, Clone)]
pub struct FsKv {
    dir: PathBuf,
}

impl FsKv {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        // Keys map directly to file names, so keep them to a safe alphabet.
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            bail!("invalid store key: {key:?}");
        }
        Ok(self.dir.join(key))
    }
}

impl KeyValue for FsKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let blob = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        Ok(Some(blob))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        fs::write(&path, value).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        if path.exists() {
            fs::remove_file(&path).with_context(|| format!("remove {}", path.display()))?;
        }
        Ok(())
    }

    fn list_keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let entries =
            fs::read_dir(&self.dir).with_context(|| format!("list {}", self.dir.display()))?;
        for entry in entries {
            let entry = entry.with_context(|| format!("list {}", self.dir.display()))?;
            if entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                keys.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        keys.sort();
        Ok(keys)
    }
}
