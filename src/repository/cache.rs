//! Local Snapshot Cache
//!
//! String key/value stores for the last known tree and the expansion set.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::CacheError;
use super::traits::TreeCache;

/// Process-local cache. Cloning is not shared; wrap in `Arc` to share.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TreeCache for MemoryCache {
    fn read(&self, key: &str) -> Result<Option<String>, CacheError> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<C: TreeCache + ?Sized> TreeCache for std::sync::Arc<C> {
    fn read(&self, key: &str) -> Result<Option<String>, CacheError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), CacheError> {
        (**self).write(key, value)
    }
}

/// One `<key>.json` file per entry under `dir`.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self, CacheError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

impl TreeCache for FileCache {
    fn read(&self, key: &str) -> Result<Option<String>, CacheError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// Read and decode a cached value. A missing key is `Ok(None)`.
pub fn load_snapshot<T, C>(cache: &C, key: &str) -> Result<Option<T>, CacheError>
where
    T: DeserializeOwned,
    C: TreeCache + ?Sized,
{
    match cache.read(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub fn store_snapshot<T, C>(cache: &C, key: &str, value: &T) -> Result<(), CacheError>
where
    T: Serialize + ?Sized,
    C: TreeCache + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    cache.write(key, &raw)
}
