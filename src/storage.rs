use std::{
    collections::HashMap,
    fs,
    io::ErrorKind,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use tracing::{event, Level};

use crate::errors::StorageError;

/// String key-value persistence with browser-storage semantics: reads and
/// writes are synchronous and every write replaces the whole value.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

#[derive(Clone, Default)]
pub struct InMemoryKeyValueStore {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        InMemoryKeyValueStore {
            items: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let lock = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(lock.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut lock = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        lock.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Keeps every key in a single JSON object on disk. The file is rewritten on
/// each `set_item`.
pub struct FileKeyValueStore {
    file_path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileKeyValueStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        FileKeyValueStore {
            file_path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Result<HashMap<String, String>, StorageError> {
        match fs::read(&self.file_path) {
            Ok(bytes) if bytes.is_empty() => Ok(HashMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut items = self.load()?;
        Ok(items.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::Poisoned)?;

        let mut items = self.load()?;
        items.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.file_path, serde_json::to_vec(&items)?)?;

        event!(Level::TRACE, key, path = %self.file_path.display(), "storage item written");
        Ok(())
    }
}
