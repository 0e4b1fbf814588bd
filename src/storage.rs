use crate::errors::StoreError;
use serde::{de::DeserializeOwned, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::PathBuf,
};
use serde_json::Value;
use tracing::{error, warn};

/// String-valued storage scoped to one user profile.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;

    /// Moves the value under `key` to `<key>.corrupt` so the next `set`
    /// cannot overwrite it.
    fn set_aside(&mut self, key: &str) -> Result<(), StoreError>;
}

/// Process-local store. Nothing survives a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn set_aside(&mut self, key: &str) -> Result<(), StoreError> {
        if let Some(value) = self.values.remove(key) {
            self.values.insert(format!("{key}.corrupt"), value);
        }
        Ok(())
    }
}

/// One `<key>.json` document per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn set_aside(&mut self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        match fs::rename(&path, path.with_extension("json.corrupt")) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Reads a JSON array stored under `key`. A missing key yields an empty
/// collection. Rows that do not deserialize are logged and skipped; a value
/// that is not a JSON array is set aside and yields an empty collection.
pub fn load_collection<T, S>(store: &mut S, key: &str) -> Vec<T>
where
    T: DeserializeOwned,
    S: KeyValueStore,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            error!("failed to read {key}: {err}");
            return Vec::new();
        }
    };

    let rows = match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Array(rows)) => rows,
        Ok(_) => {
            error!("{key} is not a list, setting it aside");
            set_aside(store, key);
            return Vec::new();
        }
        Err(err) => {
            error!("failed to parse {key}: {err}, setting it aside");
            set_aside(store, key);
            return Vec::new();
        }
    };

    rows.into_iter()
        .enumerate()
        .filter_map(|(position, row)| match serde_json::from_value(row) {
            Ok(item) => Some(item),
            Err(err) => {
                warn!("skipping row {position} of {key}: {err}");
                None
            }
        })
        .collect()
}

fn set_aside<S: KeyValueStore>(store: &mut S, key: &str) {
    if let Err(err) = store.set_aside(key) {
        error!("failed to set aside {key}: {err}");
    }
}

pub fn persist_collection<T, S>(store: &mut S, key: &str, items: &[T]) -> Result<(), StoreError>
where
    T: Serialize,
    S: KeyValueStore,
{
    let payload = serde_json::to_string_pretty(items)?;
    store.set(key, payload)
}

#[cfg(test)]
pub(crate) fn unique_temp_dir(label: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("fit_tracker_{label}_{}_{}", std::process::id(), nanos));
    path
}

/// Reads like its inner store but fails every write.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub(crate) struct ReadOnlyStore {
    pub inner: MemoryStore,
}

#[cfg(test)]
impl ReadOnlyStore {
    pub fn with(key: &str, value: &str) -> Self {
        let mut inner = MemoryStore::new();
        inner.values.insert(key.to_string(), value.to_string());
        Self { inner }
    }
}

#[cfg(test)]
impl KeyValueStore for ReadOnlyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key)
    }

    fn set(&mut self, _key: &str, _value: String) -> Result<(), StoreError> {
        Err(std::io::Error::new(ErrorKind::PermissionDenied, "read-only store").into())
    }

    fn set_aside(&mut self, key: &str) -> Result<(), StoreError> {
        self.inner.set_aside(key)
    }
}
