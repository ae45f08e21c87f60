// src/settings.rs
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use serde_json::Value;
use crate::drivers::ScopeError;
/// Generic key/value store the views persist their settings into.
pub trait SettingsStore {
    fn set_value(&mut self, key: &str, value: Value);
    fn value(&self, key: &str) -> Option<Value>;
    fn set_f64(&mut self, key: &str, value: f64) {
        self.set_value(key, Value::from(value));
    }
    /// Reads a float, falling back to `default` when the key is missing or
    /// holds something that is not a number.
    fn value_f64(&self, key: &str, default: f64) -> f64 {
        match self.value(key) {
            None => default,
            Some(Value::Number(n)) => n.as_f64().unwrap_or(default),
            // numeric strings, as some hand-edited files carry them
            Some(Value::String(s)) => s.trim().parse().unwrap_or_else(|_| {
                log::warn!("setting {key:?}: {s:?} is not a number, using {default}");
                default
            }),
            Some(other) => {
                log::warn!("setting {key:?}: unexpected {other}, using {default}");
                default
            }
        }
    }
    /// Pushes pending writes to durable storage, if there is any.
    fn flush(&self) -> Result<(), ScopeError> {
        Ok(())
    }
}
/// Volatile store, handy for tests and for running without a settings file.
#[derive(Debug, Default, Clone)]
pub struct MemorySettings {
    values: BTreeMap<String, Value>,
}
impl MemorySettings {
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
impl SettingsStore for MemorySettings {
    fn set_value(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_owned(), value);
    }
    fn value(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }
}
/// Settings kept as a flat JSON object on disk. Writes stay in memory until `flush`.
#[derive(Debug)]
pub struct JsonSettings {
    path: PathBuf,
    values: MemorySettings,
}
impl JsonSettings {
    /// Opens `path`; a missing file starts an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ScopeError> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let text = fs::read_to_string(&path)?;
            let map: BTreeMap<String, Value> = serde_json::from_str(&text)?;
            log::info!("loaded {} setting(s) from {}", map.len(), path.display());
            MemorySettings { values: map }
        } else {
            log::info!("no settings at {}, starting fresh", path.display());
            MemorySettings::default()
        };
        Ok(Self { path, values })
    }
}
impl SettingsStore for JsonSettings {
    fn set_value(&mut self, key: &str, value: Value) {
        self.values.set_value(key, value);
    }
    fn value(&self, key: &str) -> Option<Value> {
        self.values.value(key)
    }
    fn flush(&self) -> Result<(), ScopeError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let text = serde_json::to_string_pretty(&self.values.values)?;
        fs::write(&self.path, text)?;
        log::debug!("settings written to {}", self.path.display());
        Ok(())
    }
}
