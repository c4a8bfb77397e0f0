mod config;
pub mod database;
pub mod persist;

pub use config::{Config, DisplayConfig, StorageConfig};
pub use database::Database;
pub use persist::{load_session, save_check_ins, save_quit_instant, save_session, Loaded};

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::StoreError;

/// Narrow key-value interface the tracker persists through.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<S: KvStore + ?Sized> KvStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).put(key, value)
    }
}

/// In-process store. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Returns the data directory, creating it if needed.
///
/// `SMOKEFREE_DATA_DIR` wins when set. Otherwise `~/.config/smokefree[-dev]/`
/// based on `SMOKEFREE_ENV` (set `SMOKEFREE_ENV=dev` for the development
/// directory).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("SMOKEFREE_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("SMOKEFREE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("smokefree-dev")
            } else {
                base_dir.join("smokefree")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
