//! The persistence gateway: an asynchronous key-value store that holds each collection as a JSON
//! document under a fixed key.

mod files;
mod memory;

use crate::Result;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::Arc;

pub use files::FileStorage;
pub use memory::MemoryStorage;

/// Key of the JSON array of transactions.
pub const TRANSACTIONS_KEY: &str = "expense_tracker_transactions";

/// Key of the JSON array of categories.
pub const CATEGORIES_KEY: &str = "expense_tracker_categories";

/// Key of the JSON settings object.
pub const SETTINGS_KEY: &str = "expense_tracker_settings";

/// Every key this app writes.
pub const ALL_KEYS: [&str; 3] = [TRANSACTIONS_KEY, CATEGORIES_KEY, SETTINGS_KEY];

/// Environment variable that, when set and non-empty, keeps all data in memory.
pub const IN_MEMORY_ENV: &str = "EXPENSE_TRACKER_IN_MEMORY";

/// An asynchronous string-keyed byte store. Implementations must be safe to share between the
/// store and its writer task.
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// Returns the bytes stored under `key`, or `None` if nothing has been stored.
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Replaces whatever is stored under `key`.
    async fn write(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Removes `keys`. Keys that do not exist are ignored.
    async fn delete(&self, keys: &[&str]) -> Result<()>;
}

/// Selects the storage backend.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// One JSON file per key in the data directory.
    #[default]
    Files,
    /// A process-local map. Nothing survives the process.
    Memory,
}

impl Mode {
    /// `Mode::Memory` when `EXPENSE_TRACKER_IN_MEMORY` is set and non-empty, otherwise
    /// `Mode::Files`.
    pub fn from_env() -> Self {
        match std::env::var(IN_MEMORY_ENV) {
            Ok(value) if !value.is_empty() => Mode::Memory,
            _ => Mode::Files,
        }
    }

    /// Constructs the backend for this mode. `data_dir` is only used by `Mode::Files`.
    pub fn storage(&self, data_dir: &Path) -> Arc<dyn Storage> {
        match self {
            Mode::Files => Arc::new(FileStorage::new(data_dir)),
            Mode::Memory => Arc::new(MemoryStorage::new()),
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Files => f.write_str("files"),
            Mode::Memory => f.write_str("memory"),
        }
    }
}
