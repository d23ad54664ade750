//! Durable string storage and the persisted collections built on it.
//!
//! [`Storage`] is the seam to whatever actually keeps the bytes: a map in
//! memory, a JSON file, or the browser's `localStorage`. The stores above it
//! never let a backend failure escape; they log it and keep serving the
//! in-memory value.

pub mod box_list;
pub mod file;
pub mod list;
pub mod memory;

use std::rc::Rc;

use thiserror::Error;

pub use box_list::BoxListStore;
pub use file::FileStorage;
pub use list::{PersistedValue, StringListStore};
pub use memory::MemoryStorage;

/// Key holding the box collection.
pub const BOXES_KEY: &str = "boxes_v2";
/// Key holding the last preview URL the user chose.
pub const URL_KEY: &str = "url_v1";
/// Separates box records inside [`BOXES_KEY`].
pub const DEFAULT_LIST_DELIMITER: &str = ",";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A string key/value store with synchronous reads and writes.
///
/// Methods take `&self`: several stores share one backend, and all of them
/// run on the same event loop, so implementations use interior mutability.
pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for &S {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}

impl<S: Storage + ?Sized> Storage for Rc<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}

/// Read a key, treating a backend failure as "nothing stored".
pub(crate) fn read_or_warn(storage: &impl Storage, key: &str) -> Option<String> {
    match storage.get_item(key) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(%error, key, "failed to read persisted value");
            None
        }
    }
}

/// Write (or with `None`, clear) a key, logging a backend failure.
pub(crate) fn write_or_warn(storage: &impl Storage, key: &str, value: Option<&str>) {
    let result = match value {
        Some(value) => storage.set_item(key, value),
        None => storage.remove_item(key),
    };
    if let Err(error) = result {
        tracing::warn!(%error, key, "failed to persist value");
    }
}
