use everysize_core::store::{MemoryStorage, Storage, StorageError};
use wasm_bindgen::JsValue;

/// The browser's `localStorage`, or an in-memory map when the page has
/// none (private browsing, sandboxed iframes).
pub struct WebStorage {
    local: Option<web_sys::Storage>,
    fallback: MemoryStorage,
}

impl WebStorage {
    pub fn local() -> Self {
        let local = web_sys::window().and_then(|window| match window.local_storage() {
            Ok(storage) => storage,
            Err(error) => {
                tracing::warn!(?error, "localStorage unavailable; keeping state in memory");
                None
            }
        });
        Self {
            local,
            fallback: MemoryStorage::new(),
        }
    }
}

fn unavailable(error: JsValue) -> StorageError {
    StorageError::Unavailable(format!("{error:?}"))
}

impl Storage for WebStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match &self.local {
            Some(local) => local.get_item(key).map_err(unavailable),
            None => self.fallback.get_item(key),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        match &self.local {
            // Quota errors surface here.
            Some(local) => local.set_item(key, value).map_err(unavailable),
            None => self.fallback.set_item(key, value),
        }
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        match &self.local {
            Some(local) => local.remove_item(key).map_err(unavailable),
            None => self.fallback.remove_item(key),
        }
    }
}
