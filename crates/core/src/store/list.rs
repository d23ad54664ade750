use super::{Storage, read_or_warn, write_or_warn};

/// A list of strings kept under one storage key, joined by a delimiter.
///
/// The store holds the current value in memory and writes through to the
/// backend on every [`set`](Self::set), so the value it reports is always
/// the last one set, whether or not the backend accepted the write.
#[derive(Debug, Clone)]
pub struct StringListStore {
    key: String,
    delimiter: String,
    value: Option<Vec<String>>,
}

impl StringListStore {
    /// Load `key` from `storage`.
    ///
    /// Falls back to `override_initial` when nothing is stored, persisting
    /// it right away; otherwise the list starts absent.
    pub fn open(
        storage: &impl Storage,
        key: impl Into<String>,
        delimiter: impl Into<String>,
        override_initial: Option<Vec<String>>,
    ) -> Self {
        let mut store = Self {
            key: key.into(),
            delimiter: delimiter.into(),
            value: None,
        };
        match read_or_warn(storage, &store.key) {
            Some(raw) => store.value = Some(split_list(&raw, &store.delimiter)),
            None => {
                if override_initial.is_some() {
                    store.set(storage, override_initial);
                }
            }
        }
        store
    }

    /// The current list, `None` when the key is absent.
    pub fn get(&self) -> Option<&[String]> {
        self.value.as_deref()
    }

    /// Replace the list and persist it. `None` clears the key.
    pub fn set(&mut self, storage: &impl Storage, value: Option<Vec<String>>) {
        let joined = value.as_ref().map(|list| list.join(&self.delimiter));
        write_or_warn(storage, &self.key, joined.as_deref());
        self.value = value;
    }
}

/// Split a stored value into entries. An empty value is an empty list, not
/// a list holding one empty entry.
pub fn split_list(raw: &str, delimiter: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    if delimiter.is_empty() {
        return vec![raw.to_string()];
    }
    raw.split(delimiter).map(str::to_string).collect()
}

/// A single string kept under one storage key.
///
/// Same open/override/set semantics as [`StringListStore`].
#[derive(Debug, Clone)]
pub struct PersistedValue {
    key: String,
    value: Option<String>,
}

impl PersistedValue {
    pub fn open(
        storage: &impl Storage,
        key: impl Into<String>,
        override_initial: Option<String>,
    ) -> Self {
        let mut store = Self {
            key: key.into(),
            value: None,
        };
        match read_or_warn(storage, &store.key) {
            Some(raw) => store.value = Some(raw),
            None => {
                if override_initial.is_some() {
                    store.set(storage, override_initial);
                }
            }
        }
        store
    }

    pub fn get(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Replace the value and persist it. `None` clears the key.
    pub fn set(&mut self, storage: &impl Storage, value: Option<String>) {
        write_or_warn(storage, &self.key, value.as_deref());
        self.value = value;
    }
}
