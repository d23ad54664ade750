use super::{Storage, StringListStore};
use crate::model::ViewportBox;
use crate::model::codec::{deserialize_box, serialize_box};

/// The box collection on top of a [`StringListStore`], one codec record per
/// list entry.
///
/// Malformed records are dropped on read; the rest keep their order.
#[derive(Debug, Clone)]
pub struct BoxListStore {
    inner: StringListStore,
    boxes: Vec<ViewportBox>,
}

impl BoxListStore {
    pub fn open(
        storage: &impl Storage,
        key: impl Into<String>,
        delimiter: impl Into<String>,
        override_initial: Option<&[ViewportBox]>,
    ) -> Self {
        let inner = StringListStore::open(
            storage,
            key,
            delimiter,
            override_initial.map(to_records),
        );
        let boxes = from_records(inner.get());
        Self { inner, boxes }
    }

    /// The decoded collection; empty when the key is absent.
    pub fn get(&self) -> &[ViewportBox] {
        &self.boxes
    }

    /// Replace the collection and persist it. `None` clears the key.
    pub fn set(&mut self, storage: &impl Storage, boxes: Option<Vec<ViewportBox>>) {
        self.inner
            .set(storage, boxes.as_deref().map(to_records));
        self.boxes = boxes.unwrap_or_default();
    }
}

fn to_records(boxes: &[ViewportBox]) -> Vec<String> {
    boxes.iter().map(serialize_box).collect()
}

fn from_records(records: Option<&[String]>) -> Vec<ViewportBox> {
    records
        .unwrap_or_default()
        .iter()
        .filter_map(|record| deserialize_box(record))
        .collect()
}
