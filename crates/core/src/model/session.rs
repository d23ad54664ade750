use everysize_protocol::BoxCommand;

use super::box_item::{BoxSize, ViewportBox};
use super::codec::encodable_size;
use super::collection;
use super::device::{create_default_device, default_layout, find_device};
use crate::config::EverysizeConfig;
use crate::layout::{GridLayout, GridMetrics};
use crate::store::{BOXES_KEY, BoxListStore, PersistedValue, Storage, URL_KEY};
use crate::sync::{UrlState, reconcile_on_edit, reconcile_on_init};

/// The box collection and preview URL of one running app.
///
/// This is the single place surfaces mutate boxes through. Every mutation
/// is written to storage before it returns, and none of them can fail: an
/// unknown `item_id` leaves the collection as it was (and still re-persists
/// it, which is harmless).
#[derive(Debug)]
pub struct Session<S: Storage> {
    storage: S,
    config: EverysizeConfig,
    boxes: BoxListStore,
    stored_url: PersistedValue,
    url: UrlState,
}

impl<S: Storage> Session<S> {
    /// Open a session over `storage`.
    ///
    /// `ephemeral_url` is the URL the app was navigated with, if any. An
    /// empty stored collection is seeded with the default layout, and the
    /// URL pair is reconciled: a stored URL wins over the link, which is
    /// only recorded when nothing is stored yet. A second open over the
    /// same storage finds both already in place and changes nothing.
    pub fn open(storage: S, config: EverysizeConfig, ephemeral_url: Option<String>) -> Self {
        let ephemeral_url = ephemeral_url.filter(|url| !url.trim().is_empty());
        let mut boxes = BoxListStore::open(
            &storage,
            BOXES_KEY,
            config.session.list_delimiter.as_str(),
            None,
        );
        if boxes.get().is_empty() {
            tracing::debug!("seeding empty collection with the default layout");
            boxes.set(&storage, Some(default_layout()));
        } else {
            let unique = collection::dedup_ids(boxes.get().to_vec());
            if unique.len() != boxes.get().len() {
                tracing::debug!("dropping boxes with repeated ids");
                boxes.set(&storage, Some(unique));
            }
        }

        let stored_url = PersistedValue::open(&storage, URL_KEY, ephemeral_url.clone());
        let initial = UrlState::new(ephemeral_url, stored_url.get().map(str::to_string));
        let url = reconcile_on_init(&initial, &config.session.default_url);

        let mut session = Self {
            storage,
            config,
            boxes,
            stored_url,
            url: initial,
        };
        session.adopt_url(url);
        tracing::info!(
            boxes = session.boxes().len(),
            url = session.url().unwrap_or_default(),
            "session opened"
        );
        session
    }

    pub fn boxes(&self) -> &[ViewportBox] {
        self.boxes.get()
    }

    pub fn find_box(&self, item_id: &str) -> Option<&ViewportBox> {
        collection::find(self.boxes(), item_id)
    }

    /// The URL being previewed.
    pub fn url(&self) -> Option<&str> {
        self.url.current()
    }

    pub fn url_state(&self) -> &UrlState {
        &self.url
    }

    pub fn grid(&self) -> &GridLayout {
        &self.config.layout
    }

    /// Grid metrics for a freshly measured container, or the initial
    /// metrics while the container has not been measured yet.
    pub fn grid_metrics(&self, measured_width: Option<u32>) -> GridMetrics {
        match measured_width {
            Some(width) => self.config.layout.metrics(width),
            None => self.config.layout.initial_metrics(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// The user submitted a new URL in the navigation bar.
    pub fn set_url(&mut self, url: &str) {
        let next = reconcile_on_edit(&self.url, url);
        if next != self.url {
            tracing::info!(url = next.current().unwrap_or_default(), "preview url changed");
        }
        self.adopt_url(next);
    }

    /// Append a default device; returns its id.
    pub fn add_device(&mut self) -> String {
        let item = create_default_device(self.boxes());
        let item_id = item.item_id.clone();
        let next = collection::appended(self.boxes(), item);
        self.replace(next);
        item_id
    }

    pub fn remove_box(&mut self, item_id: &str) {
        let next = collection::removed(self.boxes(), item_id);
        self.replace(next);
    }

    pub fn resize_box(
        &mut self,
        item_id: &str,
        width: u32,
        height: u32,
        zoom: f64,
        device_code: Option<String>,
    ) {
        let size = BoxSize {
            width,
            height,
            zoom,
            device_code,
        };
        let size = match encodable_size(size, &self.config.session.list_delimiter) {
            Ok(size) => size,
            Err(error) => {
                tracing::debug!(item_id, %error, "ignoring resize");
                return;
            }
        };
        let next = collection::resized(self.boxes(), item_id, &size);
        self.replace(next);
    }

    pub fn move_box(&mut self, item_id: &str, position_x: i32, position_y: i32) {
        let next = collection::moved(self.boxes(), item_id, position_x, position_y);
        self.replace(next);
    }

    /// Resize a box to a catalog device. Unknown codes change nothing.
    pub fn apply_device(&mut self, item_id: &str, device_code: &str) {
        match find_device(device_code) {
            Some(device) => {
                let size = device.size();
                self.resize_box(item_id, size.width, size.height, size.zoom, size.device_code);
            }
            None => tracing::debug!(device_code, "unknown device preset"),
        }
    }

    /// Dispatch a gesture command. Returns the id of a newly added box.
    pub fn apply(&mut self, command: BoxCommand) -> Option<String> {
        match command {
            BoxCommand::AddDevice => return Some(self.add_device()),
            BoxCommand::Remove { item_id } => self.remove_box(&item_id),
            BoxCommand::Resize {
                item_id,
                width,
                height,
                zoom,
                device_code,
            } => self.resize_box(&item_id, width, height, zoom, device_code),
            BoxCommand::Move {
                item_id,
                position_x,
                position_y,
            } => self.move_box(&item_id, position_x, position_y),
            BoxCommand::ApplyDevice {
                item_id,
                device_code,
            } => self.apply_device(&item_id, &device_code),
        }
        None
    }

    fn replace(&mut self, boxes: Vec<ViewportBox>) {
        self.boxes.set(&self.storage, Some(boxes));
    }

    fn adopt_url(&mut self, next: UrlState) {
        if next.durable.as_deref() != self.stored_url.get() {
            self.stored_url.set(&self.storage, next.durable.clone());
        }
        self.url = next;
    }
}
