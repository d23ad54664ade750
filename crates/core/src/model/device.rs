use serde::Serialize;

use super::box_item::{BoxSize, ViewportBox};

/// A named device preset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Device {
    pub code: &'static str,
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
    /// Zoom a new box of this device starts at, so large screens fit on
    /// the canvas next to phones.
    pub zoom: f64,
}

impl Device {
    pub fn size(&self) -> BoxSize {
        BoxSize {
            width: self.width,
            height: self.height,
            zoom: self.zoom,
            device_code: Some(self.code.to_string()),
        }
    }
}

pub const DEVICES: &[Device] = &[
    Device {
        code: "iphone-se",
        name: "iPhone SE",
        width: 375,
        height: 667,
        zoom: 1.0,
    },
    Device {
        code: "iphone-x",
        name: "iPhone X",
        width: 375,
        height: 812,
        zoom: 1.0,
    },
    Device {
        code: "pixel-5",
        name: "Pixel 5",
        width: 393,
        height: 851,
        zoom: 1.0,
    },
    Device {
        code: "ipad",
        name: "iPad",
        width: 768,
        height: 1024,
        zoom: 0.75,
    },
    Device {
        code: "ipad-pro",
        name: "iPad Pro",
        width: 1024,
        height: 1366,
        zoom: 0.5,
    },
    Device {
        code: "laptop",
        name: "Laptop",
        width: 1366,
        height: 768,
        zoom: 0.5,
    },
    Device {
        code: "desktop-hd",
        name: "Desktop HD",
        width: 1920,
        height: 1080,
        zoom: 0.5,
    },
];

/// The device "add device" creates.
pub const DEFAULT_DEVICE_CODE: &str = "iphone-x";

/// Horizontal gap between boxes placed side by side.
const PLACEMENT_GAP: i32 = 40;

pub fn find_device(code: &str) -> Option<&'static Device> {
    DEVICES.iter().find(|device| device.code == code)
}

pub fn default_device() -> &'static Device {
    // The default code is always in the catalog.
    find_device(DEFAULT_DEVICE_CODE).unwrap_or(&DEVICES[0])
}

/// A fresh id. The nanoid alphabet (`A-Za-z0-9_-`) never contains a record
/// or list delimiter.
pub fn new_item_id() -> String {
    nanoid::nanoid!()
}

/// Where the next box goes: right of the right-most existing box, on the
/// top row. Best-effort only; nothing prevents later overlap.
fn next_position(existing: &[ViewportBox]) -> (i32, i32) {
    let right_edge = existing
        .iter()
        .map(|item| item.position_x.saturating_add(item.display_width().ceil() as i32))
        .max();
    match right_edge {
        Some(edge) => (edge.saturating_add(PLACEMENT_GAP), 0),
        None => (0, 0),
    }
}

fn place(item_id: String, device: &Device, existing: &[ViewportBox]) -> ViewportBox {
    let (position_x, position_y) = next_position(existing);
    ViewportBox {
        item_id,
        width: device.width,
        height: device.height,
        position_x,
        position_y,
        zoom: device.zoom,
        device_code: Some(device.code.to_string()),
    }
}

/// A new box for the default device with a fresh unique id.
pub fn create_default_device(existing: &[ViewportBox]) -> ViewportBox {
    place(new_item_id(), default_device(), existing)
}

const DEFAULT_LAYOUT: &[(&str, &str)] = &[
    ("default-phone", "iphone-x"),
    ("default-tablet", "ipad"),
    ("default-desktop", "desktop-hd"),
];

/// The arrangement a first-time or emptied session is seeded with: a phone,
/// a tablet and a desktop, left to right.
pub fn default_layout() -> Vec<ViewportBox> {
    let mut boxes = Vec::with_capacity(DEFAULT_LAYOUT.len());
    for (item_id, code) in DEFAULT_LAYOUT {
        if let Some(device) = find_device(code) {
            let item = place((*item_id).to_string(), device, &boxes);
            boxes.push(item);
        }
    }
    boxes
}
