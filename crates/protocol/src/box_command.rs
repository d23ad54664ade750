use serde::{Deserialize, Serialize};

/// A user gesture against the box collection, decoupled from any UI event
/// system.
///
/// Surfaces translate their own input (a drag ending, a close button, the
/// floating add button) into one of these and hand it to the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BoxCommand {
    /// Append a box sized like the default device.
    AddDevice,
    /// Close the box with this id.
    Remove { item_id: String },
    /// New viewport size, zoom, and device preset for a box.
    Resize {
        item_id: String,
        width: u32,
        height: u32,
        zoom: f64,
        device_code: Option<String>,
    },
    /// New canvas position for a box.
    Move {
        item_id: String,
        position_x: i32,
        position_y: i32,
    },
    /// Resize a box to one of the named device presets.
    ApplyDevice { item_id: String, device_code: String },
}

impl BoxCommand {
    /// The box this command targets, if any.
    pub fn item_id(&self) -> Option<&str> {
        match self {
            BoxCommand::AddDevice => None,
            BoxCommand::Remove { item_id }
            | BoxCommand::Resize { item_id, .. }
            | BoxCommand::Move { item_id, .. }
            | BoxCommand::ApplyDevice { item_id, .. } => Some(item_id),
        }
    }
}
