pub mod box_item;
pub mod codec;
pub mod collection;
pub mod device;
pub mod session;

pub use box_item::{BoxSize, ViewportBox};
pub use codec::{deserialize_box, serialize_box};
pub use device::{Device, create_default_device, default_layout, find_device};
pub use session::Session;
