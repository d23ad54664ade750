pub mod box_command;
pub mod commands;
pub mod theme;
pub mod types;

pub use box_command::BoxCommand;
pub use commands::{RenderCommand, TextAlign};
pub use theme::ThemeToken;
pub use types::{Point, Rect, Viewport};
