//! Box layout and persistence model for everysize: many device viewports of
//! one URL, side by side on a canvas.

pub mod config;
pub mod layout;
pub mod model;
pub mod store;
pub mod sync;
pub mod views;

pub use config::EverysizeConfig;
pub use layout::{GridLayout, GridMetrics};
pub use model::{Session, ViewportBox};
