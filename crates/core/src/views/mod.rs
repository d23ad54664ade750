pub mod canvas;

pub use canvas::{CanvasScene, box_at, box_title, render_canvas, to_canvas};
