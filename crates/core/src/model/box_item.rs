use serde::{Deserialize, Serialize};

/// One simulated device viewport on the canvas.
///
/// `item_id` is the only identity: lookups, updates and removal all match on
/// it, and it never changes after the box is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportBox {
    pub item_id: String,
    /// Device viewport width in CSS pixels.
    pub width: u32,
    /// Device viewport height in CSS pixels.
    pub height: u32,
    /// Canvas position, free-form and possibly negative.
    pub position_x: i32,
    pub position_y: i32,
    /// Display scale, 1.0 = 100%.
    pub zoom: f64,
    /// Named device preset, `None` for a custom size.
    pub device_code: Option<String>,
}

impl ViewportBox {
    pub fn size(&self) -> BoxSize {
        BoxSize {
            width: self.width,
            height: self.height,
            zoom: self.zoom,
            device_code: self.device_code.clone(),
        }
    }

    /// Copy with size, zoom and device replaced; id and position kept.
    pub fn with_size(&self, size: BoxSize) -> Self {
        Self {
            width: size.width,
            height: size.height,
            zoom: size.zoom,
            device_code: size.device_code,
            ..self.clone()
        }
    }

    /// Copy with the position replaced; everything else kept.
    pub fn with_position(&self, position_x: i32, position_y: i32) -> Self {
        Self {
            position_x,
            position_y,
            ..self.clone()
        }
    }

    /// Width of the viewport as drawn on the canvas.
    pub fn display_width(&self) -> f64 {
        f64::from(self.width) * self.zoom
    }

    /// Height of the viewport as drawn on the canvas.
    pub fn display_height(&self) -> f64 {
        f64::from(self.height) * self.zoom
    }
}

/// The resize payload: everything a resize gesture may change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSize {
    pub width: u32,
    pub height: u32,
    pub zoom: f64,
    pub device_code: Option<String>,
}
