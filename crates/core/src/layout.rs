//! Grid constants and the column snapping derived from the container width.

use everysize_protocol::Rect;
use serde::{Deserialize, Serialize};

use crate::model::ViewportBox;

/// Total width assumed before the container has been measured.
pub const DEFAULT_TOTAL_WIDTH: u32 = 10_000;

/// Fixed pixel constants shared by every grid consumer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridLayout {
    pub row_height: u32,
    pub column_width: u32,
    pub padding_size: u32,
    /// Narrowest a box frame is drawn, so its title bar stays usable.
    pub minimum_grid_item_width: u32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            row_height: 20,
            column_width: 20,
            padding_size: 10,
            minimum_grid_item_width: 250,
        }
    }
}

/// What the canvas surface needs after each measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridMetrics {
    pub total_width: u32,
    /// May be fractional; placement rounds as it needs.
    pub column_count: f64,
}

impl GridLayout {
    /// One column plus its padding. Saturates for absurd configured sizes.
    pub fn unit(&self) -> u32 {
        self.column_width.saturating_add(self.padding_size)
    }

    /// Snap a measured container width down to whole column units, so the
    /// grid never ends in a partial column.
    ///
    /// `floor((measured - padding) / unit) * unit`; containers narrower than
    /// the padding get 0.
    pub fn total_width(&self, measured_width: u32) -> u32 {
        let unit = self.unit();
        if unit == 0 {
            return 0;
        }
        let usable = measured_width.saturating_sub(self.padding_size);
        (usable / unit) * unit
    }

    /// Columns that fit in `total_width`: `(total - padding) / unit`.
    pub fn column_count(&self, total_width: u32) -> f64 {
        let unit = self.unit();
        if unit == 0 {
            return 0.0;
        }
        let usable = f64::from(total_width) - f64::from(self.padding_size);
        (usable / f64::from(unit)).max(0.0)
    }

    /// Container width that measures back to exactly `total_width`.
    pub fn container_width(&self, total_width: u32) -> u32 {
        total_width.saturating_add(self.padding_size)
    }

    pub fn metrics(&self, measured_width: u32) -> GridMetrics {
        let total_width = self.total_width(measured_width);
        GridMetrics {
            total_width,
            column_count: self.column_count(total_width),
        }
    }

    /// Metrics before any measurement has happened.
    pub fn initial_metrics(&self) -> GridMetrics {
        GridMetrics {
            total_width: DEFAULT_TOTAL_WIDTH,
            column_count: self.column_count(DEFAULT_TOTAL_WIDTH),
        }
    }

    /// The frame a box occupies on the canvas: its zoomed viewport, at least
    /// `minimum_grid_item_width` wide, plus one row for the title bar.
    pub fn box_frame(&self, item: &ViewportBox) -> Rect {
        let width = item
            .display_width()
            .max(f64::from(self.minimum_grid_item_width));
        Rect::new(
            f64::from(item.position_x),
            f64::from(item.position_y),
            width,
            item.display_height() + f64::from(self.row_height),
        )
    }

    /// The zoomed viewport area of a box, below its title bar.
    pub fn box_viewport(&self, item: &ViewportBox) -> Rect {
        let frame = self.box_frame(item);
        let title = f64::from(self.row_height);
        Rect::new(frame.x, frame.y + title, item.display_width(), frame.h - title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snaps_down_to_whole_units() {
        let grid = GridLayout::default();
        assert_eq!(grid.total_width(1000), 990);
        assert_eq!(grid.total_width(1019), 990);
        assert_eq!(grid.total_width(1030), 1020);
        assert_eq!(grid.total_width(1000) % grid.unit(), 0);
    }

    #[test]
    fn narrow_containers_get_zero() {
        let grid = GridLayout::default();
        assert_eq!(grid.total_width(0), 0);
        assert_eq!(grid.total_width(10), 0);
        assert_eq!(grid.total_width(39), 0);
        assert_eq!(grid.total_width(40), 30);
    }

    #[test]
    fn container_width_measures_back_to_same_total() {
        let grid = GridLayout::default();
        let total = grid.total_width(1000);
        assert_eq!(grid.total_width(grid.container_width(total)), total);
    }

    #[test]
    fn column_count_is_fractional() {
        let grid = GridLayout::default();
        assert_eq!(grid.column_count(990), 980.0 / 30.0);
        assert_eq!(grid.initial_metrics().column_count, 333.0);
        assert_eq!(grid.column_count(0), 0.0);
    }

    #[test]
    fn zero_unit_does_not_divide() {
        let grid = GridLayout {
            column_width: 0,
            padding_size: 0,
            ..GridLayout::default()
        };
        assert_eq!(grid.total_width(500), 0);
        assert_eq!(grid.column_count(500), 0.0);
    }

    #[test]
    fn huge_columns_saturate_instead_of_overflowing() {
        let grid = GridLayout {
            column_width: u32::MAX,
            ..GridLayout::default()
        };
        assert_eq!(grid.unit(), u32::MAX);
        assert_eq!(grid.total_width(1000), 0);
        assert_eq!(grid.metrics(u32::MAX).total_width, 0);
        assert!(grid.column_count(1000) < 1.0);
    }

    #[test]
    fn frames_respect_minimum_width_and_title_bar() {
        let grid = GridLayout::default();
        let small = ViewportBox {
            item_id: "s".into(),
            width: 320,
            height: 480,
            position_x: -15,
            position_y: 30,
            zoom: 0.5,
            device_code: None,
        };
        let frame = grid.box_frame(&small);
        assert_eq!(frame, Rect::new(-15.0, 30.0, 250.0, 260.0));
        let viewport = grid.box_viewport(&small);
        assert_eq!(viewport, Rect::new(-15.0, 50.0, 160.0, 240.0));
    }
}
