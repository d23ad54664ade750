use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

use super::box_item::{BoxSize, ViewportBox};

/// Separates the fields of one box record. Must differ from the list
/// delimiter of the store holding the records and never occur in an id.
pub const FIELD_DELIMITER: char = '|';

/// Number of fields in a record: id, width, height, x, y, zoom, device.
pub const FIELD_COUNT: usize = 7;

#[derive(Debug, Error, PartialEq)]
pub enum BoxDecodeError {
    #[error("expected 7 fields, found {0}")]
    FieldCount(usize),
    #[error("empty item id")]
    EmptyId,
    #[error("{field}: {source}")]
    Integer {
        field: &'static str,
        source: ParseIntError,
    },
    #[error("zoom: {0}")]
    Zoom(#[from] ParseFloatError),
    #[error("{field} must be positive")]
    NotPositive { field: &'static str },
    #[error("device code {0:?} contains a delimiter")]
    DeviceCode(String),
}

/// Encode a box as a single `|`-delimited record.
///
/// A missing device code is written as an empty last field so every record
/// has exactly [`FIELD_COUNT`] fields.
pub fn serialize_box(item: &ViewportBox) -> String {
    format!(
        "{id}{d}{w}{d}{h}{d}{x}{d}{y}{d}{zoom}{d}{device}",
        d = FIELD_DELIMITER,
        id = item.item_id,
        w = item.width,
        h = item.height,
        x = item.position_x,
        y = item.position_y,
        zoom = item.zoom,
        device = item.device_code.as_deref().unwrap_or(""),
    )
}

/// Decode a record, reporting why it was rejected.
pub fn decode_box(record: &str) -> Result<ViewportBox, BoxDecodeError> {
    let fields: Vec<&str> = record.split(FIELD_DELIMITER).collect();
    let &[id, width, height, x, y, zoom, device] = &fields[..] else {
        return Err(BoxDecodeError::FieldCount(fields.len()));
    };

    if id.is_empty() {
        return Err(BoxDecodeError::EmptyId);
    }

    let int = |field: &'static str| {
        move |source: ParseIntError| BoxDecodeError::Integer { field, source }
    };
    let width: u32 = width.parse().map_err(int("width"))?;
    let height: u32 = height.parse().map_err(int("height"))?;
    let position_x: i32 = x.parse().map_err(int("position_x"))?;
    let position_y: i32 = y.parse().map_err(int("position_y"))?;
    let zoom: f64 = zoom.parse()?;

    check_positive(width, height, zoom)?;

    Ok(ViewportBox {
        item_id: id.to_string(),
        width,
        height,
        position_x,
        position_y,
        zoom,
        device_code: (!device.is_empty()).then(|| device.to_string()),
    })
}

fn check_positive(width: u32, height: u32, zoom: f64) -> Result<(), BoxDecodeError> {
    if width == 0 {
        return Err(BoxDecodeError::NotPositive { field: "width" });
    }
    if height == 0 {
        return Err(BoxDecodeError::NotPositive { field: "height" });
    }
    if !(zoom.is_finite() && zoom > 0.0) {
        return Err(BoxDecodeError::NotPositive { field: "zoom" });
    }
    Ok(())
}

/// Check that a box given `size` would decode back to the same value when
/// stored in a list joined by `list_delimiter`.
///
/// An empty device code is normalised to `None`. A code sharing any
/// character with either delimiter is refused, since it would split the
/// record or the list.
pub fn encodable_size(size: BoxSize, list_delimiter: &str) -> Result<BoxSize, BoxDecodeError> {
    check_positive(size.width, size.height, size.zoom)?;
    let device_code = size.device_code.filter(|code| !code.is_empty());
    let splits = |code: &&str| {
        code.chars()
            .any(|c| c == FIELD_DELIMITER || list_delimiter.contains(c))
    };
    if let Some(code) = device_code.as_deref().filter(splits) {
        return Err(BoxDecodeError::DeviceCode(code.to_string()));
    }
    Ok(BoxSize {
        device_code,
        ..size
    })
}

/// Decode a record, or `None` if it is malformed in any way.
///
/// Callers drop `None` entries instead of failing the whole list.
pub fn deserialize_box(record: &str) -> Option<ViewportBox> {
    match decode_box(record) {
        Ok(item) => Some(item),
        Err(error) => {
            tracing::debug!(%error, record, "dropping malformed box record");
            None
        }
    }
}
