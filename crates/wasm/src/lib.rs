mod bridge;
mod web_storage;

use std::cell::RefCell;

use everysize_core::model::Session;
use everysize_protocol::Viewport;
use wasm_bindgen::prelude::*;

use crate::bridge::BridgeError;
use crate::web_storage::WebStorage;

thread_local! {
    static SESSION: RefCell<Option<Session<WebStorage>>> = const { RefCell::new(None) };
}

fn js_error(error: impl std::fmt::Display) -> JsError {
    JsError::new(&error.to_string())
}

fn with_session<T>(
    f: impl FnOnce(&mut Session<WebStorage>) -> Result<T, BridgeError>,
) -> Result<T, JsError> {
    SESSION.with(|cell| {
        let mut slot = cell.borrow_mut();
        let session = slot.as_mut().ok_or(BridgeError::NotInitialised).map_err(js_error)?;
        f(session).map_err(js_error)
    })
}

/// Open the session over `localStorage`. `query` is `location.search`; a
/// `url` parameter in it is a shared link, used when nothing is stored yet.
#[wasm_bindgen]
pub fn init(query: &str) {
    let session = bridge::open_session(WebStorage::local(), query);
    SESSION.with(|cell| *cell.borrow_mut() = Some(session));
}

/// All boxes as a JSON array.
#[wasm_bindgen]
pub fn boxes_json() -> Result<String, JsError> {
    with_session(|session| bridge::boxes_json(session))
}

#[wasm_bindgen]
pub fn devices_json() -> Result<String, JsError> {
    bridge::devices_json().map_err(js_error)
}

#[wasm_bindgen]
pub fn current_url() -> Result<Option<String>, JsError> {
    with_session(|session| Ok(session.url().map(str::to_string)))
}

/// `query` rewritten to carry the current URL, for `history.replaceState`.
#[wasm_bindgen]
pub fn query_for_current_url(query: &str) -> Result<String, JsError> {
    with_session(|session| Ok(bridge::query_for_current_url(session, query)))
}

#[wasm_bindgen]
pub fn set_url(url: &str) -> Result<(), JsError> {
    with_session(|session| {
        session.set_url(url);
        Ok(())
    })
}

/// Returns the new box's id.
#[wasm_bindgen]
pub fn add_device() -> Result<String, JsError> {
    with_session(|session| Ok(session.add_device()))
}

#[wasm_bindgen]
pub fn remove_box(item_id: &str) -> Result<(), JsError> {
    with_session(|session| {
        session.remove_box(item_id);
        Ok(())
    })
}

#[wasm_bindgen]
pub fn resize_box(
    item_id: &str,
    width: u32,
    height: u32,
    zoom: f64,
    device_code: Option<String>,
) -> Result<(), JsError> {
    with_session(|session| {
        session.resize_box(item_id, width, height, zoom, device_code);
        Ok(())
    })
}

#[wasm_bindgen]
pub fn move_box(item_id: &str, position_x: i32, position_y: i32) -> Result<(), JsError> {
    with_session(|session| {
        session.move_box(item_id, position_x, position_y);
        Ok(())
    })
}

#[wasm_bindgen]
pub fn apply_device(item_id: &str, device_code: &str) -> Result<(), JsError> {
    with_session(|session| {
        session.apply_device(item_id, device_code);
        Ok(())
    })
}

/// Apply a `BoxCommand` given as JSON. Returns the new id for `AddDevice`.
#[wasm_bindgen]
pub fn apply_command(command_json: &str) -> Result<Option<String>, JsError> {
    with_session(|session| bridge::apply_json(session, command_json))
}

/// Grid constants and metrics for a container measured at `width` pixels.
/// Pass `undefined` before the container has been measured.
#[wasm_bindgen]
pub fn grid_json(width: Option<u32>) -> Result<String, JsError> {
    with_session(|session| bridge::grid_json(session, width))
}

/// Render the canvas, returning render commands as JSON.
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn render_canvas(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    dpr: f64,
    zoom: f64,
    selected: Option<String>,
) -> Result<String, JsError> {
    let viewport = Viewport {
        x,
        y,
        width,
        height,
        dpr,
        zoom,
    };
    with_session(|session| bridge::canvas_json(session, &viewport, selected.as_deref()))
}
