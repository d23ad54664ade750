//! Target-independent half of the bridge: everything the exported
//! functions do, over any [`Storage`], with plain Rust errors.

use everysize_core::layout::{GridLayout, GridMetrics};
use everysize_core::model::Session;
use everysize_core::model::device::{DEVICES, Device};
use everysize_core::store::Storage;
use everysize_core::sync::query::{URL_PARAM, query_param, with_query_param};
use everysize_core::views::{CanvasScene, render_canvas};
use everysize_core::EverysizeConfig;
use everysize_protocol::{BoxCommand, Viewport};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("session not initialised; call init() first")]
    NotInitialised,
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Open a session, taking the preview URL from the page's query string.
pub fn open_session<S: Storage>(storage: S, query: &str) -> Session<S> {
    Session::open(storage, EverysizeConfig::default(), query_param(query, URL_PARAM))
}

/// The query string the address bar should show for the current URL.
pub fn query_for_current_url<S: Storage>(session: &Session<S>, query: &str) -> String {
    with_query_param(query, URL_PARAM, session.url())
}

pub fn boxes_json<S: Storage>(session: &Session<S>) -> Result<String, BridgeError> {
    Ok(serde_json::to_string(session.boxes())?)
}

pub fn devices_json() -> Result<String, BridgeError> {
    Ok(serde_json::to_string::<[Device]>(DEVICES)?)
}

#[derive(Debug, Serialize)]
struct GridInfo<'a> {
    layout: &'a GridLayout,
    metrics: GridMetrics,
    container_width: u32,
}

/// Layout constants plus the metrics for a container measured at `width`,
/// or the initial metrics before the first measurement.
pub fn grid_json<S: Storage>(
    session: &Session<S>,
    width: Option<u32>,
) -> Result<String, BridgeError> {
    let metrics = session.grid_metrics(width);
    let info = GridInfo {
        layout: session.grid(),
        metrics,
        container_width: session.grid().container_width(metrics.total_width),
    };
    Ok(serde_json::to_string(&info)?)
}

/// Apply a JSON-encoded [`BoxCommand`]; returns the new box id for
/// `AddDevice`.
pub fn apply_json<S: Storage>(
    session: &mut Session<S>,
    command: &str,
) -> Result<Option<String>, BridgeError> {
    let command: BoxCommand = serde_json::from_str(command)?;
    Ok(session.apply(command))
}

pub fn canvas_json<S: Storage>(
    session: &Session<S>,
    viewport: &Viewport,
    selected: Option<&str>,
) -> Result<String, BridgeError> {
    let measured = Some(viewport.visible_canvas().w.max(0.0) as u32).filter(|w| *w > 0);
    let scene = CanvasScene {
        boxes: session.boxes(),
        grid: session.grid(),
        metrics: session.grid_metrics(measured),
        url: session.url(),
        selected,
    };
    Ok(serde_json::to_string(&render_canvas(&scene, viewport))?)
}

#[cfg(test)]
mod tests {
    use everysize_core::store::MemoryStorage;
    use everysize_core::ViewportBox;
    use everysize_protocol::RenderCommand;

    use super::*;

    #[test]
    fn shared_link_round_trips_through_query() {
        let storage = MemoryStorage::new();
        let session = open_session(&storage, "?url=https%3A%2F%2Fa.test&x=1");
        assert_eq!(session.url(), Some("https://a.test"));
        assert_eq!(
            query_for_current_url(&session, "?x=1"),
            "?x=1&url=https%3A%2F%2Fa.test"
        );
    }

    #[test]
    fn boxes_serialize_as_json_array() {
        let storage = MemoryStorage::new();
        let session = open_session(&storage, "");
        let boxes: Vec<ViewportBox> = serde_json::from_str(&boxes_json(&session).unwrap()).unwrap();
        assert_eq!(boxes, session.boxes());
    }

    #[test]
    fn json_commands_drive_the_session() {
        let storage = MemoryStorage::new();
        let mut session = open_session(&storage, "");
        let added = apply_json(&mut session, r#""AddDevice""#).unwrap().unwrap();
        let moved = format!(r#"{{"Move":{{"item_id":"{added}","position_x":5,"position_y":-5}}}}"#);
        assert_eq!(apply_json(&mut session, &moved).unwrap(), None);
        let item = session.find_box(&added).unwrap();
        assert_eq!((item.position_x, item.position_y), (5, -5));

        assert!(matches!(
            apply_json(&mut session, r#"{"Explode":{}}"#),
            Err(BridgeError::Json(_))
        ));
    }

    #[test]
    fn grid_reports_snapped_width() {
        let storage = MemoryStorage::new();
        let session = open_session(&storage, "");
        let value: serde_json::Value = serde_json::from_str(&grid_json(&session, Some(1000)).unwrap()).unwrap();
        assert_eq!(value["metrics"]["total_width"], 990);
        assert_eq!(value["container_width"], 1000);
        assert_eq!(value["layout"]["column_width"], 20);
    }

    #[test]
    fn unmeasured_grid_reports_initial_metrics() {
        let storage = MemoryStorage::new();
        let session = open_session(&storage, "");
        let value: serde_json::Value = serde_json::from_str(&grid_json(&session, None).unwrap()).unwrap();
        assert_eq!(value["metrics"]["total_width"], 10000);
        assert_eq!(value["metrics"]["column_count"], 333.0);
    }

    #[test]
    fn canvas_json_is_render_commands() {
        let storage = MemoryStorage::new();
        let session = open_session(&storage, "");
        let json = canvas_json(&session, &Viewport::new(4000.0, 2000.0), Some("default-tablet")).unwrap();
        let cmds: Vec<RenderCommand> = serde_json::from_str(&json).unwrap();
        let last_group = cmds.iter().rev().find_map(|cmd| match cmd {
            RenderCommand::BeginGroup { id, .. } => Some(id.as_str()),
            _ => None,
        });
        assert_eq!(last_group, Some("default-tablet"));
    }

    #[test]
    fn device_catalog_lists_codes() {
        let value: serde_json::Value = serde_json::from_str(&devices_json().unwrap()).unwrap();
        assert_eq!(value[1]["code"], "iphone-x");
    }
}
