use everysize_protocol::{Point, Rect, RenderCommand, TextAlign, ThemeToken, Viewport};

use crate::layout::{GridLayout, GridMetrics};
use crate::model::{ViewportBox, find_device};

const TITLE_FONT_SIZE: f64 = 11.0;
const URL_FONT_SIZE: f64 = 12.0;
/// Column guides closer together than this (in surface pixels) are skipped.
const MIN_GUIDE_SPACING: f64 = 6.0;

/// Everything the canvas needs besides the viewport.
#[derive(Debug, Clone, Copy)]
pub struct CanvasScene<'a> {
    pub boxes: &'a [ViewportBox],
    pub grid: &'a GridLayout,
    pub metrics: GridMetrics,
    /// Shown inside every box in place of the page itself.
    pub url: Option<&'a str>,
    pub selected: Option<&'a str>,
}

/// Render the box canvas as seen through `viewport`.
///
/// Output is in surface coordinates: canvas position minus the viewport
/// origin, times the viewport zoom. Boxes are drawn in collection order
/// with the selected box last so it stays on top; boxes entirely outside
/// the viewport are skipped.
pub fn render_canvas(scene: &CanvasScene<'_>, viewport: &Viewport) -> Vec<RenderCommand> {
    let mut commands = Vec::with_capacity(scene.boxes.len() * 8 + 16);

    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(0.0, 0.0, viewport.width, viewport.height),
        color: ThemeToken::Background,
        border_color: None,
        label: None,
        item_id: None,
    });

    push_column_guides(&mut commands, scene, viewport);

    let visible = viewport.visible_canvas();
    let (selected, rest): (Vec<&ViewportBox>, Vec<&ViewportBox>) = scene
        .boxes
        .iter()
        .partition(|item| Some(item.item_id.as_str()) == scene.selected);

    for item in rest.into_iter().chain(selected) {
        let frame = scene.grid.box_frame(item);
        if !frame.intersects(&visible) {
            continue;
        }
        push_box(&mut commands, scene, viewport, item, frame);
    }

    commands
}

fn push_column_guides(commands: &mut Vec<RenderCommand>, scene: &CanvasScene<'_>, viewport: &Viewport) {
    let unit = f64::from(scene.grid.unit());
    if unit * viewport.zoom < MIN_GUIDE_SPACING {
        return;
    }
    let padding = f64::from(scene.grid.padding_size);
    let columns = scene.metrics.column_count.floor() as u32;
    for column in 0..=columns {
        let x = to_surface_x(viewport, padding + f64::from(column) * unit);
        if x < 0.0 {
            continue;
        }
        if x > viewport.width {
            break;
        }
        commands.push(RenderCommand::DrawLine {
            from: Point::new(x, 0.0),
            to: Point::new(x, viewport.height),
            color: ThemeToken::GridLine,
            width: 1.0,
        });
    }
}

fn push_box(
    commands: &mut Vec<RenderCommand>,
    scene: &CanvasScene<'_>,
    viewport: &Viewport,
    item: &ViewportBox,
    frame: Rect,
) {
    let is_selected = Some(item.item_id.as_str()) == scene.selected;
    let title = box_title(item);
    let frame = to_surface(viewport, frame);
    let title_height = f64::from(scene.grid.row_height) * viewport.zoom;
    let content = to_surface(viewport, scene.grid.box_viewport(item));

    commands.push(RenderCommand::BeginGroup {
        id: item.item_id.clone(),
        label: Some(title.clone()),
    });
    commands.push(RenderCommand::DrawRect {
        rect: frame,
        color: ThemeToken::BoxFrame,
        border_color: Some(if is_selected {
            ThemeToken::BoxFrameSelected
        } else {
            ThemeToken::Border
        }),
        label: None,
        item_id: Some(item.item_id.clone()),
    });
    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(frame.x, frame.y, frame.w, title_height),
        color: ThemeToken::BoxTitleBar,
        border_color: None,
        label: Some(title),
        item_id: Some(item.item_id.clone()),
    });
    commands.push(RenderCommand::DrawRect {
        rect: content,
        color: ThemeToken::BoxViewport,
        border_color: None,
        label: None,
        item_id: Some(item.item_id.clone()),
    });

    if let Some(url) = scene.url {
        commands.push(RenderCommand::SetClip { rect: content });
        commands.push(RenderCommand::DrawText {
            position: Point::new(content.x + content.w / 2.0, content.y + content.h / 2.0),
            text: url.to_string(),
            color: ThemeToken::BoxViewportText,
            font_size: URL_FONT_SIZE * viewport.zoom,
            align: TextAlign::Center,
        });
        commands.push(RenderCommand::ClearClip);
    }

    commands.push(RenderCommand::EndGroup);
}

/// "iPhone X 375×812 100%", or "Custom" for boxes without a known device.
pub fn box_title(item: &ViewportBox) -> String {
    let name = item
        .device_code
        .as_deref()
        .and_then(find_device)
        .map_or("Custom", |device| device.name);
    format!(
        "{name} {}×{} {:.0}%",
        item.width,
        item.height,
        item.zoom * 100.0
    )
}

/// The top-most box under a surface point, if any.
pub fn box_at<'a>(scene: &CanvasScene<'a>, viewport: &Viewport, surface: Point) -> Option<&'a ViewportBox> {
    let point = to_canvas(viewport, surface);
    let hit = |item: &&ViewportBox| scene.grid.box_frame(item).contains(point);
    let selected = scene
        .boxes
        .iter()
        .find(|item| Some(item.item_id.as_str()) == scene.selected)
        .filter(hit);
    selected.or_else(|| scene.boxes.iter().rev().find(hit))
}

/// Surface point → canvas point.
pub fn to_canvas(viewport: &Viewport, surface: Point) -> Point {
    let zoom = effective_zoom(viewport);
    Point::new(viewport.x + surface.x / zoom, viewport.y + surface.y / zoom)
}

fn to_surface_x(viewport: &Viewport, x: f64) -> f64 {
    (x - viewport.x) * effective_zoom(viewport)
}

fn to_surface(viewport: &Viewport, rect: Rect) -> Rect {
    let zoom = effective_zoom(viewport);
    Rect::new(
        (rect.x - viewport.x) * zoom,
        (rect.y - viewport.y) * zoom,
        rect.w * zoom,
        rect.h * zoom,
    )
}

fn effective_zoom(viewport: &Viewport) -> f64 {
    if viewport.zoom > 0.0 { viewport.zoom } else { 1.0 }
}
