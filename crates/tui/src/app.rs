//! Interactive canvas state: selection, pan and zoom, URL editing, and the
//! translation of keys and mouse gestures into [`BoxCommand`]s.

use std::borrow::Cow;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use everysize_core::model::device::DEVICES;
use everysize_core::model::{Session, ViewportBox};
use everysize_core::store::Storage;
use everysize_core::views::{CanvasScene, box_at, box_title, to_canvas};
use everysize_protocol::{BoxCommand, Point, Viewport};

/// Surface pixels covered by one terminal cell.
pub const CELL_WIDTH: f64 = 8.0;
pub const CELL_HEIGHT: f64 = 16.0;

const DEFAULT_ZOOM: f64 = 0.25;
const MIN_CANVAS_ZOOM: f64 = 0.05;
const MAX_CANVAS_ZOOM: f64 = 2.0;
const MIN_BOX_ZOOM: f64 = 0.1;
const MAX_BOX_ZOOM: f64 = 4.0;
const ZOOM_STEP: f64 = 1.25;
/// Pan distance per key press, in surface pixels.
const PAN_STEP: f64 = 64.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal,
    EditUrl(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone)]
struct Drag {
    item_id: String,
    grab: Point,
    origin: (i32, i32),
    position: (i32, i32),
}

pub struct App<S: Storage> {
    session: Session<S>,
    pub selected: Option<String>,
    /// Canvas coordinate shown at the top-left of the content area.
    pub pan: Point,
    pub zoom: f64,
    pub mode: Mode,
    pub status: Option<String>,
    drag: Option<Drag>,
}

impl<S: Storage> App<S> {
    pub fn new(session: Session<S>) -> Self {
        Self {
            session,
            selected: None,
            pan: Point::new(0.0, 0.0),
            zoom: DEFAULT_ZOOM,
            mode: Mode::Normal,
            status: None,
            drag: None,
        }
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    /// Viewport for a content area of `columns` × `rows` cells.
    pub fn viewport(&self, columns: u16, rows: u16) -> Viewport {
        Viewport {
            x: self.pan.x,
            y: self.pan.y,
            zoom: self.zoom,
            ..Viewport::new(f64::from(columns) * CELL_WIDTH, f64::from(rows) * CELL_HEIGHT)
        }
    }

    /// Boxes as they should be drawn, with an in-progress drag applied.
    pub fn display_boxes(&self) -> Cow<'_, [ViewportBox]> {
        let boxes = self.session.boxes();
        match &self.drag {
            Some(drag) if drag.position != drag.origin => Cow::Owned(
                boxes
                    .iter()
                    .map(|item| {
                        if item.item_id == drag.item_id {
                            item.with_position(drag.position.0, drag.position.1)
                        } else {
                            item.clone()
                        }
                    })
                    .collect(),
            ),
            _ => Cow::Borrowed(boxes),
        }
    }

    pub fn scene<'a>(&'a self, boxes: &'a [ViewportBox], viewport: &Viewport) -> CanvasScene<'a> {
        // A terminal too small to show any canvas has not been measured.
        let measured = Some(viewport.visible_canvas().w.max(0.0) as u32).filter(|w| *w > 0);
        CanvasScene {
            boxes,
            grid: self.session.grid(),
            metrics: self.session.grid_metrics(measured),
            url: self.session.url(),
            selected: self.selected.as_deref(),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if let Mode::EditUrl(buffer) = &mut self.mode {
            match key.code {
                KeyCode::Enter => {
                    let url = std::mem::take(buffer);
                    self.mode = Mode::Normal;
                    self.session.set_url(&url);
                    self.status = self.session.url().map(|url| format!("previewing {url}"));
                }
                KeyCode::Esc => self.mode = Mode::Normal,
                KeyCode::Backspace => {
                    buffer.pop();
                }
                KeyCode::Char(c) => buffer.push(c),
                _ => {}
            }
            return Flow::Continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Flow::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Flow::Quit;
            }
            KeyCode::Char('a') => {
                if let Some(item_id) = self.session.apply(BoxCommand::AddDevice) {
                    self.status = Some(format!("added {item_id}"));
                    self.selected = Some(item_id);
                }
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                if let Some(item_id) = self.selected.take() {
                    self.session.apply(BoxCommand::Remove {
                        item_id: item_id.clone(),
                    });
                    self.status = Some(format!("removed {item_id}"));
                }
            }
            KeyCode::Tab => self.select_step(1),
            KeyCode::BackTab => self.select_step(-1),
            KeyCode::Left => self.nudge_or_pan(-1, 0),
            KeyCode::Right => self.nudge_or_pan(1, 0),
            KeyCode::Up => self.nudge_or_pan(0, -1),
            KeyCode::Down => self.nudge_or_pan(0, 1),
            KeyCode::Char('h') => self.pan_by(-1.0, 0.0),
            KeyCode::Char('l') => self.pan_by(1.0, 0.0),
            KeyCode::Char('k') => self.pan_by(0.0, -1.0),
            KeyCode::Char('j') => self.pan_by(0.0, 1.0),
            KeyCode::Char('+') | KeyCode::Char('=') => self.zoom_selected(ZOOM_STEP),
            KeyCode::Char('-') => self.zoom_selected(1.0 / ZOOM_STEP),
            KeyCode::Char(']') => {
                self.zoom = (self.zoom * ZOOM_STEP).min(MAX_CANVAS_ZOOM);
            }
            KeyCode::Char('[') => {
                self.zoom = (self.zoom / ZOOM_STEP).max(MIN_CANVAS_ZOOM);
            }
            KeyCode::Char('0') => {
                self.pan = Point::new(0.0, 0.0);
                self.zoom = DEFAULT_ZOOM;
            }
            KeyCode::Char('d') => self.cycle_device(),
            KeyCode::Char('u') => {
                self.mode = Mode::EditUrl(self.session.url().unwrap_or_default().to_string());
            }
            _ => {}
        }
        Flow::Continue
    }

    /// `origin` is the top-left cell of the content area, `viewport` the
    /// one last drawn.
    pub fn handle_mouse(&mut self, mouse: MouseEvent, origin: (u16, u16), viewport: &Viewport) {
        let surface = Point::new(
            (f64::from(mouse.column) - f64::from(origin.0) + 0.5) * CELL_WIDTH,
            (f64::from(mouse.row) - f64::from(origin.1) + 0.5) * CELL_HEIGHT,
        );
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let hit = {
                    let scene = self.scene(self.session.boxes(), viewport);
                    box_at(&scene, viewport, surface)
                        .map(|item| (item.item_id.clone(), (item.position_x, item.position_y), box_title(item)))
                };
                self.selected = hit.as_ref().map(|(item_id, ..)| item_id.clone());
                self.drag = None;
                if let Some((item_id, origin, title)) = hit {
                    self.drag = Some(Drag {
                        item_id,
                        grab: to_canvas(viewport, surface),
                        origin,
                        position: origin,
                    });
                    self.status = Some(title);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(drag) = &mut self.drag {
                    let point = to_canvas(viewport, surface);
                    drag.position = (
                        drag.origin.0.saturating_add((point.x - drag.grab.x).round() as i32),
                        drag.origin.1.saturating_add((point.y - drag.grab.y).round() as i32),
                    );
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(drag) = self.drag.take()
                    && drag.position != drag.origin
                {
                    self.session.apply(BoxCommand::Move {
                        item_id: drag.item_id,
                        position_x: drag.position.0,
                        position_y: drag.position.1,
                    });
                }
            }
            MouseEventKind::ScrollDown => self.pan_by(0.0, 1.0),
            MouseEventKind::ScrollUp => self.pan_by(0.0, -1.0),
            MouseEventKind::ScrollLeft => self.pan_by(-1.0, 0.0),
            MouseEventKind::ScrollRight => self.pan_by(1.0, 0.0),
            _ => {}
        }
    }

    fn selected_box(&self) -> Option<&ViewportBox> {
        self.selected
            .as_deref()
            .and_then(|item_id| self.session.find_box(item_id))
    }

    fn select_step(&mut self, step: isize) {
        let boxes = self.session.boxes();
        if boxes.is_empty() {
            self.selected = None;
            return;
        }
        let len = boxes.len() as isize;
        let next = match self
            .selected
            .as_deref()
            .and_then(|id| boxes.iter().position(|item| item.item_id == id))
        {
            Some(index) => (index as isize + step).rem_euclid(len),
            None if step < 0 => len - 1,
            None => 0,
        };
        let item = &boxes[next as usize];
        self.status = Some(box_title(item));
        self.selected = Some(item.item_id.clone());
    }

    fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan.x += dx * PAN_STEP / self.zoom;
        self.pan.y += dy * PAN_STEP / self.zoom;
    }

    /// Arrow keys move the selected box by one grid unit, or pan when
    /// nothing is selected.
    fn nudge_or_pan(&mut self, dx: i32, dy: i32) {
        let step = i32::try_from(self.session.grid().unit()).unwrap_or(i32::MAX);
        let Some(item) = self.selected_box() else {
            self.pan_by(f64::from(dx), f64::from(dy));
            return;
        };
        let command = BoxCommand::Move {
            item_id: item.item_id.clone(),
            position_x: item.position_x.saturating_add(dx.saturating_mul(step)),
            position_y: item.position_y.saturating_add(dy.saturating_mul(step)),
        };
        self.session.apply(command);
    }

    fn zoom_selected(&mut self, factor: f64) {
        let Some(item) = self.selected_box() else {
            return;
        };
        let zoom = (item.zoom * factor).clamp(MIN_BOX_ZOOM, MAX_BOX_ZOOM);
        let command = BoxCommand::Resize {
            item_id: item.item_id.clone(),
            width: item.width,
            height: item.height,
            zoom,
            device_code: item.device_code.clone(),
        };
        self.session.apply(command);
        self.status = self.selected_box().map(box_title);
    }

    fn cycle_device(&mut self) {
        let Some(item) = self.selected_box() else {
            return;
        };
        let next = item
            .device_code
            .as_deref()
            .and_then(|code| DEVICES.iter().position(|device| device.code == code))
            .map_or(0, |index| (index + 1) % DEVICES.len());
        let command = BoxCommand::ApplyDevice {
            item_id: item.item_id.clone(),
            device_code: DEVICES[next].code.to_string(),
        };
        self.session.apply(command);
        self.status = self.selected_box().map(box_title);
    }
}
