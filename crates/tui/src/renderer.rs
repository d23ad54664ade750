use std::io::stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use everysize_core::model::Session;
use everysize_core::store::Storage;
use everysize_core::views::render_canvas;
use everysize_protocol::{RenderCommand, TextAlign, ThemeToken};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Paragraph},
};

use crate::app::{App, CELL_HEIGHT, CELL_WIDTH, Flow, Mode};

fn theme_to_color(token: ThemeToken) -> Color {
    match token {
        ThemeToken::Background => Color::Black,
        ThemeToken::Surface => Color::Rgb(24, 24, 24),
        ThemeToken::Border => Color::DarkGray,
        ThemeToken::GridLine => Color::Rgb(40, 40, 40),
        ThemeToken::BoxFrame => Color::Rgb(30, 30, 30),
        ThemeToken::BoxFrameSelected => Color::LightCyan,
        ThemeToken::BoxTitleBar => Color::DarkGray,
        ThemeToken::BoxTitleText => Color::White,
        ThemeToken::BoxViewport => Color::Rgb(235, 235, 235),
        ThemeToken::BoxViewportText => Color::Blue,
        ThemeToken::TextPrimary => Color::White,
        ThemeToken::TextSecondary => Color::Gray,
        ThemeToken::TextMuted => Color::DarkGray,
        ThemeToken::ToolbarBackground => Color::DarkGray,
        ThemeToken::ToolbarText => Color::White,
    }
}

const HELP: &str = "a add · x remove · tab select · ←↑→↓ move · +/- zoom · d device · u url · hjkl pan · [/] canvas zoom · q quit";

pub fn run_canvas<S: Storage>(session: Session<S>) -> Result<()> {
    let mut app = App::new(session);

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn event_loop<S: Storage>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App<S>,
) -> Result<()> {
    loop {
        let term_size = terminal.size()?;
        let content_area = Rect::new(0, 1, term_size.width, term_size.height.saturating_sub(2));
        let viewport = app.viewport(content_area.width, content_area.height);

        let boxes = app.display_boxes();
        let cmds = render_canvas(&app.scene(&boxes, &viewport), &viewport);
        let header_text = format!(
            " everysize · {} · {} boxes ",
            app.session().url().unwrap_or_default(),
            app.session().boxes().len()
        );
        let footer_text = match &app.mode {
            Mode::EditUrl(buffer) => format!(" url: {buffer}▏ (enter to apply, esc to cancel)"),
            Mode::Normal => match &app.status {
                Some(status) => format!(" {status} · {HELP}"),
                None => format!(" {HELP}"),
            },
        };

        terminal.draw(|frame| {
            let area = frame.area();
            let toolbar = Style::default()
                .fg(theme_to_color(ThemeToken::ToolbarText))
                .bg(theme_to_color(ThemeToken::ToolbarBackground));

            frame.render_widget(
                Paragraph::new(header_text).style(toolbar),
                Rect::new(0, 0, area.width, 1),
            );
            draw_commands(frame.buffer_mut(), content_area, &cmds);
            frame.render_widget(
                Block::default().title(footer_text).style(toolbar),
                Rect::new(0, area.height.saturating_sub(1), area.width, 1),
            );
        })?;
        drop(boxes);

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if app.handle_key(key) == Flow::Quit {
                        break;
                    }
                }
                Event::Mouse(mouse) => {
                    app.handle_mouse(mouse, (content_area.x, content_area.y), &viewport);
                }
                _ => {}
            }
        }
    }
    Ok(())
}

/// Map a surface rect to the cells it covers inside `area`.
fn cell_rect(rect: &everysize_protocol::Rect, area: Rect) -> Option<Rect> {
    let left = (rect.x / CELL_WIDTH).floor().max(0.0);
    let top = (rect.y / CELL_HEIGHT).floor().max(0.0);
    let right = (rect.right() / CELL_WIDTH).ceil().min(f64::from(area.width));
    let bottom = (rect.bottom() / CELL_HEIGHT).ceil().min(f64::from(area.height));
    if right <= left || bottom <= top {
        return None;
    }
    Some(Rect::new(
        area.x + left as u16,
        area.y + top as u16,
        (right - left) as u16,
        (bottom - top) as u16,
    ))
}

/// Borders and title labels, held back until the box's group ends so the
/// viewport fill underneath does not overwrite them at small cell sizes.
enum Overlay {
    Border(Rect, Color),
    Label {
        x: u16,
        y: u16,
        text: String,
        width: usize,
        style: Style,
    },
}

fn flush_overlays(buf: &mut Buffer, overlays: &mut Vec<Overlay>) {
    for overlay in overlays.drain(..) {
        match overlay {
            Overlay::Border(cells, color) => draw_border(buf, cells, color),
            Overlay::Label {
                x,
                y,
                text,
                width,
                style,
            } => {
                let _ = buf.set_stringn(x, y, text, width, style);
            }
        }
    }
}

/// Replay canvas commands into a cell buffer.
fn draw_commands(buf: &mut Buffer, area: Rect, cmds: &[RenderCommand]) {
    let mut clip = area;
    let mut overlays = Vec::new();
    for cmd in cmds {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
                label,
                ..
            } => {
                let Some(cells) = cell_rect(rect, area) else {
                    continue;
                };
                let cells = cells.intersection(clip);
                let bg = theme_to_color(*color);
                buf.set_style(cells, Style::default().bg(bg));
                for y in cells.top()..cells.bottom() {
                    for x in cells.left()..cells.right() {
                        buf[(x, y)].set_char(' ');
                    }
                }
                if let Some(border) = border_color {
                    overlays.push(Overlay::Border(cells, theme_to_color(*border)));
                }
                if let Some(label) = label {
                    let width = cells.width.saturating_sub(2) as usize;
                    if width > 0 && cells.height > 0 {
                        overlays.push(Overlay::Label {
                            x: cells.x.saturating_add(1),
                            y: cells.y,
                            text: label.clone(),
                            width,
                            style: Style::default()
                                .fg(theme_to_color(ThemeToken::BoxTitleText))
                                .bg(bg),
                        });
                    }
                }
            }
            RenderCommand::DrawText {
                position,
                text,
                color,
                align,
                ..
            } => {
                let len = text.chars().count() as f64;
                let col = (position.x / CELL_WIDTH).floor()
                    - match align {
                        TextAlign::Left => 0.0,
                        TextAlign::Center => (len / 2.0).floor(),
                        TextAlign::Right => len,
                    };
                let row = (position.y / CELL_HEIGHT).floor();
                if row < 0.0 {
                    continue;
                }
                let y = area.y.saturating_add(row as u16);
                if y < clip.top() || y >= clip.bottom() {
                    continue;
                }
                let fg = theme_to_color(*color);
                for (i, ch) in text.chars().enumerate() {
                    let x = col + i as f64;
                    if x < 0.0 {
                        continue;
                    }
                    let x = area.x.saturating_add(x as u16);
                    if x < clip.left() {
                        continue;
                    }
                    if x >= clip.right() {
                        break;
                    }
                    buf[(x, y)].set_char(ch).set_fg(fg);
                }
            }
            RenderCommand::DrawLine {
                from, to, color, ..
            } => {
                // Only the vertical column guides are drawn as lines.
                if from.x != to.x {
                    continue;
                }
                let col = (from.x / CELL_WIDTH).floor();
                if col < 0.0 || col >= f64::from(area.width) {
                    continue;
                }
                let x = area.x + col as u16;
                let fg = theme_to_color(*color);
                for y in clip.top()..clip.bottom() {
                    buf[(x, y)].set_char('┊').set_fg(fg);
                }
            }
            RenderCommand::SetClip { rect } => {
                clip = cell_rect(rect, area).map_or(Rect::new(area.x, area.y, 0, 0), |cells| {
                    cells.intersection(area)
                });
            }
            RenderCommand::ClearClip => clip = area,
            RenderCommand::EndGroup => flush_overlays(buf, &mut overlays),
            RenderCommand::BeginGroup { .. } => {}
        }
    }
    flush_overlays(buf, &mut overlays);
}

fn draw_border(buf: &mut Buffer, cells: Rect, color: Color) {
    if cells.width < 2 || cells.height < 2 {
        return;
    }
    let (left, right) = (cells.left(), cells.right() - 1);
    let (top, bottom) = (cells.top(), cells.bottom() - 1);
    for x in left..=right {
        buf[(x, top)].set_char('─').set_fg(color);
        buf[(x, bottom)].set_char('─').set_fg(color);
    }
    for y in top..=bottom {
        buf[(left, y)].set_char('│').set_fg(color);
        buf[(right, y)].set_char('│').set_fg(color);
    }
    buf[(left, top)].set_char('┌');
    buf[(right, top)].set_char('┐');
    buf[(left, bottom)].set_char('└');
    buf[(right, bottom)].set_char('┘');
}
