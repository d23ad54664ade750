//! Non-interactive commands: one edit or query, printed, then exit.

use std::io::Write;

use anyhow::{Result, bail};
use clap::Subcommand;
use everysize_core::model::Session;
use everysize_core::model::device::DEVICES;
use everysize_core::store::Storage;
use everysize_core::views::box_title;
use everysize_protocol::BoxCommand;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the preview URL and every box.
    List,
    /// Add a default device to the right of the others.
    Add,
    /// Remove a box.
    Remove { id: String },
    /// Give a box a custom size.
    Resize {
        id: String,
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        width: u32,
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        height: u32,
        /// Defaults to the box's current zoom.
        #[arg(long)]
        zoom: Option<f64>,
        #[arg(long)]
        device: Option<String>,
    },
    /// Move a box on the canvas.
    Move {
        id: String,
        #[arg(allow_negative_numbers = true)]
        x: i32,
        #[arg(allow_negative_numbers = true)]
        y: i32,
    },
    /// Switch a box to a device preset.
    Device { id: String, code: String },
    /// Change the preview URL.
    SetUrl { url: String },
    /// Print the grid metrics for `--width`.
    Grid,
}

pub fn run<S: Storage>(
    session: &mut Session<S>,
    command: Command,
    width: u32,
    out: &mut impl Write,
) -> Result<()> {
    tracing::debug!(?command, "running command");
    let box_command = match command {
        Command::List => return list(session, out),
        Command::Grid => {
            let metrics = session.grid_metrics(Some(width));
            writeln!(out, "total_width\t{}", metrics.total_width)?;
            writeln!(out, "column_count\t{:.2}", metrics.column_count)?;
            writeln!(
                out,
                "container_width\t{}",
                session.grid().container_width(metrics.total_width)
            )?;
            return Ok(());
        }
        Command::SetUrl { url } => {
            if url.trim().is_empty() {
                bail!("url must not be empty");
            }
            session.set_url(&url);
            writeln!(out, "{}", session.url().unwrap_or_default())?;
            return Ok(());
        }
        Command::Add => BoxCommand::AddDevice,
        Command::Remove { id } => BoxCommand::Remove {
            item_id: existing(session, id)?,
        },
        Command::Resize {
            id,
            width,
            height,
            zoom,
            device,
        } => {
            let item_id = existing(session, id)?;
            let zoom = match zoom {
                Some(zoom) if !zoom.is_finite() || zoom <= 0.0 => {
                    bail!("zoom must be a positive number, got {zoom}")
                }
                Some(zoom) => zoom,
                None => session.find_box(&item_id).map_or(1.0, |item| item.zoom),
            };
            BoxCommand::Resize {
                item_id,
                width,
                height,
                zoom,
                device_code: device,
            }
        }
        Command::Move { id, x, y } => BoxCommand::Move {
            item_id: existing(session, id)?,
            position_x: x,
            position_y: y,
        },
        Command::Device { id, code } => {
            let item_id = existing(session, id)?;
            if !DEVICES.iter().any(|device| device.code == code) {
                let known: Vec<&str> = DEVICES.iter().map(|device| device.code).collect();
                bail!("unknown device {code:?}; known devices: {}", known.join(", "));
            }
            BoxCommand::ApplyDevice {
                item_id,
                device_code: code,
            }
        }
    };

    let target = box_command.item_id().map(str::to_string);
    let removed = matches!(box_command, BoxCommand::Remove { .. });
    let added = session.apply(box_command);

    match (added.or(target), removed) {
        (Some(id), false) => match session.find_box(&id) {
            Some(item) => writeln!(out, "{id}\t{}", box_title(item))?,
            None => writeln!(out, "{id}")?,
        },
        (Some(id), true) => writeln!(out, "removed {id}")?,
        (None, _) => {}
    }
    Ok(())
}

fn list<S: Storage>(session: &Session<S>, out: &mut impl Write) -> Result<()> {
    writeln!(out, "url\t{}", session.url().unwrap_or_default())?;
    for item in session.boxes() {
        writeln!(
            out,
            "{}\t{}\t{},{}",
            item.item_id,
            box_title(item),
            item.position_x,
            item.position_y
        )?;
    }
    Ok(())
}

fn existing<S: Storage>(session: &Session<S>, id: String) -> Result<String> {
    if session.find_box(&id).is_none() {
        bail!("no box with id {id:?}");
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use everysize_core::EverysizeConfig;
    use everysize_core::store::MemoryStorage;

    use super::*;

    fn session(storage: &MemoryStorage) -> Session<&MemoryStorage> {
        Session::open(storage, EverysizeConfig::default(), None)
    }

    fn run_to_string(session: &mut Session<&MemoryStorage>, command: Command) -> String {
        let mut out = Vec::new();
        run(session, command, 1000, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn list_prints_url_and_boxes() {
        let storage = MemoryStorage::new();
        let mut session = session(&storage);
        let text = run_to_string(&mut session, Command::List);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "url\thttps://kibalabs.com");
        assert_eq!(lines[1], "default-phone\tiPhone X 375×812 100%\t0,0");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn grid_uses_width() {
        let storage = MemoryStorage::new();
        let mut session = session(&storage);
        let text = run_to_string(&mut session, Command::Grid);
        assert!(text.starts_with("total_width\t990\n"), "{text}");
        assert!(text.contains("container_width\t1000"));
    }

    #[test]
    fn resize_keeps_zoom_unless_given() {
        let storage = MemoryStorage::new();
        let mut session = session(&storage);
        run_to_string(
            &mut session,
            Command::Resize {
                id: "default-tablet".into(),
                width: 800,
                height: 600,
                zoom: None,
                device: None,
            },
        );
        let tablet = session.find_box("default-tablet").unwrap();
        assert_eq!((tablet.width, tablet.height, tablet.zoom), (800, 600, 0.75));
        assert_eq!(tablet.device_code, None);
    }

    #[test]
    fn rejects_unknown_ids_and_devices() {
        let storage = MemoryStorage::new();
        let mut session = session(&storage);
        let mut out = Vec::new();
        let err = run(&mut session, Command::Remove { id: "nope".into() }, 1000, &mut out);
        assert!(err.is_err());

        let err = run(
            &mut session,
            Command::Device {
                id: "default-phone".into(),
                code: "nokia-3310".into(),
            },
            1000,
            &mut out,
        );
        assert!(err.unwrap_err().to_string().contains("iphone-se"));
        assert_eq!(session.boxes().len(), 3);
    }

    #[test]
    fn edits_are_persisted() {
        let storage = MemoryStorage::new();
        let mut session = session(&storage);
        let added = run_to_string(&mut session, Command::Add);
        let id = added.split('\t').next().unwrap().to_string();
        run_to_string(
            &mut session,
            Command::Move {
                id: id.clone(),
                x: -40,
                y: 80,
            },
        );
        run_to_string(&mut session, Command::SetUrl { url: "https://example.com".into() });
        drop(session);

        let reopened = Session::open(&storage, EverysizeConfig::default(), None);
        let item = reopened.find_box(&id).unwrap();
        assert_eq!((item.position_x, item.position_y), (-40, 80));
        assert_eq!(reopened.url(), Some("https://example.com"));
    }
}
