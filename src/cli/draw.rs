//! Define draw subcommand, an interactive session that reads one command per line
use super::load_catalog;
use super::route_image::write_image;
use crate::app::{AppState, TrailMetadata};
use crate::catalog::Difficulty;
use crate::config::Config;
use crate::drawing::{DrawCommand, DrawEvent, DrawState};
use crate::gps::Location;
use crate::services::visualization::preview::MapView;
use crate::services::visualization::route::Route;
use crate::services::CatalogSource;
use crate::Error;
use log::{debug, warn};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use structopt::StructOpt;

const HELP: &str = "\
Commands:
  <lon> <lat>     add a point (also: add <lon> <lat>)
  undo            remove the last point
  clear           remove every point
  finish          finish the path (needs at least 2 points)
  cancel, esc     discard the path and stop drawing
  start           start drawing a new path
  wkt             print the path geometry
  status          print the number of points and the path length
  map             show the path on a terminal map
  image <file>    save a route image of the path
  submit          create a trail from the finished path
  quit            leave without submitting";

/// Draw a new trail by entering its points, then submit it to the catalog
#[derive(Debug, StructOpt)]
pub struct DrawOpts {
    /// Name of the new trail, required to submit
    #[structopt(short, long)]
    name: Option<String>,
    /// Difficulty of the new trail (beginner, intermediate, advanced, expert)
    #[structopt(short, long, default_value = "beginner")]
    difficulty: Difficulty,
    /// Description of the new trail
    #[structopt(long, default_value = "")]
    description: String,
    /// Park the trail belongs to, by id or name
    #[structopt(short, long)]
    park: Option<String>,
    /// Total elevation gain of the trail in meters
    #[structopt(short, long, default_value = "0")]
    elevation_gain: f64,
}

/// A single line of user input
#[derive(Clone, Debug, PartialEq)]
pub enum DrawInput {
    Session(DrawCommand),
    Wkt,
    Status,
    Map,
    Image(PathBuf),
    Submit,
    Help,
    Quit,
}

/// Parse a `lon lat` or `lon,lat` pair
fn parse_coordinates(text: &str) -> Result<Location, Error> {
    let values = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| Error::Other(format!("invalid coordinate '{}': {}", text, e)))?;
    match values.as_slice() {
        [lon, lat] => Location::new(*lon, *lat),
        _ => Err(Error::Other(format!(
            "expected a longitude and a latitude, found '{}'",
            text
        ))),
    }
}

/// Parse a line of input, blank lines and `#` comments give `None`
pub fn parse_input(line: &str) -> Result<Option<DrawInput>, Error> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let mut parts = line.splitn(2, char::is_whitespace);
    let keyword = parts.next().unwrap_or_default().to_ascii_lowercase();
    let rest = parts.next().unwrap_or_default().trim();

    let input = match keyword.as_str() {
        "start" => DrawInput::Session(DrawCommand::Start),
        "add" => DrawInput::Session(DrawCommand::AddPoint(parse_coordinates(rest)?)),
        "undo" => DrawInput::Session(DrawCommand::Undo),
        "clear" => DrawInput::Session(DrawCommand::Clear),
        "finish" | "done" => DrawInput::Session(DrawCommand::Finish),
        "cancel" | "esc" => DrawInput::Session(DrawCommand::Cancel),
        "wkt" => DrawInput::Wkt,
        "status" => DrawInput::Status,
        "map" => DrawInput::Map,
        "image" if !rest.is_empty() => DrawInput::Image(PathBuf::from(rest)),
        "image" => return Err(Error::Other("usage: image <file>".to_string())),
        "submit" => DrawInput::Submit,
        "help" | "?" => DrawInput::Help,
        "quit" | "exit" | "q" => DrawInput::Quit,
        _ => DrawInput::Session(DrawCommand::AddPoint(parse_coordinates(line).map_err(
            |_| Error::Other(format!("unknown command '{}', type 'help' for a list", line)),
        )?)),
    };
    Ok(Some(input))
}

fn describe_event(event: DrawEvent, state: &AppState) -> String {
    let session = state.session();
    match event {
        DrawEvent::Started => "Drawing a new path, enter points as '<lon> <lat>'".to_string(),
        DrawEvent::PointAdded(n) => match session.points().last() {
            Some(point) => format!(
                "Point {}: {} | length {:.1} km",
                n,
                point.readout(),
                session.length_km()
            ),
            None => format!("Point {}", n),
        },
        DrawEvent::PointIgnored => match session.state() {
            DrawState::Finished => "Path is finished, use 'clear' to edit it again".to_string(),
            _ => "Not drawing, use 'start' to begin a new path".to_string(),
        },
        DrawEvent::PointRemoved(n) => format!(
            "Removed last point, {} left | length {:.1} km",
            n,
            session.length_km()
        ),
        DrawEvent::NothingToUndo => "Nothing to undo".to_string(),
        DrawEvent::Cleared => "Cleared all points".to_string(),
        DrawEvent::Finished(n) => format!(
            "Finished path with {} points, {:.1} km. Use 'submit' to create the trail",
            n,
            session.length_km()
        ),
        DrawEvent::Cancelled => "Drawing cancelled".to_string(),
    }
}

fn status_line(state: &AppState) -> String {
    let session = state.session();
    let name = match session.state() {
        DrawState::Idle => "idle",
        DrawState::Active => "drawing",
        DrawState::Finished => "finished",
    };
    format!(
        "State: {}, points: {}, length: {:.1} km",
        name,
        session.points().len(),
        session.length_km()
    )
}

fn show_map(state: &AppState, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let preview = config.get_map_preview_handler()?;
    let view = MapView::new(status_line(state))
        .with_parks(state.parks())
        .with_trails(state.visible_trails())
        .with_drawing(state.session().preview());
    preview.show(&view)
}

/// Route image of the path as drawn so far, numbered markers while still drawing
fn save_route_image(
    state: &AppState,
    config: &Config,
    path: &PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let drawer = config.get_route_visualization_handler()?;
    let preview = state.session().preview();
    let route = Route::new(state.session().points(), preview.markers());
    let data = drawer.draw_route(&route)?;
    write_image(&data, Some(path))?;
    Ok(())
}

/// Process commands from `input` until it is exhausted or the user quits. Invalid input and
/// failed actions are reported on `output` and the session carries on.
pub fn run_draw_session<R: BufRead, W: Write>(
    state: &mut AppState,
    catalog: &dyn CatalogSource,
    config: &Config,
    metadata: Option<TrailMetadata>,
    input: R,
    output: &mut W,
) -> Result<(), Box<dyn std::error::Error>> {
    if state.session().state() == DrawState::Idle {
        let event = state.dispatch(DrawCommand::Start)?;
        writeln!(output, "{}", describe_event(event, state))?;
    }

    for line in input.lines() {
        let line = line?;
        let input = match parse_input(&line) {
            Ok(Some(input)) => input,
            Ok(None) => continue,
            Err(e) => {
                writeln!(output, "Error: {}", e)?;
                continue;
            }
        };
        debug!("draw input: {:?}", input);

        match input {
            DrawInput::Session(command) => match state.dispatch(command) {
                Ok(event) => writeln!(output, "{}", describe_event(event, state))?,
                Err(e) => writeln!(output, "Error: {}", e)?,
            },
            DrawInput::Wkt => {
                let wkt = state.session().to_wkt();
                if wkt.is_empty() {
                    writeln!(output, "Need at least 2 points for a path")?;
                } else {
                    writeln!(output, "{}", wkt)?;
                }
            }
            DrawInput::Status => writeln!(output, "{}", status_line(state))?,
            DrawInput::Map => {
                if let Err(e) = show_map(state, config) {
                    writeln!(output, "Error: {}", e)?;
                }
            }
            DrawInput::Image(path) => match save_route_image(state, config, &path) {
                Ok(()) => writeln!(output, "Saved route image to {:?}", path)?,
                Err(e) => writeln!(output, "Error: {}", e)?,
            },
            DrawInput::Submit => match &metadata {
                Some(metadata) => match state.submit_drawn_trail(catalog, metadata.clone()) {
                    Ok(trail) => writeln!(
                        output,
                        "Created trail '{}' (id={}), {:.1} km",
                        trail.name,
                        trail
                            .id
                            .map(|id| id.to_string())
                            .unwrap_or_else(|| "?".to_string()),
                        trail.length_km
                    )?,
                    Err(e) => writeln!(output, "Error: {}", e)?,
                },
                None => writeln!(
                    output,
                    "Error: a trail name is required to submit, pass --name"
                )?,
            },
            DrawInput::Help => writeln!(output, "{}", HELP)?,
            DrawInput::Quit => break,
        }
    }

    if !state.session().points().is_empty() {
        warn!(
            "discarding unsubmitted path with {} points",
            state.session().points().len()
        );
    }
    Ok(())
}

pub fn draw_command(config: Config, opts: DrawOpts) -> Result<(), Box<dyn std::error::Error>> {
    let DrawOpts {
        name,
        difficulty,
        description,
        park,
        elevation_gain,
    } = opts;
    let (catalog, mut state) = load_catalog(&config)?;
    let park = match park {
        Some(park) => Some(
            state
                .resolve_park_id(&park)
                .ok_or_else(|| Error::Other(format!("park '{}' does not exist", park)))?,
        ),
        None => None,
    };
    let metadata = name.map(|name| TrailMetadata {
        name,
        difficulty,
        description,
        park,
        elevation_gain_m: elevation_gain,
    });

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut output = stdout.lock();
    run_draw_session(
        &mut state,
        catalog.as_ref(),
        &config,
        metadata,
        stdin.lock(),
        &mut output,
    )
}
