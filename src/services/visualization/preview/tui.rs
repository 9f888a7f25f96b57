//! Use the tui crate to draw the map directly on the terminal
use super::{MapPreviewService, MapView};
use crate::catalog::display::{difficulty_color, PARK_COLOR};
use crate::catalog::Difficulty;
use crate::config::FromServiceConfig;
use crate::drawing::LineStyle;
use crate::gps::{BoundingBox, Location};
use crossterm::event::{self, Event};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::io;
use tui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    symbols,
    text::{Span, Spans},
    widgets::canvas::{Canvas, Line, Points},
    widgets::{Block, Borders, Paragraph},
    Terminal,
};

const DRAWING_COLOR: Color = Color::Yellow;
const START_COLOR: Color = Color::Green;
const FINISH_COLOR: Color = Color::Red;
const POI_COLOR: Color = Color::Magenta;

/// Draws the map layers onto a canvas using lon/lat as the x/y axes
#[derive(Debug, FromServiceConfig)]
pub struct TerminalMap {
    /// use braille characters for a higher resolution canvas
    braille: bool,
    /// fraction of the map extent added around the edges
    padding: f64,
    /// keep the map on screen until a key is pressed
    wait_for_key: bool,
}

impl Default for TerminalMap {
    fn default() -> Self {
        TerminalMap {
            braille: true,
            padding: 0.05,
            wait_for_key: true,
        }
    }
}

/// Parse a `#rrggbb` colour, anything else falls back to white
fn hex_color(hex: &str) -> Color {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return Color::White;
    }
    let channel = |i: usize| hex.get(i..i + 2).and_then(|c| u8::from_str_radix(c, 16).ok());
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => Color::White,
    }
}

/// Block until the user presses a key
fn wait_for_key_press() -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let result = loop {
        match event::read() {
            Ok(Event::Key(_)) => break Ok(()),
            Ok(_) => continue,
            Err(e) => break Err(e),
        }
    };
    disable_raw_mode()?;
    Ok(result?)
}

/// Split a polyline into segments, skipping every other piece for a dashed look
fn dashed_segments(path: &[Location], dashes_per_segment: usize) -> Vec<(Location, Location)> {
    let n = dashes_per_segment.max(1) * 2;
    let mut segments = Vec::new();
    for w in path.windows(2) {
        let (a, b) = (w[0], w[1]);
        let dx = (b.longitude() - a.longitude()) / n as f64;
        let dy = (b.latitude() - a.latitude()) / n as f64;
        let at = |i: usize| (a.longitude() + dx * i as f64, a.latitude() + dy * i as f64);
        for i in (0..n).step_by(2) {
            let (x1, y1) = at(i);
            let (x2, y2) = at(i + 1);
            // interpolated values always lie between two valid locations
            if let (Ok(start), Ok(end)) = (Location::new(x1, y1), Location::new(x2, y2)) {
                segments.push((start, end));
            }
        }
    }
    segments
}

fn solid_segments(path: &[Location]) -> Vec<(Location, Location)> {
    path.windows(2).map(|w| (w[0], w[1])).collect()
}

fn to_line(segment: &(Location, Location), color: Color) -> Line {
    Line {
        x1: segment.0.longitude(),
        y1: segment.0.latitude(),
        x2: segment.1.longitude(),
        y2: segment.1.latitude(),
        color,
    }
}

/// One swatch per trail difficulty, in the colours trails are drawn with
fn difficulty_legend() -> Vec<Span<'static>> {
    [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
        Difficulty::Expert,
    ]
    .iter()
    .map(|d| {
        Span::styled(
            format!("■ {} ", d),
            Style::default().fg(hex_color(difficulty_color(*d))),
        )
    })
    .collect()
}

/// Legend and status lines shown underneath the map
fn legend(view: &MapView) -> Vec<Spans<'static>> {
    let mut lines = vec![
        Spans::from(difficulty_legend()),
        Spans::from(vec![
            Span::styled("■ parks ", Style::default().fg(hex_color(PARK_COLOR))),
            Span::styled("• points of interest ", Style::default().fg(POI_COLOR)),
            Span::styled("• start ", Style::default().fg(START_COLOR)),
            Span::styled("• finish", Style::default().fg(FINISH_COLOR)),
        ]),
    ];
    lines.push(Spans::from(format!(
        "{} parks, {} trails, {} points of interest",
        view.parks().len(),
        view.trails().len(),
        view.pois().len()
    )));
    if let Some(drawing) = view.drawing() {
        let state = match drawing.style() {
            LineStyle::Dashed => "drawing",
            LineStyle::Solid => "finished",
        };
        lines.push(Spans::from(Span::styled(
            format!("path {}: {} markers", state, drawing.markers().len()),
            Style::default().fg(DRAWING_COLOR),
        )));
    }
    lines
}

impl MapPreviewService for TerminalMap {
    fn show(&self, view: &MapView) -> Result<(), Box<dyn std::error::Error>> {
        let bbox = match view.bounds() {
            Some(bbox) => bbox.padded(self.padding),
            None => BoundingBox {
                min_lon: -180.0,
                min_lat: -90.0,
                max_lon: 180.0,
                max_lat: 90.0,
            },
        };
        let marker = if self.braille {
            symbols::Marker::Braille
        } else {
            symbols::Marker::Dot
        };

        let park_lines: Vec<Line> = view
            .parks()
            .iter()
            .flat_map(|p| p.boundary.iter())
            .flat_map(|ring| solid_segments(ring))
            .map(|s| to_line(&s, hex_color(PARK_COLOR)))
            .collect();
        let trail_lines: Vec<Line> = view
            .trails()
            .iter()
            .flat_map(|t| {
                let color = hex_color(difficulty_color(t.difficulty));
                solid_segments(&t.path)
                    .into_iter()
                    .map(move |s| to_line(&s, color))
            })
            .collect();
        let poi_coords: Vec<(f64, f64)> = view
            .pois()
            .iter()
            .map(|p| (p.location.longitude(), p.location.latitude()))
            .collect();

        let mut drawing_lines = Vec::new();
        let mut drawing_points = Vec::new();
        let mut start_points = Vec::new();
        let mut finish_points = Vec::new();
        if let Some(drawing) = view.drawing() {
            if let Some(line) = drawing.line() {
                let segments = match drawing.style() {
                    LineStyle::Dashed => dashed_segments(line, 3),
                    LineStyle::Solid => solid_segments(line),
                };
                drawing_lines = segments
                    .iter()
                    .map(|s| to_line(s, DRAWING_COLOR))
                    .collect();
            }
            for m in drawing.markers() {
                let coord = (m.longitude(), m.latitude());
                match m.label() {
                    "S" => start_points.push(coord),
                    "F" => finish_points.push(coord),
                    _ => drawing_points.push(coord),
                }
            }
        }

        let mut legend = legend(view);
        if self.wait_for_key {
            legend.push(Spans::from("press any key to continue"));
        }
        let stdout = io::stdout();
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        terminal.clear()?;
        terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(1)
                .constraints([Constraint::Min(5), Constraint::Length(legend.len() as u16)].as_ref())
                .split(f.size());
            let canvas = Canvas::default()
                .block(Block::default().borders(Borders::ALL).title(view.title()))
                .marker(marker)
                .x_bounds([bbox.min_lon, bbox.max_lon])
                .y_bounds([bbox.min_lat, bbox.max_lat])
                .paint(|ctx| {
                    for line in park_lines.iter().chain(trail_lines.iter()) {
                        ctx.draw(line);
                    }
                    ctx.draw(&Points {
                        coords: &poi_coords,
                        color: POI_COLOR,
                    });
                    ctx.layer();
                    for line in &drawing_lines {
                        ctx.draw(line);
                    }
                    ctx.draw(&Points {
                        coords: &drawing_points,
                        color: DRAWING_COLOR,
                    });
                    ctx.draw(&Points {
                        coords: &start_points,
                        color: START_COLOR,
                    });
                    ctx.draw(&Points {
                        coords: &finish_points,
                        color: FINISH_COLOR,
                    });
                });
            f.render_widget(canvas, chunks[0]);
            f.render_widget(Paragraph::new(legend.clone()), chunks[1]);
        })?;

        if self.wait_for_key {
            wait_for_key_press()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(lon: f64, lat: f64) -> Location {
        Location::new(lon, lat).unwrap()
    }

    #[test]
    fn test_hex_color() {
        assert_eq!(hex_color("#10b981"), Color::Rgb(0x10, 0xb9, 0x81));
        assert_eq!(hex_color("ff7f00"), Color::Rgb(255, 127, 0));
        assert_eq!(hex_color("#xyz"), Color::White);
        assert_eq!(hex_color("#gggggg"), Color::White);
    }

    #[test]
    fn test_legend_uses_difficulty_colors() {
        let spans = difficulty_legend();
        assert_eq!(spans.len(), 4);
        assert_eq!(spans[0].content, "■ beginner ");
        assert_eq!(spans[0].style.fg, Some(Color::Rgb(0x10, 0xb9, 0x81)));
        assert_eq!(spans[3].content, "■ expert ");
        assert_eq!(spans[3].style.fg, Some(Color::Rgb(0xef, 0x44, 0x44)));

        let view = MapView::new("legend".to_string());
        let lines = legend(&view);
        assert_eq!(lines[0].0.len(), 4);
        assert!(lines
            .iter()
            .flat_map(|l| l.0.iter())
            .all(|span| span.style.fg != Some(Color::Cyan)));
    }

    #[test]
    fn test_dashed_segments() {
        let path = vec![loc(0.0, 0.0), loc(6.0, 0.0), loc(6.0, 6.0)];
        let segments = dashed_segments(&path, 3);
        assert_eq!(segments.len(), 6);
        assert_eq!(segments[0], (loc(0.0, 0.0), loc(1.0, 0.0)));
        assert_eq!(segments[1], (loc(2.0, 0.0), loc(3.0, 0.0)));
        assert_eq!(segments[3], (loc(6.0, 0.0), loc(6.0, 1.0)));
        assert!(dashed_segments(&path[..1], 3).is_empty());
    }

    #[test]
    fn test_solid_segments() {
        let path = vec![loc(0.0, 0.0), loc(1.0, 1.0), loc(2.0, 0.0)];
        assert_eq!(
            solid_segments(&path),
            vec![(path[0], path[1]), (path[1], path[2])]
        );
    }
}
