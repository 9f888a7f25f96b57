//! Interactive path drawing session used to sketch a new trail point by point.
//!
//! The session collects locations in click order and derives everything else (preview line,
//! length, WKT geometry) from that list on demand, so adding and undoing points can never make
//! the derived values drift.
//!
//! ```text
//!   Idle --start--> Active --finish (>= 2 points)--> Finished
//!                   ^  |                                 |
//!                   |  +--add/undo/clear--+              |
//!                   |                     |              |
//!                   +---------------------+----clear-----+
//!   any --cancel--> Idle
//! ```
use crate::gps::{path_length_meters, Location, Marker};
use crate::wkt::linestring_to_wkt;
use crate::Error;
use log::{debug, trace};

/// Lifecycle state of a drawing session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawState {
    /// No path is being drawn
    Idle,
    /// Accepting new points
    Active,
    /// Points are frozen and ready to be submitted
    Finished,
}

/// Commands that drive the session, one per user input event
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCommand {
    Start,
    AddPoint(Location),
    Undo,
    Clear,
    Finish,
    Cancel,
}

/// Outcome of dispatching a command, used to report back to the user
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawEvent {
    Started,
    PointAdded(usize),
    PointIgnored,
    PointRemoved(usize),
    NothingToUndo,
    Cleared,
    Finished(usize),
    Cancelled,
}

/// How the preview line is stroked
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineStyle {
    /// path is still being edited
    Dashed,
    /// path has been finished
    Solid,
}

/// Visual representation of the current session state
#[derive(Clone, Debug, PartialEq)]
pub struct PathPreview {
    line: Option<Vec<Location>>,
    markers: Vec<Marker>,
    style: LineStyle,
}

impl PathPreview {
    /// Connected line through all points, `None` until there are at least two of them
    pub fn line(&self) -> Option<&[Location]> {
        self.line.as_deref()
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn style(&self) -> LineStyle {
        self.style
    }

    /// True if there is nothing to draw
    pub fn is_empty(&self) -> bool {
        self.line.is_none() && self.markers.is_empty()
    }
}

/// An in-progress (or finished) path drawn by the user
#[derive(Clone, Debug)]
pub struct DrawingSession {
    points: Vec<Location>,
    state: DrawState,
}

impl Default for DrawingSession {
    fn default() -> Self {
        DrawingSession {
            points: Vec::new(),
            state: DrawState::Idle,
        }
    }
}

impl DrawingSession {
    /// Create an idle session without any points
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DrawState {
        self.state
    }

    /// True while the session accepts new points
    pub fn is_active(&self) -> bool {
        self.state == DrawState::Active
    }

    /// Points in the order they were added
    pub fn points(&self) -> &[Location] {
        &self.points
    }

    /// Route a command to the matching operation
    pub fn dispatch(&mut self, command: DrawCommand) -> Result<DrawEvent, Error> {
        trace!("drawing session command: {:?} (state={:?})", command, self.state);
        let event = match command {
            DrawCommand::Start => {
                self.start();
                DrawEvent::Started
            }
            DrawCommand::AddPoint(point) => {
                if self.add_point(point) {
                    DrawEvent::PointAdded(self.points.len())
                } else {
                    DrawEvent::PointIgnored
                }
            }
            DrawCommand::Undo => match self.undo_last_point() {
                Some(_) => DrawEvent::PointRemoved(self.points.len()),
                None => DrawEvent::NothingToUndo,
            },
            DrawCommand::Clear => {
                self.clear();
                DrawEvent::Cleared
            }
            DrawCommand::Finish => DrawEvent::Finished(self.finish()?.len()),
            DrawCommand::Cancel => {
                self.cancel();
                DrawEvent::Cancelled
            }
        };
        Ok(event)
    }

    /// Begin a new path, discarding any previous points
    pub fn start(&mut self) {
        self.points.clear();
        self.state = DrawState::Active;
        debug!("started drawing a new path");
    }

    /// Append a point to the path, ignored unless the session is active.
    ///
    /// Returns true if the point was added.
    pub fn add_point(&mut self, point: Location) -> bool {
        if self.state != DrawState::Active {
            return false;
        }
        self.points.push(point);
        true
    }

    /// Remove the most recently added point, if any. Finished paths are frozen and are left as is.
    pub fn undo_last_point(&mut self) -> Option<Location> {
        if self.state != DrawState::Active {
            return None;
        }
        self.points.pop()
    }

    /// Remove every point. A finished path goes back to being edited, an idle session stays idle.
    pub fn clear(&mut self) {
        self.points.clear();
        if self.state == DrawState::Finished {
            self.state = DrawState::Active;
        }
    }

    /// Freeze the path so it can be submitted.
    ///
    /// Fails with [`Error::InsufficientPoints`] if fewer than 2 points were drawn, in which case
    /// the session is left untouched.
    pub fn finish(&mut self) -> Result<&[Location], Error> {
        match self.state {
            DrawState::Finished => Ok(&self.points),
            DrawState::Active if self.points.len() >= 2 => {
                self.state = DrawState::Finished;
                debug!(
                    "finished path with {} points ({:.1} km)",
                    self.points.len(),
                    self.length_km()
                );
                Ok(&self.points)
            }
            _ => Err(Error::InsufficientPoints(self.points.len())),
        }
    }

    /// Discard the session entirely
    pub fn cancel(&mut self) {
        self.points.clear();
        self.state = DrawState::Idle;
    }

    /// Path geometry as WKT, empty if fewer than 2 points were drawn
    pub fn to_wkt(&self) -> String {
        linestring_to_wkt(&self.points)
    }

    /// Cumulative great-circle length of the path in meters
    pub fn distance_meters(&self) -> f64 {
        path_length_meters(&self.points)
    }

    /// Path length in kilometers rounded to one decimal place
    pub fn length_km(&self) -> f64 {
        (self.distance_meters() / 100.0).round() / 10.0
    }

    /// Build the visual representation of the current path
    pub fn preview(&self) -> PathPreview {
        let line = if self.points.len() >= 2 {
            Some(self.points.clone())
        } else {
            None
        };
        match self.state {
            DrawState::Idle => PathPreview {
                line: None,
                markers: Vec::new(),
                style: LineStyle::Dashed,
            },
            DrawState::Active => PathPreview {
                line,
                markers: self
                    .points
                    .iter()
                    .enumerate()
                    .map(|(i, p)| Marker::new(*p, format!("{}", i + 1)))
                    .collect(),
                style: LineStyle::Dashed,
            },
            DrawState::Finished => {
                let mut markers = Vec::new();
                if let Some(first) = self.points.first() {
                    markers.push(Marker::new(*first, "S".to_string()));
                }
                if let Some(last) = self.points.last() {
                    markers.push(Marker::new(*last, "F".to_string()));
                }
                PathPreview {
                    line,
                    markers,
                    style: LineStyle::Solid,
                }
            }
        }
    }
}
