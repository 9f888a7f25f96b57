//! Render trails and drawn paths as static route images using a mapping service
use crate::config::{FromServiceConfig, ServiceConfig};
use crate::gps::{Location, Marker};
use crate::Error;
mod mapbox;
pub use mapbox::MapBox;

/// A path to draw along with its markers and an optional line colour (`#rrggbb`)
#[derive(Clone, Copy, Debug)]
pub struct Route<'a> {
    path: &'a [Location],
    markers: &'a [Marker],
    color: Option<&'a str>,
}

impl<'a> Route<'a> {
    pub fn new(path: &'a [Location], markers: &'a [Marker]) -> Self {
        Route {
            path,
            markers,
            color: None,
        }
    }

    pub fn with_color(mut self, color: &'a str) -> Self {
        self.color = Some(color);
        self
    }

    pub fn path(&self) -> &'a [Location] {
        self.path
    }

    pub fn markers(&self) -> &'a [Marker] {
        self.markers
    }

    pub fn color(&self) -> Option<&'a str> {
        self.color
    }
}

/// Start and finish markers for a path
pub fn start_finish_markers(path: &[Location]) -> Vec<Marker> {
    let mut markers = Vec::new();
    if let Some(first) = path.first() {
        markers.push(Marker::new(*first, "S".to_string()));
    }
    if let (Some(last), true) = (path.last(), path.len() > 1) {
        markers.push(Marker::new(*last, "F".to_string()));
    }
    markers
}

/// trait that defines how to turn a path into a route image
pub trait RouteDrawingService {
    /// Return the encoded image data for the route
    fn draw_route(&self, route: &Route) -> Result<Vec<u8>, Box<dyn std::error::Error>>;
}

pub fn new_route_visualization_handler(
    config: &ServiceConfig,
) -> Result<Box<dyn RouteDrawingService>, Error> {
    match config.handler() {
        "mapbox" => Ok(Box::new(MapBox::from_config(config)?)),
        _ => Err(Error::UnknownServiceHandler(format!(
            "no route visualization handler exists for: {}",
            config.handler()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_finish_markers() {
        let a = Location::new(-6.26, 53.35).unwrap();
        let b = Location::new(-6.25, 53.36).unwrap();
        assert!(start_finish_markers(&[]).is_empty());
        let markers = start_finish_markers(&[a]);
        assert_eq!(markers, vec![Marker::new(a, "S".to_string())]);
        let markers = start_finish_markers(&[a, b]);
        assert_eq!(markers[1], Marker::new(b, "F".to_string()));
    }
}
