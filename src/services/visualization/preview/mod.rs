//! Show catalog layers and the path being drawn on a map preview
use crate::catalog::{Park, Poi, Trail};
use crate::config::{FromServiceConfig, ServiceConfig};
use crate::drawing::PathPreview;
use crate::gps::BoundingBox;
use crate::Error;
mod tui;
pub use self::tui::TerminalMap;

/// Everything that should appear on a single map preview
#[derive(Clone, Debug, Default)]
pub struct MapView<'a> {
    title: String,
    parks: Vec<&'a Park>,
    trails: Vec<&'a Trail>,
    pois: Vec<&'a Poi>,
    drawing: Option<PathPreview>,
}

impl<'a> MapView<'a> {
    pub fn new(title: String) -> Self {
        MapView {
            title,
            ..Default::default()
        }
    }

    pub fn with_parks(mut self, parks: &'a [Park]) -> Self {
        self.parks.extend(parks.iter());
        self
    }

    pub fn with_trails(mut self, trails: Vec<&'a Trail>) -> Self {
        self.trails.extend(trails);
        self
    }

    pub fn with_pois(mut self, pois: &'a [Poi]) -> Self {
        self.pois.extend(pois.iter());
        self
    }

    pub fn with_drawing(mut self, drawing: PathPreview) -> Self {
        if !drawing.is_empty() {
            self.drawing = Some(drawing);
        }
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn parks(&self) -> &[&'a Park] {
        &self.parks
    }

    pub fn trails(&self) -> &[&'a Trail] {
        &self.trails
    }

    pub fn pois(&self) -> &[&'a Poi] {
        &self.pois
    }

    pub fn drawing(&self) -> Option<&PathPreview> {
        self.drawing.as_ref()
    }

    /// Extent of every layer on the map, `None` when there is nothing to show
    pub fn bounds(&self) -> Option<BoundingBox> {
        let parks = self.parks.iter().filter_map(|p| p.bounds());
        let trails = self.trails.iter().filter_map(|t| t.bounds());
        let pois = self
            .pois
            .iter()
            .filter_map(|p| BoundingBox::from_locations(std::iter::once(&p.location)));
        let drawing = self.drawing.iter().filter_map(|d| {
            let markers = d.markers().iter().map(|m| m.location()).collect::<Vec<_>>();
            let line = d.line().unwrap_or(&[]);
            BoundingBox::from_locations(markers.iter().chain(line.iter()))
        });
        parks
            .chain(trails)
            .chain(pois)
            .chain(drawing)
            .fold(None, |acc: Option<BoundingBox>, bbox| {
                Some(acc.map_or(bbox, |a| a.union(bbox)))
            })
    }
}

/// trait that defines how a map preview is shown to the user
pub trait MapPreviewService {
    fn show(&self, view: &MapView) -> Result<(), Box<dyn std::error::Error>>;
}

pub fn new_map_preview_handler(
    config: &ServiceConfig,
) -> Result<Box<dyn MapPreviewService>, Error> {
    match config.handler() {
        "tui" => Ok(Box::new(TerminalMap::from_config(config)?)),
        _ => Err(Error::UnknownServiceHandler(format!(
            "no map preview handler exists for: {}",
            config.handler()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Difficulty, PoiType};
    use crate::drawing::DrawingSession;
    use crate::gps::Location;

    fn loc(lon: f64, lat: f64) -> Location {
        Location::new(lon, lat).unwrap()
    }

    #[test]
    fn test_empty_view_has_no_bounds() {
        let view = MapView::new("empty".to_string()).with_drawing(DrawingSession::new().preview());
        assert!(view.bounds().is_none());
        assert!(view.drawing().is_none());
    }

    #[test]
    fn test_bounds_cover_all_layers() {
        let trail = Trail {
            id: Some(1),
            name: "Loop".to_string(),
            difficulty: Difficulty::Expert,
            length_km: 1.0,
            elevation_gain_m: 10.0,
            description: None,
            park: None,
            path: vec![loc(-6.3, 53.3), loc(-6.2, 53.35)],
        };
        let pois = vec![Poi {
            id: None,
            name: "Car park".to_string(),
            poi_type: PoiType::Parking,
            description: None,
            location: loc(-6.5, 53.1),
        }];
        let mut session = DrawingSession::new();
        session.start();
        session.add_point(loc(-6.0, 53.6));

        let view = MapView::new("all".to_string())
            .with_trails(vec![&trail])
            .with_pois(&pois)
            .with_drawing(session.preview());
        let bbox = view.bounds().unwrap();
        assert_eq!(bbox.min_lon, -6.5);
        assert_eq!(bbox.max_lon, -6.0);
        assert_eq!(bbox.min_lat, 53.1);
        assert_eq!(bbox.max_lat, 53.6);
    }
}
