//! Application state shared by the commands: the loaded datasets, the active filters and the
//! drawing session
use crate::catalog::filter::{park_name, park_names, TrailFilter};
use crate::catalog::{Difficulty, NewTrail, Park, Poi, Trail};
use crate::drawing::{DrawCommand, DrawEvent, DrawState, DrawingSession};
use crate::services::CatalogSource;
use crate::Error;
use log::{error, info};

/// Attributes the user supplies when submitting a drawn trail
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrailMetadata {
    pub name: String,
    pub difficulty: Difficulty,
    pub description: String,
    pub park: Option<u64>,
    pub elevation_gain_m: f64,
}

#[derive(Debug)]
pub struct AppState {
    parks: Vec<Park>,
    trails: Vec<Trail>,
    pois: Vec<Poi>,
    filter: TrailFilter,
    session: DrawingSession,
    max_length_km: f64,
}

impl AppState {
    pub fn new(max_length_km: f64) -> Self {
        AppState {
            parks: Vec::new(),
            trails: Vec::new(),
            pois: Vec::new(),
            filter: TrailFilter::with_max_length(max_length_km),
            session: DrawingSession::new(),
            max_length_km,
        }
    }

    /// Fetch every dataset from the catalog. A dataset that fails to load is logged and left
    /// empty so the others can still be shown; the number of failures is returned.
    pub fn load(&mut self, catalog: &dyn CatalogSource) -> usize {
        let mut failures = 0;
        match catalog.fetch_parks() {
            Ok(parks) => self.parks = parks,
            Err(e) => {
                error!("Failed to load parks: {}", e);
                failures += 1;
            }
        }
        match catalog.fetch_trails() {
            Ok(trails) => self.trails = trails,
            Err(e) => {
                error!("Failed to load trails: {}", e);
                failures += 1;
            }
        }
        match catalog.fetch_pois() {
            Ok(pois) => self.pois = pois,
            Err(e) => {
                error!("Failed to load points of interest: {}", e);
                failures += 1;
            }
        }
        info!(
            "Loaded {} parks, {} trails and {} points of interest",
            self.parks.len(),
            self.trails.len(),
            self.pois.len()
        );
        failures
    }

    pub fn parks(&self) -> &[Park] {
        &self.parks
    }

    pub fn trails(&self) -> &[Trail] {
        &self.trails
    }

    pub fn pois(&self) -> &[Poi] {
        &self.pois
    }

    pub fn filter(&self) -> &TrailFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: TrailFilter) {
        self.filter = filter;
    }

    pub fn clear_filters(&mut self) {
        self.filter.clear(self.max_length_km);
    }

    /// Trails passing the active filters
    pub fn visible_trails(&self) -> Vec<&Trail> {
        self.filter.apply(&self.trails, &self.parks)
    }

    pub fn park_names(&self) -> Vec<&str> {
        park_names(&self.parks)
    }

    pub fn find_trail(&self, id: u64) -> Result<&Trail, Error> {
        self.trails
            .iter()
            .find(|t| t.id == Some(id))
            .ok_or(Error::TrailNotFound(id))
    }

    pub fn trail_park_name<'a>(&'a self, trail: &'a Trail) -> Option<&'a str> {
        park_name(trail, &self.parks)
    }

    /// Resolve a park given by id or (case-insensitive) name to its id
    pub fn resolve_park_id(&self, park: &str) -> Option<u64> {
        if let Ok(id) = park.parse::<u64>() {
            return Some(id);
        }
        self.parks
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(park.trim()))
            .and_then(|p| p.id)
    }

    pub fn session(&self) -> &DrawingSession {
        &self.session
    }

    pub fn dispatch(&mut self, command: DrawCommand) -> Result<DrawEvent, Error> {
        self.session.dispatch(command)
    }

    /// Submit the finished path as a new trail. On success the session is reset and the trail
    /// is added to the loaded trails, on failure the session is kept so the user can retry.
    pub fn submit_drawn_trail(
        &mut self,
        catalog: &dyn CatalogSource,
        metadata: TrailMetadata,
    ) -> Result<&Trail, Box<dyn std::error::Error>> {
        if self.session.state() != DrawState::Finished {
            return Err(Box::new(Error::NoFinishedPath));
        }
        let new_trail = NewTrail {
            name: metadata.name,
            difficulty: metadata.difficulty,
            description: metadata.description,
            park: metadata.park,
            length_km: self.session.length_km(),
            elevation_gain_m: metadata.elevation_gain_m,
            path: self.session.points().to_vec(),
        };
        let created = catalog.create_trail(&new_trail)?;
        self.session.cancel();
        self.trails.push(created);
        let idx = self.trails.len() - 1;
        Ok(&self.trails[idx])
    }
}
