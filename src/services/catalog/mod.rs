//! Sources of park, trail and point of interest data
use crate::catalog::{NewTrail, Park, Poi, Trail};
use crate::config::{FromServiceConfig, ServiceConfig};
use crate::Error;
mod geojson_files;
mod rest;
pub use geojson_files::GeoJsonFiles;
pub use rest::RestCatalog;

/// trait that defines how the map data is loaded and where new trails are stored
pub trait CatalogSource {
    fn fetch_parks(&self) -> Result<Vec<Park>, Box<dyn std::error::Error>>;

    fn fetch_trails(&self) -> Result<Vec<Trail>, Box<dyn std::error::Error>>;

    fn fetch_pois(&self) -> Result<Vec<Poi>, Box<dyn std::error::Error>>;

    /// Store a new trail and return it as the catalog now knows it
    fn create_trail(&self, trail: &NewTrail) -> Result<Trail, Box<dyn std::error::Error>>;
}

pub fn new_catalog_handler(config: &ServiceConfig) -> Result<Box<dyn CatalogSource>, Error> {
    match config.handler() {
        "rest" => Ok(Box::new(RestCatalog::from_config(config)?)),
        "geojson_files" => Ok(Box::new(GeoJsonFiles::from_config(config)?)),
        _ => Err(Error::UnknownServiceHandler(format!(
            "no catalog handler exists for: {}",
            config.handler()
        ))),
    }
}
