//! Store application configuration that gets read from disk
use crate::catalog::filter::DEFAULT_MAX_LENGTH_KM;
use crate::services::{
    new_catalog_handler, new_map_preview_handler, new_route_visualization_handler,
    CatalogSource, MapPreviewService, RouteDrawingService,
};
use crate::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_yaml::Value;
use simplelog::LevelFilter;
use std::collections::HashMap;
use std::fs::File;
use std::io::prelude::*;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub use trail_mapper_derive::FromServiceConfig;

/// Defines the allowed keys under the services map
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Catalog,
    MapPreview,
    RouteVisualization,
}

/// Type alias for clarity
pub type ServiceParameters = HashMap<String, Value>;

/// Configuration options for a single service of any type
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceConfig {
    handler: String,
    #[serde(default)]
    configuration: ServiceParameters,
}

impl ServiceConfig {
    pub fn new(handler: String, configuration: ServiceParameters) -> Self {
        ServiceConfig {
            handler,
            configuration,
        }
    }

    pub fn handler(&self) -> &str {
        &self.handler
    }

    pub fn parameters(&self) -> impl Iterator<Item = &String> + '_ {
        self.configuration.keys()
    }

    pub fn get_parameter(&self, key: &str) -> Option<&Value> {
        self.configuration.get(key)
    }

    pub fn get_parameter_as_string(&self, key: &str) -> Option<Result<String, Error>> {
        self.configuration.get(key).map(|value| {
            value
                .as_str()
                .ok_or_else(|| self.invalid_value(key, "a string", value))
                .map(|v| v.to_string())
        })
    }

    pub fn get_parameter_as_i64(&self, key: &str) -> Option<Result<i64, Error>> {
        self.configuration.get(key).map(|value| {
            value
                .as_i64()
                .ok_or_else(|| self.invalid_value(key, "an integer", value))
        })
    }

    pub fn get_parameter_as_f64(&self, key: &str) -> Option<Result<f64, Error>> {
        self.configuration.get(key).map(|value| {
            value
                .as_f64()
                .ok_or_else(|| self.invalid_value(key, "a floating point value", value))
        })
    }

    pub fn get_parameter_as_bool(&self, key: &str) -> Option<Result<bool, Error>> {
        self.configuration.get(key).map(|value| {
            value
                .as_bool()
                .ok_or_else(|| self.invalid_value(key, "a boolean", value))
        })
    }

    fn invalid_value(&self, key: &str, expected: &str, value: &Value) -> Error {
        Error::InvalidConfigurationValue(format!(
            "invalid value for {}.{}, expected {}: {:?}",
            &self.handler, key, expected, value
        ))
    }
}

/// Build a service handler from its configuration entry, normally derived with
/// `#[derive(FromServiceConfig)]`
pub trait FromServiceConfig: Sized {
    fn from_config(config: &ServiceConfig) -> Result<Self, Error>;
}

/// Configuration struct that we can create from the config file used
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(
        deserialize_with = "deserialize_level_filter",
        serialize_with = "serialize_level_filter",
        default = "default_level_filter"
    )]
    log_level: LevelFilter,
    #[serde(default = "default_max_length_km")]
    max_length_km: f64,
    #[serde(default)]
    services: HashMap<ServiceType, ServiceConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: default_level_filter(),
            max_length_km: default_max_length_km(),
            services: HashMap::new(),
        }
    }
}

impl Config {
    pub fn load<T: Read>(source: &mut T) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_reader(source)
    }

    /// Load a YAML configuration file from disk
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let mut fp = File::open(path)?;
        Ok(Config::load(&mut fp)?)
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn max_length_km(&self) -> f64 {
        self.max_length_km
    }

    pub fn get_catalog_handler(&self) -> Result<Box<dyn CatalogSource>, Error> {
        match self.services.get(&ServiceType::Catalog) {
            Some(cfg) => new_catalog_handler(cfg),
            None => {
                // talk to a backend running locally when nothing is configured
                new_catalog_handler(&ServiceConfig::new("rest".to_string(), HashMap::new()))
            }
        }
    }

    pub fn get_route_visualization_handler(&self) -> Result<Box<dyn RouteDrawingService>, Error> {
        match self.services.get(&ServiceType::RouteVisualization) {
            Some(cfg) => new_route_visualization_handler(cfg),
            None => Err(Error::UnknownServiceHandler(
                "no service configuration defined for route visualization".to_string(),
            )),
        }
    }

    pub fn get_map_preview_handler(&self) -> Result<Box<dyn MapPreviewService>, Error> {
        match self.services.get(&ServiceType::MapPreview) {
            Some(cfg) => new_map_preview_handler(cfg),
            None => {
                // use terminal as default preview since we always have that
                new_map_preview_handler(&ServiceConfig::new("tui".to_string(), HashMap::new()))
            }
        }
    }
}

/// `<config dir>/trail_mapper/config.yml`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("trail_mapper")
        .join("config.yml")
}

fn deserialize_level_filter<'de, D>(deserializer: D) -> Result<LevelFilter, D::Error>
where
    D: Deserializer<'de>,
{
    let buf = String::deserialize(deserializer)?;
    LevelFilter::from_str(&buf)
        .map_err(|_| serde::de::Error::custom(format!("invalid level value: {}", buf)))
}

fn serialize_level_filter<S>(level: &LevelFilter, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&level.to_string())
}

fn default_level_filter() -> LevelFilter {
    LevelFilter::Info
}

fn default_max_length_km() -> f64 {
    DEFAULT_MAX_LENGTH_KM
}
