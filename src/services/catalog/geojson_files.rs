//! Catalog stored as GeoJSON files in a local directory
use super::CatalogSource;
use crate::catalog::{decode_page, FromFeature, NewTrail, Park, Poi, Trail};
use crate::config::FromServiceConfig;
use crate::Error;
use log::{debug, info};
use serde_json::{json, Value};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind};
use std::path::{Path, PathBuf};

/// Reads `parks.geojson`, `trails.geojson` and `pois.geojson` from a directory. A file that
/// doesn't exist yet is treated as an empty collection.
#[derive(Debug, FromServiceConfig)]
pub struct GeoJsonFiles {
    directory: String,
    parks_file: String,
    trails_file: String,
    pois_file: String,
}

impl Default for GeoJsonFiles {
    fn default() -> Self {
        GeoJsonFiles {
            directory: ".".to_string(),
            parks_file: "parks.geojson".to_string(),
            trails_file: "trails.geojson".to_string(),
            pois_file: "pois.geojson".to_string(),
        }
    }
}

impl GeoJsonFiles {
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        GeoJsonFiles {
            directory: directory.as_ref().to_string_lossy().into_owned(),
            ..Default::default()
        }
    }

    fn file_path(&self, name: &str) -> PathBuf {
        Path::new(&self.directory).join(name)
    }

    /// Parsed file contents, `None` if the file doesn't exist
    fn read_value(&self, path: &Path) -> Result<Option<Value>, Error> {
        match File::open(path) {
            Ok(fp) => Ok(Some(serde_json::from_reader(BufReader::new(fp))?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn read_collection<T: FromFeature>(&self, name: &str) -> Result<Vec<T>, Error> {
        let path = self.file_path(name);
        match self.read_value(&path)? {
            Some(value) => {
                let records = decode_page::<T>(value)?.records;
                debug!("read {} records from {:?}", records.len(), path);
                Ok(records)
            }
            None => {
                debug!("{:?} does not exist, treating it as empty", path);
                Ok(Vec::new())
            }
        }
    }
}

/// Largest id used by a feature or plain record in the collection
fn max_feature_id(items: &[Value]) -> u64 {
    items
        .iter()
        .filter_map(|item| {
            item.get("id")
                .or_else(|| item.get("properties").and_then(|p| p.get("id")))
                .and_then(|id| match id {
                    Value::Number(n) => n.as_u64(),
                    Value::String(s) => s.parse().ok(),
                    _ => None,
                })
        })
        .max()
        .unwrap_or(0)
}

/// The list new features are appended to, nested paginated results included
fn feature_list(collection: &mut Value) -> Option<&mut Vec<Value>> {
    match collection {
        Value::Array(items) => Some(items),
        Value::Object(obj) => {
            if obj.contains_key("features") {
                obj.get_mut("features").and_then(Value::as_array_mut)
            } else {
                obj.get_mut("results").and_then(feature_list)
            }
        }
        _ => None,
    }
}

impl CatalogSource for GeoJsonFiles {
    fn fetch_parks(&self) -> Result<Vec<Park>, Box<dyn std::error::Error>> {
        Ok(self.read_collection(&self.parks_file)?)
    }

    fn fetch_trails(&self) -> Result<Vec<Trail>, Box<dyn std::error::Error>> {
        Ok(self.read_collection(&self.trails_file)?)
    }

    fn fetch_pois(&self) -> Result<Vec<Poi>, Box<dyn std::error::Error>> {
        Ok(self.read_collection(&self.pois_file)?)
    }

    fn create_trail(&self, trail: &NewTrail) -> Result<Trail, Box<dyn std::error::Error>> {
        let path = self.file_path(&self.trails_file);
        let mut collection = self
            .read_value(&path)?
            .unwrap_or_else(|| json!({"type": "FeatureCollection", "features": []}));

        let features = feature_list(&mut collection).ok_or_else(|| {
            Error::Other(format!("{:?} does not contain a trail collection", path))
        })?;
        let id = max_feature_id(features) + 1;
        features.push(trail.to_feature(id));
        if let Some(count) = collection.get_mut("count") {
            if let Some(n) = count.as_u64() {
                *count = json!(n + 1);
            }
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let fp = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(fp, &collection)?;
        info!("stored trail '{}' as id={} in {:?}", trail.name, id, path);

        Ok(trail.clone().into_trail(Some(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_feature_id() {
        let items = vec![
            json!({"type": "Feature", "id": 3, "properties": {}}),
            json!({"type": "Feature", "properties": {"id": "8"}}),
            json!({"id": 5, "name": "plain"}),
            json!({"type": "Feature", "properties": {}}),
        ];
        assert_eq!(max_feature_id(&items), 8);
        assert_eq!(max_feature_id(&[]), 0);
    }

    #[test]
    fn test_feature_list_shapes() {
        let mut collection = json!({"type": "FeatureCollection", "features": [1]});
        assert_eq!(feature_list(&mut collection).map(|f| f.len()), Some(1));
        let mut paginated = json!({"count": 0, "results": {"features": []}});
        assert_eq!(feature_list(&mut paginated).map(|f| f.len()), Some(0));
        let mut bare = json!([1, 2]);
        assert_eq!(feature_list(&mut bare).map(|f| f.len()), Some(2));
        assert!(feature_list(&mut json!({"detail": "nope"})).is_none());
        assert!(feature_list(&mut json!("nope")).is_none());
    }

    #[test]
    fn test_missing_files_are_empty() {
        let catalog = GeoJsonFiles::new(std::env::temp_dir().join("trail_mapper_does_not_exist"));
        assert!(catalog.fetch_parks().unwrap().is_empty());
        assert!(catalog.fetch_trails().unwrap().is_empty());
        assert!(catalog.fetch_pois().unwrap().is_empty());
    }
}
