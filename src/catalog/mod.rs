//! Typed records for the trail catalog: trails, parks and points of interest
use crate::gps::{BoundingBox, Location};
use crate::wkt::linestring_to_wkt;
use crate::Error;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;

mod decode;
pub use decode::{decode_page, decode_record, Geometry, Page, RawFeature};
pub mod display;
pub mod filter;

/// Trail difficulty class
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
    #[serde(other)]
    Unknown,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
            Difficulty::Expert => "expert",
            Difficulty::Unknown => "unknown",
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Unknown
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        match src.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            "expert" => Ok(Difficulty::Expert),
            _ => Err(Error::Other(format!(
                "unknown difficulty '{}', expected one of: beginner, intermediate, advanced, expert",
                src
            ))),
        }
    }
}

/// Kind of point of interest
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoiType {
    BikeRepair,
    BikeShop,
    Parking,
    RestArea,
    Trailhead,
    Viewpoint,
    WaterSource,
    #[serde(other)]
    Other,
}

impl PoiType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PoiType::BikeRepair => "bike_repair",
            PoiType::BikeShop => "bike_shop",
            PoiType::Parking => "parking",
            PoiType::RestArea => "rest_area",
            PoiType::Trailhead => "trailhead",
            PoiType::Viewpoint => "viewpoint",
            PoiType::WaterSource => "water_source",
            PoiType::Other => "other",
        }
    }
}

impl Default for PoiType {
    fn default() -> Self {
        PoiType::Other
    }
}

impl fmt::Display for PoiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reference from a trail to the park it belongs to, backends send either the primary key or
/// the park's name
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParkRef {
    Id(u64),
    Name(String),
}

/// A mountain bike trail
#[derive(Clone, Debug, PartialEq)]
pub struct Trail {
    pub id: Option<u64>,
    pub name: String,
    pub difficulty: Difficulty,
    pub length_km: f64,
    pub elevation_gain_m: f64,
    pub description: Option<String>,
    pub park: Option<ParkRef>,
    pub path: Vec<Location>,
}

impl Trail {
    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::from_locations(&self.path)
    }
}

/// A park boundary, stored as a list of closed rings
#[derive(Clone, Debug, PartialEq)]
pub struct Park {
    pub id: Option<u64>,
    pub name: String,
    pub location: Option<String>,
    pub area_hectares: Option<f64>,
    pub boundary: Vec<Vec<Location>>,
}

impl Park {
    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::from_locations(self.boundary.iter().flatten())
    }
}

/// A single point of interest
#[derive(Clone, Debug, PartialEq)]
pub struct Poi {
    pub id: Option<u64>,
    pub name: String,
    pub poi_type: PoiType,
    pub description: Option<String>,
    pub location: Location,
}

/// Records that can be built from a normalized feature
pub trait FromFeature: Sized {
    /// Name of the geometry attribute when the backend sends plain records instead of features
    const GEO_FIELD: &'static str;

    fn from_feature(feature: RawFeature) -> Result<Self, Error>;
}

#[derive(Debug, Deserialize)]
struct TrailProperties {
    name: String,
    #[serde(default)]
    difficulty: Difficulty,
    #[serde(default)]
    length_km: f64,
    #[serde(default)]
    elevation_gain_m: f64,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    park: Option<Value>,
    #[serde(default)]
    park_name: Option<String>,
}

impl FromFeature for Trail {
    const GEO_FIELD: &'static str = "path";

    fn from_feature(feature: RawFeature) -> Result<Self, Error> {
        let path = match feature.geometry {
            Some(Geometry::LineString(path)) => path,
            other => {
                return Err(Error::Other(format!(
                    "trail geometry must be a LineString, found {}",
                    geometry_name(&other)
                )))
            }
        };
        let TrailProperties {
            name,
            difficulty,
            length_km,
            elevation_gain_m,
            description,
            park,
            park_name,
        } = serde_json::from_value(Value::Object(feature.properties))?;
        let park = match park {
            Some(Value::Number(n)) => n.as_u64().map(ParkRef::Id),
            Some(Value::String(s)) => Some(match s.parse::<u64>() {
                Ok(id) => ParkRef::Id(id),
                Err(_) => ParkRef::Name(s),
            }),
            _ => None,
        };

        Ok(Trail {
            id: feature.id,
            name,
            difficulty,
            length_km,
            elevation_gain_m,
            description: description.filter(|d| !d.is_empty()),
            park: park.or_else(|| park_name.map(ParkRef::Name)),
            path,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ParkProperties {
    name: String,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    area_hectares: Option<f64>,
}

impl FromFeature for Park {
    const GEO_FIELD: &'static str = "boundary";

    fn from_feature(feature: RawFeature) -> Result<Self, Error> {
        let boundary = match feature.geometry {
            Some(Geometry::Polygon(rings)) => rings,
            Some(Geometry::MultiPolygon(polygons)) => polygons.into_iter().flatten().collect(),
            other => {
                return Err(Error::Other(format!(
                    "park geometry must be a Polygon or MultiPolygon, found {}",
                    geometry_name(&other)
                )))
            }
        };
        let props: ParkProperties = serde_json::from_value(Value::Object(feature.properties))?;
        Ok(Park {
            id: feature.id,
            name: props.name,
            location: props.location.filter(|l| !l.is_empty()),
            area_hectares: props.area_hectares,
            boundary,
        })
    }
}

#[derive(Debug, Deserialize)]
struct PoiProperties {
    name: String,
    #[serde(default, alias = "type")]
    poi_type: PoiType,
    #[serde(default)]
    description: Option<String>,
}

impl FromFeature for Poi {
    const GEO_FIELD: &'static str = "location";

    fn from_feature(feature: RawFeature) -> Result<Self, Error> {
        let location = match feature.geometry {
            Some(Geometry::Point(location)) => location,
            other => {
                return Err(Error::Other(format!(
                    "point of interest geometry must be a Point, found {}",
                    geometry_name(&other)
                )))
            }
        };
        let props: PoiProperties = serde_json::from_value(Value::Object(feature.properties))?;
        Ok(Poi {
            id: feature.id,
            name: props.name,
            poi_type: props.poi_type,
            description: props.description.filter(|d| !d.is_empty()),
            location,
        })
    }
}

fn geometry_name(geometry: &Option<Geometry>) -> &'static str {
    match geometry {
        None => "no geometry",
        Some(Geometry::Point(_)) => "Point",
        Some(Geometry::LineString(_)) => "LineString",
        Some(Geometry::MultiLineString(_)) => "MultiLineString",
        Some(Geometry::Polygon(_)) => "Polygon",
        Some(Geometry::MultiPolygon(_)) => "MultiPolygon",
    }
}

/// A trail drawn by the user that is ready to be submitted
#[derive(Clone, Debug, PartialEq)]
pub struct NewTrail {
    pub name: String,
    pub difficulty: Difficulty,
    pub description: String,
    pub park: Option<u64>,
    pub length_km: f64,
    pub elevation_gain_m: f64,
    pub path: Vec<Location>,
}

impl NewTrail {
    /// Trail creation request body, the geometry is sent as WKT under `path_field`
    pub fn to_request_body(&self, path_field: &str) -> Value {
        let mut body = Map::new();
        body.insert("name".to_string(), json!(self.name));
        body.insert("difficulty".to_string(), json!(self.difficulty));
        body.insert("description".to_string(), json!(self.description));
        body.insert("park".to_string(), json!(self.park));
        body.insert("length_km".to_string(), json!(self.length_km));
        body.insert("elevation_gain_m".to_string(), json!(self.elevation_gain_m));
        body.insert(path_field.to_string(), json!(linestring_to_wkt(&self.path)));
        Value::Object(body)
    }

    /// Render as a GeoJSON feature for catalogs stored on disk
    pub fn to_feature(&self, id: u64) -> Value {
        json!({
            "type": "Feature",
            "id": id,
            "geometry": {
                "type": "LineString",
                "coordinates": self.path,
            },
            "properties": {
                "id": id,
                "name": self.name,
                "difficulty": self.difficulty,
                "description": self.description,
                "park": self.park,
                "length_km": self.length_km,
                "elevation_gain_m": self.elevation_gain_m,
            }
        })
    }

    /// The trail as it will appear in the catalog once created
    pub fn into_trail(self, id: Option<u64>) -> Trail {
        Trail {
            id,
            name: self.name,
            difficulty: self.difficulty,
            length_km: self.length_km,
            elevation_gain_m: self.elevation_gain_m,
            description: Some(self.description).filter(|d| !d.is_empty()),
            park: self.park.map(ParkRef::Id),
            path: self.path,
        }
    }
}
