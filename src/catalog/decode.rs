//! Normalize the response shapes the catalog API has used over time into typed records.
//!
//! Accepted shapes for a listing:
//!  * a GeoJSON FeatureCollection
//!  * a paginated envelope `{"count", "next", "previous", "results"}` where `results` is a
//!    FeatureCollection or a bare array
//!  * a bare array
//!
//! Array items are either GeoJSON features or plain records with the geometry stored under the
//! record type's geometry attribute (GeoJSON object or WKT).
use super::FromFeature;
use crate::gps::Location;
use crate::wkt::parse_linestring;
use crate::Error;
use log::{trace, warn};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Geometry of a feature with validated coordinates
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Point(Location),
    LineString(Vec<Location>),
    MultiLineString(Vec<Vec<Location>>),
    Polygon(Vec<Vec<Location>>),
    MultiPolygon(Vec<Vec<Vec<Location>>>),
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
enum RawGeometry {
    Point(Vec<f64>),
    LineString(Vec<Vec<f64>>),
    MultiLineString(Vec<Vec<Vec<f64>>>),
    Polygon(Vec<Vec<Vec<f64>>>),
    MultiPolygon(Vec<Vec<Vec<Vec<f64>>>>),
}

impl Geometry {
    fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::String(wkt) => Ok(Geometry::LineString(parse_linestring(&wkt)?)),
            Value::Object(_) => {
                let raw: RawGeometry = serde_json::from_value(value)?;
                Geometry::from_raw(raw)
            }
            other => Err(Error::Other(format!("unsupported geometry value: {}", other))),
        }
    }

    fn from_raw(raw: RawGeometry) -> Result<Self, Error> {
        let geometry = match raw {
            RawGeometry::Point(p) => Geometry::Point(Location::from_position(&p)?),
            RawGeometry::LineString(line) => Geometry::LineString(positions(&line)?),
            RawGeometry::MultiLineString(lines) => Geometry::MultiLineString(
                lines.iter().map(|l| positions(l)).collect::<Result<_, _>>()?,
            ),
            RawGeometry::Polygon(rings) => Geometry::Polygon(
                rings.iter().map(|r| positions(r)).collect::<Result<_, _>>()?,
            ),
            RawGeometry::MultiPolygon(polygons) => Geometry::MultiPolygon(
                polygons
                    .iter()
                    .map(|rings| rings.iter().map(|r| positions(r)).collect::<Result<Vec<_>, _>>())
                    .collect::<Result<_, _>>()?,
            ),
        };
        Ok(geometry)
    }
}

fn positions(coords: &[Vec<f64>]) -> Result<Vec<Location>, Error> {
    coords.iter().map(|p| Location::from_position(p)).collect()
}

/// A feature (or plain record) split into its id, geometry and attributes
#[derive(Clone, Debug)]
pub struct RawFeature {
    pub id: Option<u64>,
    pub geometry: Option<Geometry>,
    pub properties: Map<String, Value>,
}

impl RawFeature {
    fn from_value(value: Value, geo_field: &str) -> Result<Self, Error> {
        let mut obj = match value {
            Value::Object(obj) => obj,
            other => {
                return Err(Error::Other(format!(
                    "expected a feature object, found: {}",
                    other
                )))
            }
        };

        let is_feature = obj.get("type").and_then(Value::as_str) == Some("Feature");
        let (geometry, properties, id) = if is_feature {
            let properties = match obj.remove("properties") {
                Some(Value::Object(props)) => props,
                Some(Value::Null) | None => Map::new(),
                Some(other) => {
                    return Err(Error::Other(format!(
                        "feature properties must be an object, found: {}",
                        other
                    )))
                }
            };
            (obj.remove("geometry"), properties, obj.remove("id"))
        } else {
            let geometry = obj.remove(geo_field);
            let id = obj.get("id").cloned();
            (geometry, obj, id)
        };

        let id = id
            .as_ref()
            .and_then(parse_id)
            .or_else(|| properties.get("id").and_then(parse_id));
        let geometry = match geometry {
            None | Some(Value::Null) => None,
            Some(value) => Some(Geometry::from_value(value)?),
        };

        Ok(RawFeature {
            id,
            geometry,
            properties,
        })
    }
}

fn parse_id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// One response worth of records plus the link to the next page, if the API paginates
#[derive(Clone, Debug)]
pub struct Page<T> {
    pub records: Vec<T>,
    pub next: Option<String>,
}

/// Decode any accepted listing shape into records. Items that can't be converted are skipped
/// with a warning so one bad row doesn't hide the rest of the collection.
pub fn decode_page<T: FromFeature>(value: Value) -> Result<Page<T>, Error> {
    let (items, next) = split_listing(value)?;
    trace!("decoding {} catalog items", items.len());

    let mut records = Vec::with_capacity(items.len());
    for item in items {
        match RawFeature::from_value(item, T::GEO_FIELD).and_then(T::from_feature) {
            Ok(record) => records.push(record),
            Err(e) => warn!("skipping invalid catalog item: {}", e),
        }
    }
    Ok(Page { records, next })
}

/// Decode a single feature or plain record
pub fn decode_record<T: FromFeature>(value: Value) -> Result<T, Error> {
    RawFeature::from_value(value, T::GEO_FIELD).and_then(T::from_feature)
}

fn split_listing(value: Value) -> Result<(Vec<Value>, Option<String>), Error> {
    match value {
        Value::Array(items) => Ok((items, None)),
        Value::Object(mut obj) => {
            let next = obj
                .get("next")
                .and_then(Value::as_str)
                .map(|s| s.to_string());
            if let Some(features) = obj.remove("features") {
                match features {
                    Value::Array(items) => Ok((items, next)),
                    other => Err(Error::Other(format!(
                        "'features' must be an array, found: {}",
                        other
                    ))),
                }
            } else if let Some(results) = obj.remove("results") {
                let (items, inner_next) = split_listing(results)?;
                Ok((items, next.or(inner_next)))
            } else if obj.get("type").and_then(Value::as_str) == Some("Feature") {
                Ok((vec![Value::Object(obj)], None))
            } else {
                Err(Error::Other(
                    "unrecognized response, expected a FeatureCollection, paginated results or an array"
                        .to_string(),
                ))
            }
        }
        other => Err(Error::Other(format!(
            "unrecognized response, expected an object or array: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Difficulty, Park, ParkRef, Poi, PoiType, Trail};
    use serde_json::json;

    fn trail_feature(id: u64, name: &str) -> Value {
        json!({
            "type": "Feature",
            "id": id,
            "geometry": {
                "type": "LineString",
                "coordinates": [[-6.26, 53.25], [-6.27, 53.26, 310.0]]
            },
            "properties": {
                "name": name,
                "difficulty": "beginner",
                "length_km": 16.3,
                "elevation_gain_m": 380
            }
        })
    }

    #[test]
    fn test_feature_collection() {
        let value = json!({
            "type": "FeatureCollection",
            "features": [trail_feature(1, "Wicklow Way MTB"), trail_feature(2, "Ballyhoura Blue")]
        });
        let page: Page<Trail> = decode_page(value).unwrap();
        assert!(page.next.is_none());
        assert_eq!(page.records.len(), 2);
        let trail = &page.records[0];
        assert_eq!(trail.id, Some(1));
        assert_eq!(trail.name, "Wicklow Way MTB");
        assert_eq!(trail.difficulty, Difficulty::Beginner);
        assert_eq!(trail.elevation_gain_m, 380.0);
        assert_eq!(trail.path.len(), 2);
        assert_eq!(trail.path[1], Location::new(-6.27, 53.26).unwrap());
    }

    #[test]
    fn test_paginated_results() {
        let value = json!({
            "count": 3,
            "next": "http://localhost:8000/api/trails/geojson/?page=2",
            "previous": null,
            "results": {
                "type": "FeatureCollection",
                "features": [trail_feature(1, "A"), trail_feature(2, "B")]
            }
        });
        let page: Page<Trail> = decode_page(value).unwrap();
        assert_eq!(page.records.len(), 2);
        assert_eq!(
            page.next.as_deref(),
            Some("http://localhost:8000/api/trails/geojson/?page=2")
        );

        let value = json!({"count": 1, "next": null, "results": [trail_feature(3, "C")]});
        let page: Page<Trail> = decode_page(value).unwrap();
        assert_eq!(page.records[0].id, Some(3));
        assert!(page.next.is_none());
    }

    #[test]
    fn test_paginated_feature_collection() {
        let value = json!({
            "type": "FeatureCollection",
            "count": 3,
            "next": "http://localhost:8000/api/trails/geojson/?page=2",
            "previous": null,
            "features": [trail_feature(1, "A"), trail_feature(2, "B")]
        });
        let page: Page<Trail> = decode_page(value).unwrap();
        assert_eq!(page.records.len(), 2);
        assert_eq!(
            page.next.as_deref(),
            Some("http://localhost:8000/api/trails/geojson/?page=2")
        );

        let last = json!({"type": "FeatureCollection", "next": null, "features": [trail_feature(3, "C")]});
        let page: Page<Trail> = decode_page(last).unwrap();
        assert!(page.next.is_none());
    }

    #[test]
    fn test_bare_array_of_plain_records() {
        let value = json!([{
            "id": 4,
            "name": "Davagh Forest Red",
            "difficulty": "intermediate",
            "length_km": 14.6,
            "elevation_gain_m": 320.0,
            "park": "2",
            "path": "SRID=4326;LINESTRING (-6.95 54.65, -6.96 54.66)"
        }]);
        let page: Page<Trail> = decode_page(value).unwrap();
        let trail = &page.records[0];
        assert_eq!(trail.id, Some(4));
        assert_eq!(trail.park, Some(ParkRef::Id(2)));
        assert_eq!(trail.path.len(), 2);
    }

    #[test]
    fn test_id_falls_back_to_properties() {
        let value = json!({
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [-6.3, 53.2]},
            "properties": {"id": "12", "name": "Car park", "type": "parking"}
        });
        let poi: Poi = decode_record(value).unwrap();
        assert_eq!(poi.id, Some(12));
        assert_eq!(poi.poi_type, PoiType::Parking);
    }

    #[test]
    fn test_invalid_items_are_skipped() {
        let value = json!({
            "type": "FeatureCollection",
            "features": [
                trail_feature(1, "Good"),
                {"type": "Feature", "geometry": null, "properties": {"name": "No path"}},
                {"type": "Feature", "geometry": {"type": "LineString", "coordinates": [[0, 0], [200, 0]]},
                 "properties": {"name": "Out of range"}},
                "garbage"
            ]
        });
        let page: Page<Trail> = decode_page(value).unwrap();
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].name, "Good");
    }

    #[test]
    fn test_park_polygons() {
        let ring = json!([[-6.3, 53.2], [-6.2, 53.2], [-6.2, 53.3], [-6.3, 53.2]]);
        let value = json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "id": 1,
                 "geometry": {"type": "Polygon", "coordinates": [ring.clone()]},
                 "properties": {"name": "Ticknock", "area_hectares": 120.5}},
                {"type": "Feature", "id": 2,
                 "geometry": {"type": "MultiPolygon", "coordinates": [[ring.clone()], [ring]]},
                 "properties": {"name": "Ballinastoe"}}
            ]
        });
        let page: Page<Park> = decode_page(value).unwrap();
        assert_eq!(page.records[0].area_hectares, Some(120.5));
        assert_eq!(page.records[0].boundary.len(), 1);
        assert_eq!(page.records[1].boundary.len(), 2);
        assert!(page.records[1].location.is_none());
    }

    #[test]
    fn test_unrecognized_shapes() {
        assert!(decode_page::<Trail>(json!({"detail": "Not found."})).is_err());
        assert!(decode_page::<Trail>(json!("nope")).is_err());
        assert!(decode_page::<Trail>(json!({"features": {}})).is_err());
    }
}
