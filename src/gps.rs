//! Module with GPS specific structures
use crate::Error;
use serde::ser::{Serialize, SerializeTuple, Serializer};
use std::char;

/// Mean earth radius in meters, the same sphere Leaflet measures on screen distances with
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Stores a single WGS84 geospatial point
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Location {
    /// longitude coordinate in degrees
    longitude: f64,
    /// latitude coordinate in degrees
    latitude: f64,
}

impl Location {
    /// Create a location from decimal degrees, rejecting anything outside of the WGS84 ranges
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, Error> {
        if !longitude.is_finite()
            || !latitude.is_finite()
            || !(-180.0..=180.0).contains(&longitude)
            || !(-90.0..=90.0).contains(&latitude)
        {
            return Err(Error::InvalidCoordinate(longitude, latitude));
        }
        Ok(Location {
            longitude,
            latitude,
        })
    }

    /// Create a location from a GeoJSON position (`[lon, lat]` or `[lon, lat, elevation]`)
    pub fn from_position(position: &[f64]) -> Result<Self, Error> {
        match position {
            [lon, lat] | [lon, lat, _] => Location::new(*lon, *lat),
            _ => Err(Error::Other(format!(
                "expected a position with 2 or 3 values, found {}",
                position.len()
            ))),
        }
    }

    /// Return latitude in degrees
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Return longitude in degrees
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to another location in meters using the haversine formula
    pub fn distance_to(&self, other: &Location) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = lat2 - lat1;
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }

    /// Human readable coordinate readout, e.g. `Lat: 53.35000, Lng: -6.26000`
    pub fn readout(&self) -> String {
        format!("Lat: {:.5}, Lng: {:.5}", self.latitude, self.longitude)
    }
}

impl Serialize for Location {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // GeoJSON positions are longitude first
        let mut tup = serializer.serialize_tuple(2)?;
        tup.serialize_element(&self.longitude)?;
        tup.serialize_element(&self.latitude)?;
        tup.end()
    }
}

/// Sum of the great-circle distances between consecutive locations, in meters
pub fn path_length_meters(path: &[Location]) -> f64 {
    path.windows(2).map(|w| w[0].distance_to(&w[1])).sum()
}

/// A labelled location drawn on top of a route
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    location: Location,
    label: String,
}

impl Marker {
    pub fn new(location: Location, label: String) -> Self {
        Marker { location, label }
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn latitude(&self) -> f64 {
        self.location.latitude()
    }

    pub fn longitude(&self) -> f64 {
        self.location.longitude()
    }
}

/// Axis aligned longitude/latitude extent of a set of locations
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Compute the extent of the locations, `None` if there are none
    pub fn from_locations<'a, I>(locations: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Location>,
    {
        let mut iter = locations.into_iter();
        let first = iter.next()?;
        let init = BoundingBox {
            min_lon: first.longitude(),
            min_lat: first.latitude(),
            max_lon: first.longitude(),
            max_lat: first.latitude(),
        };
        Some(iter.fold(init, |bbox, loc| bbox.extend(loc)))
    }

    /// Grow the box so it contains the location
    pub fn extend(self, loc: &Location) -> Self {
        BoundingBox {
            min_lon: self.min_lon.min(loc.longitude()),
            min_lat: self.min_lat.min(loc.latitude()),
            max_lon: self.max_lon.max(loc.longitude()),
            max_lat: self.max_lat.max(loc.latitude()),
        }
    }

    /// Smallest box containing both boxes
    pub fn union(self, other: BoundingBox) -> Self {
        BoundingBox {
            min_lon: self.min_lon.min(other.min_lon),
            min_lat: self.min_lat.min(other.min_lat),
            max_lon: self.max_lon.max(other.max_lon),
            max_lat: self.max_lat.max(other.max_lat),
        }
    }

    /// Expand every side by a fraction of the box size, degenerate boxes get a small fixed margin
    pub fn padded(self, fraction: f64) -> Self {
        let dx = ((self.max_lon - self.min_lon) * fraction).max(0.001);
        let dy = ((self.max_lat - self.min_lat) * fraction).max(0.001);
        BoundingBox {
            min_lon: (self.min_lon - dx).max(-180.0),
            min_lat: (self.min_lat - dy).max(-90.0),
            max_lon: (self.max_lon + dx).min(180.0),
            max_lat: (self.max_lat + dy).min(90.0),
        }
    }

    /// Format as the `in_bbox` query value used by the catalog API
    pub fn to_query_value(&self) -> String {
        format!(
            "{},{},{},{}",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}

/// Encodes a slice of coordinates into Google Encoded Polyline format.
///
/// This code was extracted and simplified for our use case from:
/// https://github.com/georust/polyline
/// https://developers.google.com/maps/documentation/utilities/polylinealgorithm
pub fn encode_coordinates(coordinates: &[Location]) -> Result<String, Error> {
    let mut output = String::new();
    let mut b = (0, 0);

    for a in coordinates {
        let a = (scale(a.latitude), scale(a.longitude));
        encode(a.0, b.0, &mut output)?;
        encode(a.1, b.1, &mut output)?;
        b = a;
    }

    Ok(output)
}

/// Scale a floating point value into an integer at the given precision
#[inline]
fn scale(n: f64) -> i64 {
    static FACTOR: f64 = 100_000.0; // use 5 digits of precision
    (FACTOR * n).round() as i64
}

/// Encode a single latitude or longitude delta into the polyline format
fn encode(current: i64, previous: i64, output: &mut String) -> Result<(), Error> {
    let mut coordinate = (current - previous) << 1;
    if (current - previous) < 0 {
        coordinate = !coordinate;
    }
    while coordinate >= 0x20 {
        let from_char = char::from_u32(((0x20 | (coordinate & 0x1f)) + 63) as u32)
            .ok_or_else(|| Error::Other("Couldn't convert character".to_string()))?;
        output.push(from_char);
        coordinate >>= 5;
    }
    let from_char = char::from_u32((coordinate + 63) as u32)
        .ok_or_else(|| Error::Other("Couldn't convert character".to_string()))?;
    output.push(from_char);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(lon: f64, lat: f64) -> Location {
        Location::new(lon, lat).unwrap()
    }

    #[test]
    fn test_location_rejects_out_of_range() {
        assert!(Location::new(-180.0, -90.0).is_ok());
        assert!(Location::new(180.0, 90.0).is_ok());
        assert!(Location::new(180.5, 0.0).is_err());
        assert!(Location::new(0.0, -90.1).is_err());
        assert!(Location::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_from_position_ignores_elevation() {
        let l = Location::from_position(&[-6.26, 53.35, 120.0]).unwrap();
        assert_eq!(l, loc(-6.26, 53.35));
        assert!(Location::from_position(&[1.0]).is_err());
    }

    #[test]
    fn test_haversine_known_distance() {
        // Dublin to Cork is roughly 220 km as the crow flies
        let dublin = loc(-6.2603, 53.3498);
        let cork = loc(-8.4756, 51.8985);
        let d = dublin.distance_to(&cork);
        assert!((d - 220_000.0).abs() < 3_000.0, "distance was {}", d);
        assert_eq!(dublin.distance_to(&dublin), 0.0);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let d = loc(0.0, 0.0).distance_to(&loc(0.0, 1.0));
        let expected = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;
        assert!((d - expected).abs() < 1e-6);
    }

    #[test]
    fn test_path_length() {
        assert_eq!(path_length_meters(&[]), 0.0);
        assert_eq!(path_length_meters(&[loc(1.0, 1.0)]), 0.0);
        let a = loc(-6.26, 53.35);
        let b = loc(-6.25, 53.36);
        let c = loc(-6.24, 53.355);
        let total = path_length_meters(&[a, b, c]);
        assert_eq!(total, a.distance_to(&b) + b.distance_to(&c));
    }

    #[test]
    fn test_bounding_box() {
        let pts = vec![loc(-6.26, 53.35), loc(-6.24, 53.36), loc(-6.25, 53.34)];
        let bbox = BoundingBox::from_locations(&pts).unwrap();
        assert_eq!(bbox.min_lon, -6.26);
        assert_eq!(bbox.max_lon, -6.24);
        assert_eq!(bbox.min_lat, 53.34);
        assert_eq!(bbox.max_lat, 53.36);
        assert_eq!(bbox.to_query_value(), "-6.26,53.34,-6.24,53.36");
        assert!(BoundingBox::from_locations(&Vec::new()).is_none());
    }

    #[test]
    fn test_encode_coordinates() {
        // example from the polyline algorithm documentation
        let pts = vec![
            loc(-120.2, 38.5),
            loc(-120.95, 40.7),
            loc(-126.453, 43.252),
        ];
        assert_eq!(encode_coordinates(&pts).unwrap(), "_p~iF~ps|U_ulLnnqC_mqNvxq`@");
    }

    #[test]
    fn test_readout() {
        assert_eq!(loc(-6.26, 53.35).readout(), "Lat: 53.35000, Lng: -6.26000");
    }
}
