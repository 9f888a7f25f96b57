//! Serialize paths to and from Well-Known Text `LINESTRING` geometries
use crate::gps::Location;
use crate::Error;

/// Number of fractional digits kept for each coordinate (~0.1 m at the equator)
pub const COORDINATE_PRECISION: i32 = 6;

/// Format a path as `LINESTRING(lon lat, lon lat, ...)`, paths with fewer than 2 points
/// produce an empty string since they aren't a valid line.
pub fn linestring_to_wkt(points: &[Location]) -> String {
    if points.len() < 2 {
        return String::new();
    }
    let pairs: Vec<String> = points
        .iter()
        .map(|p| {
            format!(
                "{} {}",
                format_coordinate(p.longitude()),
                format_coordinate(p.latitude())
            )
        })
        .collect();
    format!("LINESTRING({})", pairs.join(", "))
}

/// Round to the fixed precision and print the shortest decimal form, f64's Display impl never
/// uses exponents or grouping separators.
fn format_coordinate(value: f64) -> String {
    let factor = 10f64.powi(COORDINATE_PRECISION);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        // avoid printing "-0"
        return "0".to_string();
    }
    format!("{}", rounded)
}

/// Parse a `LINESTRING` (keyword matched case-insensitively, an optional `SRID=...;` prefix is
/// skipped) back into a sequence of locations.
pub fn parse_linestring(text: &str) -> Result<Vec<Location>, Error> {
    let mut body = text.trim();
    if starts_with_ignore_case(body, "SRID=") {
        body = match body.find(';') {
            Some(idx) => body[idx + 1..].trim_start(),
            None => return Err(Error::InvalidWkt(format!("unterminated SRID prefix: {}", text))),
        };
    }

    const KEYWORD: &str = "LINESTRING";
    if !starts_with_ignore_case(body, KEYWORD) {
        return Err(Error::InvalidWkt(format!(
            "expected a LINESTRING geometry: {}",
            text
        )));
    }
    let body = body[KEYWORD.len()..].trim();
    let inner = body
        .strip_prefix('(')
        .and_then(|b| b.strip_suffix(')'))
        .ok_or_else(|| Error::InvalidWkt(format!("missing parentheses: {}", text)))?;

    let mut points = Vec::new();
    for pair in inner.split(',') {
        let values: Vec<&str> = pair.split_whitespace().collect();
        if values.len() != 2 {
            return Err(Error::InvalidWkt(format!(
                "expected 'lon lat' but found '{}'",
                pair.trim()
            )));
        }
        let lon = parse_number(values[0])?;
        let lat = parse_number(values[1])?;
        points.push(Location::new(lon, lat)?);
    }

    if points.len() < 2 {
        return Err(Error::InvalidWkt(format!(
            "a LINESTRING needs at least 2 points, found {}",
            points.len()
        )));
    }
    Ok(points)
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .map_or(false, |head| head.eq_ignore_ascii_case(prefix))
}

fn parse_number(src: &str) -> Result<f64, Error> {
    src.parse::<f64>()
        .map_err(|_| Error::InvalidWkt(format!("'{}' is not a number", src)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(lon: f64, lat: f64) -> Location {
        Location::new(lon, lat).unwrap()
    }

    #[test]
    fn test_short_paths_are_empty() {
        assert_eq!(linestring_to_wkt(&[]), "");
        assert_eq!(linestring_to_wkt(&[loc(-6.26, 53.35)]), "");
    }

    #[test]
    fn test_format() {
        let wkt = linestring_to_wkt(&[loc(-6.26, 53.35), loc(-6.25, 53.36), loc(-6.24, 53.355)]);
        assert_eq!(wkt, "LINESTRING(-6.26 53.35, -6.25 53.36, -6.24 53.355)");
    }

    #[test]
    fn test_fixed_precision_and_no_negative_zero() {
        let wkt = linestring_to_wkt(&[loc(-0.0000001, 0.0), loc(10.123456789, -1e-7)]);
        assert_eq!(wkt, "LINESTRING(0 0, 10.123457 0)");
        let wkt = linestring_to_wkt(&[loc(179.9999999, 89.0), loc(-120.0, 1e-6)]);
        assert_eq!(wkt, "LINESTRING(180 89, -120 0.000001)");
    }

    #[test]
    fn test_parse_round_trip() {
        let pts = vec![loc(-8.45, 52.12), loc(-8.46, 52.13), loc(-8.46, 52.13), loc(-8.47, 52.14)];
        assert_eq!(parse_linestring(&linestring_to_wkt(&pts)).unwrap(), pts);
    }

    #[test]
    fn test_parse_is_lenient_about_case_and_whitespace() {
        let pts = parse_linestring("  linestring ( -6.26 53.25,-6.27   53.26 ) ").unwrap();
        assert_eq!(pts, vec![loc(-6.26, 53.25), loc(-6.27, 53.26)]);
        let pts = parse_linestring("SRID=4326;LINESTRING(-6.26 53.25, -6.27 53.26)").unwrap();
        assert_eq!(pts.len(), 2);
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        assert!(parse_linestring("POINT(1 2)").is_err());
        assert!(parse_linestring("LINESTRING(1 2)").is_err());
        assert!(parse_linestring("LINESTRING(1 2, 3)").is_err());
        assert!(parse_linestring("LINESTRING(1 2, 3 x)").is_err());
        assert!(parse_linestring("LINESTRING 1 2, 3 4").is_err());
        assert!(parse_linestring("LINESTRING(1 2, 3 95)").is_err());
        assert!(parse_linestring("").is_err());
    }
}
