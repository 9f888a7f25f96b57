//! Use the MapBox static images API to draw a trail route
use super::{Route, RouteDrawingService};
use crate::config::FromServiceConfig;
use crate::gps::{encode_coordinates, Marker};
use crate::Error;
use log::{debug, warn};
use reqwest::blocking::Client;

/// mapbox has a URL limit of 8192 bytes
const MAX_URL_LENGTH: usize = 8192;

/// Defines parameters to interact with the MapBox API
#[derive(Debug, FromServiceConfig)]
pub struct MapBox {
    base_url: String,
    api_version: String,
    username: String,
    style: String,
    image_width: u32,
    image_height: u32,
    padding: u32,
    marker_color: String,
    marker_style: String,
    stroke_color: String,
    stroke_width: u32,
    stroke_opacity: f32,
    access_token: String,
}

impl MapBox {
    fn request_url(&self, route: &Route) -> Result<String, Error> {
        // hacky way to encode the path, we need to drop the leading '=' sign
        // from the call to form_urlencoded which is meant for key=value pairs
        let encoded_path = form_urlencoded::Serializer::new(String::new())
            .append_pair("", &encode_coordinates(route.path())?)
            .finish();
        let markers = self.marker_overlays(route.markers());
        let stroke_color = route
            .color()
            .map(|c| c.trim_start_matches('#'))
            .unwrap_or(&self.stroke_color);
        let url = format!(
            "{}/styles/{}/{}/{}/static/{}path-{}+{}-{}({})/auto/{}x{}",
            self.base_url,
            self.api_version,
            self.username,
            self.style,
            markers,
            self.stroke_width,
            stroke_color,
            self.stroke_opacity,
            &encoded_path[1..],
            self.image_width,
            self.image_height,
        );

        // the access_token=[..] part in the query takes up around 100 bytes by itself
        if url.len() > MAX_URL_LENGTH - 100 {
            warn!(
                "URL length exceeds 8KB due to a long trail, request may fail (size={:.2}KB).",
                url.len() as f32 / 1024.0
            );
        }

        Ok(url)
    }

    /// Comma terminated list of pin overlays. Labels mapbox can't show (anything other than a
    /// single alphanumeric char or a number up to 99) get an unlabelled pin so no two markers
    /// share a misleading label.
    fn marker_overlays(&self, markers: &[Marker]) -> String {
        let overlays = markers.iter().fold(String::new(), |acc, m| {
            let pin = match pin_label(m.label()) {
                Some(label) => format!("pin-{}-{}", self.marker_style, label),
                None => format!("pin-{}", self.marker_style),
            };
            acc + &format!(
                "{}+{}({},{}),",
                pin,
                self.marker_color,
                m.longitude(),
                m.latitude()
            )
        });
        let overlays = form_urlencoded::Serializer::new(String::new())
            .append_pair("", &overlays)
            .finish();
        overlays[1..].to_string()
    }
}

fn pin_label(label: &str) -> Option<String> {
    let mut chars = label.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphanumeric() => Some(c.to_ascii_lowercase().to_string()),
        _ => match label.parse::<u8>() {
            Ok(n) if n <= 99 && label.chars().all(|c| c.is_ascii_digit()) => Some(n.to_string()),
            _ => None,
        },
    }
}

impl Default for MapBox {
    fn default() -> Self {
        MapBox {
            base_url: "https://api.mapbox.com".to_string(),
            api_version: "v1".to_string(),
            username: "mapbox".to_string(),
            style: "outdoors-v11".to_string(),
            image_width: 1280,
            image_height: 1280,
            padding: 50,
            marker_color: "f07272".to_string(),
            marker_style: "l".to_string(),
            stroke_color: "3b82f6".to_string(),
            stroke_width: 4,
            stroke_opacity: 0.8,
            access_token: String::new(),
        }
    }
}

impl RouteDrawingService for MapBox {
    fn draw_route(&self, route: &Route) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
        if route.path().len() < 2 {
            return Err(Box::new(Error::InsufficientPoints(route.path().len())));
        }
        // request image data
        let client = Client::new();
        let request_url = self.request_url(route)?;
        debug!("requesting route image from {}", self.base_url);
        let resp = client
            .get(&request_url)
            .query(&[
                ("access_token", self.access_token.clone()),
                ("padding", self.padding.to_string()),
            ])
            .send()?;
        if resp.status().is_success() {
            // return image data
            Ok(resp.bytes()?.to_vec())
        } else {
            let code = resp.status();
            let msg = resp.text().unwrap_or_default();
            Err(Box::new(Error::RequestError(
                code,
                format!("MapBox drawing failed: {}", msg),
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use crate::gps::Location;
    use std::collections::HashMap;

    fn loc(lon: f64, lat: f64) -> Location {
        Location::new(lon, lat).unwrap()
    }

    #[test]
    fn test_from_config() {
        let mut params = HashMap::new();
        params.insert("access_token".to_string(), serde_yaml::Value::from("pk.test"));
        params.insert("image_width".to_string(), serde_yaml::Value::from(640));
        params.insert("stroke_opacity".to_string(), serde_yaml::Value::from(0.5));
        let mapbox = MapBox::from_config(&ServiceConfig::new("mapbox".to_string(), params)).unwrap();
        assert_eq!(mapbox.access_token, "pk.test");
        assert_eq!(mapbox.image_width, 640);
        assert_eq!(mapbox.stroke_opacity, 0.5);
        assert_eq!(mapbox.image_height, 1280);
    }

    #[test]
    fn test_marker_labels_stay_distinct() {
        let mapbox = MapBox::default();
        let markers: Vec<Marker> = (1..=12)
            .map(|i| Marker::new(loc(0.0, 0.0), i.to_string()))
            .collect();
        let overlays = mapbox.marker_overlays(&markers);
        assert!(overlays.starts_with("pin-l-1%2B"));
        assert!(overlays.contains("pin-l-10%2B"));
        assert!(overlays.contains("pin-l-12%2B"));
        assert_eq!(overlays.matches("pin-l-1%2B").count(), 1);

        assert_eq!(pin_label("S").as_deref(), Some("s"));
        assert_eq!(pin_label("99").as_deref(), Some("99"));
        assert_eq!(pin_label("100"), None);
        assert_eq!(pin_label("Start"), None);
        assert_eq!(pin_label("+5"), None);
        assert_eq!(pin_label(""), None);
    }

    #[test]
    fn test_request_url() {
        let mapbox = MapBox::default();
        let path = vec![loc(-120.2, 38.5), loc(-120.95, 40.7), loc(-126.453, 43.252)];
        let markers = vec![Marker::new(path[0], "S".to_string())];
        let route = Route::new(&path, &markers).with_color("#ef4444");
        let url = mapbox.request_url(&route).unwrap();
        assert_eq!(
            url,
            "https://api.mapbox.com/styles/v1/mapbox/outdoors-v11/static/\
             pin-l-s%2Bf07272%28-120.2%2C38.5%29%2C\
             path-4+ef4444-0.8(_p%7EiF%7Eps%7CU_ulLnnqC_mqNvxq%60%40)/auto/1280x1280"
        );
    }
}
