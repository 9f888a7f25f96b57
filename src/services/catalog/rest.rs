//! Talk to the trail catalog web API
use super::CatalogSource;
use crate::catalog::{decode_page, decode_record, FromFeature, NewTrail, Park, Poi, Trail};
use crate::config::FromServiceConfig;
use crate::Error;
use log::{debug, info, warn};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;

/// Defines parameters to interact with the catalog API
#[derive(Debug, FromServiceConfig)]
pub struct RestCatalog {
    base_url: String,
    parks_endpoint: String,
    trails_endpoint: String,
    pois_endpoint: String,
    create_trail_endpoint: String,
    /// attribute the WKT geometry of a new trail is sent under
    path_field: String,
    auth_token: Option<String>,
    /// only request features inside `min_lon,min_lat,max_lon,max_lat`
    bbox: Option<String>,
    max_pages: u32,
    timeout_secs: u64,
}

impl Default for RestCatalog {
    fn default() -> Self {
        RestCatalog {
            base_url: "http://localhost:8000".to_string(),
            parks_endpoint: "/api/parks/geojson/".to_string(),
            trails_endpoint: "/api/trails/geojson/".to_string(),
            pois_endpoint: "/api/pois/geojson/".to_string(),
            create_trail_endpoint: "/api/trails/".to_string(),
            path_field: "path".to_string(),
            auth_token: None,
            bbox: None,
            max_pages: 100,
            timeout_secs: 30,
        }
    }
}

impl RestCatalog {
    fn url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    fn client(&self) -> Result<Client, Error> {
        Ok(Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()?)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => request.header("Authorization", format!("Token {}", token)),
            None => request,
        }
    }

    /// Request every page of a listing endpoint
    fn fetch_all<T: FromFeature>(&self, endpoint: &str) -> Result<Vec<T>, Error> {
        let client = self.client()?;
        let mut records = Vec::new();
        let mut request = client.get(&self.url(endpoint));
        if let Some(bbox) = &self.bbox {
            request = request.query(&[("in_bbox", bbox)]);
        }

        let mut pages = 0;
        loop {
            let resp = self.authorize(request).send()?;
            let value: Value = check_status(resp, endpoint)?.json()?;
            let page = decode_page::<T>(value)?;
            pages += 1;
            debug!(
                "received {} records from {} (page {})",
                page.records.len(),
                endpoint,
                pages
            );
            records.extend(page.records);

            match page.next {
                Some(next) if pages < self.max_pages => request = client.get(&next),
                Some(_) => {
                    warn!(
                        "stopped reading {} after {} pages, results are incomplete",
                        endpoint, pages
                    );
                    break;
                }
                None => break,
            }
        }
        Ok(records)
    }
}

fn check_status(resp: Response, endpoint: &str) -> Result<Response, Error> {
    if resp.status().is_success() {
        Ok(resp)
    } else {
        let code = resp.status();
        let msg = resp.text().unwrap_or_default();
        Err(Error::RequestError(
            code,
            format!("request to {} failed: {}", endpoint, msg),
        ))
    }
}

impl CatalogSource for RestCatalog {
    fn fetch_parks(&self) -> Result<Vec<Park>, Box<dyn std::error::Error>> {
        Ok(self.fetch_all(&self.parks_endpoint)?)
    }

    fn fetch_trails(&self) -> Result<Vec<Trail>, Box<dyn std::error::Error>> {
        Ok(self.fetch_all(&self.trails_endpoint)?)
    }

    fn fetch_pois(&self) -> Result<Vec<Poi>, Box<dyn std::error::Error>> {
        Ok(self.fetch_all(&self.pois_endpoint)?)
    }

    fn create_trail(&self, trail: &NewTrail) -> Result<Trail, Box<dyn std::error::Error>> {
        let client = self.client()?;
        let request = client
            .post(&self.url(&self.create_trail_endpoint))
            .json(&trail.to_request_body(&self.path_field));
        let resp = self.authorize(request).send()?;
        let value: Value = check_status(resp, &self.create_trail_endpoint)?.json()?;

        // some deployments only echo back the primary key
        let created = match decode_record::<Trail>(value.clone()) {
            Ok(created) => created,
            Err(e) => {
                debug!("could not decode created trail ({}), using submitted data", e);
                let id = value.get("id").and_then(Value::as_u64);
                trail.clone().into_trail(id)
            }
        };
        info!("created trail '{}' (id={:?})", created.name, created.id);
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let catalog =
            RestCatalog::from_config(&ServiceConfig::new("rest".to_string(), HashMap::new()))
                .unwrap();
        assert_eq!(
            catalog.url(&catalog.trails_endpoint),
            "http://localhost:8000/api/trails/geojson/"
        );
        assert_eq!(catalog.path_field, "path");
        assert!(catalog.auth_token.is_none());
    }

    #[test]
    fn test_from_config() {
        let mut params = HashMap::new();
        params.insert(
            "base_url".to_string(),
            serde_yaml::Value::from("https://trails.example.com/"),
        );
        params.insert("path_field".to_string(), serde_yaml::Value::from("path_wkt"));
        params.insert("auth_token".to_string(), serde_yaml::Value::from("abc123"));
        params.insert("max_pages".to_string(), serde_yaml::Value::from(3));
        let catalog =
            RestCatalog::from_config(&ServiceConfig::new("rest".to_string(), params)).unwrap();
        assert_eq!(
            catalog.url("/api/parks/geojson/"),
            "https://trails.example.com/api/parks/geojson/"
        );
        assert_eq!(catalog.path_field, "path_wkt");
        assert_eq!(catalog.auth_token.as_deref(), Some("abc123"));
        assert_eq!(catalog.max_pages, 3);
    }

    #[test]
    fn test_invalid_parameter_type() {
        let mut params = HashMap::new();
        params.insert("max_pages".to_string(), serde_yaml::Value::from("many"));
        assert!(RestCatalog::from_config(&ServiceConfig::new("rest".to_string(), params)).is_err());
    }
}
