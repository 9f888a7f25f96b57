//! Defines the general error type for the crate and various conversions into it
use std::convert;
use std::fmt;

/// General error type for the crate
#[derive(Debug)]
pub enum Error {
    InsufficientPoints(usize),
    InvalidCoordinate(f64, f64),
    InvalidConfigurationValue(String),
    InvalidWkt(String),
    Io(std::io::Error),
    Json(serde_json::Error),
    NoFinishedPath,
    Other(String),
    Request(reqwest::Error),
    RequestError(reqwest::StatusCode, String),
    TrailNotFound(u64),
    UnknownServiceHandler(String),
    Yaml(serde_yaml::Error),
}

impl convert::From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl convert::From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::Json(err)
    }
}

impl convert::From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Error {
        Error::Yaml(err)
    }
}

impl convert::From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Error {
        Error::Request(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InsufficientPoints(count) => write!(
                f,
                "need at least 2 points to finish a path, {} drawn so far",
                count
            ),
            Error::InvalidCoordinate(lon, lat) => write!(
                f,
                "invalid coordinate lon={}, lat={} (longitude must be within [-180, 180] and latitude within [-90, 90])",
                lon, lat
            ),
            Error::InvalidConfigurationValue(msg) => write!(f, "{}", msg),
            Error::InvalidWkt(msg) => write!(f, "invalid WKT geometry: {}", msg),
            Error::Io(e) => write!(f, "{}", e),
            Error::Json(e) => write!(f, "{}", e),
            Error::NoFinishedPath => {
                write!(f, "no finished path to submit, finish the path first")
            }
            Error::Other(msg) => write!(f, "{}", msg),
            Error::Request(e) => write!(f, "{}", e),
            Error::RequestError(code, msg) => {
                write!(f, "Request failed with code: {} - {}", code, msg)
            }
            Error::TrailNotFound(id) => write!(f, "Trail with id={} does not exist", id),
            Error::UnknownServiceHandler(msg) => write!(f, "{}", msg),
            Error::Yaml(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {}
