pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod drawing;
mod error;
pub mod gps;
pub mod services;
pub mod wkt;

pub use error::Error;
pub use gps::Location;
