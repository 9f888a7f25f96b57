//! Service module that exports interfaces to external applications, APIs, etc.

pub mod catalog;
pub mod visualization;

// rexport some traits and utilty functions
pub use catalog::{new_catalog_handler, CatalogSource};
pub use visualization::preview::{new_map_preview_handler, MapPreviewService};
pub use visualization::route::{new_route_visualization_handler, RouteDrawingService};
