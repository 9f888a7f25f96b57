//! Text rendering of catalog records for listings and detail views
use super::{Difficulty, Park, Poi, PoiType, Trail};
use crate::gps::BoundingBox;

/// Line colour used for trails of the given difficulty
pub fn difficulty_color(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Beginner => "#10b981",
        Difficulty::Intermediate => "#3b82f6",
        Difficulty::Advanced => "#6b7280",
        Difficulty::Expert => "#ef4444",
        Difficulty::Unknown => "#3b82f6",
    }
}

/// Outline colour of park boundaries
pub const PARK_COLOR: &str = "#ff7f00";

pub fn poi_icon(poi_type: PoiType) -> &'static str {
    match poi_type {
        PoiType::Parking => "🅿️",
        PoiType::Viewpoint => "🔭",
        PoiType::RestArea => "🪑",
        PoiType::WaterSource => "💧",
        PoiType::BikeRepair => "🔧",
        PoiType::BikeShop => "🚲",
        PoiType::Trailhead => "🚩",
        PoiType::Other => "📍",
    }
}

/// Single line summary of a trail, e.g. `Ballyhoura Blue [beginner] 7.9 km, 160 m`
pub fn trail_card(trail: &Trail) -> String {
    let id = trail
        .id
        .map(|id| format!("#{} ", id))
        .unwrap_or_default();
    format!(
        "{}{} [{}] {:.1} km, {} m",
        id, trail.name, trail.difficulty, trail.length_km, trail.elevation_gain_m
    )
}

pub fn results_count(count: usize) -> String {
    match count {
        0 => "No trails found".to_string(),
        1 => "Showing 1 trail".to_string(),
        n => format!("Showing {} trails", n),
    }
}

/// Detailed description of a trail
pub fn trail_popup(trail: &Trail, park_name: Option<&str>) -> String {
    let mut lines = vec![
        trail.name.clone(),
        format!("Difficulty: {}", trail.difficulty),
        format!("Length: {:.1} km", trail.length_km),
        format!("Elevation Gain: {} m", trail.elevation_gain_m),
    ];
    if let Some(park) = park_name {
        lines.push(format!("Park: {}", park));
    }
    if let Some(description) = &trail.description {
        lines.push(description.clone());
    }
    lines.join("\n")
}

pub fn park_popup(park: &Park) -> String {
    let area = park
        .area_hectares
        .map(|a| a.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    format!(
        "{}\nLocation: {}\nArea: {} hectares",
        park.name,
        park.location.as_deref().unwrap_or("N/A"),
        area
    )
}

pub fn poi_popup(poi: &Poi) -> String {
    let mut popup = format!(
        "{} {}\nType: {}",
        poi_icon(poi.poi_type),
        poi.name,
        poi.poi_type
    );
    if let Some(description) = &poi.description {
        popup.push('\n');
        popup.push_str(description);
    }
    popup
}

pub fn bounds_summary(bbox: &BoundingBox) -> String {
    format!(
        "Bounds: [{:.5}, {:.5}] - [{:.5}, {:.5}]",
        bbox.min_lat, bbox.min_lon, bbox.max_lat, bbox.max_lon
    )
}
