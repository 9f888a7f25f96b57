use serde_json::json;
use std::fs;
use std::io::Cursor;
use std::path::PathBuf;
use trail_mapper::app::{AppState, TrailMetadata};
use trail_mapper::catalog::Difficulty;
use trail_mapper::cli::run_draw_session;
use trail_mapper::config::Config;
use trail_mapper::drawing::DrawState;
use trail_mapper::services::catalog::GeoJsonFiles;

/// Fresh directory holding a small catalog
fn catalog_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("trail_mapper_{}_{}", name, std::process::id()));
    if dir.exists() {
        fs::remove_dir_all(&dir).unwrap();
    }
    fs::create_dir_all(&dir).unwrap();

    let parks = json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "id": 1,
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[-6.3, 53.2], [-6.2, 53.2], [-6.2, 53.3], [-6.3, 53.2]]]
            },
            "properties": {"name": "Ticknock", "location": "Dublin"}
        }]
    });
    let trails = json!({
        "count": 2,
        "next": null,
        "results": {
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "id": 1,
                    "geometry": {"type": "LineString", "coordinates": [[-6.25, 53.25], [-6.24, 53.26]]},
                    "properties": {"name": "Ticknock Blue", "difficulty": "intermediate",
                                   "length_km": 4.5, "elevation_gain_m": 180, "park": 1}
                },
                {
                    "type": "Feature",
                    "id": 2,
                    "geometry": {"type": "LineString", "coordinates": [[-8.5, 52.3], [-8.4, 52.35]]},
                    "properties": {"name": "Ballyhoura Blue", "difficulty": "beginner",
                                   "length_km": 7.9, "elevation_gain_m": 160}
                }
            ]
        }
    });
    let pois = json!([
        {"id": 1, "name": "Car park", "poi_type": "parking", "location": {"type": "Point", "coordinates": [-6.25, 53.25]}}
    ]);
    fs::write(dir.join("parks.geojson"), parks.to_string()).unwrap();
    fs::write(dir.join("trails.geojson"), trails.to_string()).unwrap();
    fs::write(dir.join("pois.geojson"), pois.to_string()).unwrap();
    dir
}

#[test]
fn load_filter_and_submit() {
    let dir = catalog_dir("submit");
    let catalog = GeoJsonFiles::new(&dir);
    let mut state = AppState::new(50.0);
    assert_eq!(state.load(&catalog), 0);
    assert_eq!(state.parks().len(), 1);
    assert_eq!(state.trails().len(), 2);
    assert_eq!(state.pois().len(), 1);

    let mut filter = state.filter().clone();
    filter.park = Some("Ticknock".to_string());
    state.set_filter(filter);
    let visible: Vec<&str> = state.visible_trails().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(visible, vec!["Ticknock Blue"]);
    state.clear_filters();
    assert_eq!(state.visible_trails().len(), 2);

    let script = "\
-6.26 53.35
add -6.25 53.36
undo
finish
-6.25 53.36
finish
submit
";
    let metadata = TrailMetadata {
        name: "Three Rock Loop".to_string(),
        difficulty: Difficulty::Advanced,
        description: "Rocky descent".to_string(),
        park: state.resolve_park_id("ticknock"),
        elevation_gain_m: 95.0,
    };
    let mut output = Vec::new();
    run_draw_session(
        &mut state,
        &catalog,
        &Config::default(),
        Some(metadata),
        Cursor::new(script),
        &mut output,
    )
    .unwrap();
    let output = String::from_utf8(output).unwrap();
    assert!(output.contains("Removed last point, 1 left"));
    assert!(output.contains("Error: need at least 2 points to finish a path, 1 drawn so far"));
    assert!(output.contains("Finished path with 2 points, 1.3 km"));
    assert!(output.contains("Created trail 'Three Rock Loop' (id=3), 1.3 km"));
    assert_eq!(state.session().state(), DrawState::Idle);
    assert_eq!(state.trails().len(), 3);

    // the new trail is stored alongside the existing ones
    let mut reloaded = AppState::new(50.0);
    assert_eq!(reloaded.load(&catalog), 0);
    let trail = reloaded.find_trail(3).unwrap();
    assert_eq!(trail.name, "Three Rock Loop");
    assert_eq!(trail.difficulty, Difficulty::Advanced);
    assert_eq!(trail.length_km, 1.3);
    assert_eq!(trail.path.len(), 2);
    assert_eq!(reloaded.trail_park_name(trail), Some("Ticknock"));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn draw_session_reports_bad_input_and_keeps_going() {
    let dir = catalog_dir("bad_input");
    let catalog = GeoJsonFiles::new(&dir);
    let mut state = AppState::new(50.0);
    state.load(&catalog);

    let script = "\
hello there
add 200 10
-6.26 53.35
submit
cancel
-6.25 53.36
status
start
-6.25 53.36
wkt
quit
-6.24 53.355
";
    let mut output = Vec::new();
    run_draw_session(
        &mut state,
        &catalog,
        &Config::default(),
        None,
        Cursor::new(script),
        &mut output,
    )
    .unwrap();
    let output = String::from_utf8(output).unwrap();
    assert!(output.contains("Error: unknown command 'hello there'"));
    assert!(output.contains("Error: invalid coordinate lon=200"));
    assert!(output.contains("Error: a trail name is required to submit"));
    assert!(output.contains("Drawing cancelled"));
    assert!(output.contains("Not drawing, use 'start' to begin a new path"));
    assert!(output.contains("State: idle, points: 0, length: 0.0 km"));
    assert!(output.contains("Need at least 2 points for a path"));

    // input after quit is not processed
    assert_eq!(state.session().points().len(), 1);
    assert_eq!(state.trails().len(), 2);

    fs::remove_dir_all(&dir).unwrap();
}
