//! Define show subcommand
use super::load_catalog;
use crate::catalog::display::{bounds_summary, trail_popup};
use crate::config::Config;
use crate::gps::path_length_meters;
use crate::wkt::linestring_to_wkt;
use structopt::StructOpt;

/// Print the details of a trail and the extent of its path
#[derive(Debug, StructOpt)]
pub struct ShowOpts {
    /// Id of the trail (use the trails command to see ids)
    #[structopt(name = "TRAIL_ID")]
    id: u64,
    /// Also print the trail geometry as WKT
    #[structopt(long)]
    wkt: bool,
}

pub fn show_command(config: Config, opts: ShowOpts) -> Result<(), Box<dyn std::error::Error>> {
    let (_, state) = load_catalog(&config)?;
    let trail = state.find_trail(opts.id)?;

    println!("{}", trail_popup(trail, state.trail_park_name(trail)));
    println!(
        "Path: {} points, {:.1} km measured",
        trail.path.len(),
        path_length_meters(&trail.path) / 1000.0
    );
    if let Some(bbox) = trail.bounds() {
        println!("{}", bounds_summary(&bbox));
    }
    if opts.wkt {
        println!("{}", linestring_to_wkt(&trail.path));
    }

    Ok(())
}
