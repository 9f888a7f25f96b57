//! Define pois subcommand
use super::load_catalog;
use crate::catalog::display::poi_icon;
use crate::config::Config;
use structopt::StructOpt;

/// List points of interest
#[derive(Debug, StructOpt)]
pub struct PoisOpts {
    /// Only list points of this type, e.g. parking or water_source
    #[structopt(short = "t", long = "type")]
    poi_type: Option<String>,
}

pub fn pois_command(config: Config, opts: PoisOpts) -> Result<(), Box<dyn std::error::Error>> {
    let (_, state) = load_catalog(&config)?;
    let wanted = opts.poi_type.map(|t| t.to_ascii_lowercase());
    for poi in state.pois() {
        if let Some(wanted) = &wanted {
            if poi.poi_type.as_str() != wanted.as_str() {
                continue;
            }
        }
        println!(
            "{} {} [{}] {}",
            poi_icon(poi.poi_type),
            poi.name,
            poi.poi_type,
            poi.location.readout()
        );
    }
    Ok(())
}
