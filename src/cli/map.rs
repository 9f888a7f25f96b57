//! Define map subcommand
use super::load_catalog;
use super::trails::FilterOpts;
use crate::catalog::display::results_count;
use crate::config::Config;
use crate::services::visualization::preview::MapView;
use structopt::StructOpt;

/// Draw the catalog on a map in the terminal
#[derive(Debug, StructOpt)]
pub struct MapOpts {
    #[structopt(flatten)]
    filter: FilterOpts,
    /// Leave park boundaries off the map
    #[structopt(long)]
    no_parks: bool,
    /// Leave points of interest off the map
    #[structopt(long)]
    no_pois: bool,
}

pub fn map_command(config: Config, opts: MapOpts) -> Result<(), Box<dyn std::error::Error>> {
    let preview = config.get_map_preview_handler()?;
    let (_, mut state) = load_catalog(&config)?;
    state.set_filter(opts.filter.to_filter(config.max_length_km()));

    let trails = state.visible_trails();
    let mut view = MapView::new(results_count(trails.len())).with_trails(trails);
    if !opts.no_parks {
        view = view.with_parks(state.parks());
    }
    if !opts.no_pois {
        view = view.with_pois(state.pois());
    }
    preview.show(&view)
}
