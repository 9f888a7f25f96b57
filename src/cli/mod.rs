//! Define the application's command line interface
use crate::app::AppState;
use crate::config::{default_config_path, Config};
use crate::services::CatalogSource;
use crate::Error;
use simplelog::LevelFilter;
use std::path::PathBuf;
use structopt::StructOpt;

mod draw;
pub use draw::run_draw_session;
use draw::{draw_command, DrawOpts};
mod map;
use map::{map_command, MapOpts};
mod parks;
use parks::{parks_command, ParksOpts};
mod pois;
use pois::{pois_command, PoisOpts};
mod route_image;
use route_image::{route_image_command, RouteImageOpts};
mod show;
use show::{show_command, ShowOpts};
mod trails;
use trails::{trails_command, TrailsOpts};

/// Browse the mountain bike trail catalog and draw new trails
#[derive(Debug, StructOpt)]
pub struct Cli {
    /// Set logging level to debug, use a second time (e.g. -vv) to set logging to trace
    #[structopt(short, long, parse(from_occurrences))]
    verbose: i32,
    /// Suppress info logging messages use a second time (e.g. -qq) to hide warnings
    #[structopt(short, long, parse(from_occurrences))]
    quiet: i32,
    /// Configuration file to use instead of <config dir>/trail_mapper/config.yml
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,
    #[structopt(subcommand)]
    cmd: Command,
}

impl Cli {
    /// Return the verbose flag counts as a log level filter
    pub fn verbosity(&self, default: LevelFilter) -> LevelFilter {
        if self.quiet == 1 {
            LevelFilter::Warn
        } else if self.quiet > 1 {
            LevelFilter::Error
        } else if self.verbose == 1 {
            LevelFilter::Debug
        } else if self.verbose > 1 {
            LevelFilter::Trace
        } else {
            default
        }
    }

    /// Config file to read, the default location is only used if it exists
    pub fn config_path(&self) -> Option<PathBuf> {
        match &self.config {
            Some(path) => Some(path.clone()),
            None => Some(default_config_path()).filter(|p| p.exists()),
        }
    }

    /// Consume options struct and return the result of subcommand execution
    pub fn execute_subcommand(self, config: Config) -> Result<(), Box<dyn std::error::Error>> {
        self.cmd.execute(config)
    }
}

#[derive(Debug, StructOpt)]
pub enum Command {
    /// Draw a new trail point by point and submit it to the catalog
    #[structopt(name = "draw")]
    Draw(DrawOpts),
    /// Show parks, trails and points of interest on a terminal map
    #[structopt(name = "map")]
    Map(MapOpts),
    /// List parks
    #[structopt(name = "parks")]
    Parks(ParksOpts),
    /// List points of interest
    #[structopt(name = "pois")]
    Pois(PoisOpts),
    /// Create a route image of a trail
    #[structopt(name = "route-image")]
    RouteImage(RouteImageOpts),
    /// Show the details of a single trail
    #[structopt(name = "show")]
    Show(ShowOpts),
    /// Search and filter the trail list
    #[structopt(name = "trails")]
    Trails(TrailsOpts),
}

impl Command {
    /// Consume enum variant and return the result of the command's execution
    fn execute(self, config: Config) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            Command::Draw(opts) => draw_command(config, opts),
            Command::Map(opts) => map_command(config, opts),
            Command::Parks(opts) => parks_command(config, opts),
            Command::Pois(opts) => pois_command(config, opts),
            Command::RouteImage(opts) => route_image_command(config, opts),
            Command::Show(opts) => show_command(config, opts),
            Command::Trails(opts) => trails_command(config, opts),
        }
    }
}

/// Build the configured catalog and load every dataset from it
fn load_catalog(
    config: &Config,
) -> Result<(Box<dyn CatalogSource>, AppState), Box<dyn std::error::Error>> {
    let catalog = config.get_catalog_handler()?;
    let mut state = AppState::new(config.max_length_km());
    if state.load(catalog.as_ref()) == 3 {
        return Err(Box::new(Error::Other(
            "could not load any data from the catalog".to_string(),
        )));
    }
    Ok((catalog, state))
}
