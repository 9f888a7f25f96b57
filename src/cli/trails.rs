//! Define trails subcommand
use super::load_catalog;
use crate::catalog::display::{results_count, trail_card};
use crate::catalog::filter::TrailFilter;
use crate::catalog::Difficulty;
use crate::config::Config;
use structopt::StructOpt;

/// Filters shared by every command that shows a list of trails
#[derive(Debug, StructOpt)]
pub struct FilterOpts {
    /// Only show trails whose name contains this text (case-insensitive)
    #[structopt(short, long)]
    search: Option<String>,
    /// Only show trails of this difficulty (beginner, intermediate, advanced, expert)
    #[structopt(short, long)]
    difficulty: Option<Difficulty>,
    /// Only show trails in the park with this name
    #[structopt(short, long)]
    park: Option<String>,
    /// Longest trail to show in km, defaults to max_length_km from the config file
    #[structopt(short = "l", long)]
    max_length: Option<f64>,
}

impl FilterOpts {
    pub fn to_filter(&self, default_max_length_km: f64) -> TrailFilter {
        TrailFilter {
            search: self.search.clone(),
            difficulty: self.difficulty,
            park: self.park.clone(),
            max_length_km: self.max_length.unwrap_or(default_max_length_km),
        }
    }
}

/// List trails matching the filters
#[derive(Debug, StructOpt)]
pub struct TrailsOpts {
    #[structopt(flatten)]
    filter: FilterOpts,
    /// Also print the park each trail belongs to
    #[structopt(long)]
    with_park: bool,
}

pub fn trails_command(config: Config, opts: TrailsOpts) -> Result<(), Box<dyn std::error::Error>> {
    let (_, mut state) = load_catalog(&config)?;
    state.set_filter(opts.filter.to_filter(config.max_length_km()));

    let trails = state.visible_trails();
    for trail in &trails {
        match state.trail_park_name(trail).filter(|_| opts.with_park) {
            Some(park) => println!("{} ({})", trail_card(trail), park),
            None => println!("{}", trail_card(trail)),
        }
    }
    println!("{}", results_count(trails.len()));

    Ok(())
}
