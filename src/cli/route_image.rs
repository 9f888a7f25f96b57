//! Define route image subcommand
use super::load_catalog;
use crate::catalog::display::difficulty_color;
use crate::config::Config;
use crate::services::visualization::route::{start_finish_markers, Route};
use log::info;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use structopt::StructOpt;

/// Generate an image of a trail's route
#[derive(Debug, StructOpt)]
pub struct RouteImageOpts {
    /// Id of the trail we want to generate an image for (use the trails command to see ids)
    #[structopt(name = "TRAIL_ID")]
    id: u64,
    /// name of file to output image data to, if "-" is used we will write to stdout
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,
}

pub fn route_image_command(
    config: Config,
    opts: RouteImageOpts,
) -> Result<(), Box<dyn std::error::Error>> {
    let route_drawer = config.get_route_visualization_handler()?;
    let (_, state) = load_catalog(&config)?;
    let trail = state.find_trail(opts.id)?;

    let markers = start_finish_markers(&trail.path);
    let route = Route::new(&trail.path, &markers).with_color(difficulty_color(trail.difficulty));
    let image_data = route_drawer.draw_route(&route)?;
    write_image(&image_data, opts.output.as_ref())?;
    info!("Created route image for trail '{}'", trail.name);

    Ok(())
}

/// Write image data to a file, stdout is used when no path or "-" is given
pub(super) fn write_image(data: &[u8], path: Option<&PathBuf>) -> io::Result<()> {
    match path {
        Some(path) if path.to_string_lossy() != "-" => {
            let mut fp = File::create(path)?;
            fp.write_all(data)
        }
        _ => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(data)
        }
    }
}
