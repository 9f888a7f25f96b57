//! Define parks subcommand
use super::load_catalog;
use crate::catalog::display::park_popup;
use crate::config::Config;
use structopt::StructOpt;

/// List the parks in the catalog
#[derive(Debug, StructOpt)]
pub struct ParksOpts {
    /// Only print the unique park names, e.g. for use with --park
    #[structopt(long)]
    names: bool,
}

pub fn parks_command(config: Config, opts: ParksOpts) -> Result<(), Box<dyn std::error::Error>> {
    let (_, state) = load_catalog(&config)?;
    if opts.names {
        for name in state.park_names() {
            println!("{}", name);
        }
        return Ok(());
    }

    let popups: Vec<String> = state.parks().iter().map(park_popup).collect();
    println!("{}", popups.join("\n\n"));
    Ok(())
}
