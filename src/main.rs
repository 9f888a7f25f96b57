use log::{debug, warn};
use simplelog::{TermLogger, TerminalMode};
use structopt::StructOpt;
use trail_mapper::cli::Cli;
use trail_mapper::config::{default_config_path, Config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opt = Cli::from_args();
    let config_path = opt.config_path();
    let config = match &config_path {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let level_filter = opt.verbosity(config.log_level());
    TermLogger::init(level_filter, simplelog::Config::default(), TerminalMode::Mixed)?;

    match config_path {
        Some(path) => debug!("Using configuration file: {:?}", path),
        None => warn!(
            "No configuration file found at {:?}, using default settings",
            default_config_path()
        ),
    }

    // execute any subcommands
    opt.execute_subcommand(config)
}
