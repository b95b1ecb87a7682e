use clap::Parser;
use log::error;

use rusbit_hash::engine::{use_command, Cli};

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    if let Err(e) = use_command(cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
