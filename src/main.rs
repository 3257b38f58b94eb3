mod app;
mod cli;
mod config;
mod consts;
mod core;
mod data;
mod error;
mod forecast;
mod output;
mod utils;
mod yard;

use clap::Parser;

use cli::Cli;
use config::Config;
use utils::set_parse_debug;

fn main() {
    let cli = Cli::parse();

    let quiet = cli.json || cli.csv;
    let config = if quiet {
        Config::load_quiet()
    } else {
        Config::load()
    };
    let cli = cli.with_config(&config);

    set_parse_debug(cli.debug);

    if let Err(err) = app::run(&cli, &config) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
