mod charts;
mod cli;
mod dataset;
mod error;
mod fmt;
mod loader;
mod settings;
mod tui;
mod views;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        None => cli::dashboard::run(),
        Some(Commands::View { command }) => cli::view::dispatch(command),
        Some(Commands::Load { file }) => cli::load::run(&file),
        Some(Commands::Status) => cli::status::run(),
        Some(Commands::Demo { output }) => cli::demo::run(output),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
