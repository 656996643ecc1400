use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    group::{self, GroupArgs},
    state_info::{self, StateInfoArgs},
    tiers::{self, TiersArgs},
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;

#[derive(Parser, Debug)]
#[command(name = "lsym", about = "Lattice symmetry groups and canonical representatives")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Close a generator set into a group and print its elements.
    Group(GroupArgs),
    /// Compute representative, character and norm of spin configurations.
    StateInfo(StateInfoArgs),
    /// List capability tiers supported by this processor.
    Tiers(TiersArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Group(args) => group::run(&args),
        Command::StateInfo(args) => state_info::run(&args),
        Command::Tiers(args) => tiers::run(&args),
    }
}
