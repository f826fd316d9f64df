mod cli;
mod config;
mod document;
mod error;
mod factory;
mod output;
mod pipeline;
mod providers;
#[cfg(test)]
mod testing;
mod view;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

fn main() -> Result<()> {
    env_logger::init();

    output::print_banner();

    let cli = Cli::parse();
    info!("Starting Delivery Pipeline View");
    cli.execute()?;

    Ok(())
}
