//! Binary crate for the `weather-tool` service.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Hosting registered tools over HTTP (discovery + execution)
//! - Human-friendly output for one-off lookups

use clap::Parser;

mod cli;
mod logging;
mod service;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let cmd = cli::Cli::parse();
    cmd.run().await
}
