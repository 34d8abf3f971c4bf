//! strata studio: a host for the strata renderer.
//!
//! Generates a synthetic scene, drives frames into a window (or the headless recording
//! backend), and logs what the performance monitor reports.

mod cli;
mod headless;
mod report;
mod scene;
mod window;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let args = cli::Arguments::parse();
    strata_engine::logging::init_logging(args.logging());

    if args.headless {
        headless::run(&args)
    } else {
        window::run(args)
    }
}
