//! Framestack command line
//!
//! - `build-index`: write history sidecars for a dataset root, split by split
//! - `inspect`: load one temporal sample and print its stack as JSON

mod app;
mod cli;
mod config;
mod error;

use clap::Parser;
use cli::Args;

fn main() {
    let args = Args::parse();

    if let Err(e) = app::run(args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
