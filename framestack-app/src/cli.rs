//! Command line arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Framestack - temporal frame history indexing and stacking
#[derive(Parser, Debug)]
#[command(name = "framestack")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// JSON configuration file; flags override its values
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write history sidecars for every frame with a full run of predecessors
    BuildIndex(BuildIndexArgs),
    /// Load the frame stack of one sample and print it as JSON
    Inspect(InspectArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct BuildIndexArgs {
    /// Dataset root containing one directory per split
    pub root: PathBuf,

    /// Split to build (repeatable; default: train, val, test)
    #[arg(short, long = "split")]
    pub splits: Vec<String>,

    /// Number of preceding frames required per sidecar
    #[arg(short, long)]
    pub depth: Option<usize>,

    /// Name of the sidecar directory next to `images`
    #[arg(long)]
    pub history_dir: Option<String>,

    /// Also write a JSON-lines manifest per split
    #[arg(long, default_value_t = false)]
    pub manifest: bool,

    /// Build splits concurrently
    #[arg(long, default_value_t = false)]
    pub parallel: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct InspectArgs {
    /// Directory of canonical images (searched recursively)
    pub images_dir: PathBuf,

    /// Sample index in sorted path order
    #[arg(short, long)]
    pub index: usize,

    /// Long-side size in pixels
    #[arg(long)]
    pub image_size: Option<u32>,

    /// Stretch to a square instead of keeping the aspect ratio
    #[arg(long, default_value_t = false)]
    pub stretch: bool,

    /// Number of preceding frames to include
    #[arg(short, long)]
    pub depth: Option<usize>,

    /// Name of the sidecar directory next to `images`
    #[arg(long)]
    pub history_dir: Option<String>,

    /// History manifest to resolve from instead of sidecars (repeatable)
    #[arg(long)]
    pub manifest: Vec<PathBuf>,
}
