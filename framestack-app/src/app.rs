//! Command execution and logging setup.

use crate::cli::{Args, BuildIndexArgs, Command, InspectArgs};
use crate::config::AppConfig;
use crate::error::AppError;
use framestack_data::{HistoryIndexBuilder, HistoryManifest, IndexReport};
use framestack_train::{
    DroppedFrame, FrameSize, ImageFolderLoader, ResolvedFrameList, TemporalDataset,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

/// Run a parsed command line.
pub fn run(args: Args) -> Result<(), AppError> {
    let config = AppConfig::load(args.config.as_deref())?;
    init_logging(&config.log_level(args.log_level.as_deref()));

    match args.command {
        Command::BuildIndex(build) => {
            let report = build_index(&config, &build)?;
            println!("{}", completion_message(&report));
        }
        Command::Inspect(inspect) => {
            let summary = inspect_sample(&config, &inspect)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}

fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

pub fn build_index(config: &AppConfig, args: &BuildIndexArgs) -> Result<IndexReport, AppError> {
    let builder = HistoryIndexBuilder::new(config.index_config(args))?;
    info!(
        "Building history maps under {} (depth {})",
        builder.config().root.display(),
        builder.config().history.history_depth
    );
    let report = builder.build()?;
    if report.has_walk_errors() {
        warn!("Some directory entries could not be read; see warnings above");
    }
    Ok(report)
}

pub fn completion_message(report: &IndexReport) -> String {
    let splits: Vec<&str> = report.splits.iter().map(|s| s.split.as_str()).collect();
    format!("history maps created for {}", splits.join(" / "))
}

/// JSON view of one loaded sample.
#[derive(Debug, Serialize)]
pub struct StackSummary {
    pub index: usize,
    pub frames: Vec<PathBuf>,
    pub shape: [usize; 4],
    pub original: FrameSize,
    pub resized: FrameSize,
    pub dropped: Vec<DroppedFrame>,
}

pub fn inspect_sample(config: &AppConfig, args: &InspectArgs) -> Result<StackSummary, AppError> {
    let loader = ImageFolderLoader::from_dir(
        &args.images_dir,
        &config.extensions(),
        config.image_size(args.image_size),
    )?;
    let history = config.inspect_history(args);
    let dataset = if args.manifest.is_empty() {
        TemporalDataset::new(loader, history)?
    } else {
        let mut manifest = HistoryManifest::new();
        for path in &args.manifest {
            manifest.extend_from_file(path)?;
        }
        TemporalDataset::with_source(loader, history, manifest)?
    };

    let loaded = dataset.load_stack(args.index, !args.stretch)?;
    let frames = dataset
        .frame_list(args.index)
        .map(ResolvedFrameList::paths)
        .unwrap_or_default()
        .to_vec();
    Ok(StackSummary {
        index: args.index,
        frames,
        shape: loaded.stack.shape(),
        original: loaded.original,
        resized: loaded.resized,
        dropped: loaded.dropped,
    })
}
