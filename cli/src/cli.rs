use std::path::PathBuf;

use engine::generation::Model;

/// Runs the fixed design-prompt batch. Every flag is optional; a bare
/// invocation uses the defaults.
#[derive(Debug, clap::Parser)]
pub struct Cli {
    /// Replicate API token. Falls back to the config file, then to the
    /// REPLICATE_API_TOKEN environment variable.
    #[arg(short, long)]
    pub token: Option<String>,

    /// Directory the downloaded images are written to
    #[arg(long)]
    pub images_dir: Option<PathBuf>,

    /// Path of the append-only run log
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Pause between prompts, in seconds
    #[arg(long)]
    pub delay_secs: Option<u64>,

    /// Ideogram variant to run
    #[arg(short, long)]
    pub model: Option<Model>,
}
