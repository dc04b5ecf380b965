use std::{path::PathBuf, time::Duration};

use clap::Parser as _;
use color_eyre::Result;
use engine::{
    DEFAULT_IMAGES_DIR, DEFAULT_LOG_FILE, INTER_PROMPT_DELAY, batch::BatchDriver,
    fetch::HttpFetcher, run_log::RunLog,
};
use log::debug;

mod cli;
mod config;

/// Jamaican-themed brand designs for the site header and hero sections.
const DESIGN_PROMPTS: [&str; 3] = [
    "A modern, minimalist design featuring elegant paint strokes in Jamaican flag colors. The strokes flow diagonally across a sleek black background, with vibrant green (#009B3A) and gold (#FED100) creating a dynamic, professional aesthetic. The paint strokes have a high-quality, artistic finish with clean edges and subtle blending where colors meet. The composition maintains perfect balance and negative space for a corporate, sophisticated look.",
    "An abstract, artistic interpretation of the Jamaican flag colors in a contemporary design. Smooth, flowing paint strokes in emerald green and brilliant gold sweep across a deep black canvas. The strokes have a professional, refined quality with precise edges and intentional overlapping, creating depth and movement. The composition is balanced and modern, perfect for a professional website header.",
    "A sleek, corporate design with bold paint strokes in Jamaican national colors. The strokes are clean and precise, with rich green (#009B3A) and warm gold (#FED100) creating dramatic diagonal movements across a sophisticated black background. The paint has a glossy, premium finish with sharp definition and subtle color gradients.",
];

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    pretty_env_logger::init();

    let args = cli::Cli::parse();
    let config = config::load_config()?.unwrap_or_default();
    debug!("Loaded config: {config:#?}");

    let token = config::resolve_token(
        args.token,
        &config,
        std::env::var("REPLICATE_API_TOKEN").ok(),
    )?;
    let model = args.model.or(config.model).unwrap_or_default();
    let images_dir = args
        .images_dir
        .or(config.images_dir)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_IMAGES_DIR));
    let log_file = args
        .log_file
        .or(config.log_file)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
    let delay = args
        .delay_secs
        .or(config.delay_secs)
        .map(Duration::from_secs)
        .unwrap_or(INTER_PROMPT_DELAY);
    debug!("Running {model} with images dir {}", images_dir.display());

    let driver = BatchDriver::new(
        model.make(token),
        Box::new(HttpFetcher::new()),
        RunLog::new(&log_file),
        images_dir,
        delay,
    );

    println!("Starting design generation...\n");
    driver.run(&DESIGN_PROMPTS).await?;
    println!(
        "Design generation complete! Check {} for all results.",
        log_file.display()
    );

    Ok(())
}
