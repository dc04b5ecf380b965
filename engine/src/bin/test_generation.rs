use std::path::Path;

use clap::Parser;
use color_eyre::Result;
use engine::{
    DEFAULT_IMAGES_DIR,
    fetch::{Fetcher as _, HttpFetcher},
    generation::{GenerationModel as _, Model},
};

#[derive(clap::Parser)]
struct Arg {
    model: Model,
    token: String,
    prompt: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    pretty_env_logger::init();
    let Arg {
        model,
        token,
        prompt,
    } = Arg::parse();
    let model = model.make(token);

    let locators = model.generate(&prompt).await?;
    println!("Result URLs: {locators:#?}");

    let fetcher = HttpFetcher::new();
    for url in &locators {
        let path = fetcher.fetch(url, Path::new(DEFAULT_IMAGES_DIR)).await?;
        println!("Saved {path}");
    }

    Ok(())
}
