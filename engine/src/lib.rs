use std::time::Duration;

use crate::{fetch::Fetcher, generation::GenerationModel};

pub mod batch;
pub mod fetch;
pub mod generation;
pub mod run_log;

pub type GenModBox = Box<dyn GenerationModel + Send>;
pub type FetcherBox = Box<dyn Fetcher + Send>;

pub const DEFAULT_IMAGES_DIR: &str = "web-frontend/public/images/generated";
pub const DEFAULT_LOG_FILE: &str = "design_generation_log.txt";
pub const WEB_IMAGE_ROOT: &str = "/images/generated";
pub const FILENAME_PREFIX: &str = "jamaican-design-";
pub const INTER_PROMPT_DELAY: Duration = Duration::from_secs(2);
