use std::{
    fs,
    future::Future,
    path::Path,
    pin::Pin,
    time::{SystemTime, UNIX_EPOCH},
};

use color_eyre::Result;
use log::debug;
use reqwest::Client;

use crate::{FILENAME_PREFIX, WEB_IMAGE_ROOT};

pub trait Fetcher {
    /// Downloads one image and returns the web-facing path it was saved
    /// under.
    fn fetch<'a>(
        &'a self,
        url: &'a str,
        images_dir: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;

    fn clone(&self) -> Box<dyn Fetcher + Send + 'static>;
}

#[derive(Clone, Default)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
        images_dir: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(async move {
            let bytes = self
                .client
                .get(url)
                .send()
                .await?
                .error_for_status()?
                .bytes()
                .await?;
            debug!("Downloaded {url}, {} bytes", bytes.len());

            let filename = image_filename(epoch_secs()?);
            write_image(images_dir, &filename, &bytes)
        })
    }

    fn clone(&self) -> Box<dyn Fetcher + Send + 'static> {
        Box::new(Clone::clone(self))
    }
}

fn epoch_secs() -> Result<u64> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs())
}

/// Whole-second resolution: a second fetch within the same second produces
/// the same name and overwrites the first file.
pub fn image_filename(epoch_secs: u64) -> String {
    format!("{FILENAME_PREFIX}{epoch_secs}.png")
}

/// Writes the bytes verbatim under `images_dir`, creating the directory and
/// any missing ancestors, and returns the web-facing path of the file.
pub fn write_image(images_dir: &Path, filename: &str, bytes: &[u8]) -> Result<String> {
    fs::create_dir_all(images_dir)?;
    fs::write(images_dir.join(filename), bytes)?;
    Ok(format!("{WEB_IMAGE_ROOT}/{filename}"))
}
