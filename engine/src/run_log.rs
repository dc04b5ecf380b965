use std::{
    fs::OpenOptions,
    io::Write as _,
    path::PathBuf,
};

use chrono::Local;
use color_eyre::Result;

/// Placeholder written on the URLs line when the generation call itself
/// failed and no locators were received.
pub const FAILURE_MARKER: &str = "<generation failed>";

pub struct RunLog {
    path: PathBuf,
}

pub struct LogEntry<'a> {
    pub prompt: &'a str,
    /// `None` means the generation call failed.
    pub locators: Option<&'a [String]>,
    pub local_paths: &'a [String],
}

impl RunLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Appends one entry block, creating the file on first use. Errors are
    /// left to the caller; there is no recovery at this layer.
    pub fn append(&self, entry: &LogEntry) -> Result<()> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        file.write_all(format_entry(&timestamp, entry).as_bytes())?;
        Ok(())
    }
}

fn format_entry(timestamp: &str, entry: &LogEntry) -> String {
    let locators = match entry.locators {
        Some(urls) => format!("{urls:?}"),
        None => FAILURE_MARKER.to_string(),
    };
    format!(
        "\n{timestamp}\nPrompt: {prompt}\nURLs: {locators}\nLocal paths: {paths:?}\n{separator}\n",
        prompt = entry.prompt,
        paths = entry.local_paths,
        separator = "=".repeat(50),
    )
}
