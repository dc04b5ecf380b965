use std::{fs, path::PathBuf};

use color_eyre::{Result, eyre::eyre};
use engine::generation::Model;
use serde::{Deserialize, Serialize};

/// Optional on-disk defaults. Anything left out falls back to the built-in
/// values; CLI flags override everything here.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub replicate_token: Option<String>,
    pub images_dir: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub delay_secs: Option<u64>,
    pub model: Option<Model>,
}

pub fn config_path() -> Result<PathBuf> {
    Ok(dirs::config_local_dir()
        .ok_or(eyre!("Couldn't get config dir"))?
        .join("design_forge.ron"))
}

pub fn load_config() -> Result<Option<Config>> {
    let path = config_path()?;
    if !path.exists() {
        Ok(None)
    } else {
        let src = fs::read_to_string(&path)?;
        Ok(Some(ron::from_str(&src)?))
    }
}

/// Token precedence: flag, then config file, then environment.
pub fn resolve_token(
    flag: Option<String>,
    config: &Config,
    env: Option<String>,
) -> Result<String> {
    flag.or_else(|| config.replicate_token.clone())
        .or(env)
        .ok_or_else(|| {
            eyre!(
                "No Replicate API token. Pass --token, set replicate_token in {}, \
                 or export REPLICATE_API_TOKEN",
                config_path().map(|p| p.display().to_string()).unwrap_or_default()
            )
        })
}
