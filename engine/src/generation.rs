use std::pin::Pin;

use color_eyre::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;
use strum::Display;

pub mod replicate;
pub use replicate::ReplicateModel;

use crate::GenModBox;

#[derive(
    Debug,
    Clone,
    Copy,
    Display,
    clap::ValueEnum,
    Serialize,
    Deserialize,
    Hash,
    PartialEq,
    Eq,
    Default,
)]
pub enum Model {
    #[default]
    IdeogramQuality,
    IdeogramTurbo,
}

impl Model {
    pub fn make(&self, token: String) -> GenModBox {
        match self {
            Model::IdeogramQuality => Box::new(ReplicateModel::new(
                *self,
                token,
                "ideogram-ai/ideogram-v3-quality".into(),
                design_input,
            )),
            Model::IdeogramTurbo => Box::new(ReplicateModel::new(
                *self,
                token,
                "ideogram-ai/ideogram-v3-turbo".into(),
                design_input,
            )),
        }
    }
}

/// Fixed request parameters shared by all design prompts. The "None" values
/// are literal sentinels the API reads as "unspecified".
pub fn design_input(prompt: &str) -> serde_json::Value {
    json!({
        "prompt": prompt,
        "resolution": "None",
        "style_type": "None",
        "aspect_ratio": "3:2",
        "magic_prompt_option": "Off",
    })
}

pub trait GenerationModel {
    /// Runs one generation and returns the URLs of the resulting images.
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<String>>> + Send + 'a>>;

    fn clone(&self) -> Box<dyn GenerationModel + Send + 'static>;
    fn model(&self) -> Model;
}

#[cfg(test)]
mod test {
    use expect_test::expect;

    use super::*;

    #[test]
    fn design_input_serialization() {
        let input = design_input("A bold banner in flag colors");

        let expect = expect![[
            r#"{"aspect_ratio":"3:2","magic_prompt_option":"Off","prompt":"A bold banner in flag colors","resolution":"None","style_type":"None"}"#
        ]];
        expect.assert_eq(&serde_json::to_string(&input).unwrap());
    }
}
