use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use color_eyre::{
    Result,
    eyre::{bail, eyre},
};
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::time::sleep;

use crate::generation::{GenerationModel, Model};

pub mod error;
use error::ReplicateApiError;

#[derive(Clone)]
pub struct ReplicateModel {
    model: Model,
    client: Client,
    token: String,
    slug: String,
    input_builder: Arc<dyn Fn(&str) -> serde_json::Value + Send + Sync>,
}

impl ReplicateModel {
    pub fn new(
        model: Model,
        token: String,
        slug: String,
        input_builder: impl Fn(&str) -> serde_json::Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            model,
            client: Client::new(),
            token,
            slug,
            input_builder: Arc::new(input_builder),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PredictionResponse {
    status: String,
    output: Option<Value>,
    error: Option<String>,
}

/// Depending on the model, the `output` field is a single URL, a list of
/// them, or null. Everything becomes a list here; a singular URL becomes a
/// one-element list.
pub fn result_locators(output: Option<Value>) -> Vec<String> {
    match output {
        Some(Value::String(url)) => vec![url],
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(url) => Some(url),
                _ => None,
            })
            .collect(),
        _ => vec![],
    }
}

impl GenerationModel for ReplicateModel {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<String>>> + Send + 'a>> {
        Box::pin(async move {
            // 1. Create prediction
            let create_resp = self
                .client
                .post(format!(
                    "https://api.replicate.com/v1/models/{}/predictions",
                    self.slug
                ))
                .bearer_auth(&self.token)
                .json(&json!({
                    "input": (self.input_builder)(prompt),
                }))
                .send()
                .await?;

            let status = create_resp.status();
            let body = create_resp.text().await?;
            if !status.is_success() {
                return Err(ReplicateApiError::from_status(status, body).into());
            }

            let prediction_infos = serde_json::from_str::<Value>(&body)?;
            debug!("Created prediction:\n{prediction_infos:#?}");

            let prediction_url = prediction_infos["urls"]["get"]
                .as_str()
                .ok_or_else(|| eyre!("Missing prediction get URL:\n{prediction_infos:#?}"))?
                .to_string();

            // 2. Poll until finished
            loop {
                let resp = self
                    .client
                    .get(&prediction_url)
                    .bearer_auth(&self.token)
                    .send()
                    .await?;

                let status = resp.status();
                if !status.is_success() {
                    let body = resp.text().await?;
                    return Err(ReplicateApiError::from_status(status, body).into());
                }

                let prediction: PredictionResponse = resp.json().await?;

                match prediction.status.as_str() {
                    "succeeded" => {
                        return Ok(result_locators(prediction.output));
                    }
                    "failed" | "canceled" => {
                        bail!(
                            "Replicate prediction {}: {}",
                            prediction.status,
                            prediction.error.unwrap_or_else(|| "no details".into())
                        );
                    }
                    _ => {
                        sleep(Duration::from_millis(500)).await;
                    }
                }
            }
        })
    }

    fn clone(&self) -> Box<dyn GenerationModel + Send + 'static> {
        Box::new(Clone::clone(self))
    }

    fn model(&self) -> Model {
        self.model
    }
}
