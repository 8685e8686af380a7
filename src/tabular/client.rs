use super::outcome::PredictionCode;
use super::types::TabularInput;
use crate::{Error, Result, config::TabularClassifierConfig, error::INVALID_FORMAT};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

#[async_trait]
pub trait TabularClassifier: Send + Sync {
    async fn predict(&self, input: &TabularInput) -> Result<PredictionCode>;
}

pub struct HttpTabularClassifier {
    url: String,
    submit_delay: Duration,
    client: reqwest::Client,
}

impl HttpTabularClassifier {
    pub fn new(config: TabularClassifierConfig) -> Self {
        Self {
            url: config.url,
            submit_delay: Duration::from_millis(config.submit_delay_ms),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl TabularClassifier for HttpTabularClassifier {
    async fn predict(&self, input: &TabularInput) -> Result<PredictionCode> {
        // Cosmetic pause so the loading state is visible; not a backoff.
        if !self.submit_delay.is_zero() {
            tokio::time::sleep(self.submit_delay).await;
        }

        debug!("Posting tabular input to {}", self.url);

        let response = self
            .client
            .post(&self.url)
            .json(input)
            .send()
            .await
            .map_err(Error::transport)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(Error::transport)?;

        interpret_tabular_response(status, &bytes)
    }
}

/// Maps a classifier reply to a prediction code.
///
/// An explicit `error` field wins over the HTTP status.
pub fn interpret_tabular_response(status: StatusCode, body: &[u8]) -> Result<PredictionCode> {
    let body: Value = match serde_json::from_slice(body) {
        Ok(body) => body,
        Err(e) => {
            warn!("Tabular classifier returned a non-JSON body: {}", e);
            return Err(status_error(status).unwrap_or_else(|| Error::validation(INVALID_FORMAT)));
        }
    };

    if let Some(message) = body.get("error").and_then(Value::as_str) {
        if !message.is_empty() {
            warn!("Tabular classifier reported an error: {}", message);
            return Err(Error::upstream(message));
        }
    }

    if let Some(err) = status_error(status) {
        warn!("Tabular classifier returned status {}", status);
        return Err(err);
    }

    let code = body
        .get("prediction")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::validation(INVALID_FORMAT))?;

    debug!("Tabular classifier predicted {}", code);
    Ok(PredictionCode::parse(code))
}

fn status_error(status: StatusCode) -> Option<Error> {
    (!status.is_success())
        .then(|| Error::upstream(format!("HTTP error! Status: {}", status.as_u16())))
}
