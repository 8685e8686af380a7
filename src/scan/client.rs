use super::types::{DiagnosisCategory, ScanPrediction, UploadedImage};
use crate::{Error, Result, config::ImageClassifierConfig, error::INVALID_FORMAT};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::{debug, warn};

pub const INVALID_PREDICTION: &str = "Invalid prediction result received from the server.";

#[async_trait]
pub trait ImageClassifier: Send + Sync {
    async fn classify(&self, image: &UploadedImage) -> Result<ScanPrediction>;
}

/// Posts the scan as multipart form data (`file` field) to the hosted model.
pub struct HttpImageClassifier {
    url: Option<String>,
    client: reqwest::Client,
}

impl HttpImageClassifier {
    pub fn new(config: ImageClassifierConfig) -> Self {
        Self {
            url: config.url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ImageClassifier for HttpImageClassifier {
    async fn classify(&self, image: &UploadedImage) -> Result<ScanPrediction> {
        let url = self.url.as_deref().ok_or_else(|| {
            Error::config("Image classifier URL is not configured. Set IMAGE_API_URL.")
        })?;

        debug!(
            "Uploading {} ({} bytes, {}) to image classifier",
            image.file_name,
            image.size_bytes(),
            image.content_type
        );

        let part = Part::bytes(image.data.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.content_type)
            .map_err(Error::transport)?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(Error::transport)?;

        let status = response.status();
        if !status.is_success() {
            warn!("Image classifier returned status {}", status);
            return Err(Error::server_status(status));
        }

        let bytes = response.bytes().await.map_err(Error::transport)?;
        let body: Value = serde_json::from_slice(&bytes).map_err(|e| {
            warn!("Image classifier returned a non-JSON body: {}", e);
            Error::validation(INVALID_FORMAT)
        })?;

        debug!("Image classifier response: {}", body);
        interpret_scan_response(&body)
    }
}

/// Validates `{ label, probability }` against the fixed category table.
pub fn interpret_scan_response(body: &Value) -> Result<ScanPrediction> {
    let index = body
        .get("label")
        .and_then(label_index)
        .ok_or_else(|| Error::validation(INVALID_FORMAT))?;

    let category =
        DiagnosisCategory::from_index(index).ok_or_else(|| Error::validation(INVALID_PREDICTION))?;

    let probability = body
        .get("probability")
        .and_then(Value::as_f64)
        .filter(|p| (0.0..=1.0).contains(p))
        .ok_or_else(|| Error::validation(INVALID_PREDICTION))?;

    Ok(ScanPrediction {
        category,
        probability,
    })
}

fn label_index(value: &Value) -> Option<i64> {
    if let Some(i) = value.as_i64() {
        return Some(i);
    }
    // Models serialized through numpy sometimes send `2.0`
    value
        .as_f64()
        .filter(|f| f.is_finite() && f.fract() == 0.0)
        .map(|f| f as i64)
}
