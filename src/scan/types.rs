use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// The four classes the scan classifier was trained on, in label order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosisCategory {
    #[serde(rename = "mildly demented")]
    MildlyDemented,
    #[serde(rename = "moderately demented")]
    ModeratelyDemented,
    #[serde(rename = "non demented")]
    NonDemented,
    #[serde(rename = "very mildly demented")]
    VeryMildlyDemented,
}

impl DiagnosisCategory {
    pub const ALL: [DiagnosisCategory; 4] = [
        Self::MildlyDemented,
        Self::ModeratelyDemented,
        Self::NonDemented,
        Self::VeryMildlyDemented,
    ];

    pub fn from_index(index: i64) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::MildlyDemented => "mildly demented",
            Self::ModeratelyDemented => "moderately demented",
            Self::NonDemented => "non demented",
            Self::VeryMildlyDemented => "very mildly demented",
        }
    }
}

impl fmt::Display for DiagnosisCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A validated classifier answer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScanPrediction {
    pub category: DiagnosisCategory,
    pub probability: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadedImage {
    pub file_name: String,
    pub content_type: String,
    #[serde(skip)]
    pub data: Vec<u8>,
}

impl UploadedImage {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data,
        }
    }

    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub category: DiagnosisCategory,
    pub confidence: f64,
    pub image: Arc<UploadedImage>,
}

impl PredictionRecord {
    pub fn new(prediction: ScanPrediction, image: Arc<UploadedImage>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            category: prediction.category,
            confidence: prediction.probability,
            image,
        }
    }

    pub fn confidence_display(&self) -> String {
        confidence_percent(self.confidence)
    }
}

/// Formats a probability as a percentage with one decimal, e.g. `87.0%`.
pub fn confidence_percent(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}
