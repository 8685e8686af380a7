use crate::{
    chat::ConversationMessage,
    scan::{DiagnosisCategory, PredictionRecord},
    tabular::TabularField,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionView {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub diagnosis: DiagnosisCategory,
    pub confidence: f64,
    pub confidence_display: String,
    pub image: ImageView,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImageView {
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: usize,
    pub url: String,
}

impl From<&PredictionRecord> for PredictionView {
    fn from(record: &PredictionRecord) -> Self {
        Self {
            id: record.id,
            timestamp: record.timestamp,
            diagnosis: record.category,
            confidence: record.confidence,
            confidence_display: record.confidence_display(),
            image: ImageView {
                file_name: record.image.file_name.clone(),
                content_type: record.image.content_type.clone(),
                size_bytes: record.image.size_bytes(),
                url: format!("/api/scan/history/{}/image", record.id),
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FieldInfo {
    pub name: String,
    pub description: String,
}

impl From<TabularField> for FieldInfo {
    fn from(field: TabularField) -> Self {
        Self {
            name: field.name().to_string(),
            description: field.description().to_string(),
        }
    }
}

/// One form edit. `value` may be sent as a string, number or boolean.
#[derive(Debug, Deserialize)]
pub struct FieldUpdate {
    pub field: String,
    pub value: Value,
}

impl FieldUpdate {
    pub fn raw_value(&self) -> String {
        match &self.value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReply {
    pub message: ConversationMessage,
    pub markdown: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
