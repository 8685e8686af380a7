mod client;
mod history;
mod types;

pub use client::{
    HttpImageClassifier, INVALID_PREDICTION, ImageClassifier, interpret_scan_response,
};
pub use history::ScanHistory;
pub use types::*;

use crate::{Error, Result, flow::FlowTracker};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use uuid::Uuid;

pub const WRONG_FILE_TYPE: &str = "Please upload an image file.";

/// The image-based predictor: validates the upload, calls the classifier and
/// keeps the session history.
pub struct ScanService {
    classifier: Box<dyn ImageClassifier>,
    history: Mutex<ScanHistory>,
    tracker: FlowTracker,
}

impl ScanService {
    pub fn new(classifier: Box<dyn ImageClassifier>) -> Self {
        Self {
            classifier,
            history: Mutex::new(ScanHistory::new()),
            tracker: FlowTracker::new("scan"),
        }
    }

    pub fn tracker(&self) -> &FlowTracker {
        &self.tracker
    }

    pub async fn analyze(&self, image: UploadedImage) -> Result<PredictionRecord> {
        if !image.is_image() {
            warn!(
                "Rejected upload {} with content type {}",
                image.file_name, image.content_type
            );
            return Err(Error::validation(WRONG_FILE_TYPE));
        }

        let request = self.tracker.begin()?;
        let outcome = self.classify_and_record(image).await;
        request.finish(&outcome);
        outcome
    }

    async fn classify_and_record(&self, image: UploadedImage) -> Result<PredictionRecord> {
        let prediction = self.classifier.classify(&image).await?;
        let record = PredictionRecord::new(prediction, Arc::new(image));

        info!(
            "Scan {} classified as {} ({})",
            record.id,
            record.category,
            record.confidence_display()
        );

        self.lock_history()?.record(record.clone());
        Ok(record)
    }

    pub fn history(&self) -> Result<Vec<PredictionRecord>> {
        Ok(self.lock_history()?.list())
    }

    pub fn image(&self, id: Uuid) -> Result<Option<Arc<UploadedImage>>> {
        Ok(self.lock_history()?.get(id).map(|r| Arc::clone(&r.image)))
    }

    fn lock_history(&self) -> Result<std::sync::MutexGuard<'_, ScanHistory>> {
        self.history
            .lock()
            .map_err(|e| Error::internal(format!("Mutex lock failed: {e}")))
    }
}
