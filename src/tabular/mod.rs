mod client;
mod outcome;
mod types;

pub use client::{HttpTabularClassifier, TabularClassifier, interpret_tabular_response};
pub use outcome::{PredictionCode, ResultDisplay, ResultIcon, Tone};
pub use types::*;

use crate::{Error, Result, flow::FlowTracker};
use std::sync::Mutex;
use tracing::{debug, info};

/// The tabular predictor: owns the editable form and submits it.
pub struct TabularService {
    classifier: Box<dyn TabularClassifier>,
    form: Mutex<TabularInput>,
    tracker: FlowTracker,
}

impl TabularService {
    pub fn new(classifier: Box<dyn TabularClassifier>) -> Self {
        Self {
            classifier,
            form: Mutex::new(TabularInput::default()),
            tracker: FlowTracker::new("tabular"),
        }
    }

    pub fn tracker(&self) -> &FlowTracker {
        &self.tracker
    }

    pub fn form(&self) -> Result<TabularInput> {
        Ok(self.lock_form()?.clone())
    }

    pub fn update_field(&self, field: TabularField, value: &str) -> Result<TabularInput> {
        let mut form = self.lock_form()?;
        form.set_field(field, value)?;
        debug!("Tabular form field {} set to '{}'", field, value);
        Ok(form.clone())
    }

    /// Submits `input`, or the current form when none is given.
    pub async fn predict(&self, input: Option<TabularInput>) -> Result<ResultDisplay> {
        let input = match input {
            Some(input) => {
                input.validate()?;
                input
            }
            None => self.form()?,
        };

        let request = self.tracker.begin()?;
        let outcome = self.classifier.predict(&input).await;
        request.finish(&outcome);

        let code = outcome?;
        info!("Tabular prediction: {}", code.as_str());
        Ok(ResultDisplay::for_code(&code))
    }

    fn lock_form(&self) -> Result<std::sync::MutexGuard<'_, TabularInput>> {
        self.form
            .lock()
            .map_err(|e| Error::internal(format!("Mutex lock failed: {e}")))
    }
}
