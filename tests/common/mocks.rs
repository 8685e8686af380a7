use async_trait::async_trait;
use neurosage::{
    Error, Result,
    llm::{LlmClient, StructuredAnswer},
    scan::{ImageClassifier, ScanPrediction, UploadedImage},
    tabular::{PredictionCode, TabularClassifier, TabularInput},
};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

/// Mock image classifier; `None` answers with an upstream 500
#[derive(Debug)]
pub struct MockImageClassifier {
    pub prediction: Option<ScanPrediction>,
    pub uploads: Arc<Mutex<Vec<UploadedImage>>>,
}

impl MockImageClassifier {
    pub fn new(prediction: Option<ScanPrediction>) -> Self {
        Self {
            prediction,
            uploads: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }
}

#[async_trait]
impl ImageClassifier for MockImageClassifier {
    async fn classify(&self, image: &UploadedImage) -> Result<ScanPrediction> {
        self.uploads.lock().unwrap().push(image.clone());
        self.prediction
            .ok_or_else(|| Error::server_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR))
    }
}

/// Mock tabular classifier returning a fixed code
#[derive(Debug)]
pub struct MockTabularClassifier {
    pub code: PredictionCode,
    pub requests: Arc<Mutex<Vec<TabularInput>>>,
}

impl MockTabularClassifier {
    pub fn new(code: PredictionCode) -> Self {
        Self {
            code,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl TabularClassifier for MockTabularClassifier {
    async fn predict(&self, input: &TabularInput) -> Result<PredictionCode> {
        self.requests.lock().unwrap().push(input.clone());
        Ok(self.code.clone())
    }
}

/// Mock LLM client for testing
#[derive(Debug)]
pub struct MockLlmClient {
    pub responses: Arc<Mutex<Vec<StructuredAnswer>>>,
    pub requests: Arc<Mutex<Vec<String>>>,
    pub error: Option<String>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            error: None,
        }
    }

    pub fn with_responses(self, responses: Vec<StructuredAnswer>) -> Self {
        *self.responses.lock().unwrap() = responses;
        self
    }

    pub fn with_error(mut self, error: String) -> Self {
        self.error = Some(error);
        self
    }

    pub fn get_requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn generate_answer(&self, topic: &str) -> Result<StructuredAnswer> {
        self.requests.lock().unwrap().push(topic.to_string());

        if let Some(ref error) = self.error {
            return Err(Error::llm(error.clone()));
        }

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(Error::llm("No more mock responses available"));
        }

        Ok(responses.remove(0))
    }
}

/// LLM client that blocks until the test releases a permit
pub struct GatedLlmClient {
    pub gate: Arc<Semaphore>,
    pub answer: StructuredAnswer,
}

impl GatedLlmClient {
    pub fn new(answer: StructuredAnswer) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        (
            Self {
                gate: Arc::clone(&gate),
                answer,
            },
            gate,
        )
    }
}

#[async_trait]
impl LlmClient for GatedLlmClient {
    async fn generate_answer(&self, _topic: &str) -> Result<StructuredAnswer> {
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| Error::internal(e.to_string()))?;
        permit.forget();
        Ok(self.answer.clone())
    }
}
