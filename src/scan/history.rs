use super::types::PredictionRecord;
use std::collections::VecDeque;
use uuid::Uuid;

/// Session-only list of scan predictions, most recent first.
#[derive(Debug, Default)]
pub struct ScanHistory {
    records: VecDeque<PredictionRecord>,
}

impl ScanHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, record: PredictionRecord) {
        self.records.push_front(record);
    }

    pub fn list(&self) -> Vec<PredictionRecord> {
        self.records.iter().cloned().collect()
    }

    pub fn get(&self, id: Uuid) -> Option<&PredictionRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
