use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionMetrics {
    pub matches_created: u64,
    pub updates_accepted: u64,
    pub updates_rejected: u64,
    pub last_rejection: Option<String>,
    pub last_rejection_time: Option<DateTime<Utc>>,
}

#[derive(Clone, Default)]
pub struct MetricsCollector {
    metrics: Arc<Mutex<SubmissionMetrics>>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SubmissionMetrics> {
        self.metrics.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn record_created(&self) {
        self.lock().matches_created += 1;
    }

    pub fn record_accepted(&self) {
        self.lock().updates_accepted += 1;
    }

    pub fn record_rejected(&self, reason: String) {
        let mut metrics = self.lock();
        metrics.updates_rejected += 1;
        metrics.last_rejection = Some(reason);
        metrics.last_rejection_time = Some(Utc::now());
    }

    pub fn get_metrics(&self) -> SubmissionMetrics {
        self.lock().clone()
    }
}
