use std::{
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use shared::{
    calendar::CalendarMonth,
    domain::{Submission, SubmissionId, SubmissionInput},
};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use super::SubmissionStore;
use crate::error::StoreError;

const MOCK_FETCH_LATENCY: Duration = Duration::from_millis(500);
const MOCK_CREATE_LATENCY: Duration = Duration::from_millis(800);

/// Process-local store. Nothing survives a restart.
pub struct InMemoryStore {
    submissions: Mutex<Vec<Submission>>,
    month: Option<CalendarMonth>,
    fetch_latency: Duration,
    create_latency: Duration,
    available: AtomicBool,
    create_calls: AtomicUsize,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            submissions: Mutex::new(Vec::new()),
            month: None,
            fetch_latency: Duration::ZERO,
            create_latency: Duration::ZERO,
            available: AtomicBool::new(true),
            create_calls: AtomicUsize::new(0),
        }
    }

    /// Same delays as a slow backend: half a second to list, 800 ms to save.
    pub fn mock_network() -> Self {
        Self::new().with_latency(MOCK_FETCH_LATENCY, MOCK_CREATE_LATENCY)
    }

    pub fn with_latency(mut self, fetch: Duration, create: Duration) -> Self {
        self.fetch_latency = fetch;
        self.create_latency = create;
        self
    }

    /// Reject dates outside `month`, like the server does.
    pub fn with_month(mut self, month: CalendarMonth) -> Self {
        self.month = Some(month);
        self
    }

    pub fn with_submissions(self, submissions: Vec<Submission>) -> Self {
        Self {
            submissions: Mutex::new(submissions),
            ..self
        }
    }

    /// While unavailable, both operations fail with [`StoreError::Unavailable`].
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("in-memory store is offline".into()))
        }
    }
}

#[async_trait]
impl SubmissionStore for InMemoryStore {
    async fn fetch_all(&self) -> Result<Vec<Submission>, StoreError> {
        if !self.fetch_latency.is_zero() {
            tokio::time::sleep(self.fetch_latency).await;
        }
        self.ensure_available()?;
        Ok(self.submissions.lock().await.clone())
    }

    async fn create(&self, input: SubmissionInput) -> Result<Submission, StoreError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if !self.create_latency.is_zero() {
            tokio::time::sleep(self.create_latency).await;
        }
        self.ensure_available()?;

        let input = match &self.month {
            Some(month) => input.validate_for(month),
            None => input.normalized(),
        }
        .map_err(|issue| StoreError::ValidationRejected(issue.to_string()))?;

        let submission = Submission::from_input(SubmissionId(Uuid::new_v4().to_string()), input);
        self.submissions.lock().await.push(submission.clone());
        debug!(submission_id = %submission.id, "stored submission in memory");
        Ok(submission)
    }
}
