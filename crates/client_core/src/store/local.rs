use anyhow::Result;
use async_trait::async_trait;
use server_api::{create_submission, list_submissions, ApiContext};
use shared::{
    calendar::CalendarMonth,
    domain::{Submission, SubmissionInput},
};
use storage::Storage;

use super::SubmissionStore;
use crate::error::StoreError;

/// SQLite-backed store running the same create rules as the server, in process.
#[derive(Clone)]
pub struct LocalStore {
    api: ApiContext,
}

impl LocalStore {
    pub async fn open(database_url: &str, month: CalendarMonth) -> Result<Self> {
        let storage = Storage::new(database_url).await?;
        Ok(Self::with_storage(storage, month))
    }

    pub fn with_storage(storage: Storage, month: CalendarMonth) -> Self {
        Self {
            api: ApiContext { storage, month },
        }
    }
}

#[async_trait]
impl SubmissionStore for LocalStore {
    async fn fetch_all(&self) -> Result<Vec<Submission>, StoreError> {
        Ok(list_submissions(&self.api).await?)
    }

    async fn create(&self, input: SubmissionInput) -> Result<Submission, StoreError> {
        Ok(create_submission(&self.api, input).await?)
    }
}
