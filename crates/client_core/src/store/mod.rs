//! The store boundary: where submissions are listed and created.
//!
//! Every binding assigns ids the same way (UUID v4 generated on the store
//! side), so a deployment never mixes client- and store-generated ids.

use std::sync::Arc;

use async_trait::async_trait;
use shared::domain::{Submission, SubmissionInput};

use crate::error::StoreError;

mod local;
mod memory;
mod remote;

pub use local::LocalStore;
pub use memory::InMemoryStore;
pub use remote::RemoteStore;

#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<Submission>, StoreError>;
    /// Persists `input` and returns it with its store-assigned id. A failed
    /// call leaves nothing stored.
    async fn create(&self, input: SubmissionInput) -> Result<Submission, StoreError>;
}

#[async_trait]
impl<T> SubmissionStore for Arc<T>
where
    T: SubmissionStore + ?Sized,
{
    async fn fetch_all(&self) -> Result<Vec<Submission>, StoreError> {
        self.as_ref().fetch_all().await
    }

    async fn create(&self, input: SubmissionInput) -> Result<Submission, StoreError> {
        self.as_ref().create(input).await
    }
}
