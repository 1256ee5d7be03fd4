use shared::{
    calendar::CalendarMonth,
    domain::{Submission, SubmissionInput},
    error::{ApiError, ErrorCode},
};
use storage::Storage;
use tracing::{info, warn};

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
    pub month: CalendarMonth,
}

pub async fn list_submissions(ctx: &ApiContext) -> Result<Vec<Submission>, ApiError> {
    ctx.storage.list_submissions().await.map_err(internal)
}

/// Validates `input` against the deployment month and stores it. The stored
/// copy carries trimmed names and a storage-assigned id.
pub async fn create_submission(
    ctx: &ApiContext,
    input: SubmissionInput,
) -> Result<Submission, ApiError> {
    let input = input.validate_for(&ctx.month).map_err(|issue| {
        warn!(%issue, "rejected submission");
        ApiError::from(issue)
    })?;

    let submission = ctx
        .storage
        .insert_submission(&input)
        .await
        .map_err(internal)?;
    info!(
        submission_id = %submission.id,
        dates = submission.dates.len(),
        "submission created"
    );
    Ok(submission)
}

pub async fn health(ctx: &ApiContext) -> Result<(), ApiError> {
    ctx.storage.health_check().await.map_err(internal)
}

fn internal(err: anyhow::Error) -> ApiError {
    ApiError::new(ErrorCode::Internal, format!("{err:#}"))
}
