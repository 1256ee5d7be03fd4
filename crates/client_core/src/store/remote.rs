use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use shared::{
    domain::{Submission, SubmissionInput},
    error::ApiError,
    protocol::SUBMISSIONS_PATH,
};
use tracing::warn;
use url::Url;

use super::SubmissionStore;
use crate::error::StoreError;

/// Store backed by the HTTP server.
pub struct RemoteStore {
    http: Client,
    submissions_url: Url,
}

impl RemoteStore {
    pub fn new(server_url: &str) -> Result<Self, url::ParseError> {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, server_url: &str) -> Result<Self, url::ParseError> {
        let mut base = Url::parse(server_url.trim())?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let submissions_url = base.join(SUBMISSIONS_PATH.trim_start_matches('/'))?;
        Ok(Self {
            http,
            submissions_url,
        })
    }

    pub fn submissions_url(&self) -> &Url {
        &self.submissions_url
    }
}

#[async_trait]
impl SubmissionStore for RemoteStore {
    async fn fetch_all(&self) -> Result<Vec<Submission>, StoreError> {
        let response = self
            .http
            .get(self.submissions_url.clone())
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            let (status, failure) = read_failure(response).await;
            warn!(%status, message = %failure.message(), "submission list request failed");
            return Err(StoreError::Unavailable(format!("{status}: {}", failure.message())));
        }
        response
            .json::<Vec<Submission>>()
            .await
            .map_err(|e| StoreError::Unavailable(format!("malformed submission list: {e}")))
    }

    async fn create(&self, input: SubmissionInput) -> Result<Submission, StoreError> {
        let response = self
            .http
            .post(self.submissions_url.clone())
            .json(&input)
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            return Err(create_failure(response).await);
        }
        response
            .json::<Submission>()
            .await
            .map_err(|e| StoreError::Unavailable(format!("malformed created submission: {e}")))
    }
}

fn transport(err: reqwest::Error) -> StoreError {
    warn!(error = %err, "submission request failed");
    StoreError::Unavailable(err.to_string())
}

enum Failure {
    Api(ApiError),
    Text(String),
}

impl Failure {
    fn message(&self) -> &str {
        match self {
            Self::Api(api_error) => &api_error.message,
            Self::Text(text) => text,
        }
    }
}

async fn read_failure(response: Response) -> (StatusCode, Failure) {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let failure = match serde_json::from_str::<ApiError>(&body) {
        Ok(api_error) => Failure::Api(api_error),
        Err(_) if body.trim().is_empty() => Failure::Text(status.to_string()),
        Err(_) => Failure::Text(body.trim().to_string()),
    };
    (status, failure)
}

/// Only a validation error from the server, or a plain 400/422 from body
/// decoding, is a rejection. Its message is passed through verbatim.
async fn create_failure(response: Response) -> StoreError {
    let (status, failure) = read_failure(response).await;
    let rejected = match &failure {
        Failure::Api(api_error) => api_error.is_validation(),
        Failure::Text(_) => matches!(
            status,
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY
        ),
    };

    if rejected {
        StoreError::ValidationRejected(failure.message().to_string())
    } else {
        warn!(%status, message = %failure.message(), "submission store returned an error");
        StoreError::Unavailable(format!("{status}: {}", failure.message()))
    }
}
