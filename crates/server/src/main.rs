use std::{net::SocketAddr, sync::Arc};

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use server_api::{create_submission, health, list_submissions, ApiContext};
use shared::{
    domain::{Submission, SubmissionInput},
    error::{ApiError, ErrorCode},
    protocol::{HEALTH_PATH, MAX_SUBMISSION_BODY_BYTES, SUBMISSIONS_PATH},
};
use storage::Storage;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, prepare_database_url};

#[derive(Clone)]
struct AppState {
    api: ApiContext,
}

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let month = settings.month()?;
    let database_url = prepare_database_url(&settings.database_url)?;
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;

    let state = AppState {
        api: ApiContext { storage, month },
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, month = %month.title(), "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(HEALTH_PATH, get(healthz))
        .route(
            SUBMISSIONS_PATH,
            get(http_list_submissions).post(http_create_submission),
        )
        .layer(RequestBodyLimitLayer::new(MAX_SUBMISSION_BODY_BYTES))
        .with_state(state)
}

async fn healthz(State(state): State<Arc<AppState>>) -> ApiResult<&'static str> {
    health(&state.api)
        .await
        .map_err(|e| (StatusCode::SERVICE_UNAVAILABLE, Json(e)))?;
    Ok("ok")
}

async fn http_list_submissions(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Submission>>> {
    let submissions = list_submissions(&state.api).await.map_err(reject)?;
    Ok(Json(submissions))
}

async fn http_create_submission(
    State(state): State<Arc<AppState>>,
    Json(input): Json<SubmissionInput>,
) -> ApiResult<(StatusCode, Json<Submission>)> {
    let submission = create_submission(&state.api, input).await.map_err(reject)?;
    Ok((StatusCode::CREATED, Json(submission)))
}

fn reject(err: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match err.code {
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => {
            error!(message = %err.message, "request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(err))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
