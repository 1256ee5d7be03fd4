use std::{sync::Arc, time::Duration};

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use server_api::ApiContext;
use shared::{
    calendar::{CalendarDay, CalendarMonth},
    domain::{ContractType, Position, Submission, SubmissionInput},
    error::{ApiError, ErrorCode},
    protocol::SUBMISSIONS_PATH,
};
use storage::Storage;

use crate::{
    error::StoreError,
    shell::AppShell,
    store::{InMemoryStore, LocalStore, RemoteStore, SubmissionStore},
};

type HandlerResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

fn nov(day: u32) -> CalendarDay {
    CalendarDay::from_ymd(2024, 11, day).expect("day")
}

fn input(first: &str, last: &str, days: &[CalendarDay]) -> SubmissionInput {
    SubmissionInput {
        first_name: first.to_string(),
        last_name: last.to_string(),
        contract: ContractType::Intermittent,
        position: Position::Receptionist,
        dates: days.iter().copied().collect(),
    }
}

async fn api_context() -> ApiContext {
    ApiContext {
        storage: Storage::new("sqlite::memory:").await.expect("db"),
        month: CalendarMonth::default(),
    }
}

fn reject(err: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match err.code {
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(err))
}

async fn list(State(api): State<ApiContext>) -> HandlerResult<Json<Vec<Submission>>> {
    server_api::list_submissions(&api)
        .await
        .map(Json)
        .map_err(reject)
}

async fn create(
    State(api): State<ApiContext>,
    Json(input): Json<SubmissionInput>,
) -> HandlerResult<(StatusCode, Json<Submission>)> {
    server_api::create_submission(&api, input)
        .await
        .map(|submission| (StatusCode::CREATED, Json(submission)))
        .map_err(reject)
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}")
}

async fn spawn_server() -> String {
    let app = Router::new()
        .route(SUBMISSIONS_PATH, get(list).post(create))
        .with_state(api_context().await);
    serve(app).await
}

#[tokio::test]
async fn in_memory_store_assigns_distinct_ids_in_creation_order() {
    let store = InMemoryStore::new();
    let first = store
        .create(input("Ana", "Silva", &[nov(5)]))
        .await
        .expect("create");
    let second = store
        .create(input("Bruno", "Abreu", &[nov(6)]))
        .await
        .expect("create");

    assert_ne!(first.id, second.id);
    let all = store.fetch_all().await.expect("fetch");
    assert_eq!(all, vec![first, second]);
}

#[tokio::test]
async fn in_memory_store_with_month_rejects_foreign_dates() {
    let store = InMemoryStore::new().with_month(CalendarMonth::default());
    let december = CalendarDay::from_ymd(2024, 12, 2).expect("day");

    let err = store
        .create(input("Ana", "Silva", &[nov(5), december]))
        .await
        .expect_err("must fail");
    assert!(matches!(err, StoreError::ValidationRejected(_)));
    assert!(store.fetch_all().await.expect("fetch").is_empty());
}

#[tokio::test]
async fn in_memory_store_waits_out_its_latency() {
    let store = InMemoryStore::new().with_latency(Duration::from_millis(20), Duration::ZERO);
    let started = std::time::Instant::now();
    store.fetch_all().await.expect("fetch");
    assert!(started.elapsed() >= Duration::from_millis(20));
}

#[tokio::test]
async fn offline_in_memory_store_stores_nothing() {
    let store = InMemoryStore::new();
    store.set_available(false);
    let err = store
        .create(input("Ana", "Silva", &[nov(5)]))
        .await
        .expect_err("offline");
    assert!(matches!(err, StoreError::Unavailable(_)));

    store.set_available(true);
    assert!(store.fetch_all().await.expect("fetch").is_empty());
}

#[tokio::test]
async fn local_store_persists_through_sqlite() {
    let store = LocalStore::open("sqlite::memory:", CalendarMonth::default())
        .await
        .expect("open");

    let created = store
        .create(input(" Ana ", "Silva", &[nov(12), nov(5)]))
        .await
        .expect("create");
    assert_eq!(created.first_name, "Ana");

    let all = store.fetch_all().await.expect("fetch");
    assert_eq!(all, vec![created]);
}

#[tokio::test]
async fn local_store_surfaces_validation_messages() {
    let store = LocalStore::open("sqlite::memory:", CalendarMonth::default())
        .await
        .expect("open");

    let err = store
        .create(input("Ana", "", &[nov(5)]))
        .await
        .expect_err("must fail");
    assert_eq!(
        err,
        StoreError::ValidationRejected("first and last name are required".to_string())
    );
}

#[tokio::test]
async fn remote_store_creates_and_lists_over_http() {
    let base = spawn_server().await;
    let store = RemoteStore::new(&base).expect("url");

    let created = store
        .create(input("Ana", "Silva", &[nov(12), nov(5)]))
        .await
        .expect("create");
    assert!(!created.id.as_str().is_empty());
    assert_eq!(
        created.dates.iter().copied().collect::<Vec<_>>(),
        vec![nov(5), nov(12)]
    );

    let all = store.fetch_all().await.expect("fetch");
    assert_eq!(all, vec![created]);
}

#[tokio::test]
async fn remote_store_passes_rejections_through_verbatim() {
    let base = spawn_server().await;
    let store = RemoteStore::new(&base).expect("url");
    let december = CalendarDay::from_ymd(2024, 12, 2).expect("day");

    let err = store
        .create(input("Ana", "Silva", &[december]))
        .await
        .expect_err("must fail");
    assert_eq!(
        err,
        StoreError::ValidationRejected("date 2024-12-02 is outside novembro de 2024".to_string())
    );
}

#[tokio::test]
async fn remote_server_errors_mean_unavailable() {
    let app = Router::new().route(
        SUBMISSIONS_PATH,
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "database locked") }),
    );
    let base = serve(app).await;
    let store = RemoteStore::new(&base).expect("url");

    let err = store.fetch_all().await.expect_err("must fail");
    assert!(matches!(err, StoreError::Unavailable(message) if message.contains("database locked")));
}

#[tokio::test]
async fn missing_route_on_fetch_means_unavailable() {
    let base = serve(Router::new()).await;
    let store = RemoteStore::new(&base).expect("url");

    let err = store.fetch_all().await.expect_err("must fail");
    assert!(matches!(err, StoreError::Unavailable(message) if message.starts_with("404")));
}

#[tokio::test]
async fn rate_limited_requests_mean_unavailable() {
    let app = Router::new().route(
        SUBMISSIONS_PATH,
        get(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") })
            .post(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }),
    );
    let base = serve(app).await;
    let store = RemoteStore::new(&base).expect("url");

    let err = store.fetch_all().await.expect_err("must fail");
    assert!(matches!(err, StoreError::Unavailable(_)));
    let err = store
        .create(input("Ana", "Silva", &[nov(5)]))
        .await
        .expect_err("must fail");
    assert!(matches!(err, StoreError::Unavailable(message) if message.contains("slow down")));
}

#[tokio::test]
async fn create_rejections_depend_on_the_error_code() {
    let app = Router::new()
        .route(
            SUBMISSIONS_PATH,
            axum::routing::post(|| async {
                (StatusCode::UNPROCESSABLE_ENTITY, "unknown variant `chef`")
            }),
        )
        .route(
            "/broken/submissions",
            axum::routing::post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(ApiError::new(ErrorCode::Internal, "disk full")),
                )
            }),
        );
    let base = serve(app).await;

    let store = RemoteStore::new(&base).expect("url");
    let err = store
        .create(input("Ana", "Silva", &[nov(5)]))
        .await
        .expect_err("must fail");
    assert_eq!(
        err,
        StoreError::ValidationRejected("unknown variant `chef`".to_string())
    );

    let store = RemoteStore::new(&format!("{base}/broken")).expect("url");
    let err = store
        .create(input("Ana", "Silva", &[nov(5)]))
        .await
        .expect_err("must fail");
    assert!(matches!(err, StoreError::Unavailable(message) if message.contains("disk full")));
}

#[tokio::test]
async fn unreachable_server_means_unavailable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let store = RemoteStore::new(&format!("http://{addr}")).expect("url");
    let err = store.fetch_all().await.expect_err("must fail");
    assert!(matches!(err, StoreError::Unavailable(_)));
}

#[test]
fn remote_url_keeps_a_base_path() {
    let store = RemoteStore::new("http://example.test/api").expect("url");
    assert_eq!(
        store.submissions_url().as_str(),
        "http://example.test/api/submissions"
    );
    let store = RemoteStore::new("http://example.test/").expect("url");
    assert_eq!(
        store.submissions_url().as_str(),
        "http://example.test/submissions"
    );
}

#[tokio::test]
async fn shell_over_remote_store_shows_the_new_submission() {
    let base = spawn_server().await;
    let store: Arc<dyn SubmissionStore> = Arc::new(RemoteStore::new(&base).expect("url"));
    let mut shell = AppShell::new(store, CalendarMonth::default());
    shell.refresh().await;
    assert!(shell.load_error().is_none());

    let form = shell.form_mut();
    form.update_field(crate::form::Field::FirstName("Ana".into()));
    form.update_field(crate::form::Field::LastName("Silva".into()));
    form.toggle_date(nov(5));
    shell.submit_form().await.expect("submit");

    shell.refresh().await;
    assert_eq!(shell.submissions().len(), 1);
    assert_eq!(shell.list_entries()[0].display_name, "Ana Silva");
}
