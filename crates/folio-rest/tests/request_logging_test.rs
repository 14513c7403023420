//! End-to-end tests for the request-observability layer.
//!
//! Drives the real router with `tower::ServiceExt::oneshot` and captures the
//! emitted log lines with an in-memory tracing subscriber. The log text is
//! part of the observable contract, so assertions here are on literal
//! message fragments.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use folio_config::AppConfig;
use folio_core::{Author, FolioError, FolioResult};
use folio_rest::{create_router, AppState};
use folio_service::{AuthorResponse, AuthorService};
use http_body_util::BodyExt;
use std::io;
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;

/// Collects formatted log output for assertions.
#[derive(Clone, Default)]
struct LogCapture {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock().unwrap()).into_owned()
    }
}

struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogCapture {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CaptureWriter(Arc::clone(&self.buf))
    }
}

/// Stub author service: id 42 exists, id 500 fails, the rest are missing.
struct StubAuthorService;

#[async_trait]
impl AuthorService for StubAuthorService {
    async fn get_author(&self, id: i32) -> FolioResult<AuthorResponse> {
        match id {
            42 => Ok(AuthorResponse::from(Author::new(42, "Ada", "fiction", 30))),
            500 => Err(FolioError::internal("boom")),
            _ => Err(FolioError::not_found("Author", id)),
        }
    }

    async fn get_authors(&self, ids: &[i32]) -> FolioResult<Vec<AuthorResponse>> {
        Ok(ids
            .iter()
            .map(|&id| AuthorResponse::from(Author::new(id, format!("author-{id}"), "fiction", 40)))
            .collect())
    }
}

fn app(config: &AppConfig) -> Router {
    let state = AppState::new(Arc::new(StubAuthorService));
    create_router(state, config)
}

fn capture_logs() -> (LogCapture, tracing::subscriber::DefaultGuard) {
    let capture = LogCapture::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(capture.clone())
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (capture, guard)
}

async fn send(router: Router, request: Request<Body>) -> Response {
    router.oneshot(request).await.expect("router call failed")
}

async fn get(router: Router, uri: &str) -> Response {
    send(
        router,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await
}

async fn body_text(response: Response) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collect failed")
        .to_bytes();
    String::from_utf8_lossy(&bytes).into_owned()
}

#[tokio::test]
async fn test_author_lookup_round_trip() {
    let (capture, _guard) = capture_logs();

    let response = get(app(&AppConfig::default()), "/get/author?id=42").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_text(response).await,
        r#"{"id":42,"name":"Ada","type":"fiction","age":30}"#
    );

    let logs = capture.contents();
    assert!(logs.contains("### request start[method=get; uri=/get/author?id=42"));
    assert!(logs.contains("### request end[method=get; uri=/get/author?id=42"));
    assert!(logs.contains("Request Args   : [42]"));
    assert!(logs.contains(r#"Response Args  : {"id":42,"name":"Ada","type":"fiction","age":30}"#));
    assert!(logs.contains("Time-Consuming :"));
}

#[tokio::test]
async fn test_excluded_path_suppresses_transport_log() {
    let (capture, _guard) = capture_logs();

    let mut config = AppConfig::default();
    config
        .log
        .exclude_http_log_urls
        .insert("/get/author".to_string());

    let response = get(app(&config), "/get/author?id=42").await;
    assert_eq!(response.status(), StatusCode::OK);

    let logs = capture.contents();
    assert!(!logs.contains("### request start["));
    assert!(!logs.contains("### request end["));
    // The handler-boundary log is decided independently and still fires.
    assert!(logs.contains("Request Args   : [42]"));
}

#[tokio::test]
async fn test_skip_marker_suppresses_handler_log() {
    let (capture, _guard) = capture_logs();

    let response = get(app(&AppConfig::default()), "/get/all_authors?ids=1,2").await;
    assert_eq!(response.status(), StatusCode::OK);

    let logs = capture.contents();
    // Transport-level logging still occurs for the skip-marked operation.
    assert!(logs.contains("### request start[method=get; uri=/get/all_authors?ids=1,2"));
    assert!(logs.contains("### request end["));
    // Handler-boundary logging is entirely absent.
    assert!(!logs.contains("Request Args"));
    assert!(!logs.contains("Response Args"));
    assert!(!logs.contains("Time-Consuming"));
}

#[tokio::test]
async fn test_start_precedes_end_with_non_negative_elapsed() {
    let (capture, _guard) = capture_logs();

    let response = get(app(&AppConfig::default()), "/get/author?id=42").await;
    assert_eq!(response.status(), StatusCode::OK);

    let logs = capture.contents();
    let start_pos = logs.find("### request start[").expect("no start line");
    let end_pos = logs.find("### request end[").expect("no end line");
    assert!(start_pos < end_pos);

    assert_eq!(logs.matches("### request start[").count(), 1);
    assert_eq!(logs.matches("### request end[").count(), 1);

    let elapsed_start = logs.find("; elapsed=").expect("no elapsed field") + "; elapsed=".len();
    let elapsed: String = logs[elapsed_start..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    elapsed.parse::<u64>().expect("elapsed is not an integer");
}

#[tokio::test]
async fn test_query_string_flag_disabled() {
    let (capture, _guard) = capture_logs();

    let mut config = AppConfig::default();
    config.log.include_query_string = false;

    let response = get(app(&config), "/get/author?id=42").await;
    assert_eq!(response.status(), StatusCode::OK);

    let logs = capture.contents();
    assert!(logs.contains("uri=/get/author"));
    assert!(!logs.contains("uri=/get/author?id=42"));
}

#[tokio::test]
async fn test_payload_capped_at_max_length() {
    let (capture, _guard) = capture_logs();

    let body = "a".repeat(4096);
    let request = Request::builder()
        .method("POST")
        .uri("/get/author")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(body))
        .unwrap();

    // 405 from the router; the transport log fires regardless of routing.
    let response = send(app(&AppConfig::default()), request).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let logs = capture.contents();
    let payload_start = logs.find("payload=").expect("no payload field") + "payload=".len();
    let payload: String = logs[payload_start..]
        .chars()
        .take_while(|&c| c == 'a')
        .collect();
    assert_eq!(payload.len(), 1024);
}

#[tokio::test]
async fn test_handler_failure_skips_response_args_and_timing() {
    let (capture, _guard) = capture_logs();

    let response = get(app(&AppConfig::default()), "/get/author?id=500").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let logs = capture.contents();
    // Start-side lines already emitted remain present.
    assert!(logs.contains("Request Args   : [500]"));
    // The failure path logs neither the response body nor Time-Consuming.
    assert!(!logs.contains("Response Args"));
    assert!(!logs.contains("Time-Consuming"));
    // But the failure itself is recorded with its elapsed time.
    assert!(logs.contains("Handler failed : status=500; elapsed="));
}

#[tokio::test]
async fn test_not_found_is_a_normal_return() {
    let (capture, _guard) = capture_logs();

    let response = get(app(&AppConfig::default()), "/get/author?id=7").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // A 404 is a value the handler returned, not a propagated failure.
    let logs = capture.contents();
    assert!(logs.contains("Response Args"));
    assert!(logs.contains("Time-Consuming"));
    assert!(!logs.contains("Handler failed"));
}

#[tokio::test]
async fn test_unrouted_path_logs_transport_only() {
    let (capture, _guard) = capture_logs();

    let response = get(app(&AppConfig::default()), "/no/such/route").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let logs = capture.contents();
    assert!(logs.contains("### request start[method=get; uri=/no/such/route"));
    assert!(logs.contains("### request end["));
    assert!(!logs.contains("Request Args"));
}

#[tokio::test]
async fn test_existing_session_logged_but_never_created() {
    let (capture, _guard) = capture_logs();

    let request = Request::builder()
        .uri("/get/author?id=42")
        .header(header::COOKIE, "session_id=abc123")
        .body(Body::empty())
        .unwrap();

    let response = send(app(&AppConfig::default()), request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_none());

    let logs = capture.contents();
    assert!(logs.contains("; session=abc123"));
}

#[tokio::test]
async fn test_no_session_segment_without_cookie() {
    let (capture, _guard) = capture_logs();

    let response = get(app(&AppConfig::default()), "/get/author?id=42").await;
    assert_eq!(response.status(), StatusCode::OK);

    let logs = capture.contents();
    assert!(!logs.contains("session="));
}

#[tokio::test]
async fn test_remote_user_header_logged() {
    let (capture, _guard) = capture_logs();

    let request = Request::builder()
        .uri("/get/author?id=42")
        .header("x-remote-user", "ada")
        .body(Body::empty())
        .unwrap();

    let response = send(app(&AppConfig::default()), request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let logs = capture.contents();
    assert!(logs.contains("; user=ada"));
}

#[tokio::test]
async fn test_master_switch_silences_everything() {
    let (capture, _guard) = capture_logs();

    let mut config = AppConfig::default();
    config.log.enabled = false;

    let response = get(app(&config), "/get/author?id=42").await;
    assert_eq!(response.status(), StatusCode::OK);

    let logs = capture.contents();
    assert!(!logs.contains("### request start["));
    assert!(!logs.contains("Request Args"));
}

#[tokio::test]
async fn test_production_environment_downgrades_transport_severity() {
    let (capture, _guard) = capture_logs();

    let mut config = AppConfig::default();
    config.app.environment = "production".to_string();

    let response = get(app(&config), "/get/author?id=42").await;
    assert_eq!(response.status(), StatusCode::OK);

    let logs = capture.contents();
    let start_line = logs
        .lines()
        .find(|line| line.contains("### request start["))
        .expect("no start line");
    assert!(start_line.contains("DEBUG"));
}

#[tokio::test]
async fn test_response_passes_through_unmodified() {
    let (_capture, _guard) = capture_logs();

    let response = get(app(&AppConfig::default()), "/get/all_authors?ids=1,2").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains(r#""id":1"#));
    assert!(body.contains(r#""id":2"#));
}

#[tokio::test]
async fn test_malformed_ids_rejected() {
    let (_capture, _guard) = capture_logs();

    let response = get(app(&AppConfig::default()), "/get/all_authors?ids=1,x").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_text(response).await;
    assert!(body.contains("VALIDATION_ERROR"));
}
