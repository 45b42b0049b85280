use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    body::Body,
    extract::Path as UrlPath,
    http::{Method, Request, StatusCode, header},
    routing::get,
};
use serde_json::{Value, json};
use tower::ServiceExt;

use sessiondir_core::record::{Event, Session};
use sessiondir_core::sessiondir_config::SessionDirConfig;
use sessiondir_core::{SessionDir, process};
use sessiondir_server::state::AppState;

fn sessiondir(dir: &Path, api_base_url: &str) -> SessionDir {
    SessionDir::from_config(SessionDirConfig {
        data_dir: dir.to_path_buf(),
        api_base_url: api_base_url.to_string(),
        request_delay_ms: 0,
        ..SessionDirConfig::default()
    })
}

fn app(sessiondir: &SessionDir) -> Router {
    sessiondir_server::app(AppState::new(sessiondir.clone()))
}

async fn send(app: Router, method: Method, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();
    (status, headers, body)
}

async fn send_json(app: Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let (status, _, body) = send(app, method, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

/// Session requests seen by the mock API, in arrival order.
type RequestLog = Arc<Mutex<Vec<u64>>>;

/// Serve a stand-in for the community platform API on a random local port.
async fn mock_api() -> String {
    slow_mock_api(Duration::ZERO, RequestLog::default()).await
}

/// Like `mock_api`, but each session request takes `delay` and is recorded.
async fn slow_mock_api(delay: Duration, log: RequestLog) -> String {
    let router = Router::new()
        .route(
            "/api-v2/events",
            get(|| async {
                Json(json!([
                    {"id": 102, "name": "Goa Meetup", "chapter": {"name": "Goa"}},
                    {"id": 101, "name": "Pune Meetup", "chapter": {"name": "Pune"}}
                ]))
            }),
        )
        .route(
            "/api-v2/events/{id}/event_sessions",
            get(move |UrlPath(id): UrlPath<u64>| {
                let log = log.clone();
                async move {
                    log.lock().unwrap().push(id);
                    tokio::time::sleep(delay).await;
                    match id {
                        101 => Json(json!([{
                            "id": 1,
                            "event_id": 101,
                            "name": "Fuzzing 101",
                            "start_time": "2024-03-16T10:00:00.000+05:30",
                            "video_url": "https://video.example/1"
                        }])),
                        _ => Json(json!([])),
                    }
                }
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/api-v2")
}

/// Write a small flattened dataset through the core pipeline.
fn seed_dataset(sessiondir: &SessionDir) {
    sessiondir
        .event_store()
        .append(&[Event::new(1, "Meetup", "Pune"), Event::new(2, "Meetup", "Delhi")])
        .unwrap();

    let mut with_slides = Session::new(10, 1, "Web \"Cache\" Poisoning", "2023-06-10T10:00:00Z");
    with_slides.presentation_url = Some("https://slides.example/10".into());

    let store = sessiondir.session_store();
    store
        .save(1, &[with_slides, Session::new(11, 1, "Threat Modeling", "2022-01-08T10:00:00Z")])
        .unwrap();
    store
        .save(2, &[Session::new(20, 2, "Intro to XSS", "2024-02-10T10:00:00Z")])
        .unwrap();

    process::process(sessiondir).unwrap();
}

#[tokio::test]
async fn test_status_without_summary() {
    let dir = tempfile::tempdir().unwrap();
    let sessiondir = sessiondir(dir.path(), "http://127.0.0.1:9/api-v2");

    let (status, body) = send_json(app(&sessiondir), Method::GET, "/api/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["summary"]["newEvents"], 0);
    assert_eq!(body["summary"]["newSessions"], 0);
    assert_eq!(body["summary"]["message"], "No update summary available");
    assert!(body["serverTime"].is_string());
}

#[tokio::test]
async fn test_status_reads_existing_summary() {
    let dir = tempfile::tempdir().unwrap();
    let sessiondir = sessiondir(dir.path(), "http://127.0.0.1:9/api-v2");
    std::fs::create_dir_all(sessiondir.public_data_path()).unwrap();
    std::fs::write(
        sessiondir.update_summary_path(),
        r#"{"timestamp": "2025-08-10T12:00:00Z", "newEvents": 2, "newSessions": 5, "events": [], "sessions": []}"#,
    )
    .unwrap();

    let (status, body) = send_json(app(&sessiondir), Method::GET, "/api/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["newSessions"], 5);
    assert_eq!(body["summary"]["message"], "Update summary loaded successfully");
}

#[tokio::test]
async fn test_status_with_corrupt_summary_fails() {
    let dir = tempfile::tempdir().unwrap();
    let sessiondir = sessiondir(dir.path(), "http://127.0.0.1:9/api-v2");
    std::fs::create_dir_all(sessiondir.public_data_path()).unwrap();
    std::fs::write(sessiondir.update_summary_path(), "{not json").unwrap();

    let (status, body) = send_json(app(&sessiondir), Method::GET, "/api/status").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Failed to get status");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_update_ingests_and_rebuilds_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let base = mock_api().await;
    let sessiondir = sessiondir(dir.path(), &base);

    let (status, body) = send_json(app(&sessiondir), Method::POST, "/api/update").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Update completed successfully");
    assert_eq!(body["summary"]["newEvents"], 2);
    assert_eq!(body["summary"]["newSessions"], 1);

    assert!(sessiondir.events_path().join("event101.json").exists());
    assert!(sessiondir.session_store().has(101));
    assert!(!sessiondir.session_store().has(102));

    let dataset: Value =
        serde_json::from_str(&std::fs::read_to_string(sessiondir.sessions_data_path()).unwrap()).unwrap();
    assert_eq!(dataset[0]["sessionTopic"], "Fuzzing 101");
    assert_eq!(dataset[0]["location"], "Pune");
    assert_eq!(dataset[0]["date"], "16-03-2024");

    // Nothing new on the second run
    let (_, body) = send_json(app(&sessiondir), Method::POST, "/api/update").await;
    assert_eq!(body["summary"]["newEvents"], 0);
}

#[tokio::test]
async fn test_update_finishes_after_client_disconnects() {
    let dir = tempfile::tempdir().unwrap();
    let base = slow_mock_api(Duration::from_millis(300), RequestLog::default()).await;
    let sessiondir = sessiondir(dir.path(), &base);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/update")
        .body(Body::empty())
        .unwrap();
    // Give up long before the session requests finish
    let dropped = tokio::time::timeout(Duration::from_millis(100), app(&sessiondir).oneshot(request)).await;
    assert!(dropped.is_err());

    let summary_path = sessiondir.update_summary_path();
    for _ in 0..100 {
        if summary_path.exists() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    let summary: Value = serde_json::from_str(&std::fs::read_to_string(&summary_path).unwrap()).unwrap();
    assert_eq!(summary["newEvents"], 2);
    assert_eq!(summary["newSessions"], 1);
    assert!(sessiondir.session_store().has(101));
}

#[tokio::test]
async fn test_concurrent_updates_run_one_at_a_time() {
    let dir = tempfile::tempdir().unwrap();
    let log = RequestLog::default();
    let base = slow_mock_api(Duration::from_millis(100), log.clone()).await;
    let sessiondir = sessiondir(dir.path(), &base);

    let ((first, a), (second, b)) = tokio::join!(
        send_json(app(&sessiondir), Method::POST, "/api/update"),
        send_json(app(&sessiondir), Method::POST, "/api/update"),
    );

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);

    let mut new_events = vec![
        a["summary"]["newEvents"].as_u64().unwrap(),
        b["summary"]["newEvents"].as_u64().unwrap(),
    ];
    new_events.sort();
    assert_eq!(new_events, vec![0, 2]);

    // First run asks for both events in id order; the second only retries
    // the event that still has no session file
    assert_eq!(*log.lock().unwrap(), vec![101, 102, 102]);
}

#[tokio::test]
async fn test_update_reports_unreachable_remote() {
    let dir = tempfile::tempdir().unwrap();
    // Bind then drop a listener to get a port nothing is serving on
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let sessiondir = sessiondir(dir.path(), &format!("http://127.0.0.1:{port}/api-v2"));

    let (status, body) = send_json(app(&sessiondir), Method::POST, "/api/update").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Update failed");
    assert!(!sessiondir.update_summary_path().exists());
}

#[tokio::test]
async fn test_sessions_page_applies_query() {
    let dir = tempfile::tempdir().unwrap();
    let sessiondir = sessiondir(dir.path(), "http://127.0.0.1:9/api-v2");
    seed_dataset(&sessiondir);

    let (status, body) = send_json(
        app(&sessiondir),
        Method::GET,
        "/api/sessions?location=Pune&sort=topic&direction=asc&resources=",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["totalPages"], 1);
    assert_eq!(body["label"], "Showing 1-2 of 2 sessions");
    assert_eq!(body["items"][0]["sessionTopic"], "Threat Modeling");
    assert_eq!(body["items"][1]["sessionTopic"], "Web \"Cache\" Poisoning");

    let (_, body) = send_json(
        app(&sessiondir),
        Method::GET,
        "/api/sessions?resources=presentation",
    )
    .await;
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn test_sessions_treats_empty_params_as_unset() {
    let dir = tempfile::tempdir().unwrap();
    let sessiondir = sessiondir(dir.path(), "http://127.0.0.1:9/api-v2");
    seed_dataset(&sessiondir);

    let (status, body) = send_json(
        app(&sessiondir),
        Method::GET,
        "/api/sessions?search=&location=&year=&resources=&dateFrom=&dateTo=&sort=&direction=&page=",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["page"], 1);
    assert_eq!(body["items"][0]["sessionTopic"], "Intro to XSS");
}

#[tokio::test]
async fn test_sessions_parses_typed_params() {
    let dir = tempfile::tempdir().unwrap();
    let sessiondir = sessiondir(dir.path(), "http://127.0.0.1:9/api-v2");
    seed_dataset(&sessiondir);

    let (status, body) = send_json(
        app(&sessiondir),
        Method::GET,
        "/api/sessions?dateFrom=2022-06-01&dateTo=2024-12-31&direction=asc&page=1",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["items"][0]["sessionTopic"], "Web \"Cache\" Poisoning");

    let (status, body) = send_json(app(&sessiondir), Method::GET, "/api/sessions?year=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid year 'abc'"));

    let (status, body) = send_json(app(&sessiondir), Method::GET, "/api/sessions?direction=up").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("direction"));
}

#[tokio::test]
async fn test_sessions_rejects_bad_query() {
    let dir = tempfile::tempdir().unwrap();
    let sessiondir = sessiondir(dir.path(), "http://127.0.0.1:9/api-v2");
    seed_dataset(&sessiondir);

    let (status, body) = send_json(app(&sessiondir), Method::GET, "/api/sessions?sort=speaker").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("speaker"));

    let (status, _) = send_json(app(&sessiondir), Method::GET, "/api/sessions?page=3").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sessions_without_dataset_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let sessiondir = sessiondir(dir.path(), "http://127.0.0.1:9/api-v2");

    let (status, body) = send_json(app(&sessiondir), Method::GET, "/api/sessions?page=1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
    assert_eq!(body["label"], "No sessions found");
}

#[tokio::test]
async fn test_sessions_csv_export() {
    let dir = tempfile::tempdir().unwrap();
    let sessiondir = sessiondir(dir.path(), "http://127.0.0.1:9/api-v2");
    seed_dataset(&sessiondir);

    let (status, headers, body) =
        send(app(&sessiondir), Method::GET, "/api/sessions.csv?year=2023").await;

    assert_eq!(status, StatusCode::OK);
    let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.starts_with("attachment; filename=\"null-sessions-"));

    let csv = String::from_utf8(body).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines[0],
        "Date,Session Topic,Location,Description,Presentation URL,Video URL"
    );
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("10-06-2023,\"Web \"\"Cache\"\" Poisoning\",\"Pune\""));
}

#[tokio::test]
async fn test_serves_public_files() {
    let dir = tempfile::tempdir().unwrap();
    let sessiondir = sessiondir(dir.path(), "http://127.0.0.1:9/api-v2");
    seed_dataset(&sessiondir);

    let (status, body) = send_json(
        app(&sessiondir),
        Method::GET,
        "/data/sessions-data.json",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let dir = tempfile::tempdir().unwrap();
    let sessiondir = sessiondir(dir.path(), "http://127.0.0.1:9/api-v2");

    let (status, body) = send_json(app(&sessiondir), Method::POST, "/api/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Not found"}));
}

#[tokio::test]
async fn test_cors_preflight() {
    let dir = tempfile::tempdir().unwrap();
    let sessiondir = sessiondir(dir.path(), "http://127.0.0.1:9/api-v2");

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/update")
        .header(header::ORIGIN, "http://localhost:8080")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app(&sessiondir).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let methods = response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS].to_str().unwrap();
    assert!(methods.contains("POST"));
}
