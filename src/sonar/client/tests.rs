use super::*;
use axum::{
    extract::Query,
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;

#[test]
fn build_search_params_basic() {
    let params = build_search_params("my-proj", 3, 500);
    assert_eq!(params.len(), 3);
    assert_eq!(params[0], ("componentKeys", "my-proj".to_string()));
    assert_eq!(params[1], ("p", "3".to_string()));
    assert_eq!(params[2], ("ps", "500".to_string()));
}

#[test]
fn basic_auth_header_appends_empty_password() {
    // base64("squ_abc:")
    assert_eq!(basic_auth_header("squ_abc"), "Basic c3F1X2FiYzo=");
}

#[test]
fn normalize_base_url_strips_one_trailing_slash() {
    assert_eq!(normalize_base_url("http://sonar:9000/"), "http://sonar:9000");
    assert_eq!(normalize_base_url("http://sonar:9000"), "http://sonar:9000");
    assert_eq!(normalize_base_url("http://sonar:9000//"), "http://sonar:9000/");
}

#[test]
fn parse_search_page_valid() {
    let page = parse_search_page(r#"{"total": 1, "issues": [{"key": "A"}]}"#).unwrap();
    assert_eq!(page.issues.len(), 1);
    assert_eq!(page.issues[0].key, "A");
}

#[test]
fn parse_search_page_rejects_garbage() {
    let err = parse_search_page("<html>Login</html>").unwrap_err();
    assert!(matches!(err, ExportError::Parse(_)));
    assert!(err.to_string().contains("<html>Login</html>"));
}

#[test]
fn snippet_truncates_on_char_boundary() {
    let long = "é".repeat(500);
    assert_eq!(snippet(&long).chars().count(), ERROR_SNIPPET_CHARS);
}

async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Echoes the auth header and query back inside a single issue
async fn echo_search(headers: HeaderMap, Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    Json(json!({
        "total": 1,
        "issues": [{
            "key": params.get("componentKeys").cloned().unwrap_or_default(),
            "message": auth,
            "status": format!("{}/{}", params["p"], params["ps"]),
        }]
    }))
}

#[tokio::test]
async fn search_issues_sends_auth_and_params() {
    let base = spawn_server(Router::new().route("/api/issues/search", get(echo_search))).await;
    let client = SonarClient::new(&format!("{}/", base), "squ_abc").unwrap();

    let page = client.search_issues("proj", 2, 50).await.unwrap();
    assert_eq!(page.reported_total(), Some(1));
    assert_eq!(page.issues[0].key, "proj");
    assert_eq!(page.issues[0].message, "Basic c3F1X2FiYzo=");
    assert_eq!(page.issues[0].status, "2/50");
}

#[tokio::test]
async fn search_issues_maps_non_success_status() {
    let app = Router::new().route(
        "/api/issues/search",
        get(|| async { (StatusCode::UNAUTHORIZED, "Invalid token") }),
    );
    let base = spawn_server(app).await;
    let client = SonarClient::new(&base, "bad").unwrap();

    let err = client.search_issues("proj", 1, 500).await.unwrap_err();
    match err {
        ExportError::Status { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "Invalid token");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn search_issues_rejects_malformed_body() {
    let app = Router::new().route("/api/issues/search", get(|| async { "not json" }));
    let base = spawn_server(app).await;
    let client = SonarClient::new(&base, "t").unwrap();

    let err = client.search_issues("proj", 1, 500).await.unwrap_err();
    assert!(matches!(err, ExportError::Parse(_)));
}

#[tokio::test]
async fn search_issues_reports_connection_failure() {
    // Bind then drop to get a port nobody listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = SonarClient::new(&format!("http://{}", addr), "t").unwrap();
    let err = client.search_issues("proj", 1, 500).await.unwrap_err();
    assert!(matches!(err, ExportError::Http(_)));
}
