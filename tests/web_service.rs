use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use codeguard::utils::config::ScannerConfig;
use codeguard::web::{router, AppState};
use codeguard::Scanner;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

async fn state_in(dir: &TempDir) -> Arc<AppState> {
    let mut config = ScannerConfig::default();
    config.report.output_dir = dir.path().join("reports");
    config.web.upload_dir = dir.path().join("uploads");
    config.web.database_url = format!("sqlite:{}?mode=rwc", dir.path().join("results.db").display());

    let scanner = Arc::new(Scanner::from_config(&config).unwrap());
    Arc::new(AppState::from_config(scanner, &config).await.unwrap())
}

#[tokio::test]
async fn api_results_are_persisted_once_per_request() {
    let dir = TempDir::new().unwrap();
    let state = state_in(&dir).await;
    assert!(dir.path().join("reports").is_dir());
    assert!(dir.path().join("uploads").is_dir());

    let bodies = [
        r#"{"code": "strcpy(a, b);", "language": "c"}"#,
        r#"{"code": "System.out.println(1);", "language": "java"}"#,
        r#"{"code": "   ", "language": "python"}"#,
    ];
    let mut predictions = Vec::new();
    for body in bodies {
        let request = Request::builder()
            .method("POST")
            .uri("/api/analyze")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();
        let response = router(state.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        predictions.push(value["prediction"].as_i64().unwrap());
    }

    // Whitespace-only code cannot be tokenized, which is an analysis error.
    assert_eq!(predictions, vec![1, 0, -1]);
    assert_eq!(state.store.count().await.unwrap(), 3);
}
