// 中文说明：
// Web 路由处理：首页表单与文件上传分析、JSON API 分析、PDF 报告下载（限制在报告
// 目录内）以及健康检查。每次分析追加一条存储记录；存储失败只记录日志。
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path as UrlPath, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{error, warn};

use crate::analyzer::{AnalysisOutcome, AnalysisRequest, Verdict};
use crate::detector::Language;
use crate::reporter::templates::{render_index, ResultView};
use crate::reporter::ReportInput;
use crate::utils::constants::VERSION;
use crate::utils::file_utils::create_unique_file;
use crate::utils::helpers::{has_allowed_extension, report_stem};
use crate::web::AppState;

const INTERNAL_ERROR: &str = "An internal error occurred";

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub code: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub prediction: Verdict,
    pub fixed_code: Option<String>,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: VERSION.to_string(),
    })
}

pub async fn index() -> Html<String> {
    Html(render_index(None))
}

pub async fn upload(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Response {
    let mut upload: Option<(String, Vec<u8>)> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!("Malformed upload: {}", e);
                return error_response(StatusCode::BAD_REQUEST, "Invalid multipart request");
            }
        };
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        match field.bytes().await {
            Ok(bytes) => {
                upload = Some((filename, bytes.to_vec()));
                break;
            }
            Err(e) => {
                warn!("Failed to read uploaded file: {}", e);
                return error_response(StatusCode::BAD_REQUEST, "Invalid multipart request");
            }
        }
    }

    let Some((filename, data)) = upload else {
        return error_response(StatusCode::BAD_REQUEST, "No file part in the request");
    };
    if filename.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "No file selected");
    }
    if !has_allowed_extension(&filename, &state.config.allowed_extensions) {
        return error_response(StatusCode::BAD_REQUEST, "Unsupported file type");
    }
    let code = match String::from_utf8(data) {
        Ok(code) => code,
        Err(_) => return error_response(StatusCode::BAD_REQUEST, "Uploaded file is not UTF-8 text"),
    };

    let request = AnalysisRequest {
        language: Language::from_path(&filename),
        code,
        source: filename,
    };

    let worker = state.clone();
    let joined = tokio::task::spawn_blocking(move || {
        keep_upload_copy(&worker.config.upload_dir, &request);
        let outcome = worker.scanner.analyze(&request);
        let report = worker.reports.generate(&ReportInput::new(&request, &outcome));
        (request, outcome, report)
    })
    .await;

    let (request, outcome, report) = match joined {
        Ok(done) => done,
        Err(e) => {
            error!("Upload analysis task failed: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR);
        }
    };

    persist(&state, &request.source, request.language, &outcome).await;

    let download = report
        .as_deref()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned());
    let view = ResultView {
        verdict: outcome.verdict,
        execution_time: outcome.execution_time,
        code: &request.code,
        fixed_code: outcome.fixed_code.as_deref(),
        download: download.as_deref(),
    };
    Html(render_index(Some(&view))).into_response()
}

pub async fn api_analyze(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match payload {
        Ok(body) => body,
        Err(rejection) => {
            warn!("Rejected API request: {}", rejection.body_text());
            return error_response(StatusCode::BAD_REQUEST, "Invalid JSON body");
        }
    };

    let (code, language) = match (body.code, body.language) {
        (Some(code), Some(language)) if !code.is_empty() && !language.is_empty() => (code, language),
        _ => return error_response(StatusCode::BAD_REQUEST, "Code and language are required"),
    };

    let request = AnalysisRequest::snippet(code, Language::from_tag(&language));
    let worker = state.clone();
    let joined = tokio::task::spawn_blocking(move || {
        let outcome = worker.scanner.analyze(&request);
        (request, outcome)
    })
    .await;

    let (request, outcome) = match joined {
        Ok(done) => done,
        Err(e) => {
            error!("API analysis task failed: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR);
        }
    };

    persist(&state, &request.source, request.language, &outcome).await;

    Json(AnalyzeResponse {
        prediction: outcome.verdict,
        fixed_code: outcome.fixed_code,
    })
    .into_response()
}

pub async fn download_report(
    State(state): State<Arc<AppState>>,
    UrlPath(requested): UrlPath<String>,
) -> Response {
    let Some(file) = resolve_download(&state.report_dir(), &requested).await else {
        return error_response(StatusCode::NOT_FOUND, "File not found");
    };

    match tokio::fs::read(&file).await {
        Ok(bytes) => {
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "report.pdf".to_string());
            (
                [
                    (header::CONTENT_TYPE, "application/pdf".to_string()),
                    (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", name)),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) => {
            error!("Error serving PDF file {}: {}", file.display(), e);
            error_response(StatusCode::NOT_FOUND, "File not found")
        }
    }
}

/// Map a requested path onto an existing file inside `report_dir`.
async fn resolve_download(report_dir: &Path, requested: &str) -> Option<PathBuf> {
    let relative = Path::new(requested);
    if requested.is_empty() || relative.components().any(|c| !matches!(c, Component::Normal(_))) {
        return None;
    }

    let root = tokio::fs::canonicalize(report_dir).await.ok()?;
    let candidate = tokio::fs::canonicalize(root.join(relative)).await.ok()?;
    let metadata = tokio::fs::metadata(&candidate).await.ok()?;
    (candidate.starts_with(&root) && metadata.is_file()).then_some(candidate)
}

/// Store the uploaded source next to earlier uploads of the same name.
fn keep_upload_copy(upload_dir: &Path, request: &AnalysisRequest) -> Option<PathBuf> {
    let written = create_unique_file(upload_dir, &report_stem(&request.source))
        .and_then(|(path, mut file)| file.write_all(request.code.as_bytes()).map(|()| path));
    match written {
        Ok(path) => Some(path),
        Err(e) => {
            warn!("Could not keep a copy of {} in {}: {}", request.source, upload_dir.display(), e);
            None
        }
    }
}

async fn persist(state: &AppState, filename: &str, language: Language, outcome: &AnalysisOutcome) {
    if let Err(e) = state
        .store
        .save_result(filename, language, outcome.verdict, outcome.fixed_code.as_deref())
        .await
    {
        error!("Failed to store analysis result for {}: {}", filename, e);
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
