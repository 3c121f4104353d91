// 中文说明：
// Web 服务：axum 路由 + tower-http（CORS、请求追踪）。共享状态只有只读的 Scanner、
// 追加写入的结果存储与报告渲染器；推理与 PDF 渲染放到阻塞线程池执行。
// 支持 Ctrl-C 优雅退出。
pub mod routes;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::analyzer::Scanner;
use crate::reporter::PdfReportRenderer;
use crate::store::ResultStore;
use crate::utils::config::{ScannerConfig, WebConfig};
use crate::utils::constants::MAX_UPLOAD_BYTES;
use crate::utils::error::Result;
use crate::utils::file_utils::ensure_directory;

/// State shared by every handler.
pub struct AppState {
    pub scanner: Arc<Scanner>,
    pub store: ResultStore,
    pub reports: PdfReportRenderer,
    pub config: WebConfig,
}

impl AppState {
    /// Create the upload and report directories and open the result store.
    pub async fn from_config(scanner: Arc<Scanner>, config: &ScannerConfig) -> Result<Self> {
        ensure_directory(&config.web.upload_dir)?;
        ensure_directory(&config.report.output_dir)?;
        let store = ResultStore::connect(&config.web.database_url).await?;
        info!("Result store ready at {}", config.web.database_url);

        Ok(Self {
            scanner,
            store,
            reports: PdfReportRenderer::new(&config.report.output_dir),
            config: config.web.clone(),
        })
    }

    pub fn report_dir(&self) -> PathBuf {
        self.reports.output_dir().to_path_buf()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::index).post(routes::upload))
        .route("/api/analyze", post(routes::api_analyze))
        .route("/download/{*path}", get(routes::download_report))
        .route("/health", get(routes::health_check))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(state: AppState) -> Result<()> {
    let listener = TcpListener::bind(&state.config.bind).await?;
    info!("Web interface listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(Arc::new(state)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Web server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown requested"),
        Err(e) => {
            warn!("Cannot listen for Ctrl-C ({}); serving until killed", e);
            std::future::pending::<()>().await;
        }
    }
}
