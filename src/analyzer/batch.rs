// 中文说明：
// BatchRunner：把每个文件分派到固定大小的 rayon 线程池独立分析（读取 → 检测 →
// 修复 → 可选 PDF 报告），结果按提交顺序收集；单个文件的错误或 panic 只影响
// 自己的条目，不会取消其他文件。
use rayon::prelude::*;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, warn};

use crate::analyzer::{AnalysisRequest, BatchSummary, FileAnalysis, FileStatus, Scanner};
use crate::reporter::{PdfReportRenderer, ReportInput};
use crate::utils::error::handle_file_error;
use crate::utils::logger::log_batch_completed;

pub struct BatchRunner {
    scanner: Arc<Scanner>,
    reports: Option<PdfReportRenderer>,
    threads: usize,
}

impl BatchRunner {
    pub fn new(scanner: Arc<Scanner>, threads: usize) -> Self {
        Self {
            scanner,
            reports: None,
            threads: threads.max(1),
        }
    }

    /// Write a PDF report for every analyzed file.
    pub fn with_reports(mut self, renderer: PdfReportRenderer) -> Self {
        self.reports = Some(renderer);
        self
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Analyze `paths` concurrently; the result list follows input order.
    pub fn run(&self, paths: &[PathBuf]) -> Vec<FileAnalysis> {
        let start = Instant::now();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .thread_name(|i| format!("codeguard-worker-{}", i))
            .build();

        let results: Vec<FileAnalysis> = match pool {
            Ok(pool) => pool.install(|| paths.par_iter().map(|p| self.analyze_guarded(p)).collect()),
            Err(e) => {
                warn!("Failed to start worker pool ({}); analyzing sequentially", e);
                paths.iter().map(|p| self.analyze_guarded(p)).collect()
            }
        };

        let summary = BatchSummary::from_results(&results);
        log_batch_completed(
            summary.total,
            summary.vulnerable,
            summary.failed + summary.errors,
            start.elapsed(),
        );
        results
    }

    fn analyze_guarded(&self, path: &Path) -> FileAnalysis {
        match panic::catch_unwind(AssertUnwindSafe(|| self.analyze_file(path))) {
            Ok(entry) => entry,
            Err(_) => {
                error!("Analysis of {} panicked", path.display());
                FileAnalysis {
                    file: path.to_path_buf(),
                    status: FileStatus::Failed {
                        error: "internal error during analysis".to_string(),
                    },
                }
            }
        }
    }

    pub fn analyze_file(&self, path: &Path) -> FileAnalysis {
        debug!("Analyzing {}", path.display());

        let request = match AnalysisRequest::from_file(path) {
            Ok(request) => request,
            Err(e) => {
                let message = handle_file_error(&e);
                error!("{}", message);
                return FileAnalysis {
                    file: path.to_path_buf(),
                    status: FileStatus::Failed { error: message },
                };
            }
        };

        let outcome = self.scanner.analyze(&request);
        let report = self
            .reports
            .as_ref()
            .and_then(|renderer| renderer.generate(&ReportInput::new(&request, &outcome)));

        FileAnalysis {
            file: path.to_path_buf(),
            status: FileStatus::Analyzed {
                language: request.language,
                outcome,
                report,
            },
        }
    }
}
