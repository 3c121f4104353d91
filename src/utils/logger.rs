// 中文说明：
// 日志初始化与领域日志函数：基于 tracing / tracing-subscriber，按 verbose/quiet
// 选择等级（RUST_LOG 优先），并提供规则命中、模型判定、报告写出、批量完成等
// 关键事件的统一日志入口。
use std::path::Path;
use std::time::Duration;

use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::detector::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl LogLevel {
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            LogLevel::Error
        } else if verbose {
            LogLevel::Debug
        } else {
            LogLevel::Info
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the requested level.
/// Calling this twice is harmless.
pub fn init_logging(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "codeguard={lvl},tower_http={lvl}",
            lvl = level.as_str()
        ))
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

pub fn log_rule_hit(language: Language, pattern: &str) {
    info!("Detected explicit vulnerability in {} code: {}", language, pattern);
}

pub fn log_model_decision(classifier: &str, logits: &[f32], label: usize) {
    debug!("Model logits ({}): {:?}", classifier, logits);
    info!("Model prediction: {} (1 = Vulnerable, 0 = Secure)", label);
}

pub fn log_fix_applied(pattern: &str, fix: &str) {
    info!("Detected vulnerability: {}. Suggesting fix: {}", pattern, fix.trim_end());
}

pub fn log_report_written(path: &Path) {
    info!("Analysis report saved to {}", path.display());
}

pub fn log_batch_completed(total: usize, vulnerable: usize, failed: usize, duration: Duration) {
    if vulnerable > 0 {
        warn!(
            "Batch completed - {} files, {} vulnerable, {} failed in {:.2}s",
            total,
            vulnerable,
            failed,
            duration.as_secs_f64()
        );
    } else {
        info!(
            "Batch completed - {} files, no vulnerabilities, {} failed in {:.2}s",
            total,
            failed,
            duration.as_secs_f64()
        );
    }
}
