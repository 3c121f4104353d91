// 中文说明：
// 错误类型与处理工具：统一定义文件/分类器/报告/配置/存储相关错误枚举，
// 提供面向终端的错误文案与带上下文的日志输出。分类器与报告错误在调用点被
// 转换为哨兵值（Error 判定 / 无报告），不会向上冒泡终止进程。
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("IO Error: {0}")]
    IoError(String),
    #[error("File too large: {}", .0.display())]
    FileTooLarge(PathBuf),
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),
    #[error("Not a text file: {}", .0.display())]
    NotText(PathBuf),
}

impl FileError {
    /// Attach the offending path to an I/O failure.
    pub fn from_io(error: io::Error, path: &Path) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => FileError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => FileError::PermissionDenied(path.to_path_buf()),
            _ => FileError::IoError(format!("{}: {}", path.display(), error)),
        }
    }
}

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("nothing to classify: input is empty")]
    EmptyInput,
    #[error("tokenization failed: {0}")]
    Tokenization(String),
    #[error("inference failed: {0}")]
    Inference(String),
    #[error("model returned no output classes")]
    NoOutput,
    #[error("model returned a non-finite score")]
    NonFinite,
    #[error("failed to load model from {}: {message}", .path.display())]
    Load { path: PathBuf, message: String },
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report: {0}")]
    Io(#[from] io::Error),
    #[error("failed to build PDF: {0}")]
    Pdf(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to parse config: {0}")]
    Parse(String),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync + 'static>>;

pub fn handle_file_error(error: &FileError) -> String {
    match error {
        FileError::FileTooLarge(path) => format!(
            "File {} is too large to analyze. Maximum size is {} bytes.",
            path.display(),
            crate::utils::constants::MAX_FILE_SIZE
        ),
        FileError::NotFound(path) => format!("File not found: {}", path.display()),
        FileError::PermissionDenied(path) => {
            format!("Permission denied for file {}. Please check file permissions.", path.display())
        }
        FileError::NotText(path) => format!("File {} is not UTF-8 text and was skipped.", path.display()),
        _ => error.to_string(),
    }
}

pub fn log_error(err: &dyn std::error::Error, context: &str) {
    error!("{}: {}", context, err);
    if let Some(source) = err.source() {
        error!("Caused by: {}", source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_not_found_keeps_the_real_path() {
        let err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let path = Path::new("src/missing.py");
        match FileError::from_io(err, path) {
            FileError::NotFound(p) => assert_eq!(p, path),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn not_found_message_is_user_facing() {
        let msg = handle_file_error(&FileError::NotFound(PathBuf::from("a.c")));
        assert_eq!(msg, "File not found: a.c");
    }
}
