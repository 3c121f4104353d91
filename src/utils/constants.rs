// 中文说明：
// 全局常量：默认参数、报告与上传限制、Web 服务默认地址以及交互模式使用的命令字。
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Token budget handed to the classifier; longer inputs are truncated.
pub const DEFAULT_MAX_TOKENS: usize = 512;

/// Characters of code (and of the fix) drawn into a report.
pub const REPORT_EXCERPT_CHARS: usize = 1000;
pub const REPORT_FILE_SUFFIX: &str = "_security_report_";
pub const REPORT_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S_%3f";
pub const DEFAULT_OUTPUT_DIR: &str = ".";
/// Suffixes tried before giving up on a free output file name.
pub const MAX_UNIQUE_NAME_ATTEMPTS: u32 = 10_000;

pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024; // 10MB

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
pub const DEFAULT_DATABASE_URL: &str = "sqlite:analysis_results.db?mode=rwc";
pub const DEFAULT_DB_CONNECTIONS: u32 = 5;
pub const ALLOWED_UPLOAD_EXTENSIONS: &[&str] = &["c", "py", "java", "js", "php"];
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

pub const SNIPPET_SOURCE: &str = "snippet";
pub const EXIT_COMMAND: &str = "exit";

pub const NO_INPUT_HINT: &str = "No input provided. Use --cli, --web, or specify file paths.";
