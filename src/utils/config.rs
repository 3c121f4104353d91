// 中文说明：
// 扫描器配置加载/序列化与命令行覆盖：模型后端与路径、规则文件、报告输出目录、
// 批量线程数以及 Web 服务参数（监听地址、上传目录、数据库、扩展名白名单）。
// 支持默认值、从 TOML 文件读取/写入，以及命令行参数覆盖。
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::utils::constants::*;
use crate::utils::error::ConfigError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Rule table to load instead of the built-in one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules_file: Option<PathBuf>,
    pub model: ModelConfig,
    pub report: ReportConfig,
    pub batch: BatchConfig,
    pub web: WebConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub backend: ModelBackend,
    /// Weights file (lexical) or model directory (onnx).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub max_tokens: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ModelBackend {
    Lexical,
    Onnx,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub enabled: bool,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Worker threads for batch analysis (0 = one per core).
    pub threads: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub bind: String,
    pub upload_dir: PathBuf,
    pub database_url: String,
    pub allowed_extensions: Vec<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend: ModelBackend::Lexical,
            path: None,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND_ADDR.to_string(),
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            allowed_extensions: ALLOWED_UPLOAD_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ScannerConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ScannerConfig = toml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.max_tokens == 0 {
            return Err(ConfigError::Invalid("model.max_tokens must be at least 1".into()));
        }
        if self.model.backend == ModelBackend::Onnx && self.model.path.is_none() {
            return Err(ConfigError::Invalid(
                "model.path is required for the onnx backend".into(),
            ));
        }
        if self.web.bind.trim().is_empty() {
            return Err(ConfigError::Invalid("web.bind must not be empty".into()));
        }
        Ok(())
    }

    /// Worker count for batch mode, resolving 0 to the host's core count.
    pub fn batch_threads(&self) -> usize {
        match self.batch.threads {
            0 => num_cpus::get().max(1),
            n => n,
        }
    }
}

impl ModelBackend {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "lexical" => Some(ModelBackend::Lexical),
            "onnx" => Some(ModelBackend::Onnx),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelBackend::Lexical => "lexical",
            ModelBackend::Onnx => "onnx",
        }
    }
}

/// Command-line values layered over the file configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub rules_file: Option<PathBuf>,
    pub backend: Option<String>,
    pub model_path: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub threads: Option<usize>,
    pub no_report: bool,
    pub bind: Option<String>,
    pub database_url: Option<String>,
}

pub fn load_config_with_overrides(
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<ScannerConfig, ConfigError> {
    let mut config = match config_path {
        Some(path) => ScannerConfig::from_file(path)?,
        None => ScannerConfig::default(),
    };

    if let Some(rules) = &overrides.rules_file {
        config.rules_file = Some(rules.clone());
    }
    if let Some(backend) = &overrides.backend {
        config.model.backend = ModelBackend::from_str(backend)
            .ok_or_else(|| ConfigError::Invalid(format!("Invalid model backend: {}", backend)))?;
    }
    if let Some(path) = &overrides.model_path {
        config.model.path = Some(path.clone());
    }
    if let Some(dir) = &overrides.output_dir {
        config.report.output_dir = dir.clone();
    }
    if let Some(threads) = overrides.threads {
        config.batch.threads = threads;
    }
    if overrides.no_report {
        config.report.enabled = false;
    }
    if let Some(bind) = &overrides.bind {
        config.web.bind = bind.clone();
    }
    if let Some(url) = &overrides.database_url {
        config.web.database_url = url.clone();
    }

    config.validate()?;
    Ok(config)
}
