// 中文说明：
// analyzer 模块：Scanner 是显式构造、只读共享的扫描上下文（规则表 + 分类器），
// 取代模块级单例；AnalysisRequest 描述一次待分析的代码，analyze 负责计时检测并在
// 判定为 Vulnerable 时生成修复建议。批量并行分析位于 batch 子模块。
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

pub mod analysis_results;
pub mod batch;

pub use analysis_results::{AnalysisOutcome, BatchSummary, FileAnalysis, FileStatus, Verdict};
pub use batch::BatchRunner;

use crate::classifier::{load_classifier, Classifier};
use crate::detector::{suggest_fix, Language, RuleTable, VulnerabilityDetector};
use crate::utils::config::ScannerConfig;
use crate::utils::constants::SNIPPET_SOURCE;
use crate::utils::error::{FileError, Result};
use crate::utils::file_utils::read_file_content;

#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub code: String,
    pub language: Language,
    /// File name, or "snippet" for pasted code.
    pub source: String,
}

impl AnalysisRequest {
    pub fn snippet(code: impl Into<String>, language: Language) -> Self {
        Self {
            code: code.into(),
            language,
            source: SNIPPET_SOURCE.to_string(),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> std::result::Result<Self, FileError> {
        let path = path.as_ref();
        let code = read_file_content(path)?;
        Ok(Self {
            code,
            language: Language::from_path(path),
            source: path.display().to_string(),
        })
    }
}

pub struct Scanner {
    detector: VulnerabilityDetector,
}

impl Scanner {
    pub fn new(rules: RuleTable, classifier: Arc<dyn Classifier>) -> Self {
        Self {
            detector: VulnerabilityDetector::new(rules, classifier),
        }
    }

    /// Load the rule table and model named by `config`.
    pub fn from_config(config: &ScannerConfig) -> Result<Self> {
        let rules = match &config.rules_file {
            Some(path) => RuleTable::from_file(path)?,
            None => RuleTable::builtin(),
        };
        let classifier = load_classifier(&config.model)?;
        Ok(Self::new(rules, classifier))
    }

    pub fn rules(&self) -> &RuleTable {
        self.detector.rules()
    }

    pub fn classifier_name(&self) -> &str {
        self.detector.classifier().name()
    }

    pub fn detect(&self, code: &str, language: Language) -> Verdict {
        self.detector.detect(code, language)
    }

    pub fn suggest_fix(&self, code: &str, language: Language) -> Option<String> {
        suggest_fix(self.detector.rules(), code, language)
    }

    /// Detection is timed on its own; fix suggestion only runs for
    /// vulnerable verdicts and never for model-only findings without a rule hit.
    pub fn analyze(&self, request: &AnalysisRequest) -> AnalysisOutcome {
        let start = Instant::now();
        let verdict = self.detect(&request.code, request.language);
        let execution_time = start.elapsed();

        let fixed_code = if verdict.is_vulnerable() {
            self.suggest_fix(&request.code, request.language)
        } else {
            None
        };

        AnalysisOutcome {
            verdict,
            fixed_code,
            execution_time,
        }
    }
}
