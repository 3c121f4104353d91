use serde::{Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use crate::detector::Language;

/// Three-valued analysis outcome, exchanged externally as 0 / 1 / -1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Secure,
    Vulnerable,
    Error,
}

impl Verdict {
    pub fn code(self) -> i32 {
        match self {
            Verdict::Secure => 0,
            Verdict::Vulnerable => 1,
            Verdict::Error => -1,
        }
    }

    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Verdict::Secure,
            1 => Verdict::Vulnerable,
            _ => Verdict::Error,
        }
    }

    /// Map a classifier label. Anything beyond the two known classes is
    /// treated as a failed analysis.
    pub fn from_label(label: usize) -> Self {
        match label {
            0 => Verdict::Secure,
            1 => Verdict::Vulnerable,
            other => {
                warn!("Classifier returned unexpected label {}", other);
                Verdict::Error
            }
        }
    }

    pub fn is_vulnerable(self) -> bool {
        self == Verdict::Vulnerable
    }

    pub fn headline(self) -> &'static str {
        match self {
            Verdict::Secure => "Code is secure!",
            Verdict::Vulnerable => "Vulnerabilities detected!",
            Verdict::Error => "Analysis failed: the code could not be classified.",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Verdict::Secure => "secure",
            Verdict::Vulnerable => "vulnerable",
            Verdict::Error => "error",
        };
        f.write_str(name)
    }
}

impl Serialize for Verdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.code())
    }
}

/// Result of running one request through detection and fix suggestion.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    pub verdict: Verdict,
    pub fixed_code: Option<String>,
    #[serde(rename = "execution_time_secs", serialize_with = "serialize_secs")]
    pub execution_time: Duration,
}

/// One entry of a batch run, in submission order.
#[derive(Debug, Clone, Serialize)]
pub struct FileAnalysis {
    pub file: PathBuf,
    #[serde(flatten)]
    pub status: FileStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Analyzed {
        language: Language,
        outcome: AnalysisOutcome,
        report: Option<PathBuf>,
    },
    Failed {
        error: String,
    },
}

impl FileAnalysis {
    pub fn verdict(&self) -> Option<Verdict> {
        match &self.status {
            FileStatus::Analyzed { outcome, .. } => Some(outcome.verdict),
            FileStatus::Failed { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub vulnerable: usize,
    pub secure: usize,
    pub errors: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_results(results: &[FileAnalysis]) -> Self {
        let mut summary = BatchSummary { total: results.len(), ..Default::default() };
        for entry in results {
            match entry.verdict() {
                Some(Verdict::Vulnerable) => summary.vulnerable += 1,
                Some(Verdict::Secure) => summary.secure += 1,
                Some(Verdict::Error) => summary.errors += 1,
                None => summary.failed += 1,
            }
        }
        summary
    }
}

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn verdict_codes() {
        assert_eq!(Verdict::Secure.code(), 0);
        assert_eq!(Verdict::Vulnerable.code(), 1);
        assert_eq!(Verdict::Error.code(), -1);
        assert_eq!(Verdict::from_code(-1), Verdict::Error);
        assert_eq!(Verdict::from_label(7), Verdict::Error);
        assert_eq!(serde_json::to_value(Verdict::Vulnerable).unwrap(), json!(1));
    }

    #[test]
    fn file_analysis_serializes_flat() {
        let entry = FileAnalysis {
            file: PathBuf::from("a.py"),
            status: FileStatus::Analyzed {
                language: Language::Python,
                outcome: AnalysisOutcome {
                    verdict: Verdict::Secure,
                    fixed_code: None,
                    execution_time: Duration::from_millis(250),
                },
                report: None,
            },
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["file"], json!("a.py"));
        assert_eq!(value["status"], json!("analyzed"));
        assert_eq!(value["language"], json!("python"));
        assert_eq!(value["outcome"]["verdict"], json!(0));
        assert_eq!(value["outcome"]["execution_time_secs"], json!(0.25));

        let failed = FileAnalysis {
            file: PathBuf::from("gone.c"),
            status: FileStatus::Failed { error: "File not found: gone.c".into() },
        };
        let value = serde_json::to_value(&failed).unwrap();
        assert_eq!(value["status"], json!("failed"));
        assert_eq!(value["error"], json!("File not found: gone.c"));
    }

    #[test]
    fn summary_counts_each_bucket() {
        let make = |verdict| FileAnalysis {
            file: PathBuf::from("x"),
            status: FileStatus::Analyzed {
                language: Language::C,
                outcome: AnalysisOutcome { verdict, fixed_code: None, execution_time: Duration::ZERO },
                report: None,
            },
        };
        let results = vec![
            make(Verdict::Vulnerable),
            make(Verdict::Secure),
            make(Verdict::Error),
            FileAnalysis { file: PathBuf::from("y"), status: FileStatus::Failed { error: "e".into() } },
        ];
        let summary = BatchSummary::from_results(&results);
        assert_eq!(
            summary,
            BatchSummary { total: 4, vulnerable: 1, secure: 1, errors: 1, failed: 1 }
        );
    }
}
