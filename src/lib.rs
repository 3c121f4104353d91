pub mod analyzer;
pub mod classifier;
pub mod cli;
pub mod detector;
pub mod reporter;
pub mod store;
pub mod utils;
pub mod web;

pub use analyzer::{AnalysisOutcome, AnalysisRequest, BatchRunner, FileAnalysis, Scanner, Verdict};
pub use classifier::{Classifier, LexicalClassifier};
pub use detector::{suggest_fix, Language, RuleTable, VulnerabilityDetector};
pub use reporter::{PdfReportRenderer, ReportInput};
pub use store::ResultStore;
pub use utils::config::ScannerConfig;
