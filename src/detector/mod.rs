pub mod language;
pub mod rule_table;
pub mod pattern_detector;
pub mod fix_suggester;
pub mod vulnerability_detector;

pub use language::Language;
pub use rule_table::{Rule, RuleTable};
pub use pattern_detector::PatternDetector;
pub use fix_suggester::suggest_fix;
pub use vulnerability_detector::VulnerabilityDetector;
