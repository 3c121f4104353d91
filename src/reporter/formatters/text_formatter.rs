// 中文说明：
// TextFormatter 输出面向终端的彩色文本：每个文件一行判定结果（附语言与耗时），
// 存在修复时缩进列出建议修复，最后给出批量汇总行。仅用于批量模式输出。
use colored::*;
use std::fmt::Write as _;
use std::path::Path;

use crate::analyzer::{AnalysisOutcome, BatchSummary, FileAnalysis, FileStatus, Verdict};
use crate::utils::helpers::format_seconds;

pub struct TextFormatter {
    show_fixes: bool,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl TextFormatter {
    pub fn new() -> Self {
        Self { show_fixes: true }
    }

    pub fn with_fixes(mut self, show: bool) -> Self {
        self.show_fixes = show;
        self
    }

    /// Result block for one analyzed source.
    pub fn format_outcome(&self, source: &str, outcome: &AnalysisOutcome, report: Option<&Path>) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} {} ({}s)",
            verdict_tag(outcome.verdict),
            source,
            format_seconds(outcome.execution_time)
        );

        if outcome.verdict == Verdict::Error {
            let _ = writeln!(out, "  {}", Verdict::Error.headline().dimmed());
        }

        if self.show_fixes {
            if let Some(fix) = &outcome.fixed_code {
                let _ = writeln!(out, "  {}", "Suggested fix:".bright_yellow());
                for line in fix.lines() {
                    let _ = writeln!(out, "    {}", line);
                }
            }
        }

        if let Some(path) = report {
            let _ = writeln!(out, "  Report: {}", path.display());
        }
        out
    }

    pub fn format_entry(&self, entry: &FileAnalysis) -> String {
        let source = entry.file.display().to_string();
        match &entry.status {
            FileStatus::Analyzed { outcome, report, .. } => {
                self.format_outcome(&source, outcome, report.as_deref())
            }
            FileStatus::Failed { error } => format!("{} {}: {}\n", "[FAILED]".red(), source, error),
        }
    }

    pub fn format_batch(&self, results: &[FileAnalysis]) -> String {
        let mut out: String = results.iter().map(|r| self.format_entry(r)).collect();
        out.push_str(&format_summary(&BatchSummary::from_results(results)));
        out.push('\n');
        out
    }
}

pub fn format_summary(summary: &BatchSummary) -> String {
    let line = format!(
        "Analyzed {} files: {} vulnerable, {} secure, {} errors",
        summary.total,
        summary.vulnerable,
        summary.secure,
        summary.errors + summary.failed
    );
    if summary.vulnerable > 0 {
        line.bright_red().bold().to_string()
    } else {
        line.bright_green().to_string()
    }
}

fn verdict_tag(verdict: Verdict) -> ColoredString {
    match verdict {
        Verdict::Vulnerable => "[VULNERABLE]".red().bold(),
        Verdict::Secure => "[SECURE]".green(),
        Verdict::Error => "[ERROR]".yellow(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::Language;
    use std::path::PathBuf;
    use std::time::Duration;

    fn analyzed(verdict: Verdict, fix: Option<&str>) -> FileAnalysis {
        FileAnalysis {
            file: PathBuf::from("src/x.py"),
            status: FileStatus::Analyzed {
                language: Language::Python,
                outcome: AnalysisOutcome {
                    verdict,
                    fixed_code: fix.map(str::to_string),
                    execution_time: Duration::from_millis(5),
                },
                report: Some(PathBuf::from("out/x.py_security_report_1.pdf")),
            },
        }
    }

    #[test]
    fn vulnerable_entry_lists_fix_and_report() {
        let text = TextFormatter::new().format_entry(&analyzed(Verdict::Vulnerable, Some("a\nb")));
        assert!(text.contains("[VULNERABLE]"));
        assert!(text.contains("src/x.py (0.0050s)"));
        assert!(text.contains("    a\n    b\n"));
        assert!(text.contains("Report: out/x.py_security_report_1.pdf"));

        let hidden = TextFormatter::new()
            .with_fixes(false)
            .format_entry(&analyzed(Verdict::Vulnerable, Some("a\nb")));
        assert!(!hidden.contains("Suggested fix"));
    }

    #[test]
    fn failed_and_error_entries_are_labelled() {
        let failed = FileAnalysis {
            file: PathBuf::from("gone.c"),
            status: FileStatus::Failed { error: "File not found: gone.c".into() },
        };
        let f = TextFormatter::new();
        assert!(f.format_entry(&failed).contains("File not found: gone.c"));
        assert!(f.format_entry(&analyzed(Verdict::Error, None)).contains("could not be classified"));
    }

    #[test]
    fn batch_ends_with_summary() {
        let text = TextFormatter::new().format_batch(&[
            analyzed(Verdict::Secure, None),
            analyzed(Verdict::Vulnerable, Some("fix")),
        ]);
        assert!(text.contains("Analyzed 2 files: 1 vulnerable, 1 secure, 0 errors"));
    }
}
