use std::fs;
use std::sync::Arc;

use codeguard::analyzer::{BatchSummary, FileStatus};
use codeguard::reporter::JsonFormatter;
use codeguard::utils::config::{load_config_with_overrides, ConfigOverrides};
use codeguard::utils::file_utils::expand_inputs;
use codeguard::{
    AnalysisRequest, BatchRunner, Language, LexicalClassifier, PdfReportRenderer, ReportInput,
    RuleTable, Scanner, Verdict,
};
use tempfile::TempDir;

fn default_scanner() -> Scanner {
    Scanner::new(RuleTable::builtin(), Arc::new(LexicalClassifier::untrained(512)))
}

#[test]
fn reference_scenarios() {
    let scanner = default_scanner();

    assert_eq!(scanner.detect("eval('print(1)')", Language::Python), Verdict::Vulnerable);
    assert_eq!(scanner.detect("print('Hello, World!')", Language::Python), Verdict::Secure);

    let fix = scanner.suggest_fix("eval('print(1)')", Language::Python).unwrap();
    assert!(fix.contains("Avoid using eval"));
    assert!(scanner.suggest_fix("print('Hello, World!')", Language::Python).is_none());
}

#[test]
fn every_language_flags_its_banned_substrings() {
    let scanner = default_scanner();
    let cases = [
        (Language::C, "char b[8]; gets(b);"),
        (Language::C, "strcpy(dst, src);"),
        (Language::Python, "exec(code)"),
        (Language::Java, "Runtime.getRuntime().exec(cmd);"),
        (Language::JavaScript, "eval(userInput);"),
        (Language::Php, "<?php eval($_GET['x']); ?>"),
    ];
    for (language, code) in cases {
        assert_eq!(scanner.detect(code, language), Verdict::Vulnerable, "{language}: {code}");
        assert!(scanner.suggest_fix(code, language).is_some(), "{language}: {code}");
    }
}

#[test]
fn analyzed_file_produces_a_report_on_disk() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("unsafe.c");
    fs::write(&source, "int main() { char b[4]; gets(b); return 0; }\n").unwrap();

    let request = AnalysisRequest::from_file(&source).unwrap();
    let outcome = default_scanner().analyze(&request);
    assert_eq!(outcome.verdict, Verdict::Vulnerable);

    let renderer = PdfReportRenderer::new(dir.path());
    let path = renderer.generate(&ReportInput::new(&request, &outcome)).unwrap();
    assert!(path.exists());
    assert!(path
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("unsafe.c_security_report_"));
}

#[test]
fn batch_over_a_directory_with_config_overrides() {
    let dir = TempDir::new().unwrap();
    let project = dir.path().join("project");
    fs::create_dir_all(project.join("nested")).unwrap();
    fs::write(project.join("a.py"), "print('ok')\n").unwrap();
    fs::write(project.join("nested").join("b.js"), "eval(x);\n").unwrap();
    fs::write(project.join("README.md"), "# not code\n").unwrap();

    let reports = dir.path().join("reports");
    fs::create_dir_all(&reports).unwrap();
    let overrides = ConfigOverrides {
        output_dir: Some(reports.clone()),
        threads: Some(2),
        ..Default::default()
    };
    let config = load_config_with_overrides(None, &overrides).unwrap();
    let scanner = Arc::new(Scanner::from_config(&config).unwrap());

    let missing = dir.path().join("missing.php");
    let files = expand_inputs(&[project.clone(), missing.clone()]);
    assert_eq!(files.len(), 3);

    let runner = BatchRunner::new(scanner, config.batch_threads())
        .with_reports(PdfReportRenderer::new(&config.report.output_dir));
    let results = runner.run(&files);

    assert_eq!(results[0].file, project.join("a.py"));
    assert_eq!(results[0].verdict(), Some(Verdict::Secure));
    assert_eq!(results[1].file, project.join("nested").join("b.js"));
    assert_eq!(results[1].verdict(), Some(Verdict::Vulnerable));
    assert!(matches!(results[2].status, FileStatus::Failed { .. }));

    let summary = BatchSummary::from_results(&results);
    assert_eq!((summary.total, summary.vulnerable, summary.secure, summary.failed), (3, 1, 1, 1));
    assert_eq!(fs::read_dir(&reports).unwrap().count(), 2);

    let json: serde_json::Value =
        serde_json::from_str(&JsonFormatter::new().format(&results).unwrap()).unwrap();
    assert_eq!(json["summary"]["vulnerable"], 1);
    assert_eq!(json["results"][2]["status"], "failed");
}

#[test]
fn same_basename_across_packages_gets_one_report_each() {
    let dir = TempDir::new().unwrap();
    let tree = dir.path().join("tree");
    for i in 0..16 {
        let package = tree.join(format!("pkg{}", i));
        fs::create_dir_all(&package).unwrap();
        fs::write(package.join("util.py"), format!("eval(x{})\n", i)).unwrap();
    }
    let reports = dir.path().join("reports");
    fs::create_dir_all(&reports).unwrap();

    let files = expand_inputs(&[tree]);
    assert_eq!(files.len(), 16);
    let runner = BatchRunner::new(Arc::new(default_scanner()), 16)
        .with_reports(PdfReportRenderer::new(&reports));
    let results = runner.run(&files);

    let mut claimed: Vec<_> = results
        .iter()
        .map(|entry| match &entry.status {
            FileStatus::Analyzed { report, .. } => report.clone().unwrap(),
            FileStatus::Failed { error } => panic!("{}: {}", entry.file.display(), error),
        })
        .collect();
    claimed.sort();
    claimed.dedup();

    assert_eq!(claimed.len(), 16);
    assert_eq!(fs::read_dir(&reports).unwrap().count(), 16);
    assert!(claimed.iter().all(|path| path.exists()));
}
