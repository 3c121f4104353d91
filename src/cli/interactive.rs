// 中文说明：
// 交互式会话：循环显示菜单（1 = 分析代码片段，2 = 分析文件），输入 exit 或遇到
// 输入结束时退出。代码片段可多行输入，以空行结束。每次分析都会打印判定与修复建议，
// 并在启用时生成 PDF 报告。读写端为泛型，便于测试。
use colored::*;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::analyzer::{AnalysisOutcome, AnalysisRequest, Scanner, Verdict};
use crate::detector::Language;
use crate::reporter::{PdfReportRenderer, ReportInput};
use crate::utils::constants::EXIT_COMMAND;
use crate::utils::error::handle_file_error;

pub struct InteractiveSession<'a, R, W> {
    scanner: &'a Scanner,
    reports: Option<&'a PdfReportRenderer>,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> InteractiveSession<'a, R, W> {
    pub fn new(scanner: &'a Scanner, reports: Option<&'a PdfReportRenderer>, input: R, output: W) -> Self {
        Self {
            scanner,
            reports,
            input,
            output,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "Welcome to the Code Security Analyzer CLI!")?;
        writeln!(self.output, "Type '{}' to quit.", EXIT_COMMAND)?;

        loop {
            writeln!(self.output, "\nOptions:")?;
            writeln!(self.output, "1. Analyze a code snippet")?;
            writeln!(self.output, "2. Analyze a file")?;
            let Some(choice) = self.prompt("Enter your choice (1/2): ")? else {
                break;
            };

            match choice.trim() {
                EXIT_COMMAND => break,
                "1" => self.analyze_snippet()?,
                "2" => self.analyze_file()?,
                _ => writeln!(self.output, "Invalid choice. Please try again.")?,
            }
        }

        writeln!(self.output, "Exiting CLI. Goodbye!")?;
        self.output.flush()
    }

    fn analyze_snippet(&mut self) -> io::Result<()> {
        writeln!(self.output, "Enter the code snippet to analyze (finish with an empty line):")?;
        self.output.flush()?;
        let code = self.read_block()?;

        let Some(tag) = self.prompt("Enter the programming language (e.g., python, c, java): ")? else {
            return Ok(());
        };

        let request = AnalysisRequest::snippet(code, Language::from_tag(&tag));
        let outcome = self.scanner.analyze(&request);
        self.show(&request, &outcome)
    }

    fn analyze_file(&mut self) -> io::Result<()> {
        let Some(path) = self.prompt("Enter the file path to analyze: ")? else {
            return Ok(());
        };

        let request = match AnalysisRequest::from_file(PathBuf::from(path.trim())) {
            Ok(request) => request,
            Err(e) => {
                writeln!(self.output, "{} {}", "Error:".red().bold(), handle_file_error(&e))?;
                return Ok(());
            }
        };
        let outcome = self.scanner.analyze(&request);
        self.show(&request, &outcome)
    }

    fn show(&mut self, request: &AnalysisRequest, outcome: &AnalysisOutcome) -> io::Result<()> {
        writeln!(self.output, "\nAnalysis Result:")?;
        match outcome.verdict {
            Verdict::Vulnerable => {
                writeln!(self.output, "{}", Verdict::Vulnerable.headline().red().bold())?;
                match &outcome.fixed_code {
                    Some(fix) => writeln!(self.output, "Recommended Fix:\n{}", fix)?,
                    None => writeln!(self.output, "No automatic fix is available for this finding.")?,
                }
            }
            Verdict::Secure => writeln!(self.output, "{}", Verdict::Secure.headline().green().bold())?,
            Verdict::Error => writeln!(self.output, "{}", Verdict::Error.headline().yellow())?,
        }

        if let Some(renderer) = self.reports {
            match renderer.generate(&ReportInput::new(request, outcome)) {
                Some(path) => writeln!(self.output, "Report saved to {}", path.display())?,
                None => writeln!(self.output, "The PDF report could not be written.")?,
            }
        }
        Ok(())
    }

    /// Print `message` and read one line. `None` means the input is exhausted.
    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;
        self.read_line()
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    /// Lines up to the first empty one (or the end of input).
    fn read_block(&mut self) -> io::Result<String> {
        let mut lines = Vec::new();
        while let Some(line) = self.read_line()? {
            if line.trim().is_empty() {
                break;
            }
            lines.push(line);
        }
        Ok(lines.join("\n"))
    }
}
