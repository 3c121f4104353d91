// 中文说明：
// PdfReportRenderer 将单次分析结果渲染为 Letter 尺寸、Helvetica 12pt 的固定版式
// PDF：标题、文件名、耗时（4 位小数）、代码摘录（前 1000 字符逐行）、按判定着色的
// 结论横幅，以及存在修复时的修复摘录。超出页面的内容续写到新页。同名报告不会互相
// 覆盖（追加 _1、_2 等后缀）。写入失败只记录日志并返回“无报告”。
use chrono::Local;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Pt, Rgb,
};
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::analyzer::{AnalysisOutcome, AnalysisRequest, Verdict};
use crate::utils::constants::{REPORT_EXCERPT_CHARS, REPORT_FILE_SUFFIX, REPORT_TIMESTAMP_FORMAT};
use crate::utils::error::{log_error, ReportError};
use crate::utils::file_utils::create_unique_file;
use crate::utils::helpers::{format_seconds, report_stem, truncate_chars};
use crate::utils::logger::log_report_written;

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const FONT_SIZE: f32 = 12.0;
const MARGIN_LEFT: f32 = 72.0;
const TOP: f32 = 750.0;
const BOTTOM: f32 = 50.0;
const HEADER_STEP: f32 = 20.0;
const LINE_HEIGHT: f32 = 14.0;
const CODE_START: f32 = 670.0;
const LAYER_NAME: &str = "Layer 1";
const TITLE: &str = "Code Security Analysis Report";

/// Everything a single report shows.
#[derive(Debug, Clone)]
pub struct ReportInput<'a> {
    pub filename: &'a str,
    pub code: &'a str,
    pub verdict: Verdict,
    pub execution_time: Duration,
    pub fixed_code: Option<&'a str>,
}

impl<'a> ReportInput<'a> {
    pub fn new(request: &'a AnalysisRequest, outcome: &'a AnalysisOutcome) -> Self {
        Self {
            filename: &request.source,
            code: &request.code,
            verdict: outcome.verdict,
            execution_time: outcome.execution_time,
            fixed_code: outcome.fixed_code.as_deref(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PdfReportRenderer {
    output_dir: PathBuf,
}

impl PdfReportRenderer {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Render and write the report, logging any failure.
    pub fn generate(&self, input: &ReportInput<'_>) -> Option<PathBuf> {
        match self.render(input) {
            Ok(path) => {
                log_report_written(&path);
                Some(path)
            }
            Err(e) => {
                log_error(&e, "Error generating PDF report");
                None
            }
        }
    }

    pub fn render(&self, input: &ReportInput<'_>) -> Result<PathBuf, ReportError> {
        let timestamp = Local::now().format(REPORT_TIMESTAMP_FORMAT).to_string();
        let name = report_file_name(&report_stem(input.filename), &timestamp);

        let (doc, page, layer) =
            PdfDocument::new(TITLE, Mm::from(Pt(PAGE_WIDTH)), Mm::from(Pt(PAGE_HEIGHT)), LAYER_NAME);
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::Pdf(e.to_string()))?;
        let layer = doc.get_page(page).get_layer(layer);

        let mut pen = Pen { doc: &doc, layer, font, y: TOP };
        pen.header(TITLE);
        pen.header(&format!("File: {}", input.filename));
        pen.header(&format!("Execution Time: {} seconds", format_seconds(input.execution_time)));
        pen.header("Analyzed Code:");
        pen.y = CODE_START;
        pen.excerpt(input.code);

        pen.gap();
        match input.verdict {
            Verdict::Vulnerable => {
                pen.colored(RED, Verdict::Vulnerable.headline());
                pen.line("Vulnerability detected in the code.");
                if let Some(fix) = input.fixed_code {
                    pen.line("Recommended Fix:");
                    pen.excerpt(fix);
                }
            }
            Verdict::Secure => pen.colored(GREEN, Verdict::Secure.headline()),
            Verdict::Error => {
                pen.colored(GREY, "Analysis error");
                pen.line(Verdict::Error.headline());
            }
        }

        let (path, file) = create_unique_file(&self.output_dir, &name)?;
        if let Err(e) = doc.save(&mut BufWriter::new(file)) {
            let _ = fs::remove_file(&path);
            return Err(ReportError::Pdf(e.to_string()));
        }
        Ok(path)
    }
}

/// `<stem>_security_report_<timestamp>.pdf`
pub fn report_file_name(stem: &str, timestamp: &str) -> String {
    format!("{}{}{}.pdf", stem, REPORT_FILE_SUFFIX, timestamp)
}

const RED: (f32, f32, f32) = (1.0, 0.0, 0.0);
const GREEN: (f32, f32, f32) = (0.0, 0.5, 0.0);
const GREY: (f32, f32, f32) = (0.5, 0.5, 0.5);
const BLACK: (f32, f32, f32) = (0.0, 0.0, 0.0);

/// Writes lines top to bottom, starting a new page at the bottom margin.
struct Pen<'d> {
    doc: &'d PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    y: f32,
}

impl Pen<'_> {
    fn ensure_room(&mut self) {
        if self.y < BOTTOM {
            let (page, layer) = self
                .doc
                .add_page(Mm::from(Pt(PAGE_WIDTH)), Mm::from(Pt(PAGE_HEIGHT)), LAYER_NAME);
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = TOP;
        }
    }

    /// Header rows sit on a fixed grid above the code block.
    fn header(&mut self, text: &str) {
        self.write_at(text, self.y);
        self.y -= HEADER_STEP;
    }

    fn line(&mut self, text: &str) {
        self.ensure_room();
        self.write_at(text, self.y);
        self.y -= LINE_HEIGHT;
    }

    fn write_at(&self, text: &str, y: f32) {
        let text = text.replace('\t', "    ");
        self.layer.use_text(
            text,
            FONT_SIZE,
            Mm::from(Pt(MARGIN_LEFT)),
            Mm::from(Pt(y)),
            &self.font,
        );
    }

    fn excerpt(&mut self, text: &str) {
        for line in truncate_chars(text, REPORT_EXCERPT_CHARS).lines() {
            self.line(line);
        }
    }

    fn colored(&mut self, (r, g, b): (f32, f32, f32), text: &str) {
        self.ensure_room();
        self.layer.set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
        self.line(text);
        self.layer
            .set_fill_color(Color::Rgb(Rgb::new(BLACK.0, BLACK.1, BLACK.2, None)));
    }

    fn gap(&mut self) {
        self.y -= LINE_HEIGHT;
    }
}
