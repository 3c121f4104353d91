// 中文说明：
// reporter 模块：单次分析的 PDF 报告渲染、批量结果的 JSON/文本格式化，以及
// Web 页面模板。
pub mod formatters;
pub mod pdf_report;
pub mod templates;

pub use formatters::{JsonFormatter, TextFormatter};
pub use pdf_report::{report_file_name, PdfReportRenderer, ReportInput};
