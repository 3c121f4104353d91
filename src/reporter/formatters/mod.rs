// 中文说明：
// 批量结果格式化器集合：JSON 供脚本与 CI 处理，彩色文本供终端阅读。
pub mod json_formatter;
pub mod text_formatter;

pub use json_formatter::JsonFormatter;
pub use text_formatter::TextFormatter;
