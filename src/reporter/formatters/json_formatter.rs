// 中文说明：
// JsonFormatter 将批量分析结果序列化为 JSON；可选附带工具元数据与汇总统计，
// 支持美化输出，便于脚本处理与平台集成。
use serde_json::json;

use crate::analyzer::{BatchSummary, FileAnalysis};
use crate::utils::constants::VERSION;

pub struct JsonFormatter {
    pretty_print: bool,
    include_metadata: bool,
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self {
            pretty_print: true,
            include_metadata: true,
        }
    }

    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    pub fn with_metadata(mut self, include: bool) -> Self {
        self.include_metadata = include;
        self
    }

    pub fn format(&self, results: &[FileAnalysis]) -> serde_json::Result<String> {
        let output = if self.include_metadata {
            json!({
                "tool": {
                    "name": "codeguard",
                    "version": VERSION,
                },
                "summary": BatchSummary::from_results(results),
                "results": results,
            })
        } else {
            json!({ "results": results })
        };

        if self.pretty_print {
            serde_json::to_string_pretty(&output)
        } else {
            serde_json::to_string(&output)
        }
    }
}
