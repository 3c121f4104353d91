// 中文说明：
// Web 首页模板：上传表单，以及分析完成后在同一页面展示的结果区（判定横幅、耗时、
// 代码、建议修复与 PDF 下载链接）。所有用户内容都经 html-escape 转义后写入。
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::time::Duration;

use crate::analyzer::Verdict;
use crate::utils::helpers::format_seconds;

pub const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>codeguard - Code Security Analysis</title>
    <style>
        body { font-family: Arial, sans-serif; margin: 20px; }
        .header { background-color: #f4f4f4; padding: 20px; border-radius: 5px; }
        .result { margin: 10px 0; padding: 15px; border-left: 4px solid #b2bec3; }
        .vulnerable { border-left-color: #d63031; background-color: #fff5f5; }
        .secure { border-left-color: #00b894; background-color: #f0fff8; }
        .error { border-left-color: #636e72; background-color: #f5f6fa; }
        .code-snippet { background-color: #f8f9fa; padding: 10px; border-radius: 3px; font-family: monospace; }
    </style>
</head>
<body>
    <div class="header">
        <h1>Code Security Analysis</h1>
        <form method="post" enctype="multipart/form-data">
            <input type="file" name="file">
            <button type="submit">Analyze</button>
        </form>
    </div>
{{ result }}
</body>
</html>
"#;

/// What the result section of the index page shows.
#[derive(Debug, Clone)]
pub struct ResultView<'a> {
    pub verdict: Verdict,
    pub execution_time: Duration,
    pub code: &'a str,
    pub fixed_code: Option<&'a str>,
    /// Path segment appended to `/download/`.
    pub download: Option<&'a str>,
}

pub fn render_index(result: Option<&ResultView<'_>>) -> String {
    let section = result.map(render_result).unwrap_or_default();
    INDEX_TEMPLATE.replace("{{ result }}", &section)
}

fn render_result(view: &ResultView<'_>) -> String {
    let class = match view.verdict {
        Verdict::Vulnerable => "vulnerable",
        Verdict::Secure => "secure",
        Verdict::Error => "error",
    };

    let mut html = format!(
        r#"    <div class="result {}">
        <h2>{}</h2>
        <p><strong>Execution time:</strong> {} seconds</p>
        <div class="code-snippet"><strong>Analyzed code:</strong><pre>{}</pre></div>
"#,
        class,
        encode_text(view.verdict.headline()),
        format_seconds(view.execution_time),
        encode_text(view.code)
    );

    if let Some(fix) = view.fixed_code {
        html.push_str(&format!(
            "        <div class=\"code-snippet\"><strong>Recommended fix:</strong><pre>{}</pre></div>\n",
            encode_text(fix)
        ));
    }
    if let Some(link) = view.download {
        html.push_str(&format!(
            "        <p><a href=\"/download/{}\">Download PDF report</a></p>\n",
            encode_double_quoted_attribute(link)
        ));
    }
    html.push_str("    </div>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_page_has_only_the_form() {
        let page = render_index(None);
        assert!(page.contains("enctype=\"multipart/form-data\""));
        assert!(!page.contains("{{ result }}"));
        assert!(!page.contains("class=\"result"));
    }

    #[test]
    fn result_section_escapes_user_content() {
        let view = ResultView {
            verdict: Verdict::Vulnerable,
            execution_time: Duration::from_millis(1),
            code: "<script>eval(x)</script>",
            fixed_code: Some("a < b"),
            download: Some("x.py_security_report_1.pdf"),
        };
        let page = render_index(Some(&view));
        assert!(page.contains("Vulnerabilities detected!"));
        assert!(page.contains("&lt;script&gt;eval(x)&lt;/script&gt;"));
        assert!(!page.contains("<script>"));
        assert!(page.contains("a &lt; b"));
        assert!(page.contains("href=\"/download/x.py_security_report_1.pdf\""));
    }
}
