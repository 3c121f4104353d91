// 中文说明：
// 常用工具函数：文件名清洗、按字符截断、耗时格式化、上传扩展名校验等。
use std::path::Path;
use std::time::Duration;

pub fn sanitize_filename(filename: &str) -> String {
    let cleaned: String = filename
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' => c,
            _ => '_',
        })
        .collect();

    // A bare "." or ".." would resolve outside the target directory.
    if cleaned.chars().all(|c| c == '.') {
        "_".repeat(cleaned.len().max(1))
    } else {
        cleaned
    }
}

/// Last path component of `source`, sanitized for use inside a file name.
pub fn report_stem(source: &str) -> String {
    let name = Path::new(source)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.to_string());
    sanitize_filename(&name)
}

/// First `max_chars` characters of `s`, never splitting a code point.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

pub fn format_seconds(duration: Duration) -> String {
    format!("{:.4}", duration.as_secs_f64())
}

pub fn has_allowed_extension(filename: &str, allowed: &[String]) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => {
            let ext = ext.to_lowercase();
            allowed.iter().any(|a| a.eq_ignore_ascii_case(&ext))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_separators() {
        assert_eq!(sanitize_filename("../etc/passwd"), ".._etc_passwd");
        assert_eq!(sanitize_filename(".."), "__");
        assert_eq!(sanitize_filename("main file.c"), "main_file.c");
    }

    #[test]
    fn report_stem_drops_directories() {
        assert_eq!(report_stem("src/app/views.py"), "views.py");
        assert_eq!(report_stem("snippet"), "snippet");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 5), "");
    }

    #[test]
    fn extension_allowlist() {
        let allowed: Vec<String> = vec!["py".into(), "c".into()];
        assert!(has_allowed_extension("main.PY", &allowed));
        assert!(has_allowed_extension("a.b.c", &allowed));
        assert!(!has_allowed_extension("notes.txt", &allowed));
        assert!(!has_allowed_extension("Makefile", &allowed));
        assert!(!has_allowed_extension("trailing.", &allowed));
    }

    #[test]
    fn seconds_have_four_decimals() {
        assert_eq!(format_seconds(Duration::from_millis(123)), "0.1230");
    }
}
