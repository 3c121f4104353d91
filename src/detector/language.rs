use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Source language tag. Anything unrecognised is `Unknown`, which disables
/// rule and fix lookups but still goes through the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    C,
    Python,
    Java,
    JavaScript,
    Php,
    Unknown,
}

impl Language {
    pub const SUPPORTED: [Language; 5] = [
        Language::C,
        Language::Python,
        Language::Java,
        Language::JavaScript,
        Language::Php,
    ];

    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Unknown)
    }

    pub fn from_extension(ext: &str) -> Self {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "c" | "h" => Language::C,
            "py" => Language::Python,
            "java" => Language::Java,
            "js" => Language::JavaScript,
            "php" => Language::Php,
            _ => Language::Unknown,
        }
    }

    /// Parse a user supplied tag such as `"python"` or `" C "`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "c" => Language::C,
            "python" => Language::Python,
            "java" => Language::Java,
            "javascript" => Language::JavaScript,
            "php" => Language::Php,
            _ => Language::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Python => "python",
            Language::Java => "java",
            Language::JavaScript => "javascript",
            Language::Php => "php",
            Language::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
