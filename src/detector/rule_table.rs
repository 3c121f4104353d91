// 中文说明：
// RuleTable：按语言组织的“危险子串 → 修复片段”规则表。默认规则内嵌自
// rules/default.toml，也可通过配置文件替换；加载后只读，检测与修复共用同一份表。
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::detector::Language;
use crate::utils::error::ConfigError;

const DEFAULT_RULES: &str = include_str!("../../rules/default.toml");

static BUILTIN_RULES: Lazy<RuleTable> = Lazy::new(|| {
    RuleTable::from_toml_str(DEFAULT_RULES).expect("embedded rules/default.toml is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub pattern: String,
    pub fix: String,
}

/// Language keyed, ordered rule lists. Order is the file order and decides
/// the sequence of substitutions when a fix is built.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: HashMap<Language, Vec<Rule>>,
}

#[derive(Debug, Deserialize)]
struct RuleFile {
    #[serde(default)]
    rule: Vec<RuleEntry>,
}

#[derive(Debug, Deserialize)]
struct RuleEntry {
    language: String,
    pattern: String,
    fix: String,
}

impl RuleTable {
    pub fn builtin() -> Self {
        BUILTIN_RULES.clone()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: RuleFile = toml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse rule table: {}", e)))?;

        let mut table = RuleTable::default();
        for entry in file.rule {
            let language = Language::from_tag(&entry.language);
            if language == Language::Unknown {
                return Err(ConfigError::Invalid(format!(
                    "rule for unsupported language '{}'",
                    entry.language
                )));
            }
            if entry.pattern.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "empty pattern in {} rules",
                    language
                )));
            }
            table.push(language, Rule { pattern: entry.pattern, fix: entry.fix });
        }
        Ok(table)
    }

    pub fn push(&mut self, language: Language, rule: Rule) {
        self.rules.entry(language).or_default().push(rule);
    }

    pub fn rules_for(&self, language: Language) -> &[Rule] {
        self.rules.get(&language).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_rules(&self, language: Language) -> bool {
        !self.rules_for(language).is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
