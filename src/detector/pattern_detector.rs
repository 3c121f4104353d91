// 中文说明：
// PatternDetector 对源码做纯子串匹配（区分大小写），找出规则表中命中的危险调用，
// 为“规则短路”检测与修复建议提供共同的初筛能力。
use tracing::debug;

use crate::detector::{Language, Rule, RuleTable};

pub struct PatternDetector<'a> {
    table: &'a RuleTable,
}

impl<'a> PatternDetector<'a> {
    pub fn new(table: &'a RuleTable) -> Self {
        Self { table }
    }

    /// First rule, in table order, whose pattern occurs in `code`.
    pub fn first_match(&self, code: &str, language: Language) -> Option<&'a Rule> {
        self.table
            .rules_for(language)
            .iter()
            .find(|rule| code.contains(rule.pattern.as_str()))
    }

    /// Every rule whose pattern occurs in `code`, in table order.
    pub fn matches(&self, code: &str, language: Language) -> Vec<&'a Rule> {
        let hits: Vec<&Rule> = self
            .table
            .rules_for(language)
            .iter()
            .filter(|rule| code.contains(rule.pattern.as_str()))
            .collect();

        debug!("Pattern scan ({}) matched {} rule(s)", language, hits.len());
        hits
    }
}
