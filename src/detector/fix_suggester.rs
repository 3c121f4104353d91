// 中文说明：
// 修复建议：仅由规则表驱动。对原始代码中出现的每个危险子串（按表顺序），
// 在工作副本中做全量字面替换；修复片段若含有其他规则的子串会被再次替换，
// 这是可接受的边界情况。无规则语言（含 unknown）一律返回 None。
use tracing::info;

use crate::detector::{Language, PatternDetector, RuleTable};
use crate::utils::logger::log_fix_applied;

pub fn suggest_fix(table: &RuleTable, code: &str, language: Language) -> Option<String> {
    if !table.has_rules(language) {
        info!("No fixes available for language: {}", language);
        return None;
    }

    let hits = PatternDetector::new(table).matches(code, language);
    if hits.is_empty() {
        return None;
    }

    let mut fixed = code.to_string();
    for rule in hits {
        log_fix_applied(&rule.pattern, &rule.fix);
        fixed = fixed.replace(rule.pattern.as_str(), &rule.fix);
    }
    Some(fixed)
}
