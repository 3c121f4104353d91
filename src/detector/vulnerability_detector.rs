// 中文说明：
// VulnerabilityDetector 是检测编排器：先做规则表子串匹配，命中即判定为 Vulnerable
// 且不调用分类器；未命中时交给分类器，取 logits 的 argmax 作为判定；
// 分词/推理出错则返回 Error（-1）并记录日志，不重试。
use std::sync::Arc;

use tracing::error;

use crate::analyzer::Verdict;
use crate::classifier::{argmax, Classifier};
use crate::detector::{Language, PatternDetector, RuleTable};
use crate::utils::error::ClassifierError;
use crate::utils::logger::{log_model_decision, log_rule_hit};

pub struct VulnerabilityDetector {
    rules: RuleTable,
    classifier: Arc<dyn Classifier>,
}

impl VulnerabilityDetector {
    pub fn new(rules: RuleTable, classifier: Arc<dyn Classifier>) -> Self {
        Self { rules, classifier }
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn detect(&self, code: &str, language: Language) -> Verdict {
        if let Some(rule) = PatternDetector::new(&self.rules).first_match(code, language) {
            log_rule_hit(language, &rule.pattern);
            return Verdict::Vulnerable;
        }

        match self.classify(code) {
            Ok(label) => Verdict::from_label(label),
            Err(e) => {
                error!("Error analyzing code snippet: {}", e);
                Verdict::Error
            }
        }
    }

    fn classify(&self, code: &str) -> Result<usize, ClassifierError> {
        let logits = self.classifier.logits(code)?;
        let label = argmax(&logits)?;
        log_model_decision(self.classifier.name(), &logits, label);
        Ok(label)
    }
}
