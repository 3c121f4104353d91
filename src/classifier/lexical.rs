// 中文说明：
// LexicalClassifier：纯 Rust 的词袋线性分类器。用正则把代码切成 token（截断到
// max_tokens），对每个 token 查表累加各类别权重后取平均并加上偏置，得到 logits。
// 权重来自离线导出的 JSON 文件；未提供文件时为全零的“未训练”模型，argmax 恒为 0。
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::classifier::Classifier;
use crate::utils::error::ClassifierError;

static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z_][A-Za-z0-9_]*|[0-9]+|[^\sA-Za-z0-9_]").expect("token pattern is valid")
});

/// Split code into identifier, number and punctuation tokens, keeping at
/// most `max_tokens`.
pub fn tokenize(code: &str, max_tokens: usize) -> Result<Vec<&str>, ClassifierError> {
    let tokens: Vec<&str> = TOKEN_PATTERN
        .find_iter(code)
        .take(max_tokens)
        .map(|m| m.as_str())
        .collect();

    if tokens.is_empty() {
        return Err(ClassifierError::EmptyInput);
    }
    Ok(tokens)
}

#[derive(Debug, Deserialize)]
struct ModelFile {
    labels: Vec<String>,
    bias: Vec<f32>,
    #[serde(default)]
    weights: HashMap<String, Vec<f32>>,
}

#[derive(Debug, Clone)]
pub struct LexicalClassifier {
    labels: Vec<String>,
    bias: Vec<f32>,
    weights: HashMap<String, Vec<f32>>,
    max_tokens: usize,
}

impl LexicalClassifier {
    /// All-zero weights: every input scores a tie, so the verdict is 0.
    pub fn untrained(max_tokens: usize) -> Self {
        Self {
            labels: vec!["secure".to_string(), "vulnerable".to_string()],
            bias: vec![0.0, 0.0],
            weights: HashMap::new(),
            max_tokens,
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P, max_tokens: usize) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        let load_err = |message: String| ClassifierError::Load { path: path.to_path_buf(), message };

        let content = fs::read_to_string(path).map_err(|e| load_err(e.to_string()))?;
        Self::from_json_str(&content, max_tokens).map_err(|e| match e {
            ClassifierError::Load { message, .. } => load_err(message),
            other => other,
        })
    }

    pub fn from_json_str(content: &str, max_tokens: usize) -> Result<Self, ClassifierError> {
        let invalid = |message: String| ClassifierError::Load { path: Default::default(), message };

        let file: ModelFile = serde_json::from_str(content).map_err(|e| invalid(e.to_string()))?;
        let classes = file.labels.len();
        if classes < 2 {
            return Err(invalid(format!("expected at least 2 labels, found {}", classes)));
        }
        if file.bias.len() != classes {
            return Err(invalid(format!(
                "bias has {} entries for {} labels",
                file.bias.len(),
                classes
            )));
        }
        if let Some((token, row)) = file.weights.iter().find(|(_, row)| row.len() != classes) {
            return Err(invalid(format!(
                "weights for '{}' have {} entries for {} labels",
                token,
                row.len(),
                classes
            )));
        }

        Ok(Self {
            labels: file.labels,
            bias: file.bias,
            weights: file.weights,
            max_tokens,
        })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }
}

impl Classifier for LexicalClassifier {
    fn name(&self) -> &str {
        "lexical"
    }

    fn logits(&self, code: &str) -> Result<Vec<f32>, ClassifierError> {
        let tokens = tokenize(code, self.max_tokens)?;

        let mut scores = vec![0.0f32; self.labels.len()];
        for token in &tokens {
            if let Some(row) = self.weights.get(*token) {
                for (score, w) in scores.iter_mut().zip(row) {
                    *score += w;
                }
            }
        }

        let n = tokens.len() as f32;
        Ok(scores
            .into_iter()
            .zip(&self.bias)
            .map(|(sum, b)| sum / n + b)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MODEL: &str = r#"{
        "labels": ["secure", "vulnerable"],
        "bias": [0.1, 0.0],
        "weights": {
            "system": [0.0, 2.0],
            "popen": [0.0, 2.0],
            "print": [0.5, 0.0]
        }
    }"#;

    #[test]
    fn tokenizer_splits_and_truncates() {
        let tokens = tokenize("x1 = foo(42);", 512).unwrap();
        assert_eq!(tokens, vec!["x1", "=", "foo", "(", "42", ")", ";"]);

        let tokens = tokenize("a b c d e", 3).unwrap();
        assert_eq!(tokens, vec!["a", "b", "c"]);
    }

    #[test]
    fn blank_input_cannot_be_tokenized() {
        assert!(matches!(tokenize("", 512), Err(ClassifierError::EmptyInput)));
        assert!(matches!(tokenize(" \n\t ", 512), Err(ClassifierError::EmptyInput)));
    }

    #[test]
    fn untrained_model_abstains_to_secure() {
        let model = LexicalClassifier::untrained(512);
        assert_eq!(model.logits("print('Hello, World!')").unwrap(), vec![0.0, 0.0]);
        assert_eq!(model.predict("print('Hello, World!')").unwrap(), 0);
    }

    #[test]
    fn weighted_tokens_move_the_prediction() {
        let model = LexicalClassifier::from_json_str(MODEL, 512).unwrap();
        assert_eq!(model.predict("os.system(cmd)").unwrap(), 1);
        assert_eq!(model.predict("print(x)").unwrap(), 0);
    }

    #[test]
    fn truncation_hides_late_tokens() {
        let model = LexicalClassifier::from_json_str(MODEL, 2).unwrap();
        // Only "x" and "=" are scored, so the bias decides.
        assert_eq!(model.predict("x = system()").unwrap(), 0);
    }

    #[test]
    fn malformed_models_fail_to_load() {
        let one_label = r#"{"labels": ["only"], "bias": [0.0]}"#;
        assert!(LexicalClassifier::from_json_str(one_label, 512).is_err());

        let bad_bias = r#"{"labels": ["a", "b"], "bias": [0.0]}"#;
        assert!(LexicalClassifier::from_json_str(bad_bias, 512).is_err());

        let bad_row = r#"{"labels": ["a", "b"], "bias": [0.0, 0.0], "weights": {"x": [1.0]}}"#;
        assert!(LexicalClassifier::from_json_str(bad_row, 512).is_err());
    }

    #[test]
    fn loads_from_disk_and_reports_the_path_on_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, MODEL).unwrap();
        let model = LexicalClassifier::from_file(&path, 64).unwrap();
        assert_eq!(model.labels().len(), 2);
        assert_eq!(model.max_tokens(), 64);

        let missing = dir.path().join("nope.json");
        match LexicalClassifier::from_file(&missing, 64) {
            Err(ClassifierError::Load { path, .. }) => assert_eq!(path, missing),
            other => panic!("unexpected {other:?}"),
        }
    }
}
