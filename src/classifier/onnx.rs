// 中文说明：
// OnnxClassifier（需启用 `onnx` 特性）：加载导出的序列分类模型（如 CodeBERTa）
// 目录中的 model.onnx 与 tokenizer.json，分词截断到 max_tokens 后做一次前向推理，
// 返回第一个输出张量（logits）。模型加载后只读，可在多个线程间共享。
use ndarray::Array2;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use std::path::Path;
use tokenizers::{Tokenizer, TruncationParams};

use crate::classifier::Classifier;
use crate::utils::error::ClassifierError;

pub const MODEL_FILE: &str = "model.onnx";
pub const TOKENIZER_FILE: &str = "tokenizer.json";

pub struct OnnxClassifier {
    session: Session,
    tokenizer: Tokenizer,
}

impl OnnxClassifier {
    pub fn load(model_dir: &Path, max_tokens: usize) -> Result<Self, ClassifierError> {
        let tokenizer_path = model_dir.join(TOKENIZER_FILE);
        let model_path = model_dir.join(MODEL_FILE);

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(|e| ClassifierError::Load {
            path: tokenizer_path.clone(),
            message: e.to_string(),
        })?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: max_tokens,
                ..Default::default()
            }))
            .map_err(|e| ClassifierError::Load {
                path: tokenizer_path.clone(),
                message: e.to_string(),
            })?;
        tokenizer.with_padding(None);

        let session = Session::builder()
            .and_then(|b| b.with_optimization_level(GraphOptimizationLevel::Level3))
            .and_then(|b| b.commit_from_file(&model_path))
            .map_err(|e| ClassifierError::Load {
                path: model_path.clone(),
                message: e.to_string(),
            })?;

        Ok(Self { session, tokenizer })
    }
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> &str {
        "onnx"
    }

    fn logits(&self, code: &str) -> Result<Vec<f32>, ClassifierError> {
        if code.trim().is_empty() {
            return Err(ClassifierError::EmptyInput);
        }

        let encoding = self
            .tokenizer
            .encode(code, true)
            .map_err(|e| ClassifierError::Tokenization(e.to_string()))?;

        let ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let mask: Vec<i64> = encoding.get_attention_mask().iter().map(|&m| m as i64).collect();
        let len = ids.len();

        let inference = |e: &dyn std::fmt::Display| ClassifierError::Inference(e.to_string());
        let input_ids = Array2::from_shape_vec((1, len), ids).map_err(|e| inference(&e))?;
        let attention_mask = Array2::from_shape_vec((1, len), mask).map_err(|e| inference(&e))?;

        let inputs = ort::inputs![
            "input_ids" => input_ids,
            "attention_mask" => attention_mask,
        ]
        .map_err(|e| inference(&e))?;
        let outputs = self.session.run(inputs).map_err(|e| inference(&e))?;
        let logits = outputs[0].try_extract_tensor::<f32>().map_err(|e| inference(&e))?;

        Ok(logits.iter().copied().collect())
    }
}
