//! Black-box sequence classifiers.
//!
//! A classifier turns raw code text into one score per output class
//! (index 0 = secure, 1 = vulnerable). The detector only ever takes the
//! argmax; nothing here knows about rules or languages.

pub mod lexical;
#[cfg(feature = "onnx")]
pub mod onnx;

pub use lexical::LexicalClassifier;
#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;

use std::sync::Arc;

use tracing::info;

use crate::utils::config::{ModelBackend, ModelConfig};
use crate::utils::error::ClassifierError;

/// A loaded model, shared read-only across workers.
pub trait Classifier: Send + Sync {
    fn name(&self) -> &str;

    /// Raw per-class scores for `code`.
    fn logits(&self, code: &str) -> Result<Vec<f32>, ClassifierError>;

    fn predict(&self, code: &str) -> Result<usize, ClassifierError> {
        argmax(&self.logits(code)?)
    }
}

/// Index of the highest score; ties resolve to the lowest index.
pub fn argmax(logits: &[f32]) -> Result<usize, ClassifierError> {
    if logits.is_empty() {
        return Err(ClassifierError::NoOutput);
    }
    if logits.iter().any(|v| !v.is_finite()) {
        return Err(ClassifierError::NonFinite);
    }

    let mut best = 0;
    for (i, &score) in logits.iter().enumerate().skip(1) {
        if score > logits[best] {
            best = i;
        }
    }
    Ok(best)
}

pub fn load_classifier(config: &ModelConfig) -> Result<Arc<dyn Classifier>, ClassifierError> {
    let classifier: Arc<dyn Classifier> = match config.backend {
        ModelBackend::Lexical => match &config.path {
            Some(path) => Arc::new(LexicalClassifier::from_file(path, config.max_tokens)?),
            None => Arc::new(LexicalClassifier::untrained(config.max_tokens)),
        },
        ModelBackend::Onnx => load_onnx(config)?,
    };

    info!("Model and tokenizer loaded successfully ({})", classifier.name());
    Ok(classifier)
}

#[cfg(feature = "onnx")]
fn load_onnx(config: &ModelConfig) -> Result<Arc<dyn Classifier>, ClassifierError> {
    let dir = config.path.as_deref().ok_or_else(|| ClassifierError::Load {
        path: Default::default(),
        message: "the onnx backend needs a model directory".into(),
    })?;
    Ok(Arc::new(OnnxClassifier::load(dir, config.max_tokens)?))
}

#[cfg(not(feature = "onnx"))]
fn load_onnx(config: &ModelConfig) -> Result<Arc<dyn Classifier>, ClassifierError> {
    Err(ClassifierError::Load {
        path: config.path.clone().unwrap_or_default(),
        message: "this build does not include the onnx backend (enable the `onnx` feature)".into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argmax_picks_highest_and_breaks_ties_low() {
        assert_eq!(argmax(&[0.1, 0.9]).unwrap(), 1);
        assert_eq!(argmax(&[0.9, 0.1]).unwrap(), 0);
        assert_eq!(argmax(&[0.5, 0.5]).unwrap(), 0);
        assert_eq!(argmax(&[-3.0, -1.0, -2.0]).unwrap(), 1);
    }

    #[test]
    fn argmax_rejects_degenerate_output() {
        assert!(matches!(argmax(&[]), Err(ClassifierError::NoOutput)));
        assert!(matches!(argmax(&[1.0, f32::INFINITY]), Err(ClassifierError::NonFinite)));
    }

    #[test]
    fn default_config_loads_the_untrained_lexical_model() {
        let classifier = load_classifier(&ModelConfig::default()).unwrap();
        assert_eq!(classifier.name(), "lexical");
        assert_eq!(classifier.predict("print('Hello, World!')").unwrap(), 0);
    }

    #[cfg(not(feature = "onnx"))]
    #[test]
    fn onnx_backend_requires_the_feature() {
        let config = ModelConfig {
            backend: ModelBackend::Onnx,
            path: Some("models/codeberta".into()),
            ..ModelConfig::default()
        };
        assert!(matches!(load_classifier(&config), Err(ClassifierError::Load { .. })));
    }
}
