//! Translation: Hindi/Devanagari → English via the language model.
//!
//! Translation is best-effort. Any failure (provider error, empty answer)
//! is logged and the input comes back unchanged, so a flaky translation call
//! never stops a conversion.

use crate::llm::LanguageModel;
use crate::prompts::translation_prompt;
use tracing::{info, warn};

/// Translate `text` to English, returning the model's answer verbatim.
///
/// Returns `text` unchanged when the model call fails or `text` is blank.
pub async fn translate_to_english(model: &dyn LanguageModel, text: &str) -> String {
    if text.trim().is_empty() {
        return text.to_string();
    }

    info!("Translating {} chars with {}", text.len(), model.model_name());
    match model.complete(None, &translation_prompt(text)).await {
        Ok(completion) => completion.text,
        Err(e) => {
            warn!("Translation failed, keeping original text — {}", e);
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::test_support::ScriptedModel;

    #[tokio::test]
    async fn returns_translation() {
        let model = ScriptedModel::new(vec![Ok("Hello world")]);
        let out = translate_to_english(model.as_ref(), "नमस्ते दुनिया").await;
        assert_eq!(out, "Hello world");
        let calls = model.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].0.is_none());
        assert!(calls[0].1.contains("नमस्ते दुनिया"));
    }

    #[tokio::test]
    async fn failure_returns_input_unchanged() {
        let model = ScriptedModel::new(vec![Err("connection reset")]);
        let input = "=== Page 1 ===\nनमस्ते";
        assert_eq!(translate_to_english(model.as_ref(), input).await, input);
    }

    #[tokio::test]
    async fn blank_input_skips_the_model() {
        let model = ScriptedModel::new(vec![]);
        assert_eq!(translate_to_english(model.as_ref(), "  \n").await, "  \n");
        assert!(model.calls().is_empty());
    }
}
