//! Language-model seam: a narrow completion trait plus its edgequake adapter.
//!
//! Agents, the translation stage and content analysis only ever need "send a
//! system prompt and a user prompt, get text back". [`LanguageModel`] is that
//! contract. [`ProviderModel`] implements it over any
//! [`edgequake_llm::LLMProvider`], and tests substitute a scripted model.

use crate::config::{CrewConfig, API_KEY_ENV};
use crate::error::{AgentError, ContentCrewError};
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, GeminiProvider, LLMProvider, ProviderFactory};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Text returned by a model, with token accounting when the provider reports it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
}

impl Completion {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// A chat-completion capable model.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Identifier of the underlying model, for logs.
    fn model_name(&self) -> &str;

    /// Complete `prompt`, optionally preceded by a system message.
    async fn complete(&self, system: Option<&str>, prompt: &str)
        -> Result<Completion, AgentError>;
}

/// [`LanguageModel`] over an edgequake provider.
pub struct ProviderModel {
    provider: Arc<dyn LLMProvider>,
    model: String,
    temperature: f32,
    max_tokens: usize,
}

impl ProviderModel {
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        model: impl Into<String>,
        temperature: f32,
        max_tokens: usize,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
            max_tokens,
        }
    }

    fn options(&self) -> CompletionOptions {
        CompletionOptions {
            temperature: Some(self.temperature),
            max_tokens: Some(self.max_tokens),
            ..Default::default()
        }
    }
}

#[async_trait]
impl LanguageModel for ProviderModel {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(
        &self,
        system: Option<&str>,
        prompt: &str,
    ) -> Result<Completion, AgentError> {
        let start = Instant::now();
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(prompt));

        let response = self
            .provider
            .chat(&messages, Some(&self.options()))
            .await
            .map_err(|e| AgentError::Llm {
                detail: e.to_string(),
            })?;

        debug!(
            "{}: {} input tokens, {} output tokens, {:?}",
            self.model,
            response.prompt_tokens,
            response.completion_tokens,
            start.elapsed()
        );

        if response.content.trim().is_empty() {
            return Err(AgentError::EmptyResponse);
        }

        Ok(Completion {
            text: response.content,
            prompt_tokens: response.prompt_tokens,
            completion_tokens: response.completion_tokens,
        })
    }
}

// ── Resolution ───────────────────────────────────────────────────────────────

fn create_provider(provider_name: &str, model: &str) -> Result<Arc<dyn LLMProvider>, ContentCrewError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        ContentCrewError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

/// Gemini provider authenticated with `api_key`.
///
/// The key goes straight into the provider; the process environment is never
/// touched.
fn gemini_provider(api_key: &str, model: &str) -> Arc<dyn LLMProvider> {
    Arc::new(GeminiProvider::new(api_key).with_model(model))
}

/// Resolve the language model, from most-specific to least-specific:
///
/// 1. **Pre-built model** (`config.language_model`), used as-is.
/// 2. **Pre-built provider** (`config.provider`), wrapped in a [`ProviderModel`].
/// 3. **Named provider** (`config.provider_name`) plus the configured model.
/// 4. **Environment pair** `EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL`.
/// 5. **Gemini** with the key from `config.api_key` or `GOOGLE_API_KEY`.
///
/// Nothing configured yields [`ContentCrewError::ProviderNotConfigured`].
pub fn resolve_model(config: &CrewConfig) -> Result<Arc<dyn LanguageModel>, ContentCrewError> {
    if let Some(ref model) = config.language_model {
        return Ok(Arc::clone(model));
    }

    let wrap = |provider: Arc<dyn LLMProvider>, model: &str| -> Arc<dyn LanguageModel> {
        Arc::new(ProviderModel::new(
            provider,
            model,
            config.temperature,
            config.max_tokens,
        ))
    };

    if let Some(ref provider) = config.provider {
        return Ok(wrap(Arc::clone(provider), config.model_or_default()));
    }

    if let Some(ref name) = config.provider_name {
        let model = config.model_or_default();
        return Ok(wrap(create_provider(name, model)?, model));
    }

    if let (Ok(prov), Ok(model)) = (
        std::env::var("EDGEQUAKE_LLM_PROVIDER"),
        std::env::var("EDGEQUAKE_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            return Ok(wrap(create_provider(&prov, &model)?, &model));
        }
    }

    if let Some(key) = config.resolved_api_key() {
        let model = config.model_or_default();
        return Ok(wrap(gemini_provider(&key, model), model));
    }

    Err(ContentCrewError::ProviderNotConfigured {
        provider: "gemini".to_string(),
        hint: format!(
            "Set {API_KEY_ENV}, pass --api-key, or choose a provider with \
             EDGEQUAKE_LLM_PROVIDER + EDGEQUAKE_MODEL."
        ),
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// One recorded call: (system prompt, user prompt).
    pub type Call = (Option<String>, String);

    /// Replays scripted answers in order and records every prompt it receives.
    /// `Err` entries become [`AgentError::Llm`]; running out of answers too.
    pub struct ScriptedModel {
        answers: Mutex<VecDeque<Result<String, String>>>,
        calls: Mutex<Vec<Call>>,
    }

    impl ScriptedModel {
        pub fn new(answers: Vec<Result<&str, &str>>) -> Arc<Self> {
            Arc::new(Self {
                answers: Mutex::new(
                    answers
                        .into_iter()
                        .map(|a| a.map(str::to_string).map_err(str::to_string))
                        .collect(),
                ),
                calls: Mutex::new(Vec::new()),
            })
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LanguageModel for ScriptedModel {
        fn model_name(&self) -> &str {
            "scripted"
        }

        async fn complete(
            &self,
            system: Option<&str>,
            prompt: &str,
        ) -> Result<Completion, AgentError> {
            self.calls
                .lock()
                .unwrap()
                .push((system.map(str::to_string), prompt.to_string()));
            match self.answers.lock().unwrap().pop_front() {
                Some(Ok(text)) => Ok(Completion::text(text)),
                Some(Err(detail)) => Err(AgentError::Llm { detail }),
                None => Err(AgentError::Llm {
                    detail: "script exhausted".to_string(),
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::ScriptedModel;
    use super::*;

    #[test]
    fn prebuilt_model_wins() {
        let scripted = ScriptedModel::new(vec![]);
        let config = CrewConfig::builder()
            .language_model(scripted)
            .build()
            .unwrap();
        let model = resolve_model(&config).unwrap();
        assert_eq!(model.model_name(), "scripted");
    }

    #[test]
    fn gemini_provider_carries_model() {
        let provider = gemini_provider("configured-key", "gemini-2.5-flash");
        assert_eq!(provider.name(), "gemini");
        assert_eq!(provider.model(), "gemini-2.5-flash");
    }

    #[test]
    fn configured_key_resolves_gemini_without_env_write() {
        if std::env::var("EDGEQUAKE_LLM_PROVIDER").is_ok() {
            return;
        }
        let before = std::env::var("GEMINI_API_KEY").ok();
        let config = CrewConfig::builder()
            .api_key("configured-key")
            .model("gemini-2.5-flash")
            .build()
            .unwrap();
        let model = resolve_model(&config).unwrap();
        assert_eq!(model.model_name(), "gemini-2.5-flash");
        assert_eq!(std::env::var("GEMINI_API_KEY").ok(), before);
    }

    #[tokio::test]
    async fn scripted_model_replays_and_records() {
        let model = ScriptedModel::new(vec![Ok("first"), Err("boom")]);
        let a = model.complete(Some("sys"), "one").await.unwrap();
        assert_eq!(a.text, "first");
        let b = model.complete(None, "two").await.unwrap_err();
        assert_eq!(b, AgentError::Llm { detail: "boom".into() });
        assert!(model.complete(None, "three").await.is_err());
        let calls = model.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], (Some("sys".to_string()), "one".to_string()));
    }
}
