//! Configuration types for blog generation and research conversion.
//!
//! All run behaviour is controlled through [`CrewConfig`], built via its
//! [`CrewConfigBuilder`]. Every knob lives in one struct so a CLI invocation,
//! a test and a library caller all describe a run the same way.

use crate::error::ContentCrewError;
use crate::llm::LanguageModel;
use crate::progress::ProgressCallback;
use edgequake_llm::LLMProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

/// Default Gemini model used when no model is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Environment variable holding the Google API credential.
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Configuration for a content-crew run.
///
/// Built via [`CrewConfig::builder()`] or using [`CrewConfig::default()`].
///
/// # Example
/// ```rust
/// use content_crew::{CrewConfig, OutputFormat};
///
/// let config = CrewConfig::builder()
///     .model("gemini-2.0-flash")
///     .output_format(OutputFormat::Html)
///     .translate(false)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct CrewConfig {
    /// LLM model identifier. Default: `gemini-2.0-flash`.
    pub model: Option<String>,

    /// LLM provider name (e.g. "gemini", "openai", "ollama").
    /// If None, Gemini is used with the key from `GOOGLE_API_KEY`.
    pub provider_name: Option<String>,

    /// Pre-constructed edgequake provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Pre-constructed language model. Takes precedence over every provider setting.
    pub language_model: Option<Arc<dyn LanguageModel>>,

    /// Google API key. Falls back to the `GOOGLE_API_KEY` environment variable.
    pub api_key: Option<String>,

    /// Sampling temperature for agent calls. Default: 0.7.
    pub temperature: f32,

    /// Maximum tokens per LLM response. Default: 8192.
    pub max_tokens: usize,

    /// Directory that receives exported HTML/PDF files. Default: `exports`.
    pub output_dir: PathBuf,

    /// Which files to export. Default: [`OutputFormat::Both`].
    pub output_format: OutputFormat,

    /// Translate ingested research text to English before the agents run. Default: true.
    pub translate: bool,

    /// Brand guidelines text passed to the content-creation task.
    pub brand_guidelines: Option<String>,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Optional per-task progress callback.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for CrewConfig {
    fn default() -> Self {
        Self {
            model: None,
            provider_name: None,
            provider: None,
            language_model: None,
            api_key: None,
            temperature: 0.7,
            max_tokens: 8192,
            output_dir: PathBuf::from("exports"),
            output_format: OutputFormat::default(),
            translate: true,
            brand_guidelines: None,
            download_timeout_secs: 120,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for CrewConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrewConfig")
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field(
                "language_model",
                &self.language_model.as_ref().map(|m| m.model_name().to_string()),
            )
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("output_dir", &self.output_dir)
            .field("output_format", &self.output_format)
            .field("translate", &self.translate)
            .field("brand_guidelines", &self.brand_guidelines.as_ref().map(|b| b.len()))
            .finish()
    }
}

impl CrewConfig {
    /// Create a new builder for `CrewConfig`.
    pub fn builder() -> CrewConfigBuilder {
        CrewConfigBuilder {
            config: Self::default(),
        }
    }

    /// The model id to request, falling back to [`DEFAULT_MODEL`].
    pub fn model_or_default(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    /// API key from the config, else from `GOOGLE_API_KEY`. Empty values count as absent.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|k| !k.trim().is_empty())
    }
}

/// Builder for [`CrewConfig`].
pub struct CrewConfigBuilder {
    config: CrewConfig,
}

impl CrewConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn language_model(mut self, model: Arc<dyn LanguageModel>) -> Self {
        self.config.language_model = Some(model);
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    pub fn translate(mut self, v: bool) -> Self {
        self.config.translate = v;
        self
    }

    pub fn brand_guidelines(mut self, text: impl Into<String>) -> Self {
        self.config.brand_guidelines = Some(text.into());
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<CrewConfig, ContentCrewError> {
        let c = &self.config;
        if c.max_tokens == 0 {
            return Err(ContentCrewError::InvalidConfig(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        if c.output_dir.as_os_str().is_empty() {
            return Err(ContentCrewError::InvalidConfig(
                "output directory must not be empty".into(),
            ));
        }
        if let Some(ref m) = c.model {
            if m.trim().is_empty() {
                return Err(ContentCrewError::InvalidConfig(
                    "model id must not be blank".into(),
                ));
            }
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Which export files a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// PDF only.
    Pdf,
    /// HTML only.
    Html,
    /// Both PDF and HTML (default).
    #[default]
    Both,
}

impl OutputFormat {
    pub fn wants_pdf(self) -> bool {
        matches!(self, OutputFormat::Pdf | OutputFormat::Both)
    }

    pub fn wants_html(self) -> bool {
        matches!(self, OutputFormat::Html | OutputFormat::Both)
    }
}

impl FromStr for OutputFormat {
    type Err = ContentCrewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(OutputFormat::Pdf),
            "html" => Ok(OutputFormat::Html),
            "both" => Ok(OutputFormat::Both),
            other => Err(ContentCrewError::InvalidConfig(format!(
                "unknown output format '{other}' (expected pdf, html or both)"
            ))),
        }
    }
}
