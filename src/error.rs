//! Error types for the content-crew library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ContentCrewError`] — **Fatal**: the run cannot produce a result
//!   (bad input file, unparseable PDF, provider not configured, a pipeline
//!   task failed). Returned as `Err(ContentCrewError)` from the workflow
//!   entry points.
//!
//! * [`AgentError`] — a single language-model call or agent execution
//!   failed. The orchestrator wraps it into [`ContentCrewError::TaskFailed`];
//!   the translation stage swallows it and keeps the untranslated text.
//!
//! Decode problems never show up here: the repair stage always falls back to
//! a lossy UTF-8 decode.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the content-crew library.
#[derive(Debug, Error)]
pub enum ContentCrewError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The file exists and was read, but is not a PDF.
    #[error("Input is not a valid PDF: '{origin}'\nFirst bytes: {magic:?}")]
    NotAPdf { origin: String, magic: Vec<u8> },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF structure is corrupt and cannot be parsed.
    #[error("PDF '{origin}' could not be parsed: {detail}")]
    CorruptPdf { origin: String, detail: String },

    /// The PDF parsed but no page yielded any text.
    #[error("PDF '{origin}' contains no extractable text ({pages} pages scanned)")]
    NoExtractableText { origin: String, pages: usize },

    // ── LLM errors ────────────────────────────────────────────────────────
    /// The configured provider is not initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// A direct (non-pipeline) LLM call failed.
    #[error("LLM API error: {message}")]
    LlmApiError { message: String },

    // ── Pipeline errors ───────────────────────────────────────────────────
    /// A pipeline task failed; the whole run was aborted.
    #[error("Task {index} '{task}' ({role}) failed: {detail}")]
    TaskFailed {
        index: usize,
        task: String,
        role: String,
        detail: String,
    },

    /// A task names an agent role that was not supplied to the run.
    #[error("Task '{task}' is assigned to unknown agent role '{role}'")]
    UnknownAgent { task: String, role: String },

    /// `run` was called with no tasks.
    #[error("Pipeline has no tasks to run")]
    EmptyPipeline,

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an exported HTML/PDF file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The PDF exporter could not serialise the document.
    #[error("Failed to render PDF '{path}': {detail}")]
    PdfRenderFailed { path: PathBuf, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder or brief validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A failed language-model call or agent execution.
#[derive(Debug, Clone, Error, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AgentError {
    /// The provider returned an error (network, auth, quota, bad request).
    #[error("language model call failed: {detail}")]
    Llm { detail: String },

    /// The provider answered, but with no text.
    #[error("language model returned an empty response")]
    EmptyResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_failed_display() {
        let e = ContentCrewError::TaskFailed {
            index: 2,
            task: "nlp".into(),
            role: "NLP Specialist".into(),
            detail: "quota exceeded".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("Task 2 'nlp'"), "got: {msg}");
        assert!(msg.contains("NLP Specialist"));
        assert!(msg.contains("quota exceeded"));
    }

    #[test]
    fn unknown_agent_display() {
        let e = ContentCrewError::UnknownAgent {
            task: "writing".into(),
            role: "Editor".into(),
        };
        assert!(e.to_string().contains("'Editor'"));
    }

    #[test]
    fn provider_not_configured_carries_hint() {
        let e = ContentCrewError::ProviderNotConfigured {
            provider: "gemini".into(),
            hint: "Set GOOGLE_API_KEY".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("gemini"));
        assert!(msg.contains("GOOGLE_API_KEY"));
    }

    #[test]
    fn agent_error_display() {
        let e = AgentError::Llm {
            detail: "HTTP 503".into(),
        };
        assert!(e.to_string().contains("HTTP 503"));
        assert_eq!(
            AgentError::EmptyResponse.to_string(),
            "language model returned an empty response"
        );
    }
}
