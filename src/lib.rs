//! # content-crew
//!
//! Generate blog posts and convert research PDFs with a sequential
//! multi-agent LLM pipeline, then export the result as HTML and PDF.
//!
//! ## Why this crate?
//!
//! Text pulled out of Hindi research PDFs often arrives as mojibake: the
//! Devanagari was decoded as Latin-1 somewhere along the way. Before any model
//! sees the text, the ingestion pipeline detects and undoes that damage, so
//! the agents work on readable text instead of `Ã‰Ãº` noise.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input      resolve local file or download from URL
//!  ├─ 2. Extract    per-page text via lopdf
//!  ├─ 3. Detect     statistical encoding guess (chardet)
//!  ├─ 4. Repair     Devanagari substitution table → ISCII → codec cascade
//!  ├─ 5. Normalize  control chars, whitespace, mojibake artifacts
//!  ├─ 6. Translate  optional, best-effort, via the language model
//!  ├─ 7. Agents     researcher → content creator → formatter, in order
//!  └─ 8. Export     HTML and/or PDF, written atomically
//! ```
//!
//! The blog workflow skips steps 1–6 and runs research → NLP → writing agents
//! over a [`BlogBrief`](workflows::blog::BlogBrief).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use content_crew::{convert_research, CrewConfig, OutputFormat};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Gemini with the key from GOOGLE_API_KEY
//!     let config = CrewConfig::builder()
//!         .output_format(OutputFormat::Both)
//!         .build()?;
//!     let output = convert_research("paper.pdf", &config).await?;
//!     for path in output.files.paths() {
//!         eprintln!("wrote {}", path.display());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `content-crew` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! content-crew = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod agents;
pub mod config;
pub mod error;
pub mod export;
pub mod llm;
pub mod orchestrator;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod workflows;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use agents::{Agent, AgentProfile, LlmAgent, SearchTool};
pub use config::{CrewConfig, CrewConfigBuilder, OutputFormat};
pub use error::{AgentError, ContentCrewError};
pub use export::ExportedFiles;
pub use llm::{resolve_model, Completion, LanguageModel, ProviderModel};
pub use orchestrator::{Orchestrator, PipelineContext, Task, TaskOutput};
pub use pipeline::detect::{detect_encoding, EncodingGuess};
pub use pipeline::normalize::normalize_text;
pub use pipeline::repair::{repair_bytes, repair_text};
pub use pipeline::translate::translate_to_english;
pub use progress::{NoopProgressCallback, PipelineProgressCallback, ProgressCallback};
pub use workflows::blog::{
    analyze_content, check_plagiarism, export_blog, generate_blog, BlogBrief, BlogSession,
    PlagiarismReport,
};
pub use workflows::research::{
    convert_research, convert_research_sync, convert_research_with_model, inspect,
    IngestedDocument, ResearchOutput,
};
