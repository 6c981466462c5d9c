//! Research workflow: PDF → cleaned (optionally translated) text → three-agent
//! extraction/creation/formatting run → exported HTML/PDF.
//!
//! Ingestion ([`ingest`]) is pure and needs no model, which is what the CLI
//! `inspect` command uses. [`convert_research`] adds translation, the agent
//! pipeline and export on top.

use crate::agents::{roster, Agent, SearchTool};
use crate::config::CrewConfig;
use crate::error::ContentCrewError;
use crate::export::{self, strip_markdown, ExportedFiles};
use crate::llm::{resolve_model, LanguageModel};
use crate::orchestrator::{Orchestrator, PipelineContext, Task};
use crate::pipeline::detect::{detect_encoding, EncodingGuess, EncodingReport};
use crate::pipeline::extract::extract_document;
use crate::pipeline::input::{load_input, PdfInput};
use crate::pipeline::normalize::normalize_text;
use crate::pipeline::repair::{repair_text_detailed, RepairStage};
use crate::pipeline::translate::translate_to_english;
use crate::prompts;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

/// Diagnostics for one page that yielded text.
#[derive(Debug, Clone, PartialEq)]
pub struct PageDiagnostics {
    /// Encoding guess and byte patterns of the raw page text.
    pub encoding: EncodingReport,
    /// Which repair stage produced the page's decoded text.
    pub repair: RepairStage,
    /// Characters left after cleanup.
    pub cleaned_chars: usize,
}

/// A PDF after extraction, repair and cleanup.
#[derive(Debug, Clone)]
pub struct IngestedDocument {
    pub origin: String,
    pub stem: String,
    /// Total pages in the PDF, including pages without text.
    pub page_count: usize,
    /// Raw page text, each page under a `=== Page N Raw ===` header.
    pub raw_text: String,
    /// Cleaned page text, each page under a `=== Page N ===` header.
    pub processed_text: String,
    pub pages: Vec<PageDiagnostics>,
    /// Encoding guess over all of `raw_text`.
    pub raw_encoding: EncodingGuess,
    /// Encoding guess over all of `processed_text`.
    pub processed_encoding: EncodingGuess,
}

/// Everything a research conversion produced.
#[derive(Debug, Clone)]
pub struct ResearchOutput {
    pub document: IngestedDocument,
    /// English translation of `processed_text`, when translation was on.
    pub translated_text: Option<String>,
    /// The formatter's final text.
    pub output: String,
    /// Directory the files were written to.
    pub export_dir: PathBuf,
    pub files: ExportedFiles,
}

impl ResearchOutput {
    /// The text the researcher agent searched.
    pub fn corpus(&self) -> &str {
        self.translated_text
            .as_deref()
            .unwrap_or(&self.document.processed_text)
    }
}

/// Extract every page, then repair, normalize and strip Markdown from each.
pub fn ingest(input: &PdfInput) -> Result<IngestedDocument, ContentCrewError> {
    let start = Instant::now();
    let doc = extract_document(&input.bytes, &input.origin)?;

    let mut raw_text = String::new();
    let mut processed_text = String::new();
    let mut pages = Vec::with_capacity(doc.pages.len());

    for page in &doc.pages {
        let _ = write!(raw_text, "\n=== Page {} Raw ===\n{}\n", page.number, page.text);

        let repaired = repair_text_detailed(&page.text);
        let cleaned = strip_markdown(&normalize_text(&repaired.text));
        debug!(
            "Page {}: {} raw chars, {} ({} chars after cleanup)",
            page.number,
            page.text.chars().count(),
            repaired.stage,
            cleaned.chars().count()
        );
        let _ = write!(processed_text, "\n=== Page {} ===\n{}\n", page.number, cleaned);

        pages.push(PageDiagnostics {
            encoding: EncodingReport::for_page(page.number, &page.bytes),
            repair: repaired.stage,
            cleaned_chars: cleaned.chars().count(),
        });
    }

    info!(
        "Ingested {} of {} pages from {} in {:?}",
        pages.len(),
        doc.page_count,
        input.origin,
        start.elapsed()
    );

    Ok(IngestedDocument {
        origin: input.origin.clone(),
        stem: input.stem.clone(),
        page_count: doc.page_count,
        raw_encoding: detect_encoding(raw_text.as_bytes()),
        processed_encoding: detect_encoding(processed_text.as_bytes()),
        raw_text,
        processed_text,
        pages,
    })
}

/// Load and ingest `input` without running any model.
pub async fn inspect(input: &str, config: &CrewConfig) -> Result<IngestedDocument, ContentCrewError> {
    let pdf = load_input(input, config.download_timeout_secs).await?;
    ingest(&pdf)
}

/// Document researcher → content creator → formatter.
pub fn research_tasks(brand_guidelines: Option<&str>) -> Vec<Task> {
    vec![
        Task::new(
            "research",
            prompts::RESEARCH_EXTRACTION_DESCRIPTION,
            roster::DOCUMENT_RESEARCHER,
            prompts::RESEARCH_EXTRACTION_EXPECTED_OUTPUT,
        ),
        Task::new(
            "content_creation",
            prompts::content_creation_description(brand_guidelines),
            roster::CONTENT_CREATOR,
            prompts::CONTENT_CREATION_EXPECTED_OUTPUT,
        ),
        Task::new(
            "formatting",
            prompts::FORMATTING_DESCRIPTION,
            roster::FORMATTER,
            prompts::FORMATTING_EXPECTED_OUTPUT,
        ),
    ]
}

/// Convert a research PDF (path or URL) with the model resolved from `config`.
///
/// # Errors
/// Input, PDF and provider errors, [`ContentCrewError::TaskFailed`] when an
/// agent fails (nothing is exported then) and
/// [`ContentCrewError::OutputWriteFailed`] when export fails.
pub async fn convert_research(
    input: &str,
    config: &CrewConfig,
) -> Result<ResearchOutput, ContentCrewError> {
    let model = resolve_model(config)?;
    convert_research_with_model(input, config, model).await
}

/// [`convert_research`] with an explicit model.
pub async fn convert_research_with_model(
    input: &str,
    config: &CrewConfig,
    model: Arc<dyn LanguageModel>,
) -> Result<ResearchOutput, ContentCrewError> {
    let pdf = load_input(input, config.download_timeout_secs).await?;
    let document = ingest(&pdf)?;

    let translated_text = if config.translate {
        Some(translate_to_english(model.as_ref(), &document.processed_text).await)
    } else {
        None
    };
    let corpus = translated_text
        .as_deref()
        .unwrap_or(&document.processed_text);

    let agents: Vec<Arc<dyn Agent>> = vec![
        Arc::new(roster::document_researcher(
            Arc::clone(&model),
            SearchTool::new(corpus),
        )),
        Arc::new(roster::content_creator(Arc::clone(&model))),
        Arc::new(roster::formatter(model)),
    ];

    let ctx = Orchestrator::new()
        .with_progress(config.progress_callback.clone())
        .run_with_context(
            research_tasks(config.brand_guidelines.as_deref()),
            &agents,
            PipelineContext::with_subject(document.stem.as_str()),
        )
        .await?;
    let output = crate::orchestrator::final_text(ctx)?;

    let stem = if config.translate {
        format!("{}_english", document.stem)
    } else {
        document.stem.clone()
    };
    let export_dir = config.output_dir.join(unix_timestamp().to_string());
    let files = export::export(&stem, &output, &export_dir, &stem, config.output_format)?;
    info!("Research conversion of {} complete", document.origin);

    Ok(ResearchOutput {
        document,
        translated_text,
        output,
        export_dir,
        files,
    })
}

/// Synchronous wrapper around [`convert_research`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_research_sync(
    input: &str,
    config: &CrewConfig,
) -> Result<ResearchOutput, ContentCrewError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ContentCrewError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert_research(input, config))
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
