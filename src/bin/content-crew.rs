//! CLI binary for content-crew.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `CrewConfig` and prints results.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use content_crew::workflows::blog::{
    Audience, BlogBrief, BlogType, ContentGoal, Industry, Tone, DEFAULT_WORDS,
};
use content_crew::workflows::research::IngestedDocument;
use content_crew::{
    convert_research, generate_blog, inspect, resolve_model, CrewConfig, ExportedFiles,
    OutputFormat, PipelineProgressCallback, ProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar over the pipeline's tasks plus a log
/// line per finished task.
struct CliProgressCallback {
    bar: ProgressBar,
    started: Mutex<Option<Instant>>,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:30.green/238}] {pos}/{len} tasks  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Agents");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            started: Mutex::new(None),
        })
    }

    fn task_elapsed(&self) -> f64 {
        self.started
            .lock()
            .ok()
            .and_then(|mut s| s.take())
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl PipelineProgressCallback for CliProgressCallback {
    fn on_pipeline_start(&self, total_tasks: usize) {
        self.bar.set_length(total_tasks as u64);
        self.bar.set_position(0);
        self.bar.reset_eta();
    }

    fn on_task_start(&self, _index: usize, _total: usize, task: &str, role: &str) {
        if let Ok(mut s) = self.started.lock() {
            *s = Some(Instant::now());
        }
        self.bar.set_message(format!("{role}: {task}"));
    }

    fn on_task_complete(&self, index: usize, total: usize, task: &str, output_len: usize) {
        let elapsed = self.task_elapsed();
        self.bar.println(format!(
            "  {} Task {}/{}  {:<18}  {}  {}",
            green("✓"),
            index,
            total,
            task,
            dim(&format!("{output_len:>6} chars")),
            dim(&format!("{elapsed:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_task_error(&self, index: usize, total: usize, task: &str, error: &str) {
        let elapsed = self.task_elapsed();
        let msg = if error.chars().count() > 80 {
            format!("{}\u{2026}", error.chars().take(79).collect::<String>())
        } else {
            error.to_string()
        };
        self.bar.println(format!(
            "  {} Task {}/{}  {:<18}  {}  {}",
            red("✗"),
            index,
            total,
            task,
            red(&msg),
            dim(&format!("{elapsed:.1}s")),
        ));
    }

    fn on_pipeline_complete(&self, total: usize, completed: usize) {
        self.bar.finish_and_clear();
        if completed == total {
            eprintln!("{} {} tasks completed", green("✔"), bold(&total.to_string()));
        } else {
            eprintln!(
                "{} {}/{} tasks completed",
                red("✘"),
                bold(&completed.to_string()),
                total
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Blog post with defaults (1000 words, HTML + PDF in ./exports)
  content-crew blog "Soil health for small farms"

  # Tailored brief, then analysis and plagiarism check
  content-crew blog "Rust ownership" --audience engineer --tone technical \
      --blog-type "technical tutorial" --words 1500 --analyze --plagiarism

  # Convert a Hindi research PDF, translated to English
  content-crew research paper.pdf

  # Keep the original language, HTML only, with brand guidelines
  content-crew research paper.pdf --no-translate --format html \
      --brand-guidelines brand.txt

  # Encoding diagnostics without calling any model
  content-crew inspect paper.pdf --show-text

ENVIRONMENT VARIABLES:
  GOOGLE_API_KEY          Google API key (Gemini, the default provider)
  EDGEQUAKE_LLM_PROVIDER  Override provider (openai, anthropic, gemini, ollama)
  EDGEQUAKE_MODEL         Override model ID
  RUST_LOG                Log filter, e.g. content_crew=debug

When no provider is configured, the API key is asked for on stdin.
"#;

/// Generate blog posts and convert research PDFs with LLM agents.
#[derive(Parser, Debug)]
#[command(
    name = "content-crew",
    version,
    about = "Generate blog posts and convert research PDFs with LLM agents",
    long_about = "Generate blog posts from a short brief, or turn research PDFs (local files or \
URLs) into clean documents, using a sequential crew of LLM agents. Results are exported as \
HTML and PDF. Hindi PDFs with mis-decoded Devanagari are repaired before any model sees them.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    global: GlobalArgs,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// LLM model ID. Default: gemini-2.0-flash.
    #[arg(long, global = true, env = "CONTENT_CREW_MODEL")]
    model: Option<String>,

    /// LLM provider: gemini, openai, anthropic, ollama.
    #[arg(long, global = true, env = "CONTENT_CREW_PROVIDER")]
    provider: Option<String>,

    /// Google API key for the Gemini provider.
    #[arg(long, global = true, env = "GOOGLE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Directory for exported files.
    #[arg(long, global = true, env = "CONTENT_CREW_OUTPUT_DIR", default_value = "exports")]
    output_dir: PathBuf,

    /// Export format.
    #[arg(long, global = true, env = "CONTENT_CREW_FORMAT", value_enum, default_value = "both")]
    format: FormatArg,

    /// LLM temperature (0.0–2.0).
    #[arg(long, global = true, env = "CONTENT_CREW_TEMPERATURE", default_value_t = 0.7)]
    temperature: f32,

    /// Max LLM output tokens per call.
    #[arg(long, global = true, env = "CONTENT_CREW_MAX_TOKENS", default_value_t = 8192)]
    max_tokens: usize,

    /// HTTP download timeout in seconds.
    #[arg(long, global = true, env = "CONTENT_CREW_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Output structured JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    /// Disable progress bar.
    #[arg(long, global = true, env = "CONTENT_CREW_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "CONTENT_CREW_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "CONTENT_CREW_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a blog post with the research, NLP and writer agents.
    Blog(BlogArgs),
    /// Convert a research PDF (path or URL) and export the result.
    Research(ResearchArgs),
    /// Show extraction and encoding diagnostics. No API key needed.
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
struct BlogArgs {
    /// Blog topic.
    topic: String,

    #[arg(long, default_value = "Student", value_parser = Audience::from_str)]
    audience: Audience,

    #[arg(long, default_value = "Conversational", value_parser = Tone::from_str)]
    tone: Tone,

    #[arg(long, default_value = "EdTech", value_parser = Industry::from_str)]
    industry: Industry,

    #[arg(long, default_value = "How-to Guide", value_parser = BlogType::from_str)]
    blog_type: BlogType,

    #[arg(long, default_value = "Educate", value_parser = ContentGoal::from_str)]
    goal: ContentGoal,

    /// Target length in words: 700–2000 in steps of 50.
    #[arg(long, default_value_t = DEFAULT_WORDS)]
    words: u32,

    /// Also run the content analysis.
    #[arg(long)]
    analyze: bool,

    /// Also run the plagiarism check.
    #[arg(long)]
    plagiarism: bool,

    /// Print the post without exporting files.
    #[arg(long)]
    no_export: bool,
}

#[derive(Args, Debug)]
struct ResearchArgs {
    /// Local PDF file path or HTTP/HTTPS URL.
    input: String,

    /// Keep the original language instead of translating to English.
    #[arg(long, env = "CONTENT_CREW_NO_TRANSLATE")]
    no_translate: bool,

    /// Text file with brand guidelines for the content creator.
    #[arg(long)]
    brand_guidelines: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Local PDF file path or HTTP/HTTPS URL.
    input: String,

    /// Print the processed text after the diagnostics.
    #[arg(long)]
    show_text: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Pdf,
    Html,
    Both,
}

impl From<FormatArg> for OutputFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Pdf => OutputFormat::Pdf,
            FormatArg::Html => OutputFormat::Html,
            FormatArg::Both => OutputFormat::Both,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let global = &cli.global;

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO logs unless --verbose asks for them.
    let show_progress = !global.quiet && !global.no_progress && !global.json;
    let filter = if global.verbose {
        "debug"
    } else if global.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match &cli.command {
        Command::Inspect(args) => run_inspect(global, args).await,
        Command::Blog(args) => {
            let config = build_config(global, show_progress, None).await?;
            run_blog(global, args, &config).await
        }
        Command::Research(args) => {
            let config = build_config(global, show_progress, Some(args)).await?;
            run_research(global, args, &config).await
        }
    }
}

/// Map CLI args to `CrewConfig`, asking for the API key when nothing else is configured.
async fn build_config(
    global: &GlobalArgs,
    show_progress: bool,
    research: Option<&ResearchArgs>,
) -> Result<CrewConfig> {
    let mut builder = CrewConfig::builder()
        .temperature(global.temperature)
        .max_tokens(global.max_tokens)
        .output_dir(&global.output_dir)
        .output_format(global.format.into())
        .download_timeout_secs(global.download_timeout);

    if let Some(ref model) = global.model {
        builder = builder.model(model);
    }
    if let Some(ref provider) = global.provider {
        builder = builder.provider_name(provider);
    }

    let api_key = match global.api_key.clone().filter(|k| !k.trim().is_empty()) {
        Some(key) => Some(key),
        None if global.provider.is_none() && !provider_env_configured() => Some(prompt_api_key()?),
        None => None,
    };
    if let Some(key) = api_key {
        builder = builder.api_key(key);
    }

    if let Some(args) = research {
        builder = builder.translate(!args.no_translate);
        if let Some(ref path) = args.brand_guidelines {
            let text = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read brand guidelines from {:?}", path))?;
            builder = builder.brand_guidelines(text);
        }
    }

    if show_progress {
        builder = builder.progress_callback(CliProgressCallback::new() as ProgressCallback);
    }

    builder.build().context("Invalid configuration")
}

fn provider_env_configured() -> bool {
    let set = |name: &str| std::env::var(name).map_or(false, |v| !v.trim().is_empty());
    set("EDGEQUAKE_LLM_PROVIDER") && set("EDGEQUAKE_MODEL")
}

/// Read the Google API key from stdin.
fn prompt_api_key() -> Result<String> {
    eprint!("{} Google API key not found. Enter your Google API key: ", cyan("?"));
    io::stderr().flush().ok();

    let mut key = String::new();
    io::stdin()
        .lock()
        .read_line(&mut key)
        .context("Failed to read API key from stdin")?;
    let key = key.trim().to_string();
    if key.is_empty() {
        anyhow::bail!("No API key entered. Set GOOGLE_API_KEY or pass --api-key.");
    }
    Ok(key)
}

// ── Subcommands ──────────────────────────────────────────────────────────────

async fn run_blog(global: &GlobalArgs, args: &BlogArgs, config: &CrewConfig) -> Result<()> {
    let brief = BlogBrief {
        topic: args.topic.clone(),
        audience: args.audience,
        tone: args.tone,
        industry: args.industry,
        blog_type: args.blog_type,
        content_goal: args.goal,
        word_limit: args.words,
    };
    brief.validate().context("Invalid blog brief")?;

    let model = resolve_model(config).context("No language model available")?;
    let start = Instant::now();
    let mut session = generate_blog(Arc::clone(&model), brief, config)
        .await
        .context("Blog generation failed")?;

    if args.analyze {
        session
            .analyze(model.as_ref())
            .await
            .context("Content analysis failed")?;
    }
    if args.plagiarism {
        session
            .check_plagiarism(Arc::clone(&model))
            .await
            .context("Plagiarism check failed")?;
    }

    let files = if args.no_export {
        ExportedFiles::default()
    } else {
        session
            .export(&config.output_dir, config.output_format)
            .context("Export failed")?
    };

    if global.json {
        let json = serde_json::json!({
            "session": session,
            "files": files,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&json).context("Failed to serialise output")?
        );
        return Ok(());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", session.content.trim_end()).context("Failed to write to stdout")?;
    if let Some(ref analysis) = session.analysis {
        writeln!(out, "\n{}\n{}", bold("Content Analysis"), analysis.trim_end())
            .context("Failed to write to stdout")?;
    }
    if let Some(ref report) = session.plagiarism {
        let score = report.score_text.as_deref().unwrap_or("n/a");
        let band = report
            .band
            .map(|b| format!("  ({b})"))
            .unwrap_or_default();
        writeln!(
            out,
            "\n{}\nOriginality Score: {}{}\n\n{}",
            bold("Plagiarism Check"),
            score,
            band,
            report.report.trim_end()
        )
        .context("Failed to write to stdout")?;
    }

    if !global.quiet {
        print_files(&files);
        eprintln!("   {}", dim(&format!("{}ms total", start.elapsed().as_millis())));
    }
    Ok(())
}

async fn run_research(global: &GlobalArgs, args: &ResearchArgs, config: &CrewConfig) -> Result<()> {
    let start = Instant::now();
    let output = convert_research(&args.input, config)
        .await
        .context("Research conversion failed")?;

    if global.json {
        let json = serde_json::json!({
            "origin": output.document.origin,
            "page_count": output.document.page_count,
            "pages_with_text": output.document.pages.len(),
            "translated": output.translated_text.is_some(),
            "output": output.output,
            "export_dir": output.export_dir,
            "files": output.files,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&json).context("Failed to serialise output")?
        );
        return Ok(());
    }

    if !global.quiet {
        eprintln!(
            "{}  {} pages with text  →  {}",
            green("✔"),
            output.document.pages.len(),
            bold(&output.export_dir.display().to_string()),
        );
        print_files(&output.files);
        eprintln!("   {}", dim(&format!("{}ms total", start.elapsed().as_millis())));
    }
    Ok(())
}

async fn run_inspect(global: &GlobalArgs, args: &InspectArgs) -> Result<()> {
    let config = CrewConfig::builder()
        .download_timeout_secs(global.download_timeout)
        .build()
        .context("Invalid configuration")?;
    let doc = inspect(&args.input, &config)
        .await
        .context("Failed to inspect PDF")?;

    if global.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&inspect_json(&doc, args.show_text))
                .context("Failed to serialize diagnostics")?
        );
        return Ok(());
    }

    println!("File:               {}", doc.origin);
    println!("Pages:              {}", doc.page_count);
    println!("Pages with text:    {}", doc.pages.len());
    println!("Raw encoding:       {}", doc.raw_encoding);
    println!("Processed encoding: {}", doc.processed_encoding);
    for page in &doc.pages {
        println!();
        println!("{}", bold(&format!("Page {}", page.encoding.page)));
        println!("  Detected:  {}", page.encoding.guess);
        println!("  Repair:    {}", page.repair);
        println!("  Cleaned:   {} chars", page.cleaned_chars);
        println!("  Hex:       {}", page.encoding.patterns.hex);
        println!("  ASCII:     {}", page.encoding.patterns.ascii);
        for hint in page.encoding.hints() {
            println!("  Hint:      {}", hint);
        }
    }
    if args.show_text {
        println!("{}", doc.processed_text);
    }
    Ok(())
}

fn inspect_json(doc: &IngestedDocument, show_text: bool) -> serde_json::Value {
    let pages: Vec<_> = doc
        .pages
        .iter()
        .map(|p| {
            serde_json::json!({
                "encoding": p.encoding,
                "repair": p.repair.to_string(),
                "cleaned_chars": p.cleaned_chars,
                "hints": p.encoding.hints(),
            })
        })
        .collect();
    let mut json = serde_json::json!({
        "origin": doc.origin,
        "page_count": doc.page_count,
        "raw_encoding": doc.raw_encoding,
        "processed_encoding": doc.processed_encoding,
        "pages": pages,
    });
    if show_text {
        json["raw_text"] = serde_json::Value::String(doc.raw_text.clone());
        json["processed_text"] = serde_json::Value::String(doc.processed_text.clone());
    }
    json
}

fn print_files(files: &ExportedFiles) {
    for path in files.paths() {
        eprintln!("   {} {}", cyan("→"), path.display());
    }
}
