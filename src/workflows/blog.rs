//! Blog workflow: brief → research → NLP outline → written post.
//!
//! A [`BlogSession`] carries everything one generation produced, so the
//! follow-up tools (analysis, plagiarism check, export) work on explicit state
//! instead of anything ambient.

use crate::agents::roster;
use crate::agents::Agent;
use crate::config::{CrewConfig, OutputFormat};
use crate::error::ContentCrewError;
use crate::export::{self, strip_markdown, ExportedFiles};
use crate::llm::LanguageModel;
use crate::orchestrator::{Orchestrator, PipelineContext, Task};
use crate::prompts;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

/// Smallest allowed word limit.
pub const MIN_WORDS: u32 = 700;
/// Largest allowed word limit.
pub const MAX_WORDS: u32 = 2000;
/// Word limits move in steps of this size.
pub const WORD_STEP: u32 = 50;
/// Word limit used when none is given.
pub const DEFAULT_WORDS: u32 = 1000;

// ── Brief options ────────────────────────────────────────────────────────────

/// Closed option lists with a display label per variant. Parsing accepts the
/// label or the variant name, case-insensitively.
macro_rules! labelled_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every option, in menu order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = ContentCrewError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                $(
                    if s.eq_ignore_ascii_case($label) || s.eq_ignore_ascii_case(stringify!($variant)) {
                        return Ok($name::$variant);
                    }
                )+
                Err(ContentCrewError::InvalidConfig(format!(
                    "unknown {} '{}' (expected one of: {})",
                    stringify!($name),
                    s,
                    $name::ALL.iter().map(|v| v.label()).collect::<Vec<_>>().join(", ")
                )))
            }
        }
    };
}

labelled_enum!(
    /// Who the post is written for.
    Audience {
        Student => "Student",
        Engineer => "Engineer",
        PhdResearcher => "PhD Researcher",
        BusinessProfessional => "Business Professional",
        GeneralPublic => "General Public",
        TechnicalExpert => "Technical Expert",
        Academic => "Academic",
    }
);

labelled_enum!(
    /// Writing tone.
    Tone {
        Conversational => "Conversational",
        Storytelling => "Storytelling",
        Humorous => "Humorous",
        Professional => "Professional",
        Academic => "Academic",
        Technical => "Technical",
        Casual => "Casual",
    }
);

labelled_enum!(
    /// Industry or domain of the topic.
    Industry {
        EdTech => "EdTech",
        Finance => "Finance",
        Legal => "Legal",
        Healthcare => "Healthcare",
        Technology => "Technology",
        Marketing => "Marketing",
        Science => "Science",
        Education => "Education",
        Business => "Business",
        Other => "Other",
    }
);

labelled_enum!(
    /// Shape of the post.
    BlogType {
        HowToGuide => "How-to Guide",
        Listicle => "Listicle",
        CaseStudy => "Case Study",
        OpinionPiece => "Opinion Piece",
        TechnicalTutorial => "Technical Tutorial",
        NewsAnalysis => "News Analysis",
        Review => "Review",
        ResearchSummary => "Research Summary",
    }
);

labelled_enum!(
    /// What the post should achieve.
    ContentGoal {
        Educate => "Educate",
        Rank => "Rank (SEO)",
        Convert => "Convert",
        Explain => "Explain",
        Entertain => "Entertain",
        Inform => "Inform",
        Persuade => "Persuade",
    }
);

/// Everything the blog pipeline needs to know about the post to write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogBrief {
    pub topic: String,
    pub audience: Audience,
    pub tone: Tone,
    pub industry: Industry,
    pub blog_type: BlogType,
    pub content_goal: ContentGoal,
    /// Target length in words: 700–2000 in steps of 50.
    pub word_limit: u32,
}

impl BlogBrief {
    /// A brief for `topic` with the first option of every list and 1000 words.
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            audience: Audience::Student,
            tone: Tone::Conversational,
            industry: Industry::EdTech,
            blog_type: BlogType::HowToGuide,
            content_goal: ContentGoal::Educate,
            word_limit: DEFAULT_WORDS,
        }
    }

    /// Check the topic and word limit.
    pub fn validate(&self) -> Result<(), ContentCrewError> {
        if self.topic.trim().is_empty() {
            return Err(ContentCrewError::InvalidConfig(
                "Please enter a topic to generate a blog post".into(),
            ));
        }
        if !(MIN_WORDS..=MAX_WORDS).contains(&self.word_limit)
            || (self.word_limit - MIN_WORDS) % WORD_STEP != 0
        {
            return Err(ContentCrewError::InvalidConfig(format!(
                "word limit must be between {MIN_WORDS} and {MAX_WORDS} in steps of {WORD_STEP}, got {}",
                self.word_limit
            )));
        }
        Ok(())
    }

    fn research_description(&self) -> String {
        format!(
            "Research and gather information about: {}\n\
             Target Audience: {}\n\
             Industry/Domain: {}\n\
             Blog Type: {}\n\
             Content Goal: {}",
            self.topic.trim(),
            self.audience,
            self.industry,
            self.blog_type,
            self.content_goal
        )
    }

    fn nlp_description(&self) -> String {
        format!(
            "Process and analyze the gathered information using NLP techniques.\n\
             Consider the following parameters:\n\
             - Target Audience: {}\n\
             - Writing Tone: {}\n\
             - Industry/Domain: {}\n\
             - Blog Type: {}\n\
             - Content Goal: {}",
            self.audience, self.tone, self.industry, self.blog_type, self.content_goal
        )
    }

    fn writing_description(&self) -> String {
        format!(
            "Write an engaging blog post based on the processed information.\n\
             Follow these guidelines:\n\
             - Target Audience: {}\n\
             - Writing Tone: {}\n\
             - Industry/Domain: {}\n\
             - Blog Type: {}\n\
             - Content Goal: {}\n\
             - Word Limit: {} words (strictly adhere to this range)\n\
             Ensure the content is well-structured and meets the specified requirements.",
            self.audience,
            self.tone,
            self.industry,
            self.blog_type,
            self.content_goal,
            self.word_limit
        )
    }

    /// The research → NLP → writing task sequence for this brief.
    pub fn tasks(&self) -> Vec<Task> {
        vec![
            Task::new(
                "research",
                self.research_description(),
                roster::RESEARCH_SPECIALIST,
                prompts::BLOG_RESEARCH_EXPECTED_OUTPUT,
            ),
            Task::new(
                "nlp",
                self.nlp_description(),
                roster::NLP_SPECIALIST,
                prompts::BLOG_NLP_EXPECTED_OUTPUT,
            ),
            Task::new(
                "writing",
                self.writing_description(),
                roster::CONTENT_WRITER,
                prompts::BLOG_WRITING_EXPECTED_OUTPUT,
            ),
        ]
    }
}

// ── Plagiarism report ────────────────────────────────────────────────────────

static RE_LEADING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(?:\.\d+)?").unwrap());

/// How original a scored post is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OriginalityBand {
    /// 90–100.
    HighlyOriginal,
    /// 70–89.
    MostlyOriginal,
    /// 50–69.
    ModeratelyOriginal,
    /// 30–49.
    NeedsImprovement,
    /// 0–29.
    SignificantConcerns,
}

impl OriginalityBand {
    pub fn from_score(score: f32) -> Self {
        match score {
            s if s >= 90.0 => OriginalityBand::HighlyOriginal,
            s if s >= 70.0 => OriginalityBand::MostlyOriginal,
            s if s >= 50.0 => OriginalityBand::ModeratelyOriginal,
            s if s >= 30.0 => OriginalityBand::NeedsImprovement,
            _ => OriginalityBand::SignificantConcerns,
        }
    }
}

impl fmt::Display for OriginalityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OriginalityBand::HighlyOriginal => "Highly original",
            OriginalityBand::MostlyOriginal => "Mostly original",
            OriginalityBand::ModeratelyOriginal => "Moderately original",
            OriginalityBand::NeedsImprovement => "Needs improvement",
            OriginalityBand::SignificantConcerns => "Significant concerns",
        })
    }
}

/// The plagiarism checker's answer plus the score pulled out of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlagiarismReport {
    /// Full report text as returned by the agent.
    pub report: String,
    /// Text after the first `Score:` up to the end of that line, trimmed.
    pub score_text: Option<String>,
    /// Leading number of `score_text`, when it is within 0–100.
    pub score: Option<f32>,
    pub band: Option<OriginalityBand>,
}

impl PlagiarismReport {
    pub fn parse(report: impl Into<String>) -> Self {
        let report = report.into();
        let score_text = report
            .split_once("Score:")
            .map(|(_, rest)| rest.split('\n').next().unwrap_or("").trim().to_string());
        let score = score_text
            .as_deref()
            .and_then(|s| RE_LEADING_NUMBER.find(s))
            .and_then(|m| m.as_str().parse::<f32>().ok())
            .filter(|s| (0.0..=100.0).contains(s));
        Self {
            band: score.map(OriginalityBand::from_score),
            report,
            score_text,
            score,
        }
    }
}

// ── Session ──────────────────────────────────────────────────────────────────

/// One generated post and the reports produced for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogSession {
    pub brief: BlogBrief,
    /// The writer's final post, Markdown included.
    pub content: String,
    pub analysis: Option<String>,
    pub plagiarism: Option<PlagiarismReport>,
}

impl BlogSession {
    pub fn new(brief: BlogBrief, content: impl Into<String>) -> Self {
        Self {
            brief,
            content: content.into(),
            analysis: None,
            plagiarism: None,
        }
    }

    /// Run [`analyze_content`] on the post and keep the report.
    pub async fn analyze(&mut self, model: &dyn LanguageModel) -> Result<&str, ContentCrewError> {
        let report = analyze_content(model, &self.content).await?;
        Ok(self.analysis.insert(report).as_str())
    }

    /// Run [`check_plagiarism`] on the post and keep the report.
    pub async fn check_plagiarism(
        &mut self,
        model: Arc<dyn LanguageModel>,
    ) -> Result<&PlagiarismReport, ContentCrewError> {
        let report = check_plagiarism(model, &self.content).await?;
        Ok(&*self.plagiarism.insert(report))
    }

    /// Export the post; see [`export_blog`].
    pub fn export(&self, dir: &Path, format: OutputFormat) -> Result<ExportedFiles, ContentCrewError> {
        export_blog(self, dir, format)
    }
}

// ── Operations ───────────────────────────────────────────────────────────────

/// Generate a post for `brief` with the research, NLP and writer agents.
pub async fn generate_blog(
    model: Arc<dyn LanguageModel>,
    brief: BlogBrief,
    config: &CrewConfig,
) -> Result<BlogSession, ContentCrewError> {
    brief.validate()?;
    info!(
        "Generating {} word {} on '{}'",
        brief.word_limit,
        brief.blog_type,
        brief.topic.trim()
    );

    let agents: Vec<Arc<dyn Agent>> = vec![
        Arc::new(roster::research_specialist(Arc::clone(&model))),
        Arc::new(roster::nlp_specialist(Arc::clone(&model))),
        Arc::new(roster::content_writer(model)),
    ];

    let content = Orchestrator::new()
        .with_progress(config.progress_callback.clone())
        .run_with_context(
            brief.tasks(),
            &agents,
            PipelineContext::with_subject(brief.topic.trim()),
        )
        .await
        .and_then(crate::orchestrator::final_text)?;

    Ok(BlogSession::new(brief, content))
}

/// Single-call quality report on `content`.
pub async fn analyze_content(
    model: &dyn LanguageModel,
    content: &str,
) -> Result<String, ContentCrewError> {
    info!("Analyzing {} chars of content", content.len());
    model
        .complete(None, &prompts::content_analysis_prompt(content))
        .await
        .map(|c| c.text)
        .map_err(|e| ContentCrewError::LlmApiError {
            message: e.to_string(),
        })
}

/// Score `content` for originality with the plagiarism checker agent.
pub async fn check_plagiarism(
    model: Arc<dyn LanguageModel>,
    content: &str,
) -> Result<PlagiarismReport, ContentCrewError> {
    let agents: Vec<Arc<dyn Agent>> = vec![Arc::new(roster::plagiarism_checker(model))];
    let task = Task::new(
        "plagiarism",
        prompts::plagiarism_task_description(content),
        roster::PLAGIARISM_CHECKER,
        prompts::PLAGIARISM_EXPECTED_OUTPUT,
    );
    let report = Orchestrator::new().run(vec![task], &agents).await?;
    let report = PlagiarismReport::parse(report);
    match report.score_text {
        Some(ref s) => info!("Originality score: {}", s),
        None => info!("Plagiarism report has no score line"),
    }
    Ok(report)
}

/// File stem for a blog export made now: `blog_YYYYmmdd_HHMMSS`.
pub fn blog_stem() -> String {
    format!("blog_{}", chrono::Local::now().format("%Y%m%d_%H%M%S"))
}

/// Export the Markdown-stripped post titled with its topic.
pub fn export_blog(
    session: &BlogSession,
    dir: &Path,
    format: OutputFormat,
) -> Result<ExportedFiles, ContentCrewError> {
    export::export(
        session.brief.topic.trim(),
        &strip_markdown(&session.content),
        dir,
        &blog_stem(),
        format,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::test_support::ScriptedModel;

    #[test]
    fn option_labels_round_trip() {
        assert_eq!(Audience::PhdResearcher.to_string(), "PhD Researcher");
        assert_eq!("phd researcher".parse::<Audience>().unwrap(), Audience::PhdResearcher);
        assert_eq!("How-to Guide".parse::<BlogType>().unwrap(), BlogType::HowToGuide);
        assert_eq!("rank (seo)".parse::<ContentGoal>().unwrap(), ContentGoal::Rank);
        assert_eq!("edtech".parse::<Industry>().unwrap(), Industry::EdTech);
        assert_eq!(Tone::ALL.len(), 7);
        assert_eq!(Industry::ALL.len(), 10);
        assert_eq!(BlogType::ALL.len(), 8);
    }

    #[test]
    fn unknown_option_lists_choices() {
        let err = "Sarcastic".parse::<Tone>().unwrap_err().to_string();
        assert!(err.contains("Sarcastic"));
        assert!(err.contains("Storytelling"));
    }

    #[test]
    fn word_limit_validation() {
        let mut brief = BlogBrief::new("Rust ownership");
        assert!(brief.validate().is_ok());
        for ok in [700, 750, 1950, 2000] {
            brief.word_limit = ok;
            assert!(brief.validate().is_ok(), "{ok} should be valid");
        }
        for bad in [0, 650, 725, 2050] {
            brief.word_limit = bad;
            assert!(brief.validate().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn blank_topic_rejected() {
        assert!(BlogBrief::new("   ").validate().is_err());
    }

    #[test]
    fn tasks_carry_the_brief() {
        let mut brief = BlogBrief::new("Soil health");
        brief.tone = Tone::Humorous;
        brief.word_limit = 1200;
        let tasks = brief.tasks();
        let roles: Vec<_> = tasks.iter().map(Task::agent_role).collect();
        assert_eq!(
            roles,
            vec![roster::RESEARCH_SPECIALIST, roster::NLP_SPECIALIST, roster::CONTENT_WRITER]
        );
        assert!(tasks[0].description().starts_with("Research and gather information about: Soil health"));
        assert!(!tasks[0].description().contains("Humorous"));
        assert!(tasks[1].description().contains("- Writing Tone: Humorous"));
        assert!(tasks[2].description().contains("- Word Limit: 1200 words"));
    }

    #[test]
    fn plagiarism_score_parsing() {
        let r = PlagiarismReport::parse("Report\nScore: 85/100\nDetails follow");
        assert_eq!(r.score_text.as_deref(), Some("85/100"));
        assert_eq!(r.score, Some(85.0));
        assert_eq!(r.band, Some(OriginalityBand::MostlyOriginal));

        let r = PlagiarismReport::parse("Score: 92.5\nScore: 10");
        assert_eq!(r.score, Some(92.5));
        assert_eq!(r.band, Some(OriginalityBand::HighlyOriginal));

        let r = PlagiarismReport::parse("Score: high\n");
        assert_eq!(r.score_text.as_deref(), Some("high"));
        assert_eq!(r.score, None);
        assert_eq!(r.band, None);

        let r = PlagiarismReport::parse("no score here");
        assert!(r.score_text.is_none());
    }

    #[test]
    fn band_edges() {
        assert_eq!(OriginalityBand::from_score(100.0), OriginalityBand::HighlyOriginal);
        assert_eq!(OriginalityBand::from_score(89.9), OriginalityBand::MostlyOriginal);
        assert_eq!(OriginalityBand::from_score(50.0), OriginalityBand::ModeratelyOriginal);
        assert_eq!(OriginalityBand::from_score(30.0), OriginalityBand::NeedsImprovement);
        assert_eq!(OriginalityBand::from_score(0.0), OriginalityBand::SignificantConcerns);
    }

    #[tokio::test]
    async fn generate_blog_runs_three_tasks() {
        let model = ScriptedModel::new(vec![Ok("facts"), Ok("outline"), Ok("# Post\n\nBody")]);
        let config = CrewConfig::default();
        let session = generate_blog(model.clone(), BlogBrief::new("Soil health"), &config)
            .await
            .unwrap();
        assert_eq!(session.content, "# Post\n\nBody");
        assert_eq!(session.brief.topic, "Soil health");

        let calls = model.calls();
        assert_eq!(calls.len(), 3);
        assert!(calls[0].0.as_deref().unwrap().contains(roster::RESEARCH_SPECIALIST));
        assert!(calls[2].1.contains("outline"));
        assert!(calls[2].1.contains("Subject: Soil health"));
    }

    #[tokio::test]
    async fn invalid_brief_never_calls_model() {
        let model = ScriptedModel::new(vec![]);
        let mut brief = BlogBrief::new("Topic");
        brief.word_limit = 5000;
        let err = generate_blog(model.clone(), brief, &CrewConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ContentCrewError::InvalidConfig(_)));
        assert!(model.calls().is_empty());
    }

    #[tokio::test]
    async fn analysis_error_propagates() {
        let model = ScriptedModel::new(vec![Err("quota exceeded")]);
        let err = analyze_content(model.as_ref(), "post").await.unwrap_err();
        match err {
            ContentCrewError::LlmApiError { message } => assert!(message.contains("quota exceeded")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn session_keeps_reports() {
        let model = ScriptedModel::new(vec![Ok("Looks solid."), Ok("Score: 72\nFine.")]);
        let mut session = BlogSession::new(BlogBrief::new("Topic"), "**Body** text");
        assert_eq!(session.analyze(model.as_ref()).await.unwrap(), "Looks solid.");
        let report = session.check_plagiarism(model.clone()).await.unwrap();
        assert_eq!(report.score, Some(72.0));
        assert!(session.analysis.is_some());
        assert!(session.plagiarism.is_some());

        let calls = model.calls();
        assert!(calls[0].0.is_none());
        assert!(calls[1].0.as_deref().unwrap().contains(roster::PLAGIARISM_CHECKER));
        assert!(calls[1].1.contains("**Body** text"));
    }

    #[test]
    fn export_strips_markdown_and_uses_timestamped_stem() {
        let dir = tempfile::tempdir().unwrap();
        let session = BlogSession::new(BlogBrief::new("Soil"), "# Heading\n\n**Bold** body");
        let files = session.export(dir.path(), OutputFormat::Html).unwrap();
        let html_path = files.html.unwrap();
        let name = html_path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("blog_") && name.ends_with(".html"), "got {name}");
        assert_eq!(name.len(), "blog_20240101_120000.html".len());

        let html = std::fs::read_to_string(&html_path).unwrap();
        assert!(html.contains("Heading<br>\n<br>\nBold body"));
        assert!(!html.contains("**"));
    }
}
