//! Prompt text for agents, tasks, translation and content analysis.
//!
//! Every fixed piece of prompt text lives here so wording changes happen in
//! one place and tests can inspect prompts without calling a model. Blog task
//! descriptions are templated with the brief in [`crate::workflows::blog`].

// ── Agent system prompt ──────────────────────────────────────────────────────

/// System message shared by every LLM-backed agent.
pub fn agent_system_prompt(role: &str, goal: &str, backstory: &str) -> String {
    format!("You are {role}. {backstory}\n\nYour personal goal is: {goal}")
}

// ── Translation ──────────────────────────────────────────────────────────────

/// Prompt asking the model to translate Hindi/Devanagari text to English.
pub fn translation_prompt(text: &str) -> String {
    format!(
        "Translate the following Hindi/Devanagari text to English.\n\
         Keep technical terms as is, and maintain any numerical values or measurements exactly.\n\
         Preserve formatting and structure of the text.\n\
         \n\
         Text to translate:\n\
         {text}\n\
         \n\
         Please provide a clear and accurate translation while keeping technical terminology intact."
    )
}

// ── Blog tools ───────────────────────────────────────────────────────────────

/// Single-shot content analysis prompt.
pub fn content_analysis_prompt(content: &str) -> String {
    format!(
        "Analyze the following blog content and provide a detailed report including:\n\
         1. Content Quality Assessment\n\
         2. Key Points and Main Arguments\n\
         3. Writing Style Analysis\n\
         4. Potential Improvements\n\
         5. Originality Assessment (based on common patterns and structures)\n\
         \n\
         Blog Content:\n\
         {content}"
    )
}

/// Task description for the plagiarism checker.
pub fn plagiarism_task_description(content: &str) -> String {
    format!(
        "Analyze the following content and provide:\n\
         1. A plagiarism score (0-100, where 100 is completely original)\n\
         2. Detailed analysis of writing patterns\n\
         3. Specific areas that might need improvement\n\
         4. Recommendations for enhancing originality\n\
         \n\
         Start the report with a line of the form `Score: <0-100>`.\n\
         \n\
         Content to analyze:\n\
         {content}"
    )
}

pub const PLAGIARISM_EXPECTED_OUTPUT: &str =
    "A detailed plagiarism analysis report with score and recommendations.";

pub const BLOG_RESEARCH_EXPECTED_OUTPUT: &str =
    "A comprehensive research summary with key points, statistics, and relevant information about the topic.";

pub const BLOG_NLP_EXPECTED_OUTPUT: &str =
    "An analyzed and structured outline with key points organized for blog writing, incorporating NLP insights.";

pub const BLOG_WRITING_EXPECTED_OUTPUT: &str =
    "A complete, well-structured blog post that meets all specified requirements and guidelines.";

// ── Research conversion ──────────────────────────────────────────────────────

/// Verbatim-extraction instructions for the document researcher.
pub const RESEARCH_EXTRACTION_DESCRIPTION: &str = r#"Extract and organize the following content exactly as it appears in the document.
Use the search tool to extract content - it will provide either Hindi or English text depending on the translation setting.

CRITICAL RULES:
1. DO NOT add any information that is not in the document
2. DO NOT make creative interpretations or expansions
3. DO NOT reorganize or restructure the content's original flow
4. Copy text verbatim where possible, maintaining exact wording
5. Preserve all numerical data, statistics, and figures exactly as they appear

Extract and organize the following sections IN ORDER:
1. Title (from the beginning of the document)
2. Authors (if present)
3. Abstract/Introduction
4. Main Content (maintaining original structure)
5. Conclusions
6. References

For each section:
- Use exact quotes from the document
- Maintain original paragraph structure
- Keep all numerical values unchanged
- Preserve technical terminology exactly
- Keep citations in their original format"#;

pub const RESEARCH_EXTRACTION_EXPECTED_OUTPUT: &str =
    "A faithful, verbatim reproduction of the source document's content, maintaining original structure, wording, and data.";

/// Content-creation task, optionally bound to brand guidelines.
pub fn content_creation_description(brand_guidelines: Option<&str>) -> String {
    let mut description = String::from(
        "Turn the extracted research content from the previous task into clear, \
         structured plain content for a general professional audience.\n\
         \n\
         RULES:\n\
         1. Keep every fact, figure and citation from the extracted content\n\
         2. Do not introduce information that is not in the extracted content\n\
         3. Keep the original section order: title, authors, abstract, main content, conclusions, references\n\
         4. Rewrite dense passages into readable paragraphs without changing their meaning",
    );
    match brand_guidelines.map(str::trim).filter(|g| !g.is_empty()) {
        Some(guidelines) => {
            description.push_str(
                "\n\nFollow these brand guidelines for voice, terminology and style:\n",
            );
            description.push_str(guidelines);
        }
        None => description.push_str("\n\nUse a neutral, professional voice."),
    }
    description
}

pub const CONTENT_CREATION_EXPECTED_OUTPUT: &str =
    "Structured plain content derived faithfully from the research extraction, with every section preserved.";

pub const FORMATTING_DESCRIPTION: &str = r#"Format the content from the previous task for export as a document.

RULES:
1. Put the document title on the first line
2. Separate paragraphs and sections with a single blank line
3. Use plain section headings on their own line
4. Do not use Markdown markup, tables or code fences
5. Do not add, remove or reword any content"#;

pub const FORMATTING_EXPECTED_OUTPUT: &str =
    "The final document text: title first, then sections and paragraphs separated by blank lines, no Markdown.";
