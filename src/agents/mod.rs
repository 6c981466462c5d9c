//! Agents: role-scoped capabilities that turn a task into text.
//!
//! The orchestrator only knows the narrow [`Agent`] interface. The one
//! production implementation, [`LlmAgent`], renders a role profile into a
//! system prompt and the task plus prior outputs into a user prompt, then
//! asks its [`LanguageModel`]. The roster of concrete roles lives in
//! [`roster`].

pub mod roster;

use crate::error::AgentError;
use crate::llm::LanguageModel;
use crate::orchestrator::{PipelineContext, Task};
use crate::prompts::agent_system_prompt;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::debug;

/// Something that can execute a [`Task`].
#[async_trait]
pub trait Agent: Send + Sync {
    /// Role name; tasks are routed to the agent whose role matches.
    fn role(&self) -> &str;

    /// Execute `task`, reading earlier outputs from `ctx`.
    async fn execute(&self, task: &Task, ctx: &PipelineContext) -> Result<String, AgentError>;
}

/// Who an agent is: role, objective and backstory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentProfile {
    pub role: String,
    pub goal: String,
    pub backstory: String,
}

impl AgentProfile {
    pub fn new(
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
    ) -> Self {
        Self {
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
        }
    }

    pub fn system_prompt(&self) -> String {
        agent_system_prompt(&self.role, &self.goal, &self.backstory)
    }
}

/// Gives an agent access to the processed document text.
///
/// Every query returns the whole corpus; there is no semantic search.
#[derive(Debug, Clone)]
pub struct SearchTool {
    corpus: Arc<str>,
}

impl SearchTool {
    pub fn new(corpus: impl Into<Arc<str>>) -> Self {
        Self {
            corpus: corpus.into(),
        }
    }

    pub fn search(&self, query: &str) -> &str {
        debug!("Search tool query ({} chars), returning full corpus", query.len());
        &self.corpus
    }
}

/// An [`Agent`] backed by a language model.
pub struct LlmAgent {
    profile: AgentProfile,
    model: Arc<dyn LanguageModel>,
    search_tool: Option<SearchTool>,
}

impl LlmAgent {
    pub fn new(profile: AgentProfile, model: Arc<dyn LanguageModel>) -> Self {
        Self {
            profile,
            model,
            search_tool: None,
        }
    }

    pub fn with_search_tool(mut self, tool: SearchTool) -> Self {
        self.search_tool = Some(tool);
        self
    }

    pub fn profile(&self) -> &AgentProfile {
        &self.profile
    }

    /// User message: task, expected output, subject, prior outputs, tool text.
    fn task_prompt(&self, task: &Task, ctx: &PipelineContext) -> String {
        let mut prompt = String::with_capacity(task.description().len() + 256);
        prompt.push_str(task.description());
        let _ = write!(prompt, "\n\nExpected output: {}", task.expected_output());

        if let Some(ref subject) = ctx.subject {
            let _ = write!(prompt, "\n\nSubject: {subject}");
        }

        if !ctx.outputs.is_empty() {
            prompt.push_str("\n\nContext from previous tasks:");
            for output in &ctx.outputs {
                let _ = write!(
                    prompt,
                    "\n\n--- {} ({}) ---\n{}",
                    output.task, output.role, output.text
                );
            }
        }

        if let Some(ref tool) = self.search_tool {
            let _ = write!(
                prompt,
                "\n\nDocument content (from search tool):\n{}",
                tool.search(task.description())
            );
        }

        prompt.push_str("\n\nRespond with the final answer only.");
        prompt
    }
}

#[async_trait]
impl Agent for LlmAgent {
    fn role(&self) -> &str {
        &self.profile.role
    }

    async fn execute(&self, task: &Task, ctx: &PipelineContext) -> Result<String, AgentError> {
        let system = self.profile.system_prompt();
        let prompt = self.task_prompt(task, ctx);
        debug!(
            "{} → {} ({} prompt chars)",
            self.profile.role,
            self.model.model_name(),
            prompt.len()
        );
        let completion = self.model.complete(Some(&system), &prompt).await?;
        Ok(completion.text)
    }
}
