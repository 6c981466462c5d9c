//! Sequential task pipeline.
//!
//! An [`Orchestrator`] takes an ordered list of [`Task`]s and the agents that
//! can execute them, then runs the tasks strictly one after another. Each
//! agent sees the outputs of earlier tasks only through the explicit
//! [`PipelineContext`]; nothing is shared implicitly.
//!
//! Failure policy is all-or-nothing: the first failing task aborts the run
//! with [`ContentCrewError::TaskFailed`]. There are no retries and no partial
//! results, so callers never export half a pipeline.

use crate::agents::Agent;
use crate::error::ContentCrewError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};

// ── Data model ───────────────────────────────────────────────────────────────

/// One unit of work, executed by the agent whose role matches `agent_role`.
///
/// Tasks are immutable once built and are moved into [`Orchestrator::run`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    name: String,
    description: String,
    agent_role: String,
    expected_output: String,
}

impl Task {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        agent_role: impl Into<String>,
        expected_output: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            agent_role: agent_role.into(),
            expected_output: expected_output.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn agent_role(&self) -> &str {
        &self.agent_role
    }

    pub fn expected_output(&self) -> &str {
        &self.expected_output
    }
}

/// The text one task produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOutput {
    pub task: String,
    pub role: String,
    pub text: String,
}

/// Per-run state passed to every agent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineContext {
    /// What the run is about (blog topic, document name).
    pub subject: Option<String>,
    /// Outputs of the tasks completed so far, in order.
    pub outputs: Vec<TaskOutput>,
}

impl PipelineContext {
    pub fn with_subject(subject: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.into()),
            outputs: Vec::new(),
        }
    }

    /// Output of the most recently completed task.
    pub fn last_output(&self) -> Option<&TaskOutput> {
        self.outputs.last()
    }
}

// ── Orchestrator ─────────────────────────────────────────────────────────────

/// Runs a fixed task sequence over a set of agents.
#[derive(Clone, Default)]
pub struct Orchestrator {
    progress: Option<ProgressCallback>,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report task events to `callback`.
    pub fn with_progress(mut self, callback: Option<ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Run `tasks` in order and return the final task's output.
    pub async fn run(
        &self,
        tasks: Vec<Task>,
        agents: &[Arc<dyn Agent>],
    ) -> Result<String, ContentCrewError> {
        let ctx = self
            .run_with_context(tasks, agents, PipelineContext::default())
            .await?;
        final_text(ctx)
    }

    /// Run `tasks` starting from `ctx` and return the filled context.
    ///
    /// # Errors
    /// - [`ContentCrewError::EmptyPipeline`] when `tasks` is empty
    /// - [`ContentCrewError::UnknownAgent`] when a task names a role none of
    ///   `agents` has; checked before any task runs
    /// - [`ContentCrewError::TaskFailed`] for the first failing task
    pub async fn run_with_context(
        &self,
        tasks: Vec<Task>,
        agents: &[Arc<dyn Agent>],
        mut ctx: PipelineContext,
    ) -> Result<PipelineContext, ContentCrewError> {
        if tasks.is_empty() {
            return Err(ContentCrewError::EmptyPipeline);
        }

        let assignments = tasks
            .iter()
            .map(|task| {
                agents
                    .iter()
                    .find(|agent| agent.role() == task.agent_role())
                    .map(Arc::clone)
                    .ok_or_else(|| ContentCrewError::UnknownAgent {
                        task: task.name().to_string(),
                        role: task.agent_role().to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let total = tasks.len();
        info!("Running pipeline of {} tasks", total);
        if let Some(ref cb) = self.progress {
            cb.on_pipeline_start(total);
        }

        for (i, (task, agent)) in tasks.into_iter().zip(assignments).enumerate() {
            let index = i + 1;
            if let Some(ref cb) = self.progress {
                cb.on_task_start(index, total, task.name(), task.agent_role());
            }

            let start = Instant::now();
            let span = info_span!("task", index, name = task.name(), role = task.agent_role());
            let result = agent.execute(&task, &ctx).instrument(span).await;

            match result {
                Ok(text) => {
                    debug!(
                        "Task {}/{} '{}' finished in {:?} ({} bytes)",
                        index,
                        total,
                        task.name(),
                        start.elapsed(),
                        text.len()
                    );
                    if let Some(ref cb) = self.progress {
                        cb.on_task_complete(index, total, task.name(), text.len());
                    }
                    ctx.outputs.push(TaskOutput {
                        task: task.name().to_string(),
                        role: task.agent_role().to_string(),
                        text,
                    });
                }
                Err(e) => {
                    warn!("Task {}/{} '{}' failed — {}", index, total, task.name(), e);
                    if let Some(ref cb) = self.progress {
                        cb.on_task_error(index, total, task.name(), &e.to_string());
                        cb.on_pipeline_complete(total, i);
                    }
                    return Err(ContentCrewError::TaskFailed {
                        index,
                        task: task.name().to_string(),
                        role: task.agent_role().to_string(),
                        detail: e.to_string(),
                    });
                }
            }
        }

        if let Some(ref cb) = self.progress {
            cb.on_pipeline_complete(total, total);
        }
        info!("Pipeline complete");
        Ok(ctx)
    }
}

/// The last task's text from a completed run.
pub(crate) fn final_text(ctx: PipelineContext) -> Result<String, ContentCrewError> {
    ctx.outputs
        .into_iter()
        .last()
        .map(|o| o.text)
        .ok_or_else(|| ContentCrewError::Internal("pipeline finished without output".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{AgentProfile, LlmAgent};
    use crate::llm::test_support::ScriptedModel;
    use crate::progress::PipelineProgressCallback;
    use std::sync::Mutex;

    fn agent(role: &str, model: Arc<ScriptedModel>) -> Arc<dyn Agent> {
        Arc::new(LlmAgent::new(
            AgentProfile::new(role, format!("{role} goal"), format!("{role} backstory")),
            model,
        ))
    }

    fn three_tasks() -> Vec<Task> {
        vec![
            Task::new("research", "Research the topic", "Researcher", "notes"),
            Task::new("analysis", "Analyse the notes", "Analyst", "outline"),
            Task::new("writing", "Write the post", "Writer", "post"),
        ]
    }

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl PipelineProgressCallback for Recorder {
        fn on_pipeline_start(&self, total: usize) {
            self.events.lock().unwrap().push(format!("start {total}"));
        }
        fn on_task_start(&self, index: usize, _total: usize, task: &str, _role: &str) {
            self.events.lock().unwrap().push(format!("begin {index} {task}"));
        }
        fn on_task_complete(&self, index: usize, _total: usize, _task: &str, _len: usize) {
            self.events.lock().unwrap().push(format!("done {index}"));
        }
        fn on_task_error(&self, index: usize, _total: usize, _task: &str, _error: &str) {
            self.events.lock().unwrap().push(format!("error {index}"));
        }
        fn on_pipeline_complete(&self, total: usize, completed: usize) {
            self.events.lock().unwrap().push(format!("end {completed}/{total}"));
        }
    }

    #[tokio::test]
    async fn runs_in_order_and_returns_last_output() {
        let model = ScriptedModel::new(vec![Ok("R-OUT"), Ok("A-OUT"), Ok("final post")]);
        let agents = vec![
            agent("Researcher", model.clone()),
            agent("Analyst", model.clone()),
            agent("Writer", model.clone()),
        ];
        let out = Orchestrator::new().run(three_tasks(), &agents).await.unwrap();
        assert_eq!(out, "final post");

        let calls = model.calls();
        assert_eq!(calls.len(), 3);
        assert!(calls[0].0.as_deref().unwrap().starts_with("You are Researcher."));
        // Later tasks see earlier outputs through the context.
        assert!(calls[1].1.contains("R-OUT"));
        assert!(calls[2].1.contains("R-OUT"));
        assert!(calls[2].1.contains("A-OUT"));
        assert!(!calls[0].1.contains("R-OUT"));
    }

    #[tokio::test]
    async fn middle_failure_aborts() {
        let model = ScriptedModel::new(vec![Ok("notes"), Err("quota exceeded"), Ok("never")]);
        let agents = vec![
            agent("Researcher", model.clone()),
            agent("Analyst", model.clone()),
            agent("Writer", model.clone()),
        ];
        let recorder = Arc::new(Recorder::default());
        let err = Orchestrator::new()
            .with_progress(Some(recorder.clone()))
            .run(three_tasks(), &agents)
            .await
            .unwrap_err();

        match err {
            ContentCrewError::TaskFailed {
                index, task, role, detail,
            } => {
                assert_eq!(index, 2);
                assert_eq!(task, "analysis");
                assert_eq!(role, "Analyst");
                assert!(detail.contains("quota exceeded"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(model.calls().len(), 2, "third task must not run");
        assert_eq!(
            *recorder.events.lock().unwrap(),
            vec!["start 3", "begin 1 research", "done 1", "begin 2 analysis", "error 2", "end 1/3"]
        );
    }

    #[tokio::test]
    async fn unknown_agent_checked_before_running() {
        let model = ScriptedModel::new(vec![Ok("notes")]);
        let agents = vec![agent("Researcher", model.clone()), agent("Writer", model.clone())];
        let err = Orchestrator::new().run(three_tasks(), &agents).await.unwrap_err();
        assert!(matches!(
            err,
            ContentCrewError::UnknownAgent { ref role, .. } if role == "Analyst"
        ));
        assert!(model.calls().is_empty());
    }

    #[tokio::test]
    async fn empty_pipeline() {
        let agents: Vec<Arc<dyn Agent>> = Vec::new();
        let err = Orchestrator::new().run(Vec::new(), &agents).await.unwrap_err();
        assert!(matches!(err, ContentCrewError::EmptyPipeline));
    }

    #[tokio::test]
    async fn context_keeps_subject_and_outputs() {
        let model = ScriptedModel::new(vec![Ok("one"), Ok("two")]);
        let agents = vec![agent("Researcher", model.clone())];
        let tasks = vec![
            Task::new("a", "first", "Researcher", "x"),
            Task::new("b", "second", "Researcher", "y"),
        ];
        let ctx = Orchestrator::new()
            .run_with_context(tasks, &agents, PipelineContext::with_subject("Soil health"))
            .await
            .unwrap();
        assert_eq!(ctx.subject.as_deref(), Some("Soil health"));
        assert_eq!(ctx.outputs.len(), 2);
        assert_eq!(ctx.last_output().unwrap().text, "two");
        assert!(model.calls()[0].1.contains("Soil health"));
    }
}
