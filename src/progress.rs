//! Progress-callback trait for per-task pipeline events.
//!
//! Inject an [`Arc<dyn PipelineProgressCallback>`] via
//! [`crate::config::CrewConfigBuilder::progress_callback`] to receive events
//! as the orchestrator works through its tasks.
//!
//! Callers can forward events to a channel, a log sink or a terminal progress
//! bar; the library knows nothing about how the host reports progress.
//!
//! # Example
//!
//! ```rust
//! use content_crew::{CrewConfig, PipelineProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: Arc<AtomicUsize>,
//! }
//!
//! impl PipelineProgressCallback for CountingCallback {
//!     fn on_task_complete(&self, index: usize, total: usize, task: &str, output_len: usize) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("Task {}/{} '{}' done ({} bytes)", index, total, task, output_len);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback {
//!     completed: Arc::new(AtomicUsize::new(0)),
//! });
//!
//! let config = CrewConfig::builder()
//!     .progress_callback(counter as Arc<dyn PipelineProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the orchestrator as it executes each task.
///
/// Tasks run strictly one after another, so events arrive in order. All
/// methods have default no-op implementations so callers only override what
/// they care about.
pub trait PipelineProgressCallback: Send + Sync {
    /// Called once before the first task runs.
    fn on_pipeline_start(&self, total_tasks: usize) {
        let _ = total_tasks;
    }

    /// Called just before a task is handed to its agent.
    ///
    /// # Arguments
    /// * `index` — 1-indexed task position
    /// * `total` — number of tasks in the pipeline
    /// * `task`  — task name
    /// * `role`  — role of the agent executing the task
    fn on_task_start(&self, index: usize, total: usize, task: &str, role: &str) {
        let _ = (index, total, task, role);
    }

    /// Called when a task produced its output.
    ///
    /// `output_len` is the byte length of the agent's answer.
    fn on_task_complete(&self, index: usize, total: usize, task: &str, output_len: usize) {
        let _ = (index, total, task, output_len);
    }

    /// Called when a task failed. The pipeline aborts right after.
    fn on_task_error(&self, index: usize, total: usize, task: &str, error: &str) {
        let _ = (index, total, task, error);
    }

    /// Called once the pipeline finished, successfully or not.
    ///
    /// # Arguments
    /// * `total`     — tasks in the pipeline
    /// * `completed` — tasks that finished without error
    fn on_pipeline_complete(&self, total: usize, completed: usize) {
        let _ = (total, completed);
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl PipelineProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::CrewConfig`].
pub type ProgressCallback = Arc<dyn PipelineProgressCallback>;
