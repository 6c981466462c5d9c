//! End-to-end workflows built from the pipeline stages, agents and exporters.
//!
//! - [`blog`]: generate a post from a brief, then analyse, score and export it
//! - [`research`]: turn a research PDF into an exported document

pub mod blog;
pub mod research;
