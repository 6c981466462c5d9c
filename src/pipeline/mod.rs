//! Document ingestion stages for research conversion.
//!
//! Each submodule implements exactly one transformation step so every stage
//! can be tested on its own.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ detect ──▶ repair ──▶ normalize ──▶ translate
//! (path/URL) (lopdf)   (chardet)  (Devanagari) (cleanup)    (LLM, optional)
//! ```
//!
//! 1. [`input`]     — load the user-supplied path or URL as PDF bytes
//! 2. [`extract`]   — pull per-page text out of the PDF
//! 3. [`detect`]    — statistical encoding guess and byte-pattern diagnostics
//! 4. [`repair`]    — undo mis-decoded Devanagari, else pick the best codec
//! 5. [`normalize`] — deterministic whitespace and mojibake cleanup
//! 6. [`translate`] — best-effort translation to English; the only stage
//!    with network I/O besides URL download

pub mod detect;
pub mod extract;
pub mod input;
pub mod normalize;
pub mod repair;
pub mod translate;
