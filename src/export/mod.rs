//! Exporters: write finished content as HTML and/or PDF files.
//!
//! Both formats are rendered fully in memory, then written atomically
//! (temp file in the target directory + rename) so a failed run never leaves
//! a half-written file behind.

pub mod html;
pub mod markdown;
pub mod pdf;

use crate::config::OutputFormat;
use crate::error::ContentCrewError;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

pub use html::render_html;
pub use markdown::strip_markdown;
pub use pdf::render_pdf;

/// Paths of the files written by one export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedFiles {
    pub html: Option<PathBuf>,
    pub pdf: Option<PathBuf>,
}

impl ExportedFiles {
    /// Every written path, PDF first.
    pub fn paths(&self) -> Vec<&Path> {
        self.pdf
            .iter()
            .chain(self.html.iter())
            .map(PathBuf::as_path)
            .collect()
    }
}

/// Write `<dir>/<stem>.html`.
pub fn export_html(
    title: &str,
    text: &str,
    dir: &Path,
    stem: &str,
) -> Result<PathBuf, ContentCrewError> {
    let path = dir.join(format!("{stem}.html"));
    write_atomic(&path, render_html(title, text).as_bytes())?;
    info!("Wrote {}", path.display());
    Ok(path)
}

/// Write `<dir>/<stem>.pdf`.
pub fn export_pdf(
    title: &str,
    text: &str,
    dir: &Path,
    stem: &str,
) -> Result<PathBuf, ContentCrewError> {
    let path = dir.join(format!("{stem}.pdf"));
    let bytes = render_pdf(title, text).map_err(|e| ContentCrewError::PdfRenderFailed {
        path: path.clone(),
        detail: e.to_string(),
    })?;
    write_atomic(&path, &bytes)?;
    info!("Wrote {}", path.display());
    Ok(path)
}

/// Write the formats selected by `format` into `dir`.
pub fn export(
    title: &str,
    text: &str,
    dir: &Path,
    stem: &str,
    format: OutputFormat,
) -> Result<ExportedFiles, ContentCrewError> {
    let mut files = ExportedFiles::default();
    if format.wants_pdf() {
        files.pdf = Some(export_pdf(title, text, dir, stem)?);
    }
    if format.wants_html() {
        files.html = Some(export_html(title, text, dir, stem)?);
    }
    Ok(files)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ContentCrewError> {
    let write_failed = |source: std::io::Error| ContentCrewError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(write_failed)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_failed)?;
    tmp.write_all(bytes).map_err(write_failed)?;
    tmp.persist(path).map_err(|e| write_failed(e.error))?;
    Ok(())
}
