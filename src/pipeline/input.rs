//! Input resolution: turn a user-supplied path or URL into PDF bytes.
//!
//! `lopdf` parses from memory, so both local files and downloads end up as a
//! byte buffer. The `%PDF` magic is checked here so callers get a clear
//! [`ContentCrewError::NotAPdf`] instead of a parser error.

use crate::error::ContentCrewError;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A loaded PDF and where it came from.
#[derive(Debug, Clone)]
pub struct PdfInput {
    /// Path or URL as given by the user.
    pub origin: String,
    /// File stem used to name exported files (e.g. `report` for `report.pdf`).
    pub stem: String,
    pub bytes: Vec<u8>,
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Load the input as PDF bytes, downloading it first when it is a URL.
pub async fn load_input(input: &str, timeout_secs: u64) -> Result<PdfInput, ContentCrewError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ContentCrewError::InvalidInput {
            input: input.to_string(),
        });
    }
    if is_url(input) {
        download_url(input, timeout_secs).await
    } else {
        load_local(input)
    }
}

/// Read a local file, validating existence, permissions and PDF magic bytes.
fn load_local(path_str: &str) -> Result<PdfInput, ContentCrewError> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(ContentCrewError::FileNotFound { path });
    }

    let bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(ContentCrewError::PermissionDenied { path });
        }
        Err(_) => return Err(ContentCrewError::FileNotFound { path }),
    };

    check_magic(&bytes, path_str)?;
    debug!("Loaded local PDF: {} ({} bytes)", path.display(), bytes.len());

    Ok(PdfInput {
        origin: path_str.to_string(),
        stem: stem_of(&path),
        bytes,
    })
}

/// Download a URL into memory.
async fn download_url(url: &str, timeout_secs: u64) -> Result<PdfInput, ContentCrewError> {
    info!("Downloading PDF from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ContentCrewError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            ContentCrewError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            ContentCrewError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(ContentCrewError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ContentCrewError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?
        .to_vec();

    check_magic(&bytes, url)?;
    info!("Downloaded {} bytes", bytes.len());

    Ok(PdfInput {
        origin: url.to_string(),
        stem: stem_from_url(url),
        bytes,
    })
}

fn check_magic(bytes: &[u8], origin: &str) -> Result<(), ContentCrewError> {
    if bytes.starts_with(b"%PDF") {
        Ok(())
    } else {
        Err(ContentCrewError::NotAPdf {
            origin: origin.to_string(),
            magic: bytes.iter().take(4).copied().collect(),
        })
    }
}

fn stem_of(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("document")
        .to_string()
}

/// File stem from the last URL path segment, or `document`.
fn stem_from_url(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .filter(|last| !last.is_empty())
        .map(|last| stem_of(Path::new(&last)))
        .unwrap_or_else(|| "document".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/doc.pdf"));
        assert!(is_url("http://example.com/doc.pdf"));
        assert!(!is_url("/tmp/doc.pdf"));
        assert!(!is_url("doc.pdf"));
        assert!(!is_url(""));
    }

    #[test]
    fn test_stem_from_url() {
        assert_eq!(stem_from_url("https://example.com/papers/report.pdf"), "report");
        assert_eq!(stem_from_url("https://example.com/"), "document");
        assert_eq!(stem_from_url("not a url"), "document");
    }

    #[tokio::test]
    async fn missing_file() {
        let err = load_input("/definitely/not/here.pdf", 5).await.unwrap_err();
        assert!(matches!(err, ContentCrewError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn blank_input() {
        let err = load_input("   ", 5).await.unwrap_err();
        assert!(matches!(err, ContentCrewError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn rejects_non_pdf() {
        let mut f = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        f.write_all(b"PK\x03\x04 zip archive").unwrap();
        let err = load_input(f.path().to_str().unwrap(), 5).await.unwrap_err();
        match err {
            ContentCrewError::NotAPdf { magic, .. } => assert_eq!(magic, b"PK\x03\x04".to_vec()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn loads_local_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.pdf");
        std::fs::write(&path, b"%PDF-1.4\n%%EOF\n").unwrap();
        let input = load_input(path.to_str().unwrap(), 5).await.unwrap();
        assert_eq!(input.stem, "notes");
        assert!(input.bytes.starts_with(b"%PDF"));
    }
}
