//! Encoding detection: statistical charset guess plus a byte-pattern report.
//!
//! The guess comes from the `chardet` crate (a port of the universal charset
//! detector). It never fails: empty input is reported as ASCII and an
//! unrecognised buffer as low-confidence UTF-8. The byte-pattern report is a
//! cheap diagnostic shown by `content-crew inspect`.
//!
//! 7-bit input containing ESC never reaches `chardet`: its detector has no
//! result for that state and panics in `close`. Such buffers are matched
//! against the ISO-2022 designator sequences here instead.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bytes shown in the hex / binary / ASCII previews.
const PREVIEW_LEN: usize = 20;

/// Bytes scanned for the pattern flags.
const SCAN_LEN: usize = 100;

/// A statistical guess at a byte buffer's character encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodingGuess {
    /// Lower-cased encoding label (e.g. `utf-8`, `windows-1252`).
    pub encoding: String,
    /// Detector confidence in `[0, 1]`.
    pub confidence: f32,
}

impl fmt::Display for EncodingGuess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.0}%)", self.encoding, self.confidence * 100.0)
    }
}

/// Guess the encoding of `bytes`.
pub fn detect_encoding(bytes: &[u8]) -> EncodingGuess {
    if bytes.is_empty() {
        return EncodingGuess {
            encoding: "ascii".to_string(),
            confidence: 1.0,
        };
    }

    if is_escaped_ascii(bytes) {
        return detect_iso2022(bytes).unwrap_or_else(|| EncodingGuess {
            encoding: "utf-8".to_string(),
            confidence: 0.0,
        });
    }

    let (charset, confidence, _language) = chardet::detect(bytes);
    let encoding = charset.trim().to_ascii_lowercase();
    if encoding.is_empty() {
        return EncodingGuess {
            encoding: "utf-8".to_string(),
            confidence: 0.0,
        };
    }

    EncodingGuess {
        encoding,
        confidence: confidence.clamp(0.0, 1.0),
    }
}

// ── Escape sequences ─────────────────────────────────────────────────────────

/// Confidence reported for a matched ISO-2022 designator.
const ESCAPE_CONFIDENCE: f32 = 0.99;

/// Designator sequences and the encoding they announce.
const ISO2022_DESIGNATORS: &[(&[u8], &str)] = &[
    (b"\x1b$B", "iso-2022-jp"),
    (b"\x1b$@", "iso-2022-jp"),
    (b"\x1b(J", "iso-2022-jp"),
    (b"\x1b$(D", "iso-2022-jp"),
    (b"\x1b$)C", "iso-2022-kr"),
    (b"\x1b$)A", "iso-2022-cn"),
    (b"\x1b$)G", "iso-2022-cn"),
    (b"\x1b$*H", "iso-2022-cn"),
];

/// No high bytes (NBSP aside) and at least one ESC.
fn is_escaped_ascii(bytes: &[u8]) -> bool {
    bytes.contains(&0x1b) && bytes.iter().all(|&b| b < 0x80 || b == 0xa0)
}

fn detect_iso2022(bytes: &[u8]) -> Option<EncodingGuess> {
    bytes
        .iter()
        .enumerate()
        .filter(|&(_, &b)| b == 0x1b)
        .find_map(|(i, _)| {
            ISO2022_DESIGNATORS
                .iter()
                .find(|(seq, _)| bytes[i..].starts_with(seq))
        })
        .map(|&(_, encoding)| EncodingGuess {
            encoding: encoding.to_string(),
            confidence: ESCAPE_CONFIDENCE,
        })
}

// ── Byte patterns ────────────────────────────────────────────────────────────

/// Previews of the leading bytes and a few cheap encoding hints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BytePatterns {
    /// Space-separated hex of the first 20 bytes.
    pub hex: String,
    /// Space-separated 8-bit binary of the first 20 bytes.
    pub binary: String,
    /// First 20 bytes with non-printable ASCII shown as `.`.
    pub ascii: String,
    /// A byte ≥ 0x80 appears in the first 100 bytes (possible UTF-8).
    pub high_bit: bool,
    /// Every one of the first 100 bytes is 7-bit ASCII.
    pub all_ascii: bool,
    /// A NUL byte appears in the first 100 bytes (possible UTF-16).
    pub has_nul: bool,
}

/// Inspect the leading bytes of `bytes`.
pub fn byte_patterns(bytes: &[u8]) -> BytePatterns {
    let preview = &bytes[..bytes.len().min(PREVIEW_LEN)];
    let scan = &bytes[..bytes.len().min(SCAN_LEN)];

    let hex = preview
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ");
    let binary = preview
        .iter()
        .map(|b| format!("{b:08b}"))
        .collect::<Vec<_>>()
        .join(" ");
    let ascii = preview
        .iter()
        .map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '.'
            }
        })
        .collect();

    BytePatterns {
        hex,
        binary,
        ascii,
        high_bit: scan.iter().any(|&b| b >= 0x80),
        all_ascii: scan.is_ascii(),
        has_nul: scan.contains(&0),
    }
}

/// Per-page diagnostic combining the statistical guess and byte patterns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodingReport {
    /// 1-indexed page number.
    pub page: usize,
    pub guess: EncodingGuess,
    pub patterns: BytePatterns,
}

impl EncodingReport {
    pub fn for_page(page: usize, bytes: &[u8]) -> Self {
        Self {
            page,
            guess: detect_encoding(bytes),
            patterns: byte_patterns(bytes),
        }
    }

    /// Human-readable hints derived from the pattern flags.
    pub fn hints(&self) -> Vec<&'static str> {
        let mut hints = Vec::new();
        if self.patterns.high_bit {
            hints.push("high-bit bytes present: possibly UTF-8");
        }
        if self.patterns.all_ascii {
            hints.push("all bytes are ASCII");
        }
        if self.patterns.has_nul {
            hints.push("NUL bytes present: possibly UTF-16");
        }
        hints
    }
}
