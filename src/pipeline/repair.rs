//! Script repair: recover Devanagari text that was decoded with the wrong codec.
//!
//! Legacy Hindi PDFs often embed text in 8-bit font encodings. Extracted via a
//! Latin-1/cp1252 view, every glyph turns into a short mojibake sequence such
//! as `Ã‰` or `Ãº`. Repair runs in stages and stops at the first candidate
//! whose printable ratio exceeds [`PRINTABLE_THRESHOLD`]:
//!
//! ```text
//! markers? ──yes──▶ substitution table ──▶ ISCII decode ──▶ (ratio > 0.8) ✓
//!    │                                                          │ no
//!    ▼ no                                                       ▼
//! statistical detector (confidence > 0.8 and ratio > 0.8) ──────▶ ✓
//!    │ no
//!    ▼
//! codec cascade utf-8 → utf-16 → utf-32 → iso-8859-1 → windows-1252
//!               → ascii → iso-8859-15 → mac-roman ──────────────▶ ✓
//!    │ none
//!    ▼
//! lossy UTF-8 of the original input
//! ```
//!
//! None of these stages can fail; the worst case is the lossy decode.

use crate::pipeline::detect::detect_encoding;
use crate::pipeline::normalize::printable_ratio;
use encoding_rs::{Encoding, ISO_8859_15, MACINTOSH, UTF_16BE, UTF_16LE, WINDOWS_1252};
use std::borrow::Cow;
use std::fmt;
use tracing::debug;

/// A candidate decode is accepted when its printable ratio is above this.
pub const PRINTABLE_THRESHOLD: f64 = 0.8;

/// Minimum detector confidence before its guess is even tried.
pub const CONFIDENCE_THRESHOLD: f32 = 0.8;

/// Substrings that mark text as mis-decoded Devanagari.
pub const INDIC_MARKERS: &[&str] = &["Ã‰", "Ãº", "Ã¹", "Ã¾", "Ã²", "Ã¤", "Ã¦", "ÃŽ", "Ãµ"];

/// Ordered substitution table, applied in declaration order.
///
/// Each key appears once, at the position of its first declaration.
/// `P`, `(R)` and `+/-` are font-specific glyph slots in the source PDFs.
pub const DEVANAGARI_REPAIRS: &[(&str, &str)] = &[
    ("(R)", "र"),
    ("+/-", "ल"),
    ("Ã‰", "ा"),
    ("Ã¨", "ै"),
    ("Ãº", "र"),
    ("Ã¹", "द"),
    ("Ã¾", "ह"),
    ("Ã²", "क"),
    ("Ã¤", "े"),
    ("Ã¦", "ो"),
    ("ÃŽ", "ि"),
    ("Ãµ", "ट"),
    ("Â¨", "म"),
    ("Â½", "ह"),
    ("ÃŠ", "ि"),
    ("Âº", "स"),
    ("Ã†", "ं"),
    ("Ã‡", "च"),
    ("Âª", "य"),
    ("Â¦", "भ"),
    ("P", "श"),
    ("Ã¿", "ह"),
    ("Ã’", "ी"),
    ("Ã“", "ी"),
    ("Ã”", "ी"),
    ("Ã•", "ी"),
    ("Ã–", "ी"),
    ("Ã—", "ी"),
    ("Ã˜", "ी"),
    ("Ã™", "ी"),
    ("Ãš", "ी"),
    ("Ã›", "ी"),
    ("Ãœ", "ी"),
    ("Ã\u{9d}", "ी"),
    ("Ãž", "ी"),
    ("ÃŸ", "ी"),
    ("Ã\u{a0}", "ी"),
    ("Ã¡", "ी"),
    ("Ã¢", "ी"),
    ("Ã£", "ी"),
    ("Ã¥", "े"),
    ("Ã§", "ो"),
    ("Ã©", "ै"),
    ("Ãª", "ै"),
    ("Ã«", "ै"),
    ("Ã¬", "ै"),
    ("Ã\u{ad}", "ै"),
    ("Ã®", "ै"),
    ("Ã¯", "ै"),
    ("Ã°", "ै"),
    ("Ã±", "ै"),
    ("Ã³", "क"),
    ("Ã´", "क"),
    ("Ã¶", "ट"),
    ("Ã·", "ट"),
    ("Ã¸", "ट"),
    ("Ã»", "र"),
    ("Ã¼", "र"),
    ("Ã½", "र"),
];

// ── Public API ───────────────────────────────────────────────────────────────

/// Which stage produced a repaired string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairStage {
    /// Input was empty.
    Empty,
    /// Marker substitution followed by the ISCII decode.
    Script,
    /// The statistical detector's guess.
    Detected(Codec),
    /// A codec from the fallback cascade.
    Fallback(Codec),
    /// Nothing qualified; lossy UTF-8 of the input.
    Lossy,
}

impl fmt::Display for RepairStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepairStage::Empty => write!(f, "empty"),
            RepairStage::Script => write!(f, "devanagari repair"),
            RepairStage::Detected(c) => write!(f, "detected {}", c.name()),
            RepairStage::Fallback(c) => write!(f, "fallback {}", c.name()),
            RepairStage::Lossy => write!(f, "lossy utf-8"),
        }
    }
}

/// Repaired text together with the stage that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repaired {
    pub text: String,
    pub stage: RepairStage,
}

/// Repair a decoded-or-garbled string.
pub fn repair_text(text: &str) -> String {
    repair_text_detailed(text).text
}

/// Repair raw bytes. Valid UTF-8 goes through the full marker check; anything
/// else skips straight to detection and the codec cascade.
pub fn repair_bytes(bytes: &[u8]) -> String {
    repair_bytes_detailed(bytes).text
}

/// Like [`repair_text`], reporting the stage that produced the result.
pub fn repair_text_detailed(text: &str) -> Repaired {
    if text.is_empty() {
        return Repaired {
            text: String::new(),
            stage: RepairStage::Empty,
        };
    }

    let mut candidate = Cow::Borrowed(text);
    if has_indic_markers(text) {
        let substituted = apply_repairs(text);
        let decoded = decode_iscii(&substituted);
        let ratio = printable_ratio(&decoded);
        if ratio > PRINTABLE_THRESHOLD {
            debug!("Devanagari repair accepted (printable ratio {:.2})", ratio);
            return Repaired {
                text: decoded,
                stage: RepairStage::Script,
            };
        }
        debug!("Devanagari repair rejected (printable ratio {:.2})", ratio);
        candidate = Cow::Owned(substituted);
    }

    decode_candidates(candidate.as_bytes()).unwrap_or_else(|| lossy(text.as_bytes()))
}

/// Like [`repair_bytes`], reporting the stage that produced the result.
pub fn repair_bytes_detailed(bytes: &[u8]) -> Repaired {
    match std::str::from_utf8(bytes) {
        Ok(text) => repair_text_detailed(text),
        Err(_) => decode_candidates(bytes).unwrap_or_else(|| lossy(bytes)),
    }
}

/// Whether any of [`INDIC_MARKERS`] occurs in `text`.
pub fn has_indic_markers(text: &str) -> bool {
    INDIC_MARKERS.iter().any(|m| text.contains(m))
}

/// Apply [`DEVANAGARI_REPAIRS`] in declaration order.
pub fn apply_repairs(text: &str) -> String {
    let mut out = text.to_string();
    for (pattern, replacement) in DEVANAGARI_REPAIRS {
        if out.contains(pattern) {
            out = out.replace(pattern, replacement);
        }
    }
    out
}

// ── ISCII ────────────────────────────────────────────────────────────────────

/// ISCII-91 Devanagari, bytes 0xA1..=0xFA. `None` marks unassigned slots.
const ISCII_DEVANAGARI: [Option<char>; 90] = [
    Some('\u{0901}'), Some('\u{0902}'), Some('\u{0903}'), Some('\u{0905}'), // A1-A4
    Some('\u{0906}'), Some('\u{0907}'), Some('\u{0908}'), Some('\u{0909}'), // A5-A8
    Some('\u{090A}'), Some('\u{090B}'), Some('\u{090E}'), Some('\u{090F}'), // A9-AC
    Some('\u{0910}'), Some('\u{090D}'), Some('\u{0912}'), Some('\u{0913}'), // AD-B0
    Some('\u{0914}'), Some('\u{0911}'), Some('\u{0915}'), Some('\u{0916}'), // B1-B4
    Some('\u{0917}'), Some('\u{0918}'), Some('\u{0919}'), Some('\u{091A}'), // B5-B8
    Some('\u{091B}'), Some('\u{091C}'), Some('\u{091D}'), Some('\u{091E}'), // B9-BC
    Some('\u{091F}'), Some('\u{0920}'), Some('\u{0921}'), Some('\u{0922}'), // BD-C0
    Some('\u{0923}'), Some('\u{0924}'), Some('\u{0925}'), Some('\u{0926}'), // C1-C4
    Some('\u{0927}'), Some('\u{0928}'), Some('\u{0929}'), Some('\u{092A}'), // C5-C8
    Some('\u{092B}'), Some('\u{092C}'), Some('\u{092D}'), Some('\u{092E}'), // C9-CC
    Some('\u{092F}'), Some('\u{095F}'), Some('\u{0930}'), Some('\u{0931}'), // CD-D0
    Some('\u{0932}'), Some('\u{0933}'), Some('\u{0934}'), Some('\u{0935}'), // D1-D4
    Some('\u{0936}'), Some('\u{0937}'), Some('\u{0938}'), Some('\u{0939}'), // D5-D8
    None,             Some('\u{093E}'), Some('\u{093F}'), Some('\u{0940}'), // D9-DC
    Some('\u{0941}'), Some('\u{0942}'), Some('\u{0943}'), Some('\u{0946}'), // DD-E0
    Some('\u{0947}'), Some('\u{0948}'), Some('\u{0945}'), Some('\u{094A}'), // E1-E4
    Some('\u{094B}'), Some('\u{094C}'), Some('\u{0949}'), Some('\u{094D}'), // E5-E8
    Some('\u{093C}'), Some('\u{0964}'), None,             None,             // E9-EC
    None,             None,             None,             None,             // ED-F0
    Some('\u{0966}'), Some('\u{0967}'), Some('\u{0968}'), Some('\u{0969}'), // F1-F4
    Some('\u{096A}'), Some('\u{096B}'), Some('\u{096C}'), Some('\u{096D}'), // F5-F8
    Some('\u{096E}'), Some('\u{096F}'),                                     // F9-FA
];

/// Reinterpret leftover Latin-1 code points in 0xA1..=0xFA as ISCII bytes.
/// Everything else, including unassigned slots, passes through.
fn decode_iscii(text: &str) -> String {
    text.chars()
        .map(|c| {
            let cp = c as u32;
            if (0xA1..=0xFA).contains(&cp) {
                ISCII_DEVANAGARI[(cp - 0xA1) as usize].unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}

// ── Codecs ───────────────────────────────────────────────────────────────────

/// A strict (non-replacing) decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    Utf8,
    /// BOM-aware, little-endian when no BOM is present.
    Utf16,
    /// BOM-aware, little-endian when no BOM is present.
    Utf32,
    /// True ISO-8859-1: every byte maps to the code point of the same value.
    Latin1,
    Ascii,
    /// Any single-byte WHATWG encoding from `encoding_rs`.
    Whatwg(&'static Encoding),
}

impl Codec {
    pub fn name(&self) -> &'static str {
        match self {
            Codec::Utf8 => "utf-8",
            Codec::Utf16 => "utf-16",
            Codec::Utf32 => "utf-32",
            Codec::Latin1 => "iso-8859-1",
            Codec::Ascii => "ascii",
            Codec::Whatwg(enc) if *enc == MACINTOSH => "mac-roman",
            Codec::Whatwg(enc) => enc.name(),
        }
    }

    /// Map a detector label onto a codec. Unknown labels yield `None`.
    pub fn from_label(label: &str) -> Option<Codec> {
        let label = label.trim().to_ascii_lowercase();
        match label.as_str() {
            "utf-8" | "utf8" => Some(Codec::Utf8),
            "utf-16" | "utf16" | "utf-16le" => Some(Codec::Utf16),
            "utf-16be" => Some(Codec::Whatwg(UTF_16BE)),
            "utf-32" | "utf32" | "utf-32le" | "utf-32be" => Some(Codec::Utf32),
            "iso-8859-1" | "latin1" | "latin-1" => Some(Codec::Latin1),
            "ascii" | "us-ascii" => Some(Codec::Ascii),
            "mac-roman" | "macroman" | "macintosh" => Some(Codec::Whatwg(MACINTOSH)),
            other => Encoding::for_label(other.as_bytes()).map(Codec::Whatwg),
        }
    }

    /// Decode `bytes` strictly; any malformed sequence yields `None`.
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            Codec::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_owned),
            Codec::Utf16 => {
                let (enc, body) = match bytes {
                    [0xFF, 0xFE, rest @ ..] => (UTF_16LE, rest),
                    [0xFE, 0xFF, rest @ ..] => (UTF_16BE, rest),
                    _ => (UTF_16LE, bytes),
                };
                enc.decode_without_bom_handling_and_without_replacement(body)
                    .map(Cow::into_owned)
            }
            Codec::Utf32 => decode_utf32(bytes),
            Codec::Latin1 => Some(bytes.iter().map(|&b| b as char).collect()),
            Codec::Ascii => bytes
                .is_ascii()
                .then(|| bytes.iter().map(|&b| b as char).collect()),
            Codec::Whatwg(enc) => enc
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(Cow::into_owned),
        }
    }
}

/// The generic cascade, tried in this order.
pub fn fallback_codecs() -> [Codec; 8] {
    [
        Codec::Utf8,
        Codec::Utf16,
        Codec::Utf32,
        Codec::Latin1,
        Codec::Whatwg(WINDOWS_1252),
        Codec::Ascii,
        Codec::Whatwg(ISO_8859_15),
        Codec::Whatwg(MACINTOSH),
    ]
}

fn decode_utf32(bytes: &[u8]) -> Option<String> {
    let (big_endian, body) = match bytes {
        [0xFF, 0xFE, 0x00, 0x00, rest @ ..] => (false, rest),
        [0x00, 0x00, 0xFE, 0xFF, rest @ ..] => (true, rest),
        _ => (false, bytes),
    };
    if body.len() % 4 != 0 {
        return None;
    }
    body.chunks_exact(4)
        .map(|c| {
            let quad = [c[0], c[1], c[2], c[3]];
            let cp = if big_endian {
                u32::from_be_bytes(quad)
            } else {
                u32::from_le_bytes(quad)
            };
            char::from_u32(cp)
        })
        .collect()
}

// ── Candidate selection ──────────────────────────────────────────────────────

/// Detector guess first, then the cascade. `None` when nothing qualifies.
fn decode_candidates(bytes: &[u8]) -> Option<Repaired> {
    let guess = detect_encoding(bytes);
    if guess.confidence > CONFIDENCE_THRESHOLD {
        if let Some(codec) = Codec::from_label(&guess.encoding) {
            if let Some(text) = accept(codec, bytes) {
                debug!("Detector guess {} accepted", guess);
                return Some(Repaired {
                    text,
                    stage: RepairStage::Detected(codec),
                });
            }
            debug!("Detector guess {} rejected by printable ratio", guess);
        }
    }

    fallback_codecs().into_iter().find_map(|codec| {
        accept(codec, bytes).map(|text| {
            debug!("Fallback codec {} accepted", codec.name());
            Repaired {
                text,
                stage: RepairStage::Fallback(codec),
            }
        })
    })
}

fn accept(codec: Codec, bytes: &[u8]) -> Option<String> {
    codec
        .decode(bytes)
        .filter(|text| printable_ratio(text) > PRINTABLE_THRESHOLD)
}

fn lossy(bytes: &[u8]) -> Repaired {
    debug!("No decode qualified; using lossy UTF-8");
    Repaired {
        text: String::from_utf8_lossy(bytes).into_owned(),
        stage: RepairStage::Lossy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input() {
        assert_eq!(repair_text(""), "");
        assert_eq!(repair_bytes(b""), "");
        assert_eq!(repair_text_detailed("").stage, RepairStage::Empty);
    }

    #[test]
    fn plain_text_passes_through() {
        let text = "Quarterly report on soil moisture, 2023 season.";
        assert_eq!(repair_text(text), text);
    }

    #[test]
    fn utf8_devanagari_passes_through() {
        let text = "भारत एक विशाल देश है";
        assert_eq!(repair_text(text), text);
    }

    #[test]
    fn markers_trigger_substitution() {
        assert!(has_indic_markers("xÃ‰y"));
        assert!(!has_indic_markers("plain"));
        let out = repair_text_detailed("Ãº Ã‰");
        assert_eq!(out.text, "र ा");
        assert_eq!(out.stage, RepairStage::Script);
    }

    #[test]
    fn capital_p_maps_to_sha_inside_repaired_text() {
        assert_eq!(repair_text("Ã‰P"), "ाश");
    }

    #[test]
    fn capital_p_untouched_without_markers() {
        assert_eq!(repair_text("Pune"), "Pune");
    }

    #[test]
    fn leftover_latin1_decoded_as_iscii() {
        // U+00B3 is ISCII 0xB3 (KA).
        assert_eq!(repair_text("Ã‰\u{B3}"), "ाक");
    }

    #[test]
    fn table_keeps_first_position() {
        let keys: Vec<&str> = DEVANAGARI_REPAIRS.iter().map(|(k, _)| *k).collect();
        let mut dedup = keys.clone();
        dedup.sort_unstable();
        dedup.dedup();
        assert_eq!(keys.len(), dedup.len(), "duplicate keys in repair table");
        assert_eq!(keys[0], "(R)");
        assert_eq!(keys[2], "Ã‰");
    }

    #[test]
    fn iscii_table_shape() {
        assert_eq!(ISCII_DEVANAGARI[0], Some('\u{0901}'));
        assert_eq!(ISCII_DEVANAGARI[0xD9 - 0xA1], None);
        assert_eq!(ISCII_DEVANAGARI[0xFA - 0xA1], Some('\u{096F}'));
    }

    #[test]
    fn unprintable_input_falls_back_to_lossy() {
        let text = "\u{1}\u{2}\u{3}";
        let out = repair_text_detailed(text);
        assert_eq!(out.text, text);
        assert_eq!(out.stage, RepairStage::Lossy);
    }

    #[test]
    fn non_utf8_bytes_use_cascade() {
        let out = repair_bytes(b"caf\xe9!");
        assert!(out.starts_with("caf"));
        assert!(out.ends_with('!'));
        assert!(printable_ratio(&out) > PRINTABLE_THRESHOLD);
    }

    #[test]
    fn escape_bytes_are_repaired() {
        let out = repair_text("\u{1b}[1mbold");
        assert!(out.contains("bold"));

        let out = repair_bytes(b"Intro \x1b text");
        assert!(out.starts_with("Intro"));
        assert!(printable_ratio(&out) > PRINTABLE_THRESHOLD);

        let out = repair_bytes(b"\x1b[1m\xa0\x1b[0m");
        let lossy = String::from_utf8_lossy(b"\x1b[1m\xa0\x1b[0m");
        assert!(printable_ratio(&out) > PRINTABLE_THRESHOLD || out == lossy);
    }

    #[test]
    fn pseudo_random_bytes_printable_or_lossy() {
        // xorshift64, fixed seed; small alphabets so ESC and NBSP show up often.
        let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
        let mut next = || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state
        };
        let alphabet: &[u8] = &[b'a', b' ', b'[', b'1', 0x1b, 0xa0, 0x00, 0xe9, 0xc3];
        for _ in 0..2000 {
            let len = (next() % 24) as usize;
            let bytes: Vec<u8> = (0..len)
                .map(|_| {
                    let r = next();
                    if r % 4 == 0 {
                        (r >> 8) as u8
                    } else {
                        alphabet[(r >> 8) as usize % alphabet.len()]
                    }
                })
                .collect();
            let out = repair_bytes(&bytes);
            let lossy = String::from_utf8_lossy(&bytes);
            assert!(
                out.is_empty() || printable_ratio(&out) > PRINTABLE_THRESHOLD || out == lossy,
                "bad repair for {bytes:?}: {out:?}"
            );
        }
    }

    #[test]
    fn output_printable_or_lossy() {
        let inputs: [&[u8]; 6] = [
            b"hello world",
            b"\x00\x01\x02\x03\x04",
            b"\xff\xfe\xfd",
            "Ã‰Ãº\u{1}\u{2}\u{3}\u{4}\u{5}\u{6}\u{7}\u{8}".as_bytes(),
            b"caf\xe9 cr\xe8me",
            "नमस्ते".as_bytes(),
        ];
        for bytes in inputs {
            let out = repair_bytes(bytes);
            let lossy = String::from_utf8_lossy(bytes);
            assert!(
                printable_ratio(&out) > PRINTABLE_THRESHOLD || out == lossy,
                "bad repair for {bytes:?}: {out:?}"
            );
        }
    }

    #[test]
    fn codec_decoding() {
        assert_eq!(Codec::Utf16.decode(&[0xFF, 0xFE, b'h', 0, b'i', 0]).as_deref(), Some("hi"));
        assert_eq!(Codec::Utf16.decode(&[b'h', 0, b'i']), None);
        assert_eq!(Codec::Utf32.decode(&[b'A', 0, 0, 0]).as_deref(), Some("A"));
        assert_eq!(Codec::Utf32.decode(&[0, 0, 0xFE, 0xFF, 0, 0, 0, b'B']).as_deref(), Some("B"));
        assert_eq!(Codec::Latin1.decode(&[0xE9]).as_deref(), Some("é"));
        assert_eq!(Codec::Ascii.decode(&[0xE9]), None);
        assert_eq!(Codec::Whatwg(WINDOWS_1252).decode(&[0x93]).as_deref(), Some("\u{201C}"));
        assert_eq!(Codec::Whatwg(MACINTOSH).decode(&[0x8E]).as_deref(), Some("é"));
    }

    #[test]
    fn codec_labels() {
        assert_eq!(Codec::from_label("UTF-8"), Some(Codec::Utf8));
        assert_eq!(Codec::from_label("ISO-8859-1"), Some(Codec::Latin1));
        assert_eq!(Codec::from_label("windows-1252"), Some(Codec::Whatwg(WINDOWS_1252)));
        assert_eq!(Codec::from_label("no-such-codec"), None);
        assert_eq!(Codec::Whatwg(MACINTOSH).name(), "mac-roman");
        assert_eq!(fallback_codecs()[0], Codec::Utf8);
        assert_eq!(fallback_codecs()[7].name(), "mac-roman");
    }
}
