//! Text normalisation: deterministic cleanup of extracted page text.
//!
//! PDF text extraction leaves behind control characters, ragged whitespace and
//! the classic UTF-8-read-as-cp1252 artefacts (`â€™` for `'`). This module
//! removes them with a fixed sequence of cheap passes. Every pass is a pure
//! `&str → String` function and the whole sequence is idempotent:
//! `normalize_text(normalize_text(x)) == normalize_text(x)`.
//!
//! ## Pass Order
//!
//! Non-printables go first so the whitespace passes never see stray control
//! characters. The artefact table runs to a fixpoint because removing `Ã‚`
//! can join two halves of another artefact. Whitespace is collapsed again
//! afterwards since an emptied artefact can leave two spaces side by side.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_properties::{GeneralCategoryGroup, UnicodeGeneralCategory};

/// Normalise extracted text.
///
/// Passes (applied in order):
/// 1. Drop every non-printable character except `\n` and `\t`
/// 2. Collapse horizontal whitespace runs; drop spaces around newlines
/// 3. Replace known mojibake artefacts until nothing changes
/// 4. Collapse horizontal whitespace again
/// 5. Collapse runs of blank lines into exactly one blank line
/// 6. Trim leading and trailing whitespace
pub fn normalize_text(input: &str) -> String {
    let s = strip_non_printable(input);
    let s = collapse_whitespace(&s);
    let s = replace_artifacts(&s);
    let s = collapse_whitespace(&s);
    let s = collapse_blank_lines(&s);
    s.trim().to_string()
}

// ── Printability ─────────────────────────────────────────────────────────────

/// Whether `c` is printable.
///
/// A plain space is printable. Every other separator (`Z*`) and every
/// control, format, surrogate, private-use or unassigned code point (`C*`)
/// is not.
pub fn is_printable(c: char) -> bool {
    c == ' '
        || !matches!(
            c.general_category_group(),
            GeneralCategoryGroup::Separator | GeneralCategoryGroup::Other
        )
}

/// Fraction of printable characters in `text`, in `[0, 1]`.
///
/// Returns 0.0 for the empty string so an empty decode never wins a
/// quality comparison.
pub fn printable_ratio(text: &str) -> f64 {
    let mut total = 0usize;
    let mut printable = 0usize;
    for c in text.chars() {
        total += 1;
        if is_printable(c) {
            printable += 1;
        }
    }
    if total == 0 {
        0.0
    } else {
        printable as f64 / total as f64
    }
}

// ── Pass 1: Strip non-printable characters ───────────────────────────────────

fn strip_non_printable(input: &str) -> String {
    input
        .chars()
        .filter(|&c| c == '\n' || c == '\t' || is_printable(c))
        .collect()
}

// ── Pass 2/4: Collapse horizontal whitespace ─────────────────────────────────

static RE_HSPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());
static RE_SPACE_AROUND_NEWLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r" *\n *").unwrap());

fn collapse_whitespace(input: &str) -> String {
    let s = RE_HSPACE.replace_all(input, " ");
    RE_SPACE_AROUND_NEWLINE.replace_all(&s, "\n").into_owned()
}

// ── Pass 3: Mojibake artefacts ───────────────────────────────────────────────

/// Ordered artefact table. Longer sequences come before their prefixes.
pub const ARTIFACTS: &[(&str, &str)] = &[
    ("Ã¢â‚¬â„¢", "'"),
    ("Ã¢â‚¬Å“", "\""),
    ("Ã¢â‚¬", "\""),
    ("Ã‚", ""),
    ("â€™", "'"),
    ("â€œ", "\""),
    ("â€", "\""),
    ("degÃ¼", "deg"),
    ("(c)", "©"),
];

/// Apply [`ARTIFACTS`] repeatedly until a full pass changes nothing.
///
/// Every replacement is shorter than its pattern, so this terminates.
fn replace_artifacts(input: &str) -> String {
    let mut current = input.to_string();
    loop {
        let mut next = current.clone();
        for (pattern, replacement) in ARTIFACTS {
            if next.contains(pattern) {
                next = next.replace(pattern, replacement);
            }
        }
        if next == current {
            return current;
        }
        current = next;
    }
}

// ── Pass 5: Collapse blank lines ─────────────────────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n").into_owned()
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smart_quote_artifact() {
        assert_eq!(normalize_text("Ã¢â‚¬â„¢"), "'");
        assert_eq!(normalize_text("it Ã¢â‚¬â„¢s"), "it 's");
    }

    #[test]
    fn test_blank_lines_collapse_to_one() {
        assert_eq!(normalize_text("deg\n\n\nmore"), "deg\n\nmore");
        assert_eq!(normalize_text("a\n \n\t\n  \nb"), "a\n\nb");
    }

    #[test]
    fn test_single_newline_kept() {
        assert_eq!(normalize_text("line one\nline two"), "line one\nline two");
    }

    #[test]
    fn test_whitespace_collapse() {
        assert_eq!(normalize_text("  a \t  b   \n   c  "), "a b\nc");
    }

    #[test]
    fn test_control_chars_removed() {
        assert_eq!(normalize_text("a\u{0007}b\u{200B}c\u{FEFF}d\r"), "abcd");
    }

    #[test]
    fn test_artifact_table() {
        assert_eq!(normalize_text("â€œquotedâ€"), "\"quoted\"");
        assert_eq!(normalize_text("Ã‚ 25 degÃ¼C"), "25 degC");
        assert_eq!(normalize_text("(c) 2024"), "© 2024");
    }

    #[test]
    fn test_artifact_fixpoint() {
        // Removing the inner `Ã‚` exposes a second artefact.
        assert_eq!(normalize_text("â€Ã‚™"), "'");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "  Hello\u{0000}  world \n\n\n\n  next Ã¢â‚¬â„¢ para  ",
            "deg\n\n\nmore",
            "Ã‚ Ã‚ x",
            "tab\t\tsep\n \n \nend(c)",
            "",
            "\n\n\n",
            "नमस्ते  दुनिया",
        ];
        for s in samples {
            let once = normalize_text(s);
            assert_eq!(normalize_text(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn test_devanagari_untouched() {
        assert_eq!(normalize_text("नमस्ते दुनिया"), "नमस्ते दुनिया");
    }

    #[test]
    fn test_is_printable() {
        assert!(is_printable(' '));
        assert!(is_printable('a'));
        assert!(is_printable('न'));
        assert!(!is_printable('\n'));
        assert!(!is_printable('\u{00A0}'));
        assert!(!is_printable('\u{200D}'));
        assert!(!is_printable('\u{E000}'));
    }

    #[test]
    fn test_format_and_unassigned_not_printable() {
        for c in ['\u{0890}', '\u{0891}', '\u{08E2}', '\u{110BD}', '\u{1D173}', '\u{1D17A}'] {
            assert!(!is_printable(c), "{:?} is a format character", c);
        }
        // Unassigned code points and noncharacters.
        assert!(!is_printable('\u{0378}'));
        assert!(!is_printable('\u{FFFF}'));
        assert!(!is_printable('\u{10FFFF}'));
        assert!(is_printable('\u{1F600}'));
        assert!(is_printable('\u{0964}'));
    }

    #[test]
    fn test_printable_ratio() {
        assert_eq!(printable_ratio(""), 0.0);
        assert_eq!(printable_ratio("abcd"), 1.0);
        assert_eq!(printable_ratio("ab\u{0001}\u{0002}"), 0.5);
    }
}
