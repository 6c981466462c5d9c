//! Markdown stripping for plain-text exports.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#+\s*").unwrap());
static RE_BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static RE_ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.*?)\*").unwrap());
static RE_SYMBOLS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[#*_~`]").unwrap());

/// Remove Markdown markup, keeping the text.
///
/// Heading markers go first, then bold, then italic, then any stray
/// `# * _ ~ `` ` symbol.
pub fn strip_markdown(text: &str) -> String {
    let s = RE_HEADING.replace_all(text, "");
    let s = RE_BOLD.replace_all(&s, "$1");
    let s = RE_ITALIC.replace_all(&s, "$1");
    RE_SYMBOLS.replace_all(&s, "").into_owned()
}
