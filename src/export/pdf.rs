//! PDF export: title plus paragraphs on Letter pages, built with `lopdf`.
//!
//! Layout follows a simple flowing-document model:
//!
//! - Letter page (612 × 792 pt) with 72 pt margins on every side
//! - Title in Helvetica-Bold 24 pt, 30 pt space after, then a 12 pt spacer
//! - Body paragraphs in Helvetica 12 pt, 12 pt space after plus a 12 pt spacer
//! - Paragraphs are split on blank lines (`"\n\n"`); blank paragraphs are skipped
//! - Lines wrap on word boundaries using the standard Helvetica metrics
//! - A new page starts when the next line would cross the bottom margin
//!
//! Text is written with the base-14 fonts in WinAnsiEncoding, so characters
//! outside Windows-1252 are replaced by `?`. All coordinates are whole points.

use encoding_rs::WINDOWS_1252;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

const PAGE_WIDTH: i64 = 612;
const PAGE_HEIGHT: i64 = 792;
const MARGIN: i64 = 72;
const TEXT_WIDTH: i64 = PAGE_WIDTH - 2 * MARGIN;
const SPACER: i64 = 12;

/// Font and spacing for one paragraph style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Style {
    font: Font,
    size: i64,
    leading: i64,
    space_after: i64,
}

const TITLE: Style = Style {
    font: Font::HelveticaBold,
    size: 24,
    leading: 29,
    space_after: 30,
};

const BODY: Style = Style {
    font: Font::Helvetica,
    size: 12,
    leading: 14,
    space_after: 12,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Font {
    Helvetica,
    HelveticaBold,
}

impl Font {
    fn resource_name(self) -> &'static str {
        match self {
            Font::Helvetica => "F1",
            Font::HelveticaBold => "F2",
        }
    }

    fn base_font(self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Advance width in 1/1000 em of a WinAnsi byte.
    fn width(self, byte: u8) -> i64 {
        let table = match self {
            Font::Helvetica => &HELVETICA_WIDTHS,
            Font::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        };
        match byte {
            32..=126 => table[(byte - 32) as usize],
            _ => DEFAULT_WIDTH,
        }
    }

    /// Width of `bytes` at `size`, in points (rounded up).
    fn text_width(self, bytes: &[u8], size: i64) -> i64 {
        let units: i64 = bytes.iter().map(|&b| self.width(b)).sum();
        (units * size + 999) / 1000
    }
}

const DEFAULT_WIDTH: i64 = 556;

// Standard AFM advance widths for codes 32..=126.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [i64; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // 32-47
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 48-63
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // 64-79
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 80-95
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // 96-111
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,      // 112-126
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [i64; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // 32-47
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // 48-63
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // 64-79
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 80-95
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // 96-111
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,      // 112-126
];

// ── Text encoding ────────────────────────────────────────────────────────────

/// Encode `text` as WinAnsi bytes; unmappable characters become `?`.
pub fn to_winansi(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    let mut buf = [0u8; 4];
    for c in text.chars() {
        if c.is_ascii() {
            out.push(if c.is_ascii_control() { b' ' } else { c as u8 });
            continue;
        }
        let (bytes, _, had_errors) = WINDOWS_1252.encode(c.encode_utf8(&mut buf));
        if had_errors || bytes.len() != 1 {
            out.push(b'?');
        } else {
            out.extend_from_slice(&bytes);
        }
    }
    out
}

// ── Layout ───────────────────────────────────────────────────────────────────

/// One line of text placed on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PlacedLine {
    style: Style,
    x: i64,
    y: i64,
    bytes: Vec<u8>,
}

/// Greedy word wrap of `words` to `TEXT_WIDTH`. Words wider than a line are
/// split between characters.
fn wrap(words: &[Vec<u8>], style: Style) -> Vec<Vec<u8>> {
    let space = style.font.text_width(b" ", style.size);
    let mut lines: Vec<Vec<u8>> = Vec::new();
    let mut current: Vec<u8> = Vec::new();
    let mut current_width = 0;

    for word in words {
        let word_width = style.font.text_width(word, style.size);
        let needed = if current.is_empty() {
            word_width
        } else {
            current_width + space + word_width
        };

        if needed <= TEXT_WIDTH {
            if !current.is_empty() {
                current.push(b' ');
            }
            current.extend_from_slice(word);
            current_width = needed;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }

        if word_width <= TEXT_WIDTH {
            current.extend_from_slice(word);
            current_width = word_width;
        } else {
            for &b in word {
                let w = style.font.text_width(&[b], style.size);
                if !current.is_empty() && current_width + w > TEXT_WIDTH {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(b);
                current_width += w;
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Flow the title and paragraphs onto pages.
fn layout(title: &str, text: &str) -> Vec<Vec<PlacedLine>> {
    let mut blocks: Vec<(Style, String)> = Vec::new();
    if !title.trim().is_empty() {
        blocks.push((TITLE, title.to_string()));
    }
    for paragraph in text.split("\n\n") {
        if !paragraph.trim().is_empty() {
            blocks.push((BODY, paragraph.to_string()));
        }
    }

    let top = PAGE_HEIGHT - MARGIN;
    let mut pages: Vec<Vec<PlacedLine>> = vec![Vec::new()];
    let mut y = top;

    for (style, block) in blocks {
        let words: Vec<Vec<u8>> = block.split_whitespace().map(to_winansi).collect();
        for line in wrap(&words, style) {
            if y - style.leading < MARGIN {
                pages.push(Vec::new());
                y = top;
            }
            y -= style.leading;
            if let Some(page) = pages.last_mut() {
                page.push(PlacedLine {
                    style,
                    x: MARGIN,
                    y,
                    bytes: line,
                });
            }
        }
        y -= style.space_after + SPACER;
    }
    pages
}

// ── Document assembly ────────────────────────────────────────────────────────

fn page_content(lines: &[PlacedLine]) -> Content {
    let mut operations = Vec::with_capacity(lines.len() * 5);
    for line in lines {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![line.style.font.resource_name().into(), line.style.size.into()],
        ));
        operations.push(Operation::new("Td", vec![line.x.into(), line.y.into()]));
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(line.bytes.clone())],
        ));
        operations.push(Operation::new("ET", vec![]));
    }
    Content { operations }
}

fn font_dict(doc: &mut Document, font: Font) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => font.base_font(),
        "Encoding" => "WinAnsiEncoding",
    })
}

/// Render `title` and `text` into PDF bytes.
pub fn render_pdf(title: &str, text: &str) -> Result<Vec<u8>, lopdf::Error> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular = font_dict(&mut doc, Font::Helvetica);
    let bold = font_dict(&mut doc, Font::HelveticaBold);
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            Font::Helvetica.resource_name() => regular,
            Font::HelveticaBold.resource_name() => bold,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for lines in layout(title, text) {
        let content = page_content(&lines);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Resources" => resources_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(to_winansi(title)),
        "Producer" => Object::string_literal("content-crew"),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}
