//! Page extraction: PDF bytes → ordered pages of raw text.
//!
//! Uses `lopdf` (pure Rust) so no native PDF library is needed. Pages whose
//! text layer is empty are skipped; a document where every page is empty is
//! an error since nothing downstream could work with it.

use crate::error::ContentCrewError;
use tracing::{debug, warn};

/// One extracted page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// 1-indexed page number within the source PDF.
    pub number: usize,
    /// Raw extracted text.
    pub text: String,
    /// UTF-8 bytes of `text`, kept for encoding analysis.
    pub bytes: Vec<u8>,
}

impl Page {
    pub fn new(number: usize, text: String) -> Self {
        let bytes = text.as_bytes().to_vec();
        Self {
            number,
            text,
            bytes,
        }
    }
}

/// An extracted document: pages with text, in page order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Where the bytes came from (path or URL), for messages.
    pub origin: String,
    /// Total pages in the PDF, including skipped empty ones.
    pub page_count: usize,
    pub pages: Vec<Page>,
}

impl Document {
    /// All raw page text concatenated, one page per block.
    pub fn raw_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Parse `bytes` and extract the text of every page.
pub fn extract_document(bytes: &[u8], origin: &str) -> Result<Document, ContentCrewError> {
    let doc = lopdf::Document::load_mem(bytes).map_err(|e| ContentCrewError::CorruptPdf {
        origin: origin.to_string(),
        detail: e.to_string(),
    })?;

    let mut numbers: Vec<u32> = doc.get_pages().keys().cloned().collect();
    numbers.sort_unstable();
    let page_count = numbers.len();

    let mut pages = Vec::with_capacity(page_count);
    for number in numbers {
        let text = match doc.extract_text(&[number]) {
            Ok(text) => text,
            Err(e) => {
                warn!("Page {}: text extraction failed — {}", number, e);
                continue;
            }
        };
        if text.trim().is_empty() {
            debug!("Page {}: no text layer, skipped", number);
            continue;
        }
        pages.push(Page::new(number as usize, text));
    }

    if pages.is_empty() {
        return Err(ContentCrewError::NoExtractableText {
            origin: origin.to_string(),
            pages: page_count,
        });
    }

    debug!(
        "Extracted {} of {} pages from {}",
        pages.len(),
        page_count,
        origin
    );

    Ok(Document {
        origin: origin.to_string(),
        page_count,
        pages,
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use lopdf::{dictionary, Document, Object, Stream};

    /// Build a PDF with one Helvetica text line per page. An empty string
    /// produces a page with no content.
    pub fn pdf_with_pages(page_texts: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.4");
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        let mut page_ids = Vec::new();
        for text in page_texts {
            let content = if text.is_empty() {
                String::new()
            } else {
                format!(
                    "BT /F1 12 Tf 72 700 Td ({}) Tj ET",
                    text.replace('\\', "\\\\")
                        .replace('(', "\\(")
                        .replace(')', "\\)")
                )
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Resources" => resources_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
            page_ids.push(page_id);
        }

        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_texts.len() as i64,
        });
        for page_id in page_ids {
            if let Ok(Object::Dictionary(dict)) = doc.get_object_mut(page_id) {
                dict.set("Parent", pages_id);
            }
        }
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }
}
