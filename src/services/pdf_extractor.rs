use std::time::Instant;
use lopdf::Document;

use crate::error::{AppError, AppResult};

/// Text pulled out of an uploaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    /// Non-empty page texts joined with `\n`, in page order.
    pub text: String,
    pub page_count: usize,
    pub pages_with_text: usize,
}

impl ExtractedText {
    /// True when nothing but whitespace was extracted.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Parses `content` and extracts the text of every page.
    ///
    /// Fails only when the bytes are not a loadable PDF. A page whose text
    /// cannot be decoded counts as a page without text.
    pub fn extract_text(&self, content: &[u8]) -> AppResult<ExtractedText> {
        let start = Instant::now();

        tracing::info!("Starting PDF text extraction ({} bytes)", content.len());

        let document = Document::load_mem(content).map_err(|e| {
            tracing::warn!("PDF structure validation failed: {}", e);
            AppError::from(e)
        })?;

        // BTreeMap keyed by page number, so iteration is in page order
        let pages = document.get_pages();
        let mut page_texts = Vec::with_capacity(pages.len());

        for &page_number in pages.keys() {
            match document.extract_text(&[page_number]) {
                Ok(text) => page_texts.push(text),
                Err(e) => {
                    tracing::warn!(page = page_number, "Skipping page without readable text: {}", e);
                }
            }
        }

        // lopdf cannot decode CID fonts; pdf-extract reads their ToUnicode maps
        if has_undecoded_text(&page_texts) {
            page_texts = match extract_with_cmaps(content) {
                Ok(text) => {
                    tracing::info!("Re-extracted Identity-H text with pdf-extract");
                    split_pages(&text)
                }
                Err(e) => {
                    tracing::warn!("pdf-extract fallback failed, dropping undecoded text: {}", e);
                    strip_undecoded(page_texts)
                }
            };
        }

        let pages_with_text = page_texts
            .iter()
            .filter(|text| !normalize_page(text).is_empty())
            .count();
        let text = join_pages(page_texts.iter().map(String::as_str));

        tracing::info!(
            "PDF extraction completed in {}ms, {} of {} pages with text, {} characters",
            start.elapsed().as_millis(),
            pages_with_text,
            pages.len(),
            text.len()
        );

        Ok(ExtractedText {
            text,
            page_count: pages.len(),
            pages_with_text,
        })
    }
}

impl Default for PdfTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// What lopdf writes in place of text shown with an Identity-H font.
const IDENTITY_H_PLACEHOLDER: &str = "?Identity-H Unimplemented?";

fn has_undecoded_text(page_texts: &[String]) -> bool {
    page_texts
        .iter()
        .any(|text| text.contains(IDENTITY_H_PLACEHOLDER))
}

/// Removes the placeholder so a page that only had CID text reads as empty.
fn strip_undecoded(page_texts: Vec<String>) -> Vec<String> {
    page_texts
        .into_iter()
        .map(|text| text.replace(IDENTITY_H_PLACEHOLDER, ""))
        .collect()
}

/// Whole-document extraction through pdf-extract, which decodes CID fonts
/// via their `/ToUnicode` CMaps. pdf-extract panics on some malformed
/// documents, so a panic is reported as an ordinary failure.
fn extract_with_cmaps(content: &[u8]) -> Result<String, String> {
    match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(content)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err("pdf-extract panicked while decoding the document".to_string()),
    }
}

/// pdf-extract separates pages with form feeds when it emits them at all.
fn split_pages(text: &str) -> Vec<String> {
    text.split('\x0C').map(str::to_string).collect()
}

/// Both extractors pad text objects with line breaks; strip those so a page
/// contributes only its own text.
fn normalize_page(text: &str) -> &str {
    text.trim_matches(&['\n', '\r'][..])
}

/// Joins page texts with `\n`, dropping pages that produced no text.
pub(crate) fn join_pages<'a>(pages: impl IntoIterator<Item = &'a str>) -> String {
    pages
        .into_iter()
        .map(normalize_page)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
