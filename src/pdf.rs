// PDF loading and page-range text extraction

use crate::error::{PipelineError, PipelineResult};
use std::path::Path;

/// A PDF book loaded into memory as per-page text.
///
/// `pdf-extract` returns the whole document as a single string with form
/// feed characters (`\x0C`) between pages, so we split on those to get a
/// page-addressable view. Some documents come back without form feeds; in
/// that case triple newlines are treated as page breaks, and failing that
/// the whole text is one page.
#[derive(Debug)]
pub struct PdfBook {
    pages: Vec<String>,
}

impl PdfBook {
    /// Load a PDF file and split its text into pages.
    pub fn open(path: &Path) -> PipelineResult<Self> {
        let text = pdf_extract::extract_text(path).map_err(|e| {
            PipelineError::Extraction(format!("cannot read '{}': {}", path.display(), e))
        })?;

        if text.trim().is_empty() {
            return Err(PipelineError::Extraction(format!(
                "'{}' contains no extractable text (encrypted or scanned?)",
                path.display()
            )));
        }

        let pages: Vec<String> = if text.contains('\x0C') {
            text.split('\x0C').map(str::to_string).collect()
        } else if text.contains("\n\n\n") {
            text.split("\n\n\n").map(str::to_string).collect()
        } else {
            vec![text]
        };

        log::debug!("loaded {} pages from '{}'", pages.len(), path.display());

        Ok(Self { pages })
    }

    #[cfg(test)]
    pub fn from_pages(pages: Vec<String>) -> Self {
        Self { pages }
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Concatenated text of an inclusive, 1-based page range.
    pub fn page_range_text(&self, start: u32, end: u32) -> PipelineResult<String> {
        if start == 0 || start > end {
            return Err(PipelineError::Extraction(format!(
                "invalid page range {}-{} (pages are 1-based, start <= end)",
                start, end
            )));
        }
        if end > self.page_count() {
            return Err(PipelineError::Extraction(format!(
                "page range {}-{} exceeds document bounds ({} pages)",
                start,
                end,
                self.page_count()
            )));
        }

        let mut text = String::new();
        for page in &self.pages[(start - 1) as usize..end as usize] {
            text.push_str(page);
            if !page.ends_with('\n') {
                text.push('\n');
            }
        }
        Ok(text)
    }
}
