//! Chapter derivation: TOC entries + page text -> ordered chapters.

use crate::error::{PipelineError, PipelineResult};
use crate::pdf::PdfBook;
use crate::text::clean_for_tts;
use crate::toc::TocEntry;

/// A chapter's text together with the half-open page range it came from.
#[derive(Debug, Clone)]
pub struct Chapter {
    pub title: String,
    pub text: String,
    /// 1-based, inclusive
    pub start_page: u32,
    /// exclusive; for the last chapter this is `page_count + 1`
    pub end_page: u32,
}

/// Derive each chapter's half-open page range from the TOC sequence.
///
/// Entry i spans from its own start page to the next entry's start page;
/// the last entry runs to the end of the document. With strictly
/// increasing start pages the ranges are contiguous and non-overlapping.
pub fn chapter_ranges(entries: &[TocEntry], page_count: u32) -> Vec<(u32, u32)> {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let end = match entries.get(i + 1) {
                Some(next) => next.start_page,
                None => page_count + 1,
            };
            (entry.start_page, end)
        })
        .collect()
}

/// Split the book into chapters along the TOC boundaries.
///
/// Chapter text is cleaned for TTS and trimmed. A chapter that comes back
/// empty is kept so the marker sequence stays aligned with the TOC; the
/// synthesizer will narrate its title alone.
pub fn split_chapters(book: &PdfBook, entries: &[TocEntry]) -> PipelineResult<Vec<Chapter>> {
    let page_count = book.page_count();

    if let Some(last) = entries.last() {
        if last.start_page > page_count {
            return Err(PipelineError::Extraction(format!(
                "chapter '{}' starts on page {} but the document has only {} pages",
                last.title, last.start_page, page_count
            )));
        }
    }

    let ranges = chapter_ranges(entries, page_count);
    let mut chapters = Vec::with_capacity(entries.len());

    for (entry, (start, end)) in entries.iter().zip(ranges) {
        // Inclusive extraction range: [start, end) in pages is start..=end-1.
        let raw = book.page_range_text(start, end - 1)?;
        let text = clean_for_tts(&raw).trim().to_string();

        if text.is_empty() {
            log::warn!(
                "chapter '{}' (pages {}-{}) has no extractable text",
                entry.title,
                start,
                end - 1
            );
        }

        chapters.push(Chapter {
            title: entry.title.clone(),
            text,
            start_page: start,
            end_page: end,
        });
    }

    Ok(chapters)
}

/// Reduce a chapter title to a filesystem-safe fragment: alphanumerics,
/// spaces, and underscores survive, everything else is dropped.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '_')
        .collect::<String>()
        .trim_end()
        .to_string()
}
