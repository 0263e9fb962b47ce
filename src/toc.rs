//! Table-of-contents parsing.
//!
//! TOC pages typically render one chapter per line as
//! `<title> .... <page number>`. We match the trailing page number and
//! treat everything before the leader dots as the title. Lines that don't
//! fit the pattern (headings, blank lines, page decorations) are skipped.

use crate::error::{PipelineError, PipelineResult};
use once_cell::sync::Lazy;
use regex::Regex;

/// One parsed TOC line: a chapter title and its 1-based start page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub title: String,
    pub start_page: u32,
}

/// Title text, a leader (a run of two or more dots/middle dots, an
/// ellipsis, or plain whitespace), then a trailing page number. A single
/// period stays with the title so abbreviations like "Etc." survive.
static TOC_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<title>.*?)(?:\s*(?:[.\u{00b7}]{2,}|\u{2026}+)\s*|\s+)(?P<page>\d{1,4})$")
        .unwrap()
});

/// Parse raw TOC text into an ordered list of entries.
///
/// Fails with `Parse` if nothing is recovered, if a title repeats, or if
/// page numbers are not strictly increasing. Guessing chapter boundaries
/// from a malformed TOC produces a garbage audiobook, so we refuse instead.
pub fn parse_toc(raw: &str) -> PipelineResult<Vec<TocEntry>> {
    let mut entries: Vec<TocEntry> = Vec::new();

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Some(caps) = TOC_LINE.captures(line) else {
            log::debug!("skipping TOC line: {:?}", line);
            continue;
        };

        let title = caps["title"].trim().trim_end_matches(['-', '_']).trim_end();
        // A bare page number or dot leader is not a chapter line.
        if title.is_empty() || !title.chars().any(|c| c.is_alphabetic()) {
            log::debug!("skipping TOC line without a title: {:?}", line);
            continue;
        }

        // \d{1,4} always fits in u32
        let start_page: u32 = caps["page"].parse().unwrap();

        entries.push(TocEntry {
            title: title.to_string(),
            start_page,
        });
    }

    if entries.is_empty() {
        return Err(PipelineError::Parse(
            "no TOC entries recovered; check the TOC page range".to_string(),
        ));
    }

    validate(&entries)?;

    log::info!("recovered {} TOC entries", entries.len());
    Ok(entries)
}

/// Reject duplicate titles and non-increasing page numbers.
fn validate(entries: &[TocEntry]) -> PipelineResult<()> {
    for pair in entries.windows(2) {
        if pair[1].start_page <= pair[0].start_page {
            return Err(PipelineError::Parse(format!(
                "page numbers not strictly increasing: '{}' (p. {}) followed by '{}' (p. {})",
                pair[0].title, pair[0].start_page, pair[1].title, pair[1].start_page
            )));
        }
    }

    for (i, entry) in entries.iter().enumerate() {
        if entries[..i].iter().any(|e| e.title == entry.title) {
            return Err(PipelineError::Parse(format!(
                "duplicate chapter title '{}'",
                entry.title
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dotted_toc() {
        let raw = "Intro .... 1\nChapter One .... 5\nChapter Two .... 12\n";
        let entries = parse_toc(raw).unwrap();
        assert_eq!(
            entries,
            vec![
                TocEntry { title: "Intro".into(), start_page: 1 },
                TocEntry { title: "Chapter One".into(), start_page: 5 },
                TocEntry { title: "Chapter Two".into(), start_page: 12 },
            ]
        );
    }

    #[test]
    fn test_parse_whitespace_separator() {
        let raw = "Prologue   3\nThe Long Road\t17\n";
        let entries = parse_toc(raw).unwrap();
        assert_eq!(entries[0].title, "Prologue");
        assert_eq!(entries[0].start_page, 3);
        assert_eq!(entries[1].title, "The Long Road");
        assert_eq!(entries[1].start_page, 17);
    }

    #[test]
    fn test_non_matching_lines_skipped() {
        let raw = "CONTENTS\n\nIntro .... 1\n42\nChapter One .... 5\n....\n";
        let entries = parse_toc(raw).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Intro");
        assert_eq!(entries[1].title, "Chapter One");
    }

    #[test]
    fn test_empty_toc_is_parse_error() {
        let err = parse_toc("CONTENTS\n\n\n").unwrap_err();
        assert!(matches!(err, PipelineError::Parse(_)));
    }

    #[test]
    fn test_non_increasing_pages_rejected() {
        let raw = "Intro .... 5\nChapter One .... 5\n";
        let err = parse_toc(raw).unwrap_err();
        assert!(matches!(err, PipelineError::Parse(_)));
        assert!(err.to_string().contains("strictly increasing"));
    }

    #[test]
    fn test_decreasing_pages_rejected() {
        let raw = "Intro .... 9\nChapter One .... 5\n";
        assert!(parse_toc(raw).is_err());
    }

    #[test]
    fn test_duplicate_title_rejected() {
        let raw = "Notes .... 3\nNotes .... 8\n";
        let err = parse_toc(raw).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_trailing_abbreviation_period_kept() {
        let raw = "Etc. .... 9\nMaps, Charts, Etc. 15\n";
        let entries = parse_toc(raw).unwrap();
        assert_eq!(entries[0].title, "Etc.");
        assert_eq!(entries[0].start_page, 9);
        assert_eq!(entries[1].title, "Maps, Charts, Etc.");
        assert_eq!(entries[1].start_page, 15);
    }

    #[test]
    fn test_dash_separator_trimmed_from_title() {
        let raw = "Part One - 7\n";
        let entries = parse_toc(raw).unwrap();
        assert_eq!(entries[0].title, "Part One");
        assert_eq!(entries[0].start_page, 7);
    }

    #[test]
    fn test_title_keeps_interior_digits() {
        let raw = "Part 2 The Return .... 100\n";
        let entries = parse_toc(raw).unwrap();
        assert_eq!(entries[0].title, "Part 2 The Return");
        assert_eq!(entries[0].start_page, 100);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let raw = "Intro .... 1\nChapter One .... 5\nChapter Two .... 12\n";
        let first = parse_toc(raw).unwrap();
        let second = parse_toc(raw).unwrap();
        assert_eq!(first, second);
    }
}
