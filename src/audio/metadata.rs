//! FFmpeg metadata generation for chapter markers.

use crate::audio::ChapterAudio;
use std::fmt::Write;

/// A chapter marker in the output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterMarker {
    pub title: String,
    /// Start offset in milliseconds
    pub start_ms: u64,
    /// End offset in milliseconds
    pub end_ms: u64,
}

impl ChapterMarker {
    pub fn new(title: impl Into<String>, start_ms: u64, end_ms: u64) -> Self {
        Self {
            title: title.into(),
            start_ms,
            end_ms,
        }
    }

    /// Start offset in seconds.
    pub fn start_secs(&self) -> f64 {
        self.start_ms as f64 / 1000.0
    }
}

/// Build chapter markers from per-chapter durations.
///
/// Each chapter starts where the previous one ended; offsets are the
/// cumulative sum of preceding durations.
pub fn build_markers(chapters: &[ChapterAudio]) -> Vec<ChapterMarker> {
    let mut markers = Vec::with_capacity(chapters.len());
    let mut offset_ms = 0u64;

    for chapter in chapters {
        let end_ms = offset_ms + chapter.duration_ms;
        markers.push(ChapterMarker::new(chapter.title.clone(), offset_ms, end_ms));
        offset_ms = end_ms;
    }

    markers
}

/// Render an FFMETADATA1 document carrying the book title and chapter
/// markers. The caller writes it next to the concat inputs.
pub fn render_ffmetadata(title: &str, markers: &[ChapterMarker]) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(out, ";FFMETADATA1");
    let _ = writeln!(out, "title={}", escape_metadata_value(title));
    let _ = writeln!(out, "album={}", escape_metadata_value(title));
    let _ = writeln!(out, "genre=Audiobook");
    let _ = writeln!(out);

    for marker in markers {
        let _ = writeln!(out, "[CHAPTER]");
        let _ = writeln!(out, "TIMEBASE=1/1000");
        let _ = writeln!(out, "START={}", marker.start_ms);
        let _ = writeln!(out, "END={}", marker.end_ms);
        let _ = writeln!(out, "title={}", escape_metadata_value(&marker.title));
        let _ = writeln!(out);
    }

    out
}

/// FFmpeg metadata values need to escape: = ; # \ and newlines.
fn escape_metadata_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for c in value.chars() {
        match c {
            '=' | ';' | '#' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            _ => escaped.push(c),
        }
    }

    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::path::PathBuf;

    fn chapter(title: &str, duration_ms: u64) -> ChapterAudio {
        ChapterAudio {
            title: title.to_string(),
            path: PathBuf::from(format!("/tmp/{}.wav", title)),
            duration_ms,
        }
    }

    #[test]
    fn test_build_markers_cumulative() {
        let markers = build_markers(&[
            chapter("Intro", 3000),
            chapter("Chapter One", 7000),
            chapter("Chapter Two", 5000),
        ]);

        assert_eq!(markers.len(), 3);
        assert_eq!((markers[0].start_ms, markers[0].end_ms), (0, 3000));
        assert_eq!((markers[1].start_ms, markers[1].end_ms), (3000, 10000));
        assert_eq!((markers[2].start_ms, markers[2].end_ms), (10000, 15000));
    }

    #[test]
    fn test_start_secs() {
        let marker = ChapterMarker::new("x", 2500, 4000);
        assert_eq!(marker.start_secs(), 2.5);
    }

    #[test]
    fn test_escape_metadata_value() {
        assert_eq!(escape_metadata_value("Simple"), "Simple");
        assert_eq!(escape_metadata_value("Q=A"), "Q\\=A");
        assert_eq!(escape_metadata_value("a;b#c\\d"), "a\\;b\\#c\\\\d");
        assert_eq!(escape_metadata_value("Line1\nLine2"), "Line1\\nLine2");
    }

    #[test]
    fn test_render_ffmetadata() {
        let markers = vec![
            ChapterMarker::new("Intro", 0, 60000),
            ChapterMarker::new("Chapter One", 60000, 120000),
        ];

        let content = render_ffmetadata("My Book", &markers);
        assert!(content.starts_with(";FFMETADATA1"));
        assert!(content.contains("title=My Book"));
        assert!(content.contains("genre=Audiobook"));
        assert!(content.contains("[CHAPTER]"));
        assert!(content.contains("TIMEBASE=1/1000"));
        assert!(content.contains("START=60000"));
        assert!(content.contains("END=120000"));
        assert!(content.contains("title=Chapter One"));
    }

    proptest! {
        /// Offsets are monotonically non-decreasing and equal the
        /// cumulative sum of preceding durations.
        #[test]
        fn prop_marker_offsets(durations in proptest::collection::vec(0u64..10_000_000, 1..30)) {
            let chapters: Vec<ChapterAudio> = durations
                .iter()
                .enumerate()
                .map(|(i, &d)| chapter(&format!("c{}", i), d))
                .collect();

            let markers = build_markers(&chapters);
            let mut expected_start = 0u64;

            for (marker, duration) in markers.iter().zip(&durations) {
                prop_assert_eq!(marker.start_ms, expected_start);
                prop_assert_eq!(marker.end_ms, expected_start + duration);
                expected_start += duration;
            }
        }
    }
}
