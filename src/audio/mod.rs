//! Audio assembly: per-chapter files in, one tagged audiobook out.

pub mod assembler;
pub mod metadata;

pub use assembler::assemble_audiobook;
pub use metadata::ChapterMarker;

use std::path::PathBuf;

/// A synthesized chapter: its audio file and probed duration.
#[derive(Debug, Clone)]
pub struct ChapterAudio {
    pub title: String,
    pub path: PathBuf,
    pub duration_ms: u64,
}

/// The final artifact: the output file plus its embedded chapter markers.
#[derive(Debug)]
pub struct Audiobook {
    pub path: PathBuf,
    pub markers: Vec<ChapterMarker>,
}

/// Output container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// MP3 with ID3v2 chapter markers
    Mp3,
    /// M4B (MP4 audio) with chapter atoms
    M4b,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Mp3 => "mp3",
            OutputFormat::M4b => "m4b",
        }
    }
}
