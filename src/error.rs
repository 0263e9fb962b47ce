//! Pipeline error kinds.
//!
//! Every stage maps its failures onto one of these four kinds so the final
//! error message always names the stage that aborted the run. That includes
//! I/O failures inside a stage: there is no catch-all variant.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The PDF could not be opened or a page range was out of bounds.
    #[error("extraction failed: {0}")]
    Extraction(String),

    /// No usable TOC entries were recovered, or the recovered entries
    /// were inconsistent (duplicate title, non-increasing page number).
    #[error("TOC parsing failed: {0}")]
    Parse(String),

    /// The external TTS engine was unavailable or exited non-zero.
    #[error("speech synthesis failed: {0}")]
    Synthesis(String),

    /// FFmpeg/ffprobe concatenation, probing, or tagging failed.
    #[error("audiobook assembly failed: {0}")]
    Assembly(String),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
