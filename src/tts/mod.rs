//! TTS engine trait and voice options.

pub mod espeak;

use crate::book::{Chapter, sanitize_title};
use crate::error::PipelineResult;
use std::path::{Path, PathBuf};

/// Voice parameters for speech synthesis.
#[derive(Debug, Clone)]
pub struct TtsOptions {
    /// Voice identifier, e.g. "en" or "en-us"
    pub voice: String,
    /// Speech rate in words per minute (80-450)
    pub rate_wpm: u32,
    /// Volume (0-100)
    pub volume: u32,
}

impl Default for TtsOptions {
    fn default() -> Self {
        Self {
            voice: "en".to_string(),
            rate_wpm: 170,
            volume: 100,
        }
    }
}

impl TtsOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the voice identifier.
    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    /// Set the speech rate in words per minute.
    pub fn with_rate(mut self, rate_wpm: u32) -> Self {
        self.rate_wpm = rate_wpm.clamp(80, 450);
        self
    }

    /// Set the volume.
    pub fn with_volume(mut self, volume: u32) -> Self {
        self.volume = volume.min(100);
        self
    }
}

/// Speech synthesis engine - the one seam where a test double can stand
/// in for the external binary.
pub trait TtsEngine {
    /// Synthesize `text` into an audio file at `output_path`.
    fn synthesize(
        &self,
        text: &str,
        output_path: &Path,
        options: &TtsOptions,
    ) -> PipelineResult<()>;

    /// Whether the underlying engine can be invoked at all.
    fn is_available(&self) -> bool;
}

/// Synthesize each chapter to a wav file under `audio_dir`, in order.
///
/// The first engine failure aborts the run; wavs already written stay on
/// disk for inspection. A chapter with no extractable text is narrated
/// from its title so the marker sequence stays aligned with the TOC.
pub fn synthesize_chapters(
    engine: &dyn TtsEngine,
    chapters: &[Chapter],
    options: &TtsOptions,
    audio_dir: &Path,
    mut on_done: impl FnMut(usize, &str),
) -> PipelineResult<Vec<PathBuf>> {
    let mut wav_paths = Vec::with_capacity(chapters.len());

    for (i, chapter) in chapters.iter().enumerate() {
        let wav_path = audio_dir.join(format!(
            "chapter_{:02}_{}.wav",
            i + 1,
            sanitize_title(&chapter.title)
        ));

        let text = if chapter.text.is_empty() {
            &chapter.title
        } else {
            &chapter.text
        };

        engine.synthesize(text, &wav_path, options)?;
        wav_paths.push(wav_path);
        on_done(i, &chapter.title);
    }

    Ok(wav_paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use std::cell::Cell;

    /// Test double: writes a stub file, optionally failing on one chapter.
    struct FakeEngine {
        fail_on_call: Option<usize>,
        calls: Cell<usize>,
    }

    impl FakeEngine {
        fn new(fail_on_call: Option<usize>) -> Self {
            Self {
                fail_on_call,
                calls: Cell::new(0),
            }
        }
    }

    impl TtsEngine for FakeEngine {
        fn synthesize(
            &self,
            text: &str,
            output_path: &Path,
            _options: &TtsOptions,
        ) -> PipelineResult<()> {
            let call = self.calls.get();
            self.calls.set(call + 1);
            if self.fail_on_call == Some(call) {
                return Err(PipelineError::Synthesis("engine exploded".into()));
            }
            std::fs::write(output_path, text)
                .map_err(|e| PipelineError::Synthesis(e.to_string()))?;
            Ok(())
        }

        fn is_available(&self) -> bool {
            true
        }
    }

    fn chapters() -> Vec<Chapter> {
        vec![
            Chapter {
                title: "Intro".into(),
                text: "intro text".into(),
                start_page: 1,
                end_page: 5,
            },
            Chapter {
                title: "Chapter One".into(),
                text: "chapter one text".into(),
                start_page: 5,
                end_page: 12,
            },
        ]
    }

    #[test]
    fn test_synthesize_all_chapters_in_order() {
        let dir = tempfile::TempDir::new().unwrap();
        let engine = FakeEngine::new(None);

        let mut seen = Vec::new();
        let wavs = synthesize_chapters(
            &engine,
            &chapters(),
            &TtsOptions::default(),
            dir.path(),
            |i, title| seen.push((i, title.to_string())),
        )
        .unwrap();

        assert_eq!(wavs.len(), 2);
        assert!(wavs[0].file_name().unwrap().to_string_lossy().starts_with("chapter_01"));
        assert!(wavs[1].file_name().unwrap().to_string_lossy().starts_with("chapter_02"));
        assert_eq!(seen, vec![(0, "Intro".to_string()), (1, "Chapter One".to_string())]);
    }

    #[test]
    fn test_failure_keeps_earlier_wavs() {
        let dir = tempfile::TempDir::new().unwrap();
        let engine = FakeEngine::new(Some(1));

        let err = synthesize_chapters(
            &engine,
            &chapters(),
            &TtsOptions::default(),
            dir.path(),
            |_, _| {},
        )
        .unwrap_err();

        assert!(matches!(err, PipelineError::Synthesis(_)));
        // Chapter 1's wav survives the abort.
        let survivors: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(survivors.len(), 1);
    }

    #[test]
    fn test_empty_chapter_narrates_title() {
        let dir = tempfile::TempDir::new().unwrap();
        let engine = FakeEngine::new(None);

        let chapters = vec![Chapter {
            title: "Silent Chapter".into(),
            text: String::new(),
            start_page: 1,
            end_page: 2,
        }];

        let wavs =
            synthesize_chapters(&engine, &chapters, &TtsOptions::default(), dir.path(), |_, _| {})
                .unwrap();

        let contents = std::fs::read_to_string(&wavs[0]).unwrap();
        assert_eq!(contents, "Silent Chapter");
    }

    #[test]
    fn test_options_default() {
        let opts = TtsOptions::default();
        assert_eq!(opts.voice, "en");
        assert_eq!(opts.rate_wpm, 170);
        assert_eq!(opts.volume, 100);
    }

    #[test]
    fn test_options_builder() {
        let opts = TtsOptions::new()
            .with_voice("en-us")
            .with_rate(200)
            .with_volume(80);
        assert_eq!(opts.voice, "en-us");
        assert_eq!(opts.rate_wpm, 200);
        assert_eq!(opts.volume, 80);
    }

    #[test]
    fn test_options_clamping() {
        let opts = TtsOptions::new().with_rate(10_000).with_volume(500);
        assert_eq!(opts.rate_wpm, 450);
        assert_eq!(opts.volume, 100);

        let opts = TtsOptions::new().with_rate(1);
        assert_eq!(opts.rate_wpm, 80);
    }
}
