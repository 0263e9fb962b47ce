//! eSpeak TTS backend.
//!
//! Shells out to the `espeak` binary once per chapter. The text is handed
//! over through a temp file (`-f`) rather than argv, since chapters can
//! run to hundreds of kilobytes.

use super::{TtsEngine, TtsOptions};
use crate::error::{PipelineError, PipelineResult};
use std::io::Write;
use std::path::Path;
use std::process::Command;

pub struct EspeakEngine {
    binary: String,
}

impl EspeakEngine {
    pub fn new() -> Self {
        Self {
            binary: "espeak".to_string(),
        }
    }

    /// Use a specific binary name/path, e.g. "espeak-ng".
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for EspeakEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TtsEngine for EspeakEngine {
    fn synthesize(
        &self,
        text: &str,
        output_path: &Path,
        options: &TtsOptions,
    ) -> PipelineResult<()> {
        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                PipelineError::Synthesis(format!("cannot create '{}': {}", parent.display(), e))
            })?;
        }

        let mut text_file = tempfile::NamedTempFile::new().map_err(|e| {
            PipelineError::Synthesis(format!("cannot create temporary text file: {}", e))
        })?;
        text_file
            .write_all(text.as_bytes())
            .and_then(|()| text_file.flush())
            .map_err(|e| {
                PipelineError::Synthesis(format!("cannot write temporary text file: {}", e))
            })?;

        let output = Command::new(&self.binary)
            .args(["-v", &options.voice])
            .args(["-s", &options.rate_wpm.to_string()])
            .args(["-a", &options.volume.to_string()])
            .arg("-f")
            .arg(text_file.path())
            .arg("-w")
            .arg(output_path)
            .output()
            .map_err(|e| {
                PipelineError::Synthesis(format!(
                    "cannot run '{}': {} (is eSpeak installed?)",
                    self.binary, e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PipelineError::Synthesis(format!(
                "'{}' exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            )));
        }

        log::debug!("synthesized {} bytes of text to {}", text.len(), output_path.display());
        Ok(())
    }

    fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}
