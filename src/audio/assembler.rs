//! Audiobook assembly using FFmpeg.

use super::metadata::{build_markers, render_ffmetadata};
use super::{Audiobook, ChapterAudio, OutputFormat};
use crate::error::{PipelineError, PipelineResult};
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn ffmpeg_command() -> Command {
    Command::new("ffmpeg")
}

fn ffprobe_command() -> Command {
    Command::new("ffprobe")
}

/// Get the duration of an audio file in milliseconds using ffprobe.
pub fn probe_duration_ms(audio_path: &Path) -> PipelineResult<u64> {
    let output = ffprobe_command()
        .args([
            "-v",
            "quiet",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(audio_path)
        .output()
        .map_err(|e| PipelineError::Assembly(format!("cannot run ffprobe: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PipelineError::Assembly(format!(
            "ffprobe failed on '{}': {}",
            audio_path.display(),
            stderr.trim()
        )));
    }

    let duration_str = String::from_utf8_lossy(&output.stdout);
    let duration_secs: f64 = duration_str.trim().parse().map_err(|_| {
        PipelineError::Assembly(format!(
            "unparseable ffprobe duration {:?} for '{}'",
            duration_str.trim(),
            audio_path.display()
        ))
    })?;

    Ok((duration_secs * 1000.0) as u64)
}

/// Concatenate audio files losslessly with FFmpeg's concat demuxer.
///
/// The single-file case is a plain copy.
fn concatenate(audio_files: &[&Path], output_path: &Path) -> PipelineResult<()> {
    if audio_files.is_empty() {
        return Err(PipelineError::Assembly("no audio files to merge".into()));
    }

    if audio_files.len() == 1 {
        std::fs::copy(audio_files[0], output_path)
            .map_err(|e| PipelineError::Assembly(format!("cannot copy audio file: {}", e)))?;
        return Ok(());
    }

    let temp_dir = TempDir::new()
        .map_err(|e| PipelineError::Assembly(format!("cannot create temp dir: {}", e)))?;
    let list_file = temp_dir.path().join("concat_list.txt");

    let mut list_content = String::new();
    for path in audio_files {
        // Escape single quotes in path
        let path_str = path.to_string_lossy().replace('\'', "'\\''");
        list_content.push_str(&format!("file '{}'\n", path_str));
    }
    std::fs::write(&list_file, &list_content)
        .map_err(|e| PipelineError::Assembly(format!("cannot write concat list: {}", e)))?;

    let output = ffmpeg_command()
        .args(["-y", "-f", "concat", "-safe", "0", "-i"])
        .arg(&list_file)
        .args(["-c", "copy"])
        .arg(output_path)
        .output()
        .map_err(|e| PipelineError::Assembly(format!("cannot run ffmpeg: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PipelineError::Assembly(format!(
            "ffmpeg concat failed: {}",
            stderr.trim()
        )));
    }

    Ok(())
}

/// Merge per-chapter audio into one tagged audiobook.
///
/// Chapter wavs are concatenated losslessly, then encoded once into the
/// target container with the FFMETADATA1 chapter markers mapped in.
pub fn assemble_audiobook(
    chapters: &[ChapterAudio],
    title: &str,
    format: OutputFormat,
    output_path: &Path,
) -> PipelineResult<Audiobook> {
    if chapters.is_empty() {
        return Err(PipelineError::Assembly("no chapters to assemble".into()));
    }

    let markers = build_markers(chapters);
    let temp_dir = TempDir::new()
        .map_err(|e| PipelineError::Assembly(format!("cannot create temp dir: {}", e)))?;

    let merged_wav = temp_dir.path().join("merged.wav");
    let files: Vec<&Path> = chapters.iter().map(|c| c.path.as_path()).collect();
    concatenate(&files, &merged_wav)?;

    let metadata_file = temp_dir.path().join("metadata.txt");
    std::fs::write(&metadata_file, render_ffmetadata(title, &markers))
        .map_err(|e| PipelineError::Assembly(format!("cannot write metadata file: {}", e)))?;

    let mut cmd = ffmpeg_command();
    cmd.args(["-y", "-i"])
        .arg(&merged_wav)
        .arg("-i")
        .arg(&metadata_file)
        .args(["-map", "0:a", "-map_metadata", "1"]);

    match format {
        OutputFormat::Mp3 => {
            cmd.args(["-id3v2_version", "3", "-c:a", "libmp3lame", "-b:a", "128k"]);
        }
        OutputFormat::M4b => {
            cmd.args(["-c:a", "aac", "-b:a", "128k", "-f", "mp4"]);
        }
    }
    cmd.arg(output_path);

    let output = cmd
        .output()
        .map_err(|e| PipelineError::Assembly(format!("cannot run ffmpeg: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PipelineError::Assembly(format!(
            "ffmpeg tagging failed: {}",
            stderr.trim()
        )));
    }

    Ok(Audiobook {
        path: output_path.to_path_buf(),
        markers,
    })
}

/// Check that both ffmpeg and ffprobe can be invoked.
pub fn is_ffmpeg_available() -> bool {
    let check = |mut cmd: Command| {
        cmd.arg("-version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    };
    check(ffmpeg_command()) && check(ffprobe_command())
}
