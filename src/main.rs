//! pdf-audio - Convert PDF books to chapter-navigable audiobooks

mod audio;
mod book;
mod config;
mod error;
mod pdf;
mod text;
mod toc;
mod tts;

use anyhow::{Context, Result};
use audio::{ChapterAudio, OutputFormat};
use book::sanitize_title;
use clap::Parser;
use config::ConvertConfig;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tts::{TtsEngine, TtsOptions, espeak::EspeakEngine};

#[derive(Parser, Debug)]
#[command(name = "pdf-audio")]
#[command(about = "Convert PDF books to chapter-navigable audiobooks", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the PDF file
    pdf_file: PathBuf,

    /// Output file path (default: <pdf-name>.<format>)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// First page of the table of contents (1-based, inclusive)
    #[arg(long, default_value_t = 1)]
    toc_start: u32,

    /// Last page of the table of contents (inclusive)
    #[arg(long, default_value_t = 5)]
    toc_end: u32,

    /// eSpeak voice identifier (e.g. "en", "en-us")
    #[arg(long)]
    voice: Option<String>,

    /// Speech rate in words per minute (80-450)
    #[arg(long)]
    rate: Option<u32>,

    /// Volume (0-100)
    #[arg(long)]
    volume: Option<u32>,

    /// Output container format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Directory for intermediate text and audio files (default: <output>.work)
    #[arg(long)]
    work_dir: Option<PathBuf>,

    /// Keep intermediate per-chapter files after a successful run
    #[arg(long)]
    keep_intermediates: bool,

    /// Persist this run's voice, rate, volume, and format as the new defaults
    #[arg(long)]
    save_defaults: bool,

    /// Enable debug output
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    run(&args)
}

fn run(args: &Args) -> Result<()> {
    if !args.pdf_file.exists() {
        anyhow::bail!("PDF file not found: {}", args.pdf_file.display());
    }

    // Persistent defaults, overridden per invocation
    let config = ConvertConfig::load().context("Failed to load configuration")?;
    let format = args.format.unwrap_or(config.format);
    let options = TtsOptions::new()
        .with_voice(args.voice.clone().unwrap_or(config.voice))
        .with_rate(args.rate.unwrap_or(config.rate_wpm))
        .with_volume(args.volume.unwrap_or(config.volume));

    if args.save_defaults {
        let defaults = ConvertConfig {
            voice: options.voice.clone(),
            rate_wpm: options.rate_wpm,
            volume: options.volume,
            format,
        };
        defaults.save().context("Failed to save configuration")?;
        log::info!("Saved defaults to {}", ConvertConfig::config_path()?.display());
    }

    let output_path = args.output.clone().unwrap_or_else(|| {
        let stem = args.pdf_file.file_stem().unwrap_or_default();
        args.pdf_file
            .with_file_name(format!("{}.{}", stem.to_string_lossy(), format.extension()))
    });
    let book_title = output_path
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    let work_dir = args
        .work_dir
        .clone()
        .unwrap_or_else(|| output_path.with_extension("work"));

    log::debug!("output: {}", output_path.display());
    log::debug!("work dir: {}", work_dir.display());
    log::debug!(
        "voice: {} rate: {} volume: {}",
        options.voice,
        options.rate_wpm,
        options.volume
    );

    // Stage 1: load the document
    log::info!("Opening PDF: {}", args.pdf_file.display());
    let book = pdf::PdfBook::open(&args.pdf_file)?;
    log::info!("Document has {} pages", book.page_count());

    // Stage 2: TOC extraction and parsing
    let toc_text = book.page_range_text(args.toc_start, args.toc_end)?;
    let entries = toc::parse_toc(&toc_text)?;

    // Stage 3: split into chapters and save the per-chapter texts
    let chapters = book::split_chapters(&book, &entries)?;
    for chapter in &chapters {
        log::debug!(
            "chapter '{}': pages {}-{}, {} chars",
            chapter.title,
            chapter.start_page,
            chapter.end_page - 1,
            chapter.text.len()
        );
    }

    let text_dir = work_dir.join("text");
    let audio_dir = work_dir.join("audio");
    std::fs::create_dir_all(&text_dir)?;
    std::fs::create_dir_all(&audio_dir)?;

    for (i, chapter) in chapters.iter().enumerate() {
        let path = text_dir.join(format!(
            "chapter_{:02}_{}.txt",
            i + 1,
            sanitize_title(&chapter.title)
        ));
        std::fs::write(&path, &chapter.text)
            .with_context(|| format!("Failed to save chapter text to {}", path.display()))?;
    }

    // Fail before synthesizing anything if the external tools are missing.
    let engine = EspeakEngine::new();
    if !engine.is_available() {
        return Err(error::PipelineError::Synthesis(
            "espeak not found on PATH; install eSpeak to synthesize speech".into(),
        )
        .into());
    }
    if !audio::assembler::is_ffmpeg_available() {
        return Err(error::PipelineError::Assembly(
            "ffmpeg/ffprobe not found on PATH; install FFmpeg to assemble the audiobook".into(),
        )
        .into());
    }

    // Stage 4: synthesis, strictly one chapter at a time
    log::info!("Synthesizing {} chapters...", chapters.len());
    let pb = ProgressBar::new(chapters.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let wav_paths = tts::synthesize_chapters(&engine, &chapters, &options, &audio_dir, |_, title| {
        pb.inc(1);
        pb.set_message(title.to_string());
    })?;
    pb.finish_with_message("synthesis complete");

    // Stage 5: probe durations and assemble the tagged output
    let mut chapter_audio = Vec::with_capacity(chapters.len());
    for (chapter, wav_path) in chapters.iter().zip(&wav_paths) {
        let duration_ms = audio::assembler::probe_duration_ms(wav_path)?;
        chapter_audio.push(ChapterAudio {
            title: chapter.title.clone(),
            path: wav_path.clone(),
            duration_ms,
        });
    }

    log::info!("Assembling audiobook...");
    let audiobook = audio::assemble_audiobook(&chapter_audio, &book_title, format, &output_path)?;

    for marker in &audiobook.markers {
        log::debug!("marker '{}' at {:.1}s", marker.title, marker.start_secs());
    }

    let size_mb = std::fs::metadata(&audiobook.path)?.len() as f64 / (1024.0 * 1024.0);
    log::info!(
        "Audiobook created: {} ({} chapters, {:.1} MB)",
        audiobook.path.display(),
        audiobook.markers.len(),
        size_mb
    );

    if args.keep_intermediates {
        log::info!("Intermediate files kept in {}", work_dir.display());
    } else {
        cleanup_intermediates(&work_dir, &text_dir, &audio_dir)
            .with_context(|| format!("Failed to clean up work dir {}", work_dir.display()))?;
    }

    Ok(())
}

/// Remove the intermediate directories this run created. A user-supplied
/// work dir may hold unrelated files, so the dir itself is only removed
/// when it ends up empty.
fn cleanup_intermediates(work_dir: &Path, text_dir: &Path, audio_dir: &Path) -> std::io::Result<()> {
    std::fs::remove_dir_all(text_dir)?;
    std::fs::remove_dir_all(audio_dir)?;
    let _ = std::fs::remove_dir(work_dir);
    Ok(())
}
