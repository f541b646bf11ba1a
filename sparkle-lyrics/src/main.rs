//! sparkle-lyrics - lyrics file tool for the Sparkle player
//!
//! Inspects, converts and looks up karaoke lyrics files, and reads song
//! information from local audio files.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use sparkle_common::config::{load_or_default, RootFolderResolver, TomlConfig};
use sparkle_common::human_time::{format_clock_millis, parse_clock_millis};
use sparkle_common::paths::APP_NAME;
use sparkle_common::AppPaths;
use sparkle_lyrics::{LyricsFormat, LyricsIo, LyricsScanner, LyricsSession, SongInfo};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "sparkle-lyrics")]
#[command(about = "Lyrics file tool for the Sparkle player")]
#[command(version)]
struct Args {
    /// Data root folder (lyrics, album covers, ...)
    #[arg(short, long, global = true, env = "SPARKLE_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Config file (defaults to <config dir>/sparkle/sparkle.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List supported lyrics extensions
    Formats,
    /// Show tags and summary of a lyrics file
    Info { file: PathBuf },
    /// Print every timed line
    Dump { file: PathBuf },
    /// Convert between formats, chosen by extension
    Convert { src: PathBuf, dst: PathBuf },
    /// Show the line and word sung at a position (mm:ss.fff)
    At { file: PathBuf, time: String },
    /// Read song information from an audio file
    Song {
        audio: PathBuf,
        /// Save the embedded cover into the album folder
        #[arg(long)]
        save_cover: bool,
    },
    /// Find the lyrics file for a song display name
    Find { name: String },
    /// List lyrics files under a folder (defaults to the lyrics folder)
    Scan { dir: Option<PathBuf> },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_or_default(args.config.as_deref());

    init_tracing(&config)?;

    info!(
        "Starting {} lyrics tool v{} [{}] built {} ({})",
        APP_NAME,
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let root_folder = RootFolderResolver::new()
        .with_cli_arg(args.root_folder.clone())
        .with_toml(&config)
        .resolve();
    let paths = AppPaths::new(root_folder);
    tracing::debug!(root = %paths.root().display(), "Resolved root folder");

    let io = LyricsIo::global();

    match args.command {
        Command::Formats => {
            for ext in io.supported_exts() {
                println!("{}", ext);
            }
        }
        Command::Info { file } => print_info(io, &file)?,
        Command::Dump { file } => dump(io, &file)?,
        Command::Convert { src, dst } => {
            let converted = io.convert(&src, &dst).with_context(|| {
                format!("Failed to convert {} to {}", src.display(), dst.display())
            })?;
            println!(
                "Converted {} lines to {} ({})",
                converted.lines.len(),
                dst.display(),
                converted.format
            );
        }
        Command::At { file, time } => show_position(io, &file, &time)?,
        Command::Song { audio, save_cover } => show_song(&paths, &audio, save_cover)?,
        Command::Find { name } => {
            paths
                .ensure_all()
                .with_context(|| format!("Failed to create {}", paths.root().display()))?;
            let preferred = preferred_formats(&config);
            let found = LyricsScanner::new()
                .find_for(&name, &paths.lyrics(), &preferred)
                .context("Failed to search lyrics folder")?;
            match found {
                Some(path) => println!("{}", path.display()),
                None => bail!("No lyrics found for '{}' in {}", name, paths.lyrics().display()),
            }
        }
        Command::Scan { dir } => {
            let dir = match dir {
                Some(dir) => dir,
                None => {
                    paths
                        .ensure_all()
                        .with_context(|| format!("Failed to create {}", paths.root().display()))?;
                    paths.lyrics()
                }
            };
            let files = LyricsScanner::new()
                .scan(&dir)
                .with_context(|| format!("Failed to scan {}", dir.display()))?;
            for file in &files {
                println!("{}", file.display());
            }
            info!("Found {} lyrics files", files.len());
        }
    }

    Ok(())
}

/// `RUST_LOG` wins, then the configured level, then `info`
fn init_tracing(config: &TomlConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match &config.logging.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn preferred_formats(config: &TomlConfig) -> Vec<LyricsFormat> {
    config
        .lyrics
        .preferred_formats
        .iter()
        .filter_map(|ext| {
            let format = LyricsFormat::from_ext(ext);
            if format.is_none() {
                tracing::warn!(ext = %ext, "Ignoring unknown preferred lyrics format");
            }
            format
        })
        .collect()
}

fn read(io: &LyricsIo, file: &Path) -> Result<sparkle_lyrics::LyricsInfo> {
    io.read_path(file)
        .with_context(|| format!("Failed to read {}", file.display()))
}

fn print_info(io: &LyricsIo, file: &Path) -> Result<()> {
    let lyrics = read(io, file)?;
    let tags = &lyrics.tags;
    let show = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());

    println!("File:    {}", file.display());
    println!("Format:  {}", lyrics.format);
    println!("Title:   {}", show(&tags.title));
    println!("Artist:  {}", show(&tags.artist));
    println!("Album:   {}", show(&tags.album));
    println!("By:      {}", show(&tags.by));
    println!("Offset:  {} ms", tags.offset_or_zero());
    if let Some(total) = tags.total {
        println!("Total:   {}", format_clock_millis(total));
    }
    for (key, value) in &tags.extra {
        println!("[{}]  {}", key, value);
    }
    println!("Lines:   {}", lyrics.lines.len());
    let timing = if lyrics.format.is_word_timed() { "per word" } else { "per line" };
    println!("Timing:  {}", timing);
    println!("Extra:   {:?}", lyrics.extra_kind());
    Ok(())
}

fn dump(io: &LyricsIo, file: &Path) -> Result<()> {
    let lyrics = read(io, file)?;
    for (index, line) in lyrics.lines.iter().enumerate() {
        println!(
            "{:>4} [{} - {}] {}",
            index,
            format_clock_millis(line.start_time),
            format_clock_millis(line.end_time),
            line.text
        );
        if let Some(translation) = lyrics.extra.translation.get(index) {
            println!("       {}", translation.text);
        }
    }
    Ok(())
}

fn show_position(io: &LyricsIo, file: &Path, time: &str) -> Result<()> {
    let progress = parse_clock_millis(time).with_context(|| format!("Invalid time '{}'", time))?;
    let session = LyricsSession::new(read(io, file)?, Some(file.to_path_buf()));

    let Some(position) = session.word_progress_at(progress) else {
        bail!("{} has no lyrics lines", file.display());
    };
    let line = &session.lines()[position.line_index];

    println!("Line {}: {}", position.line_index, line.text);
    match position.word_index {
        Some(word) => println!(
            "Word {}: '{}' ({:.0}%)",
            word,
            line.words.get(word).map(String::as_str).unwrap_or(""),
            position.fraction * 100.0
        ),
        None => println!("Line has no timed words"),
    }
    if let Some(translation) = session.translation_for(position.line_index) {
        println!("Translation: {}", translation.text);
    }
    Ok(())
}

fn show_song(paths: &AppPaths, audio: &Path, save_cover: bool) -> Result<()> {
    let song = SongInfo::from_file(audio)
        .with_context(|| format!("Failed to read song info from {}", audio.display()))?;
    let Some(mut song) = song else {
        bail!("{} is missing or too small to be a song", audio.display());
    };

    if save_cover {
        song.attach_album_cover(&paths.album());
    }
    println!("{}", serde_json::to_string_pretty(&song)?);
    Ok(())
}
