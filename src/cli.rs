// VideoScout CLI binary

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use videoscout_lib::discover::discover_videos;
use videoscout_lib::engines::languagetool::LanguageToolClient;
use videoscout_lib::engines::readability::FleschMeter;
use videoscout_lib::engines::GrammarChecker;
use videoscout_lib::jobs::progress::JobProgress;
use videoscout_lib::jobs::BatchRunner;
use videoscout_lib::pipeline::reading_ease_or_fallback;
use videoscout_lib::{
    tools, AnalysisInput, AnalysisPipeline, AnalysisResult, Engines, ScoutConfig, VideoRequest,
};

#[derive(Parser)]
#[command(name = "videoscout")]
#[command(about = "VideoScout - Score short spoken-video submissions on a 1-9 scale", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.videoscout/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a single video
    Score {
        /// Video file
        file: PathBuf,
        /// Video ID (defaults to a new UUID)
        #[arg(long)]
        id: Option<String>,
        /// Pretty-print the JSON result
        #[arg(long)]
        pretty: bool,
    },

    /// Score every video under a path
    Batch {
        /// File or directory (walked recursively)
        path: PathBuf,
        /// Concurrent workers (defaults to config)
        #[arg(short, long)]
        workers: Option<usize>,
        /// Write JSON lines here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Score a transcript without any media
    Rate {
        /// Duration in seconds
        #[arg(long)]
        duration: f64,
        /// Transcript text
        #[arg(long, conflicts_with = "transcript_file", required_unless_present = "transcript_file")]
        transcript: Option<String>,
        /// Read the transcript from a file
        #[arg(long)]
        transcript_file: Option<PathBuf>,
        /// Grammar error count (asks LanguageTool when omitted)
        #[arg(long)]
        errors: Option<u32>,
        /// Flesch reading ease (computed when omitted)
        #[arg(long)]
        reading_ease: Option<f64>,
        /// Video ID
        #[arg(long, default_value = "manual")]
        id: String,
    },

    /// Check external tools and services
    Tools,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = ScoutConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Score { file, id, pretty } => cmd_score(&config, file, id, pretty),
        Commands::Batch { path, workers, output } => cmd_batch(&config, &path, workers, output),
        Commands::Rate { duration, transcript, transcript_file, errors, reading_ease, id } => {
            cmd_rate(&config, duration, transcript, transcript_file, errors, reading_ease, &id)
        }
        Commands::Tools => cmd_tools(&config),
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "info,videoscout=debug,videoscout_lib=debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .init();
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}

fn cmd_score(config: &ScoutConfig, file: PathBuf, id: Option<String>, pretty: bool) -> Result<()> {
    let pipeline = AnalysisPipeline::new(Engines::from_config(config)?);
    let video_id = id.unwrap_or_else(|| Uuid::new_v4().to_string());

    match pipeline.run(&VideoRequest::new(video_id, file)) {
        Ok(result) => print_json(&result, pretty),
        Err(failure) => anyhow::bail!(
            "{} failed during {} [{}]: {}",
            failure.video_id,
            failure.phase,
            failure.kind(),
            failure.error
        ),
    }
}

fn cmd_batch(
    config: &ScoutConfig,
    path: &Path,
    workers: Option<usize>,
    output: Option<PathBuf>,
) -> Result<()> {
    let files = discover_videos(path)?;
    if files.is_empty() {
        println!("No videos found under {}", path.display());
        return Ok(());
    }

    let requests: Vec<VideoRequest> = files
        .into_iter()
        .map(|file| VideoRequest::new(Uuid::new_v4().to_string(), file))
        .collect();

    let pipeline = Arc::new(AnalysisPipeline::new(Engines::from_config(config)?));
    let runner = BatchRunner::new(pipeline, workers.unwrap_or(config.workers));

    let cancel = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&cancel);
    ctrlc::set_handler(move || {
        log::warn!("Cancel requested, finishing running jobs");
        handler_flag.store(true, Ordering::SeqCst);
    })
    .context("Failed to install Ctrl-C handler")?;

    log::info!("Scoring {} video(s) with {} worker(s)", requests.len(), runner.workers());

    let on_progress = |p: &JobProgress| {
        if p.is_error() {
            log::warn!("[{}/{}] {}", p.finished, p.total, p.summary());
        } else {
            log::info!("[{}/{}] {}", p.finished, p.total, p.summary());
        }
    };
    let report = runner.run(requests, &cancel, &on_progress);

    let to_file = output.is_some();
    let mut out: Box<dyn Write> = match &output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Cannot create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    for outcome in &report.outcomes {
        serde_json::to_writer(&mut out, outcome)?;
        writeln!(out)?;
    }
    out.flush()?;
    drop(out);

    let summary = format!(
        "Batch complete: {} total, {} completed, {} failed, {} cancelled",
        report.total(),
        report.completed,
        report.failed,
        report.cancelled
    );
    // Keep stdout clean for the JSON lines when no output file is given
    if to_file {
        println!("{}", summary);
    } else {
        eprintln!("{}", summary);
    }

    Ok(())
}

fn cmd_rate(
    config: &ScoutConfig,
    duration: f64,
    transcript: Option<String>,
    transcript_file: Option<PathBuf>,
    errors: Option<u32>,
    reading_ease: Option<f64>,
    video_id: &str,
) -> Result<()> {
    if !duration.is_finite() || duration < 0.0 {
        anyhow::bail!("Duration must be a non-negative number of seconds, got {}", duration);
    }

    let text = match (transcript, transcript_file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Cannot read transcript {}", path.display()))?,
        (None, None) => anyhow::bail!("Provide --transcript or --transcript-file"),
    };
    let text = text.trim().to_string();

    let grammar_errors = match errors {
        Some(n) => n,
        None => LanguageToolClient::new(
            &config.languagetool_url,
            &config.grammar_language,
            config.http_timeout_secs,
        )?
        .check_grammar(&text)?,
    };

    let ease = match reading_ease {
        Some(x) => x,
        None => reading_ease_or_fallback(&FleschMeter, video_id, &text),
    };

    let result = AnalysisResult::from_input(
        video_id,
        AnalysisInput::new(duration, text, grammar_errors, ease),
    );
    print_json(&result, true)
}

fn cmd_tools(config: &ScoutConfig) -> Result<()> {
    let mark = |ok: bool| if ok { "ok" } else { "MISSING" };

    println!("External tools:");
    println!("  ffprobe      {:<8} {}", mark(tools::is_tool_available("ffprobe")), tools::ffprobe_path().display());
    println!("  ffmpeg       {:<8} {}", mark(tools::is_tool_available("ffmpeg")), tools::ffmpeg_path().display());
    println!("  whisper      {:<8} {}", mark(tools::is_tool_available("whisper")), tools::whisper_path().display());

    let model = config.whisper_model_path()?;
    println!("  model        {:<8} {}", mark(model.is_file()), model.display());

    let grammar = LanguageToolClient::new(
        &config.languagetool_url,
        &config.grammar_language,
        config.http_timeout_secs,
    )?;
    println!("  languagetool {:<8} {}", mark(grammar.is_available()), grammar.base_url());

    Ok(())
}
