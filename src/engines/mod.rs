// External engine handles
//
// The pipeline never reaches for global engine state. Every collaborator is a
// handle passed in through `Engines`, and each implementation documents its own
// thread-safety contract. Engines that cannot be shared across threads are
// wrapped in `Serialized`, which queues callers behind a mutex.

pub mod whisper;
pub mod languagetool;
pub mod readability;

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::ScoutConfig;
use crate::error::{Result, ScoutError};
use crate::media::{ExtractedMedia, FfmpegExtractor};

/// Produces the duration and a temporary audio track for a media file.
/// Failures are `ScoutError::Media` (or `NotFound`).
pub trait MediaExtractor {
    fn extract_duration_and_audio(&self, media_path: &Path) -> Result<ExtractedMedia>;
}

/// Speech-to-text. Failures are `ScoutError::Transcription`.
pub trait Transcriber {
    fn transcribe(&self, audio_path: &Path) -> Result<String>;
}

/// Counts grammar issues in text. Failures are `ScoutError::GrammarEngine`.
pub trait GrammarChecker {
    fn check_grammar(&self, text: &str) -> Result<u32>;
}

/// Reading-ease metric. Failures are `ScoutError::Readability`.
pub trait ReadabilityMeter {
    fn reading_ease(&self, text: &str) -> Result<f64>;
}

/// The set of engine handles a pipeline runs against.
/// Cloning shares the same underlying engines.
#[derive(Clone)]
pub struct Engines {
    pub media: Arc<dyn MediaExtractor + Send + Sync>,
    pub transcriber: Arc<dyn Transcriber + Send + Sync>,
    pub grammar: Arc<dyn GrammarChecker + Send + Sync>,
    pub readability: Arc<dyn ReadabilityMeter + Send + Sync>,
}

impl Engines {
    /// Build the default engine set: ffmpeg, whisper.cpp, LanguageTool, Flesch.
    pub fn from_config(config: &ScoutConfig) -> Result<Self> {
        let media = FfmpegExtractor::new(config.temp_dir.clone());
        let transcriber = whisper::WhisperCliTranscriber::new(
            config.whisper_model_path()?,
            &config.transcription_language,
        );
        let grammar = languagetool::LanguageToolClient::new(
            &config.languagetool_url,
            &config.grammar_language,
            config.http_timeout_secs,
        )?;

        Ok(Self {
            media: Arc::new(media),
            transcriber: Arc::new(transcriber),
            grammar: Arc::new(grammar),
            readability: Arc::new(readability::FleschMeter),
        })
    }
}

/// Serializes access to an engine that is not safe to call concurrently.
/// Callers block until the engine is free.
pub struct Serialized<T> {
    inner: Mutex<T>,
}

impl<T> Serialized<T> {
    pub fn new(engine: T) -> Self {
        Self { inner: Mutex::new(engine) }
    }

    fn lock(&self) -> Result<MutexGuard<'_, T>> {
        self.inner
            .lock()
            .map_err(|_| ScoutError::Internal("engine lock poisoned".to_string()))
    }
}

impl<T: MediaExtractor> MediaExtractor for Serialized<T> {
    fn extract_duration_and_audio(&self, media_path: &Path) -> Result<ExtractedMedia> {
        self.lock()?.extract_duration_and_audio(media_path)
    }
}

impl<T: Transcriber> Transcriber for Serialized<T> {
    fn transcribe(&self, audio_path: &Path) -> Result<String> {
        self.lock()?.transcribe(audio_path)
    }
}

impl<T: GrammarChecker> GrammarChecker for Serialized<T> {
    fn check_grammar(&self, text: &str) -> Result<u32> {
        self.lock()?.check_grammar(text)
    }
}

impl<T: ReadabilityMeter> ReadabilityMeter for Serialized<T> {
    fn reading_ease(&self, text: &str) -> Result<f64> {
        self.lock()?.reading_ease(text)
    }
}
