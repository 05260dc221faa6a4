// Analysis pipeline
//
// Received -> MediaProcessed -> Transcribed -> Scored -> Completed.
// Any phase may fail; the failure carries the video id and the phase it happened in.
// The temporary audio track is released before either outcome is reported.


use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::READING_EASE_FALLBACK;
use crate::engines::{Engines, ReadabilityMeter};
use crate::error::ScoutError;
use crate::media::ExtractedMedia;
use crate::scoring::{self, AnalysisInput, ScoringBreakdown};

/// A submission to analyse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRequest {
    pub video_id: String,
    pub file_path: PathBuf,
}

impl VideoRequest {
    pub fn new(video_id: impl Into<String>, file_path: impl Into<PathBuf>) -> Self {
        Self {
            video_id: video_id.into(),
            file_path: file_path.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Received,
    MediaProcessed,
    Transcribed,
    Scored,
    Completed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Received => "received",
            Phase::MediaProcessed => "media_processed",
            Phase::Transcribed => "transcribed",
            Phase::Scored => "scored",
            Phase::Completed => "completed",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Successful analysis. Serializes to the response contract:
/// `{ video_id, score, transcript, details: {...} }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub video_id: String,
    #[serde(rename = "score")]
    pub display_score: u8,
    pub transcript: String,
    #[serde(rename = "details")]
    pub breakdown: ScoringBreakdown,
}

impl AnalysisResult {
    /// Score a fully gathered input
    pub fn from_input(video_id: impl Into<String>, input: AnalysisInput) -> Self {
        let (breakdown, display_score) = scoring::evaluate(&input);
        Self {
            video_id: video_id.into(),
            display_score,
            transcript: input.transcript,
            breakdown,
        }
    }
}

/// A failed analysis: which video, in which phase, and why
#[derive(Debug, Error)]
#[error("video {video_id} failed in phase {phase}: {error}")]
pub struct PipelineFailure {
    pub video_id: String,
    pub phase: Phase,
    #[source]
    pub error: ScoutError,
}

impl PipelineFailure {
    pub fn kind(&self) -> &'static str {
        self.error.kind()
    }
}

/// Give an engine error the kind of the phase it surfaced in.
/// Missing input, config and internal faults keep their own kind.
fn classify(phase: Phase, error: ScoutError) -> ScoutError {
    match (phase, error) {
        (_, e @ (ScoutError::NotFound(_) | ScoutError::Config(_) | ScoutError::Internal(_))) => e,
        (Phase::MediaProcessed, e @ ScoutError::Media(_)) => e,
        (Phase::MediaProcessed, e) => ScoutError::Media(e.to_string()),
        (Phase::Transcribed, e @ ScoutError::Transcription(_)) => e,
        (Phase::Transcribed, e) => ScoutError::Transcription(e.to_string()),
        (Phase::Scored, e @ ScoutError::GrammarEngine(_)) => e,
        (Phase::Scored, e) => ScoutError::GrammarEngine(e.to_string()),
        (_, e) => e,
    }
}

/// Reading ease with the recovery policy applied: any readability failure is
/// logged and replaced by the fallback ease (80.0, easy conversational text).
pub fn reading_ease_or_fallback(meter: &dyn ReadabilityMeter, video_id: &str, text: &str) -> f64 {
    match meter.reading_ease(text) {
        Ok(ease) if ease.is_finite() => ease,
        Ok(ease) => {
            log::warn!(
                "[{}] Readability returned {}, using fallback {}",
                video_id, ease, READING_EASE_FALLBACK
            );
            READING_EASE_FALLBACK
        }
        Err(e) => {
            log::warn!(
                "[{}] Readability failed ({}), using fallback {}",
                video_id, e, READING_EASE_FALLBACK
            );
            READING_EASE_FALLBACK
        }
    }
}

/// Runs submissions through the engines and the rubric.
///
/// Holds only shared engine handles, so one pipeline serves many workers.
#[derive(Clone)]
pub struct AnalysisPipeline {
    engines: Engines,
}

impl AnalysisPipeline {
    pub fn new(engines: Engines) -> Self {
        Self { engines }
    }

    pub fn engines(&self) -> &Engines {
        &self.engines
    }

    fn fail(&self, video_id: &str, phase: Phase, error: ScoutError) -> PipelineFailure {
        let error = classify(phase, error);
        log::error!(
            "[{}] Failed in phase {} ({}): {}",
            video_id, phase, error.kind(), error
        );
        PipelineFailure {
            video_id: video_id.to_string(),
            phase,
            error,
        }
    }

    /// Analyse one submission end to end.
    pub fn run(&self, request: &VideoRequest) -> Result<AnalysisResult, PipelineFailure> {
        let video_id = request.video_id.as_str();
        log::debug!("[{}] {}: {}", video_id, Phase::Received, request.file_path.display());

        if !request.file_path.is_file() {
            return Err(self.fail(
                video_id,
                Phase::Received,
                ScoutError::NotFound(format!("Video file not found: {}", request.file_path.display())),
            ));
        }

        let ExtractedMedia { duration_seconds, audio } = self
            .engines
            .media
            .extract_duration_and_audio(&request.file_path)
            .map_err(|e| self.fail(video_id, Phase::MediaProcessed, e))?;
        log::debug!("[{}] {}: {:.2}s", video_id, Phase::MediaProcessed, duration_seconds);

        let transcript = self.engines.transcriber.transcribe(audio.path());

        // Release before reporting either outcome
        if let Err(e) = audio.release() {
            log::warn!("[{}] Could not remove temporary audio: {}", video_id, e);
        }

        let transcript = transcript.map_err(|e| self.fail(video_id, Phase::Transcribed, e))?;
        log::debug!("[{}] {}: {} chars", video_id, Phase::Transcribed, transcript.len());

        self.score_transcript(video_id, duration_seconds, transcript)
    }

    /// Score an existing transcript: grammar check, readability, rubric.
    pub fn score_transcript(
        &self,
        video_id: &str,
        duration_seconds: f64,
        transcript: String,
    ) -> Result<AnalysisResult, PipelineFailure> {
        let grammar_errors = self
            .engines
            .grammar
            .check_grammar(&transcript)
            .map_err(|e| self.fail(video_id, Phase::Scored, e))?;

        let reading_ease =
            reading_ease_or_fallback(&*self.engines.readability, video_id, &transcript);

        let input = AnalysisInput::new(duration_seconds, transcript, grammar_errors, reading_ease);
        let result = AnalysisResult::from_input(video_id, input);
        log::debug!(
            "[{}] {}: raw {:.2}",
            video_id, Phase::Scored, result.breakdown.raw_total()
        );

        log::info!(
            "[{}] {}: score {} (length {:.2}, grammar {:.2}, complexity {:.2})",
            video_id,
            Phase::Completed,
            result.display_score,
            result.breakdown.length().value(),
            result.breakdown.grammar().value(),
            result.breakdown.complexity().value(),
        );
        Ok(result)
    }
}
