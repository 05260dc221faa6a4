// whisper.cpp transcription
// Runs the whisper.cpp command line tool against the extracted WAV track.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, ScoutError};
use crate::tools::whisper_path;
use super::Transcriber;

/// Non-speech markers whisper emits on their own line, e.g. `[BLANK_AUDIO]`
static NON_SPEECH_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\[(][A-Za-z _]+[\])]$").expect("valid regex"));

/// Transcriber backed by whisper.cpp's CLI.
///
/// Thread-safe: each call spawns an independent process that loads the model,
/// so concurrent calls only compete for CPU. Bound concurrency with the batch
/// worker count.
#[derive(Debug, Clone)]
pub struct WhisperCliTranscriber {
    binary: PathBuf,
    model: PathBuf,
    language: String,
}

impl WhisperCliTranscriber {
    pub fn new(model: PathBuf, language: &str) -> Self {
        Self {
            binary: whisper_path(),
            model,
            language: language.to_string(),
        }
    }

    pub fn model(&self) -> &Path {
        &self.model
    }
}

impl Transcriber for WhisperCliTranscriber {
    fn transcribe(&self, audio_path: &Path) -> Result<String> {
        if !self.model.exists() {
            return Err(ScoutError::Transcription(format!(
                "Whisper model not found: {}",
                self.model.display()
            )));
        }

        log::debug!("Transcribing {} with {}", audio_path.display(), self.model.display());

        let output = Command::new(&self.binary)
            .arg("-m").arg(&self.model)
            .arg("-f").arg(audio_path)
            .args(["-l", &self.language, "-nt", "-np"])
            .output()
            .map_err(|e| ScoutError::Transcription(format!("Failed to run whisper: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScoutError::Transcription(format!("whisper failed: {}", stderr.trim())));
        }

        Ok(parse_transcript(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Join whisper's segment lines into one transcript, dropping non-speech markers
fn parse_transcript(stdout: &str) -> String {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !NON_SPEECH_LINE.is_match(line))
        .collect::<Vec<_>>()
        .join(" ")
}
