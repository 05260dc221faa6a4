// Audio track extraction
//
// Pulls a 16 kHz mono PCM WAV out of the source video for the transcriber.
// The file lives in a self-deleting temp path: dropping the artifact removes it.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempPath;

use crate::constants::{AUDIO_CHANNELS, AUDIO_SAMPLE_RATE};
use crate::error::{Result, ScoutError};

/// Temporary extracted audio. Deleted on drop or `release`.
#[derive(Debug)]
pub struct AudioArtifact {
    path: TempPath,
}

impl AudioArtifact {
    pub fn new(path: TempPath) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file now, reporting any failure instead of ignoring it
    pub fn release(self) -> Result<()> {
        self.path.close()?;
        Ok(())
    }
}

/// Allocate an empty temp WAV path in `temp_dir` (system temp dir when None)
fn allocate_wav(temp_dir: Option<&PathBuf>) -> Result<TempPath> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("videoscout-").suffix(".wav");

    let file = match temp_dir {
        Some(dir) => builder.tempfile_in(dir),
        None => builder.tempfile(),
    }
    .map_err(|e| ScoutError::Media(format!("Failed to create temp audio file: {}", e)))?;

    Ok(file.into_temp_path())
}

/// Extract the audio track of `source_path` into a temporary WAV file.
pub fn extract_audio(source_path: &Path, temp_dir: Option<&PathBuf>) -> Result<AudioArtifact> {
    let wav_path = allocate_wav(temp_dir)?;

    let output = Command::new(crate::tools::ffmpeg_path())
        .args(["-y", "-v", "error", "-i"])
        .arg(source_path)
        .args([
            "-vn",
            "-ac", &AUDIO_CHANNELS.to_string(),
            "-ar", &AUDIO_SAMPLE_RATE.to_string(),
            "-c:a", "pcm_s16le",
        ])
        .arg(&*wav_path)
        .output()
        .map_err(|e| ScoutError::Media(format!("Failed to run ffmpeg: {}", e)))?;

    // On any early return `wav_path` drops and the partial file goes with it
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ScoutError::Media(format!("Audio extraction failed: {}", stderr.trim())));
    }

    let size = std::fs::metadata(&wav_path).map(|m| m.len()).unwrap_or(0);
    if size == 0 {
        return Err(ScoutError::Media("Audio extraction produced an empty file".to_string()));
    }

    Ok(AudioArtifact::new(wav_path))
}
