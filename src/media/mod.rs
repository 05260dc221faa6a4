// Media handling: probe a submission and pull out its audio

pub mod ffprobe;
pub mod audio;

use std::path::{Path, PathBuf};

pub use audio::AudioArtifact;

use crate::engines::MediaExtractor;
use crate::error::{Result, ScoutError};

/// Output of the media step: the duration and a temporary audio track
#[derive(Debug)]
pub struct ExtractedMedia {
    pub duration_seconds: f64,
    pub audio: AudioArtifact,
}

/// ffprobe + ffmpeg backed extractor.
///
/// Each call spawns its own processes and writes its own temp file, so one
/// instance can be shared by any number of workers.
#[derive(Debug, Clone, Default)]
pub struct FfmpegExtractor {
    temp_dir: Option<PathBuf>,
}

impl FfmpegExtractor {
    pub fn new(temp_dir: Option<PathBuf>) -> Self {
        Self { temp_dir }
    }
}

impl MediaExtractor for FfmpegExtractor {
    fn extract_duration_and_audio(&self, media_path: &Path) -> Result<ExtractedMedia> {
        if !media_path.is_file() {
            return Err(ScoutError::NotFound(format!(
                "Media file not found: {}",
                media_path.display()
            )));
        }

        let probe = ffprobe::probe(media_path)?;
        let duration_seconds = probe.duration_seconds.ok_or_else(|| {
            ScoutError::Media(format!("No duration found for {}", media_path.display()))
        })?;
        if !probe.has_audio {
            return Err(ScoutError::Media(format!(
                "No audio stream in {}",
                media_path.display()
            )));
        }

        log::debug!("Probed {}: {:.2}s", media_path.display(), duration_seconds);

        let audio = audio::extract_audio(media_path, self.temp_dir.as_ref())?;
        log::debug!("Extracted audio to {}", audio.path().display());

        Ok(ExtractedMedia { duration_seconds, audio })
    }
}
