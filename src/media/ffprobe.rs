// FFprobe wrapper for duration and audio-stream detection

use std::path::Path;
use std::process::Command;
use serde::Deserialize;

use crate::error::{Result, ScoutError};

#[derive(Debug, Deserialize)]
struct FFprobeOutput {
    streams: Option<Vec<FFprobeStream>>,
    format: Option<FFprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FFprobeStream {
    codec_type: Option<String>,
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FFprobeFormat {
    duration: Option<String>,
}

/// What the pipeline needs to know about a media file before extraction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaProbe {
    pub duration_seconds: Option<f64>,
    pub has_audio: bool,
}

/// Run ffprobe on a file
pub fn probe(path: &Path) -> Result<MediaProbe> {
    let output = Command::new(crate::tools::ffprobe_path())
        .args([
            "-v", "quiet",
            "-print_format", "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .map_err(|e| ScoutError::Media(format!("Failed to run ffprobe: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ScoutError::Media(format!("ffprobe failed: {}", stderr.trim())));
    }

    parse_probe_output(&output.stdout)
}

/// Parse ffprobe's JSON. Container duration wins over stream duration.
fn parse_probe_output(stdout: &[u8]) -> Result<MediaProbe> {
    let probe_output: FFprobeOutput = serde_json::from_slice(stdout)
        .map_err(|e| ScoutError::Media(format!("Failed to parse ffprobe output: {}", e)))?;

    let mut meta = MediaProbe {
        duration_seconds: probe_output.format
            .as_ref()
            .and_then(|f| parse_duration(f.duration.as_deref())),
        has_audio: false,
    };

    for stream in probe_output.streams.iter().flatten() {
        match stream.codec_type.as_deref() {
            Some("audio") => meta.has_audio = true,
            Some("video") if meta.duration_seconds.is_none() => {
                meta.duration_seconds = parse_duration(stream.duration.as_deref());
            }
            _ => {}
        }
    }

    Ok(meta)
}

/// Parse an ffprobe duration string ("123.456000") to seconds
fn parse_duration(duration_str: Option<&str>) -> Option<f64> {
    let seconds: f64 = duration_str?.trim().parse().ok()?;
    (seconds.is_finite() && seconds >= 0.0).then_some(seconds)
}
