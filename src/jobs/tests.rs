// Batch runner tests

use super::*;
use crate::engines::{Engines, GrammarChecker, MediaExtractor, ReadabilityMeter, Transcriber};
use crate::error::{Result, ScoutError};
use crate::media::{AudioArtifact, ExtractedMedia};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

/// Duration comes from the file stem ("95.mp4" -> 95s); "noaudio" fails
struct StemMedia;

impl MediaExtractor for StemMedia {
    fn extract_duration_and_audio(&self, media_path: &Path) -> Result<ExtractedMedia> {
        let stem = media_path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        if stem.starts_with("noaudio") {
            return Err(ScoutError::Media("No audio stream".into()));
        }
        let duration = stem.parse::<f64>().unwrap_or(120.0);
        let wav = tempfile::Builder::new().suffix(".wav").tempfile()?.into_temp_path();
        Ok(ExtractedMedia {
            duration_seconds: duration,
            audio: AudioArtifact::new(wav),
        })
    }
}

/// Same transcript for every clip
struct FixedTranscriber;

impl Transcriber for FixedTranscriber {
    fn transcribe(&self, _audio_path: &Path) -> Result<String> {
        Ok("a clean short sentence".to_string())
    }
}

/// Panics on demand to exercise worker recovery
struct Grammar;

impl GrammarChecker for Grammar {
    fn check_grammar(&self, text: &str) -> Result<u32> {
        if text.contains("panic") {
            panic!("grammar engine exploded");
        }
        Ok(0)
    }
}

/// Small delay so workers overlap
struct Ease;

impl ReadabilityMeter for Ease {
    fn reading_ease(&self, _text: &str) -> Result<f64> {
        std::thread::sleep(Duration::from_millis(5));
        Ok(50.0)
    }
}

struct PanickyTranscriber;

impl Transcriber for PanickyTranscriber {
    fn transcribe(&self, _audio_path: &Path) -> Result<String> {
        Ok("panic now".to_string())
    }
}

fn pipeline_with(transcriber: impl Transcriber + Send + Sync + 'static) -> Arc<AnalysisPipeline> {
    Arc::new(AnalysisPipeline::new(Engines {
        media: Arc::new(StemMedia),
        transcriber: Arc::new(transcriber),
        grammar: Arc::new(Grammar),
        readability: Arc::new(Ease),
    }))
}

fn requests(dir: &TempDir, stems: &[&str]) -> Vec<VideoRequest> {
    stems
        .iter()
        .map(|stem| {
            let path = dir.path().join(format!("{}.mp4", stem));
            std::fs::write(&path, b"x").unwrap();
            VideoRequest::new(*stem, path)
        })
        .collect()
}

fn no_progress(_: &JobProgress) {}

#[test]
fn test_outcomes_in_submission_order() {
    let dir = TempDir::new().unwrap();
    let stems = ["60", "120", "30", "150", "95", "200"];
    let runner = BatchRunner::new(pipeline_with(FixedTranscriber), 3);

    let report = runner.run(requests(&dir, &stems), &AtomicBool::new(false), &no_progress);

    let ids: Vec<&str> = report.outcomes.iter().map(|o| o.video_id.as_str()).collect();
    assert_eq!(ids, stems);
    assert_eq!(report.completed, 6);
    assert_eq!(report.total(), 6);

    let scores: Vec<u8> = report
        .outcomes
        .iter()
        .map(|o| o.result.as_ref().unwrap().display_score)
        .collect();
    // 60s -> length 25 (raw 85), 120s -> 40 (raw 100), 30s -> 10 (raw 70),
    // 150s -> 40, 95s -> 40, 200s -> 15 (raw 75)
    assert_eq!(scores, [8, 9, 7, 9, 9, 7]);
}

#[test]
fn test_failure_is_isolated() {
    let dir = TempDir::new().unwrap();
    let runner = BatchRunner::new(pipeline_with(FixedTranscriber), 2);

    let report = runner.run(
        requests(&dir, &["120", "noaudio", "100"]),
        &AtomicBool::new(false),
        &no_progress,
    );

    assert_eq!(report.completed, 2);
    assert_eq!(report.failed, 1);

    let failed = &report.outcomes[1];
    assert_eq!(failed.status, JobStatus::Failed);
    assert!(failed.result.is_none());
    let error = failed.error.as_ref().unwrap();
    assert_eq!(error.kind, "media_error");
    assert_eq!(error.phase, Some(Phase::MediaProcessed));
}

#[test]
fn test_missing_file_fails_only_that_job() {
    let dir = TempDir::new().unwrap();
    let mut reqs = requests(&dir, &["120"]);
    reqs.push(VideoRequest::new("ghost", dir.path().join("ghost.mp4")));

    let report = BatchRunner::new(pipeline_with(FixedTranscriber), 2)
        .run(reqs, &AtomicBool::new(false), &no_progress);

    assert_eq!(report.outcomes[0].status, JobStatus::Completed);
    assert_eq!(report.outcomes[1].error.as_ref().unwrap().kind, "not_found");
}

#[test]
fn test_panicking_job_is_recovered() {
    let dir = TempDir::new().unwrap();
    let runner = BatchRunner::new(pipeline_with(PanickyTranscriber), 1);

    let report = runner.run(requests(&dir, &["120", "90"]), &AtomicBool::new(false), &no_progress);

    // The single worker survived the first panic and ran the second job
    assert_eq!(report.failed, 2);
    for outcome in &report.outcomes {
        let error = outcome.error.as_ref().unwrap();
        assert_eq!(error.kind, "internal_error");
        assert!(error.phase.is_none());
        assert!(error.message.contains("grammar engine exploded"));
    }
}

#[test]
fn test_cancel_before_start() {
    let dir = TempDir::new().unwrap();
    let runner = BatchRunner::new(pipeline_with(FixedTranscriber), 2);

    let report = runner.run(requests(&dir, &["120", "100", "90"]), &AtomicBool::new(true), &no_progress);

    assert_eq!(report.cancelled, 3);
    assert!(report.outcomes.iter().all(|o| o.status == JobStatus::Cancelled && o.worker.is_none()));
}

#[test]
fn test_cancel_mid_batch() {
    let dir = TempDir::new().unwrap();
    let runner = BatchRunner::new(pipeline_with(FixedTranscriber), 1);
    let cancel = AtomicBool::new(false);

    // Raise the flag as soon as the first job reports in
    let on_progress = |_: &JobProgress| cancel.store(true, Ordering::SeqCst);
    let report = runner.run(requests(&dir, &["120", "100", "90"]), &cancel, &on_progress);

    assert_eq!(report.outcomes[0].status, JobStatus::Completed);
    assert_eq!(report.outcomes[1].status, JobStatus::Cancelled);
    assert_eq!(report.outcomes[2].status, JobStatus::Cancelled);
}

#[test]
fn test_progress_reported_per_job() {
    let dir = TempDir::new().unwrap();
    let runner = BatchRunner::new(pipeline_with(FixedTranscriber), 2);
    let seen = Mutex::new(Vec::new());

    let on_progress = |p: &JobProgress| seen.lock().unwrap().push((p.finished, p.total, p.is_error()));
    runner.run(requests(&dir, &["120", "noaudio"]), &AtomicBool::new(false), &on_progress);

    let mut seen = seen.into_inner().unwrap();
    seen.sort();
    assert_eq!(seen.len(), 2);
    assert_eq!((seen[0].0, seen[1].0), (1, 2));
    assert!(seen.iter().all(|(_, total, _)| *total == 2));
    assert_eq!(seen.iter().filter(|(_, _, err)| *err).count(), 1);
}

#[test]
fn test_progress_describes_each_video() {
    let dir = TempDir::new().unwrap();
    let runner = BatchRunner::new(pipeline_with(FixedTranscriber), 1);
    let events = Mutex::new(Vec::new());

    let on_progress = |p: &JobProgress| events.lock().unwrap().push(p.clone());
    runner.run(requests(&dir, &["120", "noaudio"]), &AtomicBool::new(false), &on_progress);

    let events = events.into_inner().unwrap();
    assert_eq!(events[0].video_id, "120");
    assert_eq!(events[0].status, JobStatus::Completed);
    assert_eq!(events[0].display_score, Some(9));

    let failure = events[1].failure.as_ref().unwrap();
    assert_eq!(events[1].status, JobStatus::Failed);
    assert_eq!(failure.phase, Some(Phase::MediaProcessed));
    assert_eq!(failure.kind, "media_error");
    assert!(events[1].display_score.is_none());
}

#[test]
fn test_empty_batch() {
    let runner = BatchRunner::new(pipeline_with(FixedTranscriber), 4);
    let report = runner.run(Vec::new(), &AtomicBool::new(false), &no_progress);
    assert_eq!(report.total(), 0);
}

#[test]
fn test_worker_count_clamped() {
    assert_eq!(BatchRunner::new(pipeline_with(FixedTranscriber), 0).workers(), 1);
    assert_eq!(BatchRunner::new(pipeline_with(FixedTranscriber), 1000).workers(), MAX_WORKERS);
}

#[test]
fn test_outcome_json_shape() {
    let dir = TempDir::new().unwrap();
    let report = BatchRunner::new(pipeline_with(FixedTranscriber), 1)
        .run(requests(&dir, &["120", "noaudio"]), &AtomicBool::new(false), &no_progress);

    let ok = serde_json::to_value(&report.outcomes[0]).unwrap();
    assert_eq!(ok["status"], "completed");
    assert_eq!(ok["result"]["score"], 9);
    assert!(ok.get("error").is_none());

    let bad = serde_json::to_value(&report.outcomes[1]).unwrap();
    assert_eq!(bad["status"], "failed");
    assert_eq!(bad["error"]["phase"], "media_processed");
    assert!(bad.get("result").is_none());
}
