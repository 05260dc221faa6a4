// Per-job progress for batch runs
//
// One event per finished job, built from its outcome: how far the batch is,
// and what happened to that video (grade, failure, or cancellation).

use serde::Serialize;

use super::{JobError, JobOutcome, JobStatus};

#[derive(Debug, Clone, Serialize)]
pub struct JobProgress {
    pub video_id: String,
    pub status: JobStatus,
    /// Jobs finished so far in this batch, this one included
    pub finished: u64,
    pub total: u64,
    pub percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<JobError>,
}

impl JobProgress {
    /// Progress event for `outcome`, the `finished`-th of `total` jobs
    pub fn for_outcome(outcome: &JobOutcome, finished: u64, total: u64) -> Self {
        let percent = (finished as f64 / total.max(1) as f64 * 100.0).min(100.0);
        Self {
            video_id: outcome.video_id.clone(),
            status: outcome.status,
            finished,
            total,
            percent,
            display_score: outcome.result.as_ref().map(|r| r.display_score),
            failure: outcome.error.clone(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.failure.is_some()
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == JobStatus::Cancelled
    }

    /// One-line human summary, e.g. "vid-1: score 7" or "vid-2: media_error in media_processed"
    pub fn summary(&self) -> String {
        match (&self.failure, self.display_score) {
            (Some(f), _) => match f.phase {
                Some(phase) => format!("{}: {} in {} ({})", self.video_id, f.kind, phase, f.message),
                None => format!("{}: {} ({})", self.video_id, f.kind, f.message),
            },
            (None, Some(score)) => format!("{}: score {}", self.video_id, score),
            (None, None) => format!("{}: {}", self.video_id, self.status),
        }
    }
}
