// Batch job system
//
// A fixed pool of workers drains a FIFO queue of submissions. Each job moves
// queued -> processing -> completed | failed, or straight to cancelled when the
// cancel flag is up before it starts. One job failing never touches another.

pub mod progress;
mod worker;

#[cfg(test)]
mod tests;

use std::collections::VecDeque;
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::constants::MAX_WORKERS;
use crate::pipeline::{AnalysisPipeline, AnalysisResult, Phase, PipelineFailure, VideoRequest};
use progress::JobProgress;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a job failed. `phase` is None when the job never reached the pipeline
/// (a worker panic or no worker to run it).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobError {
    pub phase: Option<Phase>,
    pub kind: String,
    pub message: String,
}

impl From<&PipelineFailure> for JobError {
    fn from(failure: &PipelineFailure) -> Self {
        Self {
            phase: Some(failure.phase),
            kind: failure.kind().to_string(),
            message: failure.error.to_string(),
        }
    }
}

impl JobError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            phase: None,
            kind: "internal_error".to_string(),
            message: message.into(),
        }
    }
}

/// Final state of one submission
#[derive(Debug, Clone, Serialize)]
pub struct JobOutcome {
    pub video_id: String,
    pub file_path: PathBuf,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<AnalysisResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JobError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker: Option<String>,
    pub finished_at: DateTime<Utc>,
}

impl JobOutcome {
    fn finish(request: VideoRequest, status: JobStatus, worker: Option<&str>) -> Self {
        Self {
            video_id: request.video_id,
            file_path: request.file_path,
            status,
            result: None,
            error: None,
            worker: worker.map(str::to_string),
            finished_at: Utc::now(),
        }
    }

    pub fn completed(request: VideoRequest, result: AnalysisResult, worker: &str) -> Self {
        Self {
            result: Some(result),
            ..Self::finish(request, JobStatus::Completed, Some(worker))
        }
    }

    pub fn failed(request: VideoRequest, error: JobError, worker: Option<&str>) -> Self {
        Self {
            error: Some(error),
            ..Self::finish(request, JobStatus::Failed, worker)
        }
    }

    pub fn cancelled(request: VideoRequest) -> Self {
        Self::finish(request, JobStatus::Cancelled, None)
    }
}

/// All outcomes of a batch, in submission order
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub outcomes: Vec<JobOutcome>,
    pub completed: usize,
    pub failed: usize,
    pub cancelled: usize,
}

impl BatchReport {
    fn from_outcomes(outcomes: Vec<JobOutcome>) -> Self {
        let count = |status| outcomes.iter().filter(|o| o.status == status).count();
        let (completed, failed, cancelled) = (
            count(JobStatus::Completed),
            count(JobStatus::Failed),
            count(JobStatus::Cancelled),
        );
        Self { outcomes, completed, failed, cancelled }
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }
}

/// Check if a batch has been cancelled.
pub fn is_cancelled(flag: &AtomicBool) -> bool {
    flag.load(Ordering::Relaxed)
}

/// Lock a batch mutex. A worker that panicked mid-update cannot leave the
/// queue or result slots in a torn state, so poisoning is ignored.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// Shared state the workers of one batch operate on
struct BatchState<'a> {
    pipeline: &'a AnalysisPipeline,
    queue: Mutex<VecDeque<(usize, VideoRequest)>>,
    slots: Mutex<Vec<Option<JobOutcome>>>,
    finished: AtomicUsize,
    total: u64,
    cancel: &'a AtomicBool,
    on_progress: &'a (dyn Fn(&JobProgress) + Sync),
}

impl BatchState<'_> {
    fn next_job(&self) -> Option<(usize, VideoRequest)> {
        lock(&self.queue).pop_front()
    }

    fn record(&self, index: usize, outcome: JobOutcome) {
        let finished = self.finished.fetch_add(1, Ordering::SeqCst) as u64 + 1;
        (self.on_progress)(&JobProgress::for_outcome(&outcome, finished, self.total));
        lock(&self.slots)[index] = Some(outcome);
    }
}

/// Runs a batch of submissions on a bounded worker pool.
pub struct BatchRunner {
    pipeline: Arc<AnalysisPipeline>,
    workers: usize,
}

impl BatchRunner {
    pub fn new(pipeline: Arc<AnalysisPipeline>, workers: usize) -> Self {
        Self {
            pipeline,
            workers: workers.clamp(1, MAX_WORKERS),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run every request to completion (or cancellation) and report the
    /// outcomes in submission order. `on_progress` is called once per job.
    pub fn run(
        &self,
        requests: Vec<VideoRequest>,
        cancel: &AtomicBool,
        on_progress: &(dyn Fn(&JobProgress) + Sync),
    ) -> BatchReport {
        let total = requests.len();
        let state = BatchState {
            pipeline: &self.pipeline,
            queue: Mutex::new(requests.into_iter().enumerate().collect()),
            slots: Mutex::new((0..total).map(|_| None).collect()),
            finished: AtomicUsize::new(0),
            total: total as u64,
            cancel,
            on_progress,
        };

        let pool_size = self.workers.min(total);
        log::info!("Batch of {} video(s) on {} worker(s)", total, pool_size);

        std::thread::scope(|s| {
            for n in 0..pool_size {
                let state = &state;
                let spawned = std::thread::Builder::new()
                    .name(format!("score-worker-{}", n))
                    .spawn_scoped(s, move || worker::worker_loop(state, worker::worker_id(n)));
                if let Err(e) = spawned {
                    log::error!("Failed to spawn worker {}: {}", n, e);
                }
            }
        });

        // Anything still queued had no worker to run it
        while let Some((index, request)) = state.next_job() {
            log::error!("[{}] No worker available", request.video_id);
            let outcome = JobOutcome::failed(request, JobError::internal("No worker available"), None);
            state.record(index, outcome);
        }

        let outcomes: Vec<JobOutcome> = state
            .slots
            .into_inner()
            .unwrap_or_else(|e| e.into_inner())
            .into_iter()
            .flatten()
            .collect();

        let report = BatchReport::from_outcomes(outcomes);
        log::info!(
            "Batch finished: {} completed, {} failed, {} cancelled",
            report.completed, report.failed, report.cancelled
        );
        report
    }
}
