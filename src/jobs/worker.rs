// Batch worker -- pulls jobs off the shared queue until it is empty.
//
// Panics inside a job are caught so one bad submission cannot take the worker
// (or the rest of the batch) down with it.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use super::{is_cancelled, BatchState, JobError, JobOutcome, JobStatus};
use crate::pipeline::{AnalysisPipeline, VideoRequest};

/// Worker identifier: host:pid:n
pub(super) fn worker_id(n: usize) -> String {
    let hostname = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    let pid = std::process::id();
    format!("{}:{}:{}", hostname, pid, n)
}

pub(super) fn worker_loop(state: &BatchState<'_>, worker_id: String) {
    log::debug!("Worker {} started", worker_id);

    while let Some((index, request)) = state.next_job() {
        let outcome = if is_cancelled(state.cancel) {
            log::info!("[{}] {}", request.video_id, JobStatus::Cancelled);
            JobOutcome::cancelled(request)
        } else {
            log::debug!(
                "[{}] {} -> {} on {}",
                request.video_id, JobStatus::Queued, JobStatus::Processing, worker_id
            );
            run_job(state.pipeline, request, &worker_id)
        };

        log::debug!("[{}] -> {}", outcome.video_id, outcome.status);
        state.record(index, outcome);
    }

    log::debug!("Worker {} finished", worker_id);
}

fn run_job(pipeline: &AnalysisPipeline, request: VideoRequest, worker_id: &str) -> JobOutcome {
    let result = panic::catch_unwind(AssertUnwindSafe(|| pipeline.run(&request)));

    match result {
        Ok(Ok(analysis)) => JobOutcome::completed(request, analysis, worker_id),
        Ok(Err(failure)) => JobOutcome::failed(request, JobError::from(&failure), Some(worker_id)),
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            log::error!("[{}] Job panicked (recovered): {}", request.video_id, message);
            JobOutcome::failed(
                request,
                JobError::internal(format!("Job panicked: {}", message)),
                Some(worker_id),
            )
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
