// Length scoring
// Full marks inside the target window, linear decay outside it.

use crate::constants::{
    COMPONENT_LENGTH, LENGTH_MAX_DURATION_SECS, LENGTH_MAX_SCORE, LENGTH_MIN_DURATION_SECS,
    LENGTH_PENALTY_PER_SECOND,
};
use super::{round2, ScoreComponent};

/// Score a duration (seconds) against the target window. Max 40.
pub fn score(duration_seconds: f64) -> ScoreComponent {
    let diff = distance_from_window(duration_seconds);
    let value = (LENGTH_MAX_SCORE - LENGTH_PENALTY_PER_SECOND * diff).max(0.0);

    ScoreComponent::new(COMPONENT_LENGTH, round2(value), LENGTH_MAX_SCORE)
}

/// Seconds between `duration` and the nearest window boundary (0 inside)
fn distance_from_window(duration: f64) -> f64 {
    0.0_f64
        .max(LENGTH_MIN_DURATION_SECS - duration)
        .max(duration - LENGTH_MAX_DURATION_SECS)
}
