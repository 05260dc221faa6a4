// Complexity scoring
// Triangular score over Flesch reading ease, peaking at the standard-difficulty
// point and reaching zero at either end of the 0-100 scale.

use crate::constants::{
    COMPLEXITY_MAX_DISTANCE, COMPLEXITY_MAX_SCORE, COMPLEXITY_TARGET_EASE, COMPONENT_COMPLEXITY,
};
use super::{round2, ScoreComponent};

/// Score a reading-ease value. Max 30. Total over all inputs.
pub fn score(reading_ease: f64) -> ScoreComponent {
    let distance = (reading_ease - COMPLEXITY_TARGET_EASE).abs();
    // NaN compares false everywhere; treat it as maximally far from target
    let clamped_distance = if distance.is_nan() {
        COMPLEXITY_MAX_DISTANCE
    } else {
        distance.min(COMPLEXITY_MAX_DISTANCE)
    };

    let value = COMPLEXITY_MAX_SCORE * (1.0 - clamped_distance / COMPLEXITY_MAX_DISTANCE);

    ScoreComponent::new(COMPONENT_COMPLEXITY, round2(value.max(0.0)), COMPLEXITY_MAX_SCORE)
}
