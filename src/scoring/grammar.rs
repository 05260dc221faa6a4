// Grammar scoring
// Density based (errors per 100 words) so the score does not depend on length.

use crate::constants::{
    COMPONENT_GRAMMAR, GRAMMAR_DENSITY_WORDS, GRAMMAR_MAX_SCORE, GRAMMAR_PENALTY_PER_DENSITY,
};
use super::{round2, ScoreComponent};

/// Score a transcript from its grammar error count and word count. Max 30.
pub fn score(error_count: u32, word_count: usize) -> ScoreComponent {
    let density = error_density(error_count, word_count);
    let value = (GRAMMAR_MAX_SCORE - GRAMMAR_PENALTY_PER_DENSITY * density).max(0.0);

    ScoreComponent::new(COMPONENT_GRAMMAR, round2(value), GRAMMAR_MAX_SCORE)
}

/// Errors per 100 words. An empty transcript has density 0.
pub fn error_density(error_count: u32, word_count: usize) -> f64 {
    if word_count == 0 {
        return 0.0;
    }
    error_count as f64 / word_count as f64 * GRAMMAR_DENSITY_WORDS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_transcript_is_clean() {
        let c = score(5, 0);
        assert_eq!(c.value(), 30.0);
        assert_eq!(error_density(5, 0), 0.0);
    }

    #[test]
    fn test_no_errors_full_marks() {
        assert_eq!(score(0, 100).value(), 30.0);
    }

    #[test]
    fn test_density_ten_zeroes_score() {
        assert_eq!(score(10, 100).value(), 0.0);
    }

    #[test]
    fn test_density_beyond_ten_floors_at_zero() {
        assert_eq!(score(50, 100).value(), 0.0);
        assert_eq!(score(3, 1).value(), 0.0);
    }

    #[test]
    fn test_partial_penalty() {
        // 2 errors in 40 words -> density 5 -> 30 - 15
        assert_eq!(score(2, 40).value(), 15.0);
        // 1 error in 3 words -> density 33.3 -> 0
        assert_eq!(score(1, 3).value(), 0.0);
        // 1 error in 70 words -> density 1.4286 -> 25.714 -> 25.71
        assert_eq!(score(1, 70).value(), 25.71);
    }

    #[test]
    fn test_length_independent() {
        assert_eq!(score(1, 50).value(), score(4, 200).value());
    }
}
