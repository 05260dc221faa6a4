// Scoring Engine
// Pure rubric scorers and the aggregation that turns them into a 1-9 grade.
// Nothing in here performs I/O; identical input always yields identical output.

pub mod length;
pub mod grammar;
pub mod complexity;
pub mod aggregate;


use serde::{Deserialize, Serialize};

use crate::constants::SCORING_VERSION;

/// Everything the rubric needs, gathered from the external engines.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisInput {
    pub duration_seconds: f64,
    pub transcript: String,
    pub grammar_error_count: u32,
    pub reading_ease: f64,
}

impl AnalysisInput {
    pub fn new(
        duration_seconds: f64,
        transcript: impl Into<String>,
        grammar_error_count: u32,
        reading_ease: f64,
    ) -> Self {
        Self {
            duration_seconds,
            transcript: transcript.into(),
            grammar_error_count,
            reading_ease,
        }
    }
}

/// One rubric component. `value` always lies in `[0, max]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreComponent {
    name: &'static str,
    value: f64,
    max: f64,
}

impl ScoreComponent {
    /// Build a component, clamping `value` into `[0, max]`. NaN becomes 0.
    pub fn new(name: &'static str, value: f64, max: f64) -> Self {
        let value = if value.is_nan() { 0.0 } else { value.clamp(0.0, max) };
        Self { name, value, max }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

/// Full breakdown of a scored submission.
/// Serializes to the `details` object of the response contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "ScoreDetails")]
pub struct ScoringBreakdown {
    duration_seconds: f64,
    length: ScoreComponent,
    grammar: ScoreComponent,
    complexity: ScoreComponent,
    grammar_errors: u32,
    reading_ease: f64,
    raw_total: f64,
    word_count: usize,
    error_density: f64,
    scoring_version: u32,
}

impl ScoringBreakdown {
    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    pub fn length(&self) -> &ScoreComponent {
        &self.length
    }

    pub fn grammar(&self) -> &ScoreComponent {
        &self.grammar
    }

    pub fn complexity(&self) -> &ScoreComponent {
        &self.complexity
    }

    pub fn grammar_errors(&self) -> u32 {
        self.grammar_errors
    }

    pub fn reading_ease(&self) -> f64 {
        self.reading_ease
    }

    pub fn raw_total(&self) -> f64 {
        self.raw_total
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn error_density(&self) -> f64 {
        self.error_density
    }

    pub fn scoring_version(&self) -> u32 {
        self.scoring_version
    }
}

/// Wire shape of a breakdown (`details` in the response)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreDetails {
    pub duration_seconds: f64,
    pub length_score: f64,
    pub grammar_score: f64,
    pub grammar_errors: u32,
    pub complexity_score: f64,
    pub reading_ease: f64,
    pub raw_total: f64,
    pub word_count: usize,
}

impl From<ScoringBreakdown> for ScoreDetails {
    fn from(b: ScoringBreakdown) -> Self {
        Self {
            duration_seconds: b.duration_seconds,
            length_score: b.length.value,
            grammar_score: b.grammar.value,
            grammar_errors: b.grammar_errors,
            complexity_score: b.complexity.value,
            reading_ease: b.reading_ease,
            raw_total: b.raw_total,
            word_count: b.word_count,
        }
    }
}

/// Score an input: run the three scorers and the aggregator.
/// Returns the breakdown and the display grade (1-9).
pub fn evaluate(input: &AnalysisInput) -> (ScoringBreakdown, u8) {
    let word_count = count_words(&input.transcript);

    let length = length::score(input.duration_seconds);
    let grammar = grammar::score(input.grammar_error_count, word_count);
    let complexity = complexity::score(input.reading_ease);

    let (raw_total, display_score) = aggregate::aggregate(&length, &grammar, &complexity);

    let breakdown = ScoringBreakdown {
        duration_seconds: round2(input.duration_seconds),
        length,
        grammar,
        complexity,
        grammar_errors: input.grammar_error_count,
        reading_ease: input.reading_ease,
        raw_total,
        word_count,
        error_density: grammar::error_density(input.grammar_error_count, word_count),
        scoring_version: SCORING_VERSION,
    };

    (breakdown, display_score)
}

/// Number of whitespace-delimited tokens
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Round to 2 decimal places by the exact binary value of `value`.
/// Only exact ties (24.625, 0.125) go to the even neighbour; 2.675 is
/// stored just below the tie and rounds down to 2.67.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let magnitude = value.abs();
    let scaled = magnitude * 100.0;
    if scaled >= 4_503_599_627_370_496.0 {
        // 2^52: no fractional hundredths left
        return value;
    }

    // magnitude * 100 == scaled + residual, exactly
    let residual = magnitude.mul_add(100.0, -scaled);

    let mut lower = scaled.floor();
    if scaled == lower && residual < 0.0 {
        lower -= 1.0;
    }

    // Sign of (exact - (lower + 0.5)); the subtraction is exact near the tie
    let above_half = (scaled - (lower + 0.5)) + residual;
    let hundredths = if above_half > 0.0 {
        lower + 1.0
    } else if above_half < 0.0 {
        lower
    } else if lower % 2.0 == 0.0 {
        lower
    } else {
        lower + 1.0
    };

    (hundredths / 100.0).copysign(value)
}
