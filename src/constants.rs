// VideoScout Constants
// Rubric values are fixed. Bump SCORING_VERSION whenever one of them changes.

pub const SCORING_VERSION: u32 = 1;

// ----- Length rubric -----

pub const LENGTH_MAX_SCORE: f64 = 40.0;
pub const LENGTH_MIN_DURATION_SECS: f64 = 90.0;   // 2 min - 30s
pub const LENGTH_MAX_DURATION_SECS: f64 = 150.0;  // 2 min + 30s
pub const LENGTH_PENALTY_PER_SECOND: f64 = 0.5;

// ----- Grammar rubric -----

pub const GRAMMAR_MAX_SCORE: f64 = 30.0;
pub const GRAMMAR_PENALTY_PER_DENSITY: f64 = 3.0;  // density 10 errors/100 words zeroes the score
pub const GRAMMAR_DENSITY_WORDS: f64 = 100.0;

// ----- Complexity rubric -----

pub const COMPLEXITY_MAX_SCORE: f64 = 30.0;
pub const COMPLEXITY_TARGET_EASE: f64 = 50.0;      // "standard difficulty"
pub const COMPLEXITY_MAX_DISTANCE: f64 = 50.0;

/// Substituted when the readability engine fails (easy conversational text)
pub const READING_EASE_FALLBACK: f64 = 80.0;

// ----- Aggregation -----

pub const RAW_TOTAL_MAX: f64 = 100.0;
pub const DISPLAY_SCORE_MIN: u8 = 1;
pub const DISPLAY_SCORE_MAX: u8 = 9;

// ----- Component names -----

pub const COMPONENT_LENGTH: &str = "length";
pub const COMPONENT_GRAMMAR: &str = "grammar";
pub const COMPONENT_COMPLEXITY: &str = "complexity";

// ----- Flesch reading ease -----

pub const FLESCH_BASE: f64 = 206.835;
pub const FLESCH_SENTENCE_WEIGHT: f64 = 1.015;
pub const FLESCH_SYLLABLE_WEIGHT: f64 = 84.6;

// ----- Concurrency defaults -----

pub const DEFAULT_WORKERS: usize = 2;  // more than two parallel transcriptions starves the host
pub const MAX_WORKERS: usize = 16;

// ----- Engines -----

pub const DEFAULT_LANGUAGETOOL_URL: &str = "http://localhost:8081";
pub const DEFAULT_GRAMMAR_LANGUAGE: &str = "en-GB";  // British spelling/grammar conventions
pub const DEFAULT_TRANSCRIPTION_LANGUAGE: &str = "en";
pub const DEFAULT_WHISPER_MODEL_FILE: &str = "ggml-base.bin";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 120;

// Audio handed to the transcriber
pub const AUDIO_SAMPLE_RATE: u32 = 16_000;
pub const AUDIO_CHANNELS: u32 = 1;

// ----- Paths -----

pub const VIDEOSCOUT_FOLDER: &str = ".videoscout";
pub const CONFIG_FILENAME: &str = "config.json";
pub const MODELS_FOLDER: &str = "models";

// Video extensions accepted by batch discovery
pub const VIDEO_EXTENSIONS: [&str; 12] = [
    "mp4", "mov", "avi", "mkv", "webm", "m4v", "wmv", "flv",
    "mpg", "mpeg", "3gp", "ts",
];
