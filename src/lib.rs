// VideoScout - Library Entry Point
//
// Rubric scoring for short spoken-video submissions: length, grammar and
// language complexity folded into a 1-9 grade.

pub mod constants;
pub mod error;
pub mod tools;
pub mod config;
pub mod scoring;
pub mod engines;
pub mod media;
pub mod pipeline;
pub mod discover;
pub mod jobs;

pub use config::ScoutConfig;
pub use engines::Engines;
pub use error::{Result, ScoutError};
pub use pipeline::{AnalysisPipeline, AnalysisResult, Phase, PipelineFailure, VideoRequest};
pub use scoring::{AnalysisInput, ScoringBreakdown};
