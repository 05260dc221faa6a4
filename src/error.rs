// VideoScout Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Media error: {0}")]
    Media(String),

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Grammar engine error: {0}")]
    GrammarEngine(String),

    /// Never surfaces from the pipeline; recovered with the fallback ease.
    #[error("Readability error: {0}")]
    Readability(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ScoutError {
    /// Stable machine-readable token for this error's kind
    pub fn kind(&self) -> &'static str {
        match self {
            ScoutError::NotFound(_) => "not_found",
            ScoutError::Media(_) => "media_error",
            ScoutError::Transcription(_) => "transcription_error",
            ScoutError::GrammarEngine(_) => "grammar_engine_error",
            ScoutError::Readability(_) => "readability_error",
            ScoutError::Config(_) => "config_error",
            ScoutError::Io(_) | ScoutError::Json(_) | ScoutError::Internal(_) => "internal_error",
        }
    }
}

impl From<anyhow::Error> for ScoutError {
    fn from(err: anyhow::Error) -> Self {
        ScoutError::Internal(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ScoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tokens() {
        assert_eq!(ScoutError::NotFound("x".into()).kind(), "not_found");
        assert_eq!(ScoutError::Media("x".into()).kind(), "media_error");
        assert_eq!(ScoutError::GrammarEngine("x".into()).kind(), "grammar_engine_error");
        assert_eq!(ScoutError::Internal("x".into()).kind(), "internal_error");

        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        assert_eq!(ScoutError::from(io).kind(), "internal_error");
    }

    #[test]
    fn test_display_includes_message() {
        let err = ScoutError::Transcription("model missing".to_string());
        assert_eq!(err.to_string(), "Transcription error: model missing");
    }
}
