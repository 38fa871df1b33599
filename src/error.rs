use crate::filter::NO_LOGS_IN_RANGE;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Please enter a log.")]
    EmptyInput,

    #[error("At least two logs are needed for comparison.")]
    InsufficientHistory,

    #[error("{}", NO_LOGS_IN_RANGE)]
    NoLogsInRange,

    #[error("Invalid frequency range: {0}")]
    InvalidRange(String),

    #[error("API call failed - {0}")]
    Http(#[from] reqwest::Error),

    #[error("API call failed - service returned {status}: {body}")]
    Service { status: u16, body: String },

    #[error("API call failed - malformed response: {0}")]
    MalformedResponse(String),

    #[error("API call failed - invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnalyzerError {
    /// Text shown on the display surface.
    pub fn display_message(&self) -> String {
        format!("Error: {}", self)
    }

    /// Input problems the user can fix, as opposed to service failures.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            AnalyzerError::EmptyInput
                | AnalyzerError::InsufficientHistory
                | AnalyzerError::NoLogsInRange
                | AnalyzerError::InvalidRange(_)
        )
    }
}
