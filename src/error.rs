//! Error handling for resume-ats

use thiserror::Error;

/// Shown for every analysis failure that is not a configuration problem.
pub const GENERIC_ANALYSIS_FAILURE: &str =
    "The analysis could not be completed. Please try again in a moment.";

/// Shown when the provider answered but the answer was unusable.
pub const GENERIC_FORMAT_FAILURE: &str =
    "The analysis service returned an unexpected answer. Please try again.";

#[derive(Error, Debug)]
pub enum ResumeAtsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Text extraction error: {0}")]
    Extraction(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("The model returned an empty response")]
    EmptyResponse,

    #[error("Response format error: {0}")]
    Format(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Provider error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("An analysis is already in progress")]
    AnalysisInProgress,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, ResumeAtsError>;

impl ResumeAtsError {
    /// Message safe to show to an end user.
    ///
    /// Configuration problems are shown verbatim since they carry the
    /// remediation. Everything on the provider path collapses to a generic
    /// message; the detailed error only goes to the log.
    pub fn user_message(&self) -> String {
        match self {
            ResumeAtsError::Configuration(_)
            | ResumeAtsError::Extraction(_)
            | ResumeAtsError::UnsupportedFormat(_)
            | ResumeAtsError::InvalidInput(_)
            | ResumeAtsError::AnalysisInProgress => self.to_string(),
            ResumeAtsError::EmptyResponse | ResumeAtsError::Format(_) => {
                GENERIC_FORMAT_FAILURE.to_string()
            }
            _ => GENERIC_ANALYSIS_FAILURE.to_string(),
        }
    }

    /// True for errors raised while turning a document into text.
    pub fn is_extraction(&self) -> bool {
        matches!(
            self,
            ResumeAtsError::Extraction(_) | ResumeAtsError::UnsupportedFormat(_)
        )
    }
}

impl From<reqwest::Error> for ResumeAtsError {
    fn from(err: reqwest::Error) -> Self {
        ResumeAtsError::Network(err.to_string())
    }
}
