use std::result;

use thiserror::Error;

/// Error types for gateway operations
#[derive(Error, Debug)]
pub enum PubMedError {
    /// HTTP request failed before a response arrived (connect, timeout, ...)
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    /// XML parsing failed
    #[error("XML parsing failed: {0}")]
    XmlError(String),

    /// Article not found
    #[error("Article not found: PMID {pmid}")]
    ArticleNotFound { pmid: String },

    /// Invalid PMID format
    #[error("Invalid PMID format: {pmid}")]
    InvalidPmid { pmid: String },

    /// Invalid PMC ID format
    #[error("Invalid PMC ID format: {pmcid}")]
    InvalidPmcid { pmcid: String },

    /// Invalid query structure or parameters
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Upstream answered with a non-success HTTP status (other than 429)
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },
}

pub type Result<T> = result::Result<T, PubMedError>;

impl PubMedError {
    /// Whether the error stems from caller input and was raised before any network call
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            PubMedError::InvalidPmid { .. }
                | PubMedError::InvalidPmcid { .. }
                | PubMedError::InvalidQuery(_)
        )
    }
}

impl From<quick_xml::Error> for PubMedError {
    fn from(err: quick_xml::Error) -> Self {
        PubMedError::XmlError(err.to_string())
    }
}

impl From<quick_xml::DeError> for PubMedError {
    fn from(err: quick_xml::DeError) -> Self {
        PubMedError::XmlError(err.to_string())
    }
}
