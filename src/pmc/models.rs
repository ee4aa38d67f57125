use serde::{Deserialize, Serialize};

/// A top-level body section of a full-text article
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ArticleSection {
    /// Section title, "Untitled Section" when the JATS `sec` has none
    pub title: String,
    /// Paragraph text with nested sub-sections inlined as `"Title:\n..."` blocks
    pub text: String,
}

impl ArticleSection {
    pub fn new<T: Into<String>, S: Into<String>>(title: T, text: S) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }
}

/// Transport-level outcome of a full-text request
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FullTextStatus {
    /// The JATS document was retrieved; content problems go to `parsing_error`
    Success,
    /// The request itself failed; see `error`
    Error,
}

/// Full-text extraction result for one PMC article
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FullTextResult {
    /// Canonical PMC ID (e.g., "PMC7906746"), absent when the input was unusable
    pub pmcid: Option<String>,
    pub sections: Vec<ArticleSection>,
    /// Why no sections could be extracted from a retrieved document
    pub parsing_error: Option<String>,
    /// PDF download link from the PMC OA service
    pub pdf_url: Option<String>,
    pub status: FullTextStatus,
    /// Request failure message, set only with `FullTextStatus::Error`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FullTextResult {
    /// Failed request for `pmcid`
    pub fn failed<S: Into<String>>(pmcid: Option<String>, error: S) -> Self {
        Self {
            pmcid,
            sections: Vec::new(),
            parsing_error: None,
            pdf_url: None,
            status: FullTextStatus::Error,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == FullTextStatus::Success
    }

    /// Check if any body text was extracted
    pub fn has_content(&self) -> bool {
        !self.sections.is_empty()
    }
}
