use serde::{Deserialize, Serialize};

/// Placeholder used when an upstream record has no title
pub const NO_TITLE: &str = "No title available";
/// Placeholder used when an upstream record has no abstract
pub const NO_ABSTRACT: &str = "No abstract available";
/// Placeholder used when an upstream record names no journal
pub const UNKNOWN_JOURNAL: &str = "Unknown journal";
/// Placeholder used for missing dates and years
pub const UNKNOWN: &str = "Unknown";

/// Lightweight article metadata joined from ESearch and ESummary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSummary {
    /// PubMed ID
    pub pmid: String,
    /// PMC ID, present when a full-text copy exists in PubMed Central
    pub pmcid: Option<String>,
    /// Article title
    pub title: String,
    /// Publication date as reported by ESummary (e.g. "2020 Feb 15")
    pub pub_date: String,
    /// Full journal name, falling back to the source abbreviation
    pub journal: String,
    /// Author display names in order
    pub authors: Vec<String>,
    /// True iff `pmcid` is present
    pub full_text_available: bool,
}

impl ArticleSummary {
    pub fn pubmed_url(&self) -> String {
        format!("https://pubmed.ncbi.nlm.nih.gov/{}/", self.pmid)
    }
}

/// One page of search results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Total number of matches reported by ESearch
    pub total_count: u64,
    /// Summaries for the returned page, in ESearch order
    pub items: Vec<ArticleSummary>,
    /// Page size that was requested
    pub retmax: usize,
    /// Offset that was requested
    pub retstart: usize,
}

/// Count-only search outcome, used to refine a query before fetching results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResult {
    pub query: String,
    pub total_count: u64,
    /// How PubMed interpreted the query (MeSH expansion, field tags)
    pub query_translation: String,
    /// Ignored phrases and quoted phrases that were not found
    pub warnings: Vec<String>,
}

/// Abstract-level article record parsed from EFetch XML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleAbstract {
    pub pmid: String,
    pub title: String,
    /// Abstract segments joined by newlines, each prefixed by its label when labeled
    pub abstract_text: String,
    pub journal: String,
    pub year: String,
    /// "ForeName LastName" for every author carrying both parts
    pub authors: Vec<String>,
    pub doi: Option<String>,
}

/// Outcome of a similarity search
///
/// Failures are reported through `error` rather than as an `Err`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarArticles {
    pub reference_pmid: String,
    pub items: Vec<ArticleSummary>,
    pub count: usize,
    /// Explanation when no similar articles could be produced
    pub error: Option<String>,
}

impl SimilarArticles {
    pub(crate) fn found(reference_pmid: &str, items: Vec<ArticleSummary>) -> Self {
        Self {
            reference_pmid: reference_pmid.to_string(),
            count: items.len(),
            items,
            error: None,
        }
    }

    pub(crate) fn failed<S: Into<String>>(reference_pmid: &str, error: S) -> Self {
        Self {
            reference_pmid: reference_pmid.to_string(),
            items: Vec::new(),
            count: 0,
            error: Some(error.into()),
        }
    }
}
