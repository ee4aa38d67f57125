//! Search ordering and similarity-query synthesis

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::PubMedId;
use crate::error::PubMedError;

/// Sort order for ESearch results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    /// Best Match ranking
    #[default]
    Relevance,
    /// Most recent first
    PublicationDate,
}

impl SortOrder {
    /// Value of the ESearch `sort` parameter
    pub fn as_api_param(&self) -> &'static str {
        match self {
            SortOrder::Relevance => "relevance",
            SortOrder::PublicationDate => "pub_date",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_api_param())
    }
}

impl FromStr for SortOrder {
    type Err = PubMedError;

    /// Accepts `relevance` and `pub_date`; `recency` is taken as `pub_date`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "relevance" => Ok(SortOrder::Relevance),
            "pub_date" | "recency" => Ok(SortOrder::PublicationDate),
            other => Err(PubMedError::InvalidQuery(format!(
                "Invalid sort parameter: {other}. Use 'relevance' for Best Match or 'pub_date' for Most Recent."
            ))),
        }
    }
}

/// Title words that never become similarity keywords
pub const STOP_WORDS: [&str; 9] = [
    "the", "and", "for", "with", "from", "that", "this", "study", "analysis",
];

const KEYWORD_TRIM: &[char] = &[
    '.', ',', ';', ':', '(', ')', '[', ']', '{', '}', '"', '\'',
];

/// Candidate keywords from an article title, in title order
///
/// Tokens are split on whitespace, stripped of surrounding punctuation and
/// quotes, lowercased, and kept when longer than three characters and not a
/// stop word.
///
/// ```
/// use pubmed_gateway::pubmed::query::title_keywords;
///
/// assert_eq!(
///     title_keywords("The (Neural) basis of Memory: a study"),
///     vec!["neural", "basis", "memory"]
/// );
/// ```
pub fn title_keywords(title: &str) -> Vec<String> {
    title
        .split_whitespace()
        .map(|word| word.trim_matches(KEYWORD_TRIM).to_lowercase())
        .filter(|word| word.chars().count() > 3 && !STOP_WORDS.contains(&word.as_str()))
        .collect()
}

/// Boolean query derived from one article's MeSH descriptors and title keywords
///
/// Rendered as `("T1"[MeSH Terms] OR "k1"[Title/Abstract]) NOT <pmid>[PMID]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimilarityQuery {
    seed: PubMedId,
    mesh_terms: Vec<String>,
    keywords: Vec<String>,
}

impl SimilarityQuery {
    pub const MAX_MESH_TERMS: usize = 3;
    pub const MAX_KEYWORDS: usize = 2;

    /// Build the query for `seed`, or `None` when neither MeSH terms nor usable
    /// title keywords exist
    ///
    /// ```
    /// use pubmed_gateway::common::PubMedId;
    /// use pubmed_gateway::pubmed::SimilarityQuery;
    ///
    /// let seed = PubMedId::parse("12345").unwrap();
    /// let query = SimilarityQuery::new(seed, vec!["Asthma".to_string()], "Airway remodeling").unwrap();
    /// assert_eq!(
    ///     query.build(),
    ///     r#"("Asthma"[MeSH Terms] OR "airway"[Title/Abstract] OR "remodeling"[Title/Abstract]) NOT 12345[PMID]"#
    /// );
    ///
    /// assert!(SimilarityQuery::new(seed, vec![], "The study of this").is_none());
    /// ```
    pub fn new<I>(seed: PubMedId, mesh_terms: I, title: &str) -> Option<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mesh_terms: Vec<String> = mesh_terms
            .into_iter()
            .map(|term| term.replace('"', "").trim().to_string())
            .filter(|term| !term.is_empty())
            .take(Self::MAX_MESH_TERMS)
            .collect();

        let keywords: Vec<String> = title_keywords(title)
            .into_iter()
            .take(Self::MAX_KEYWORDS)
            .collect();

        if mesh_terms.is_empty() && keywords.is_empty() {
            return None;
        }

        Some(Self {
            seed,
            mesh_terms,
            keywords,
        })
    }

    pub fn seed(&self) -> PubMedId {
        self.seed
    }

    pub fn mesh_terms(&self) -> &[String] {
        &self.mesh_terms
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Render the ESearch term
    pub fn build(&self) -> String {
        let clauses: Vec<String> = self
            .mesh_terms
            .iter()
            .map(|term| format!("\"{term}\"[MeSH Terms]"))
            .chain(
                self.keywords
                    .iter()
                    .map(|word| format!("\"{word}\"[Title/Abstract]")),
            )
            .collect();

        format!("({}) NOT {}[PMID]", clauses.join(" OR "), self.seed)
    }
}

impl fmt::Display for SimilarityQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build())
    }
}
