//! PubMed client for searching and fetching article metadata
//!
//! This module talks to the NCBI E-utilities (ESearch, ESummary, EFetch) and
//! normalizes their responses into the records defined in [`models`].

pub mod client;
pub mod models;
pub mod parser;
pub mod query;
pub(crate) mod responses;

// Re-export public types
pub use client::PubMedClient;
pub use models::{ArticleAbstract, ArticleSummary, CountResult, SearchResult, SimilarArticles};
pub use query::{SimilarityQuery, SortOrder};
