//! # PubMed Gateway
//!
//! Rate-governed access to NCBI E-utilities, PubMed Central and NIH iCite,
//! with responses normalized into plain records.
//!
//! ## Features
//!
//! - **Shared rate limiting**: one sliding-window budget (3 req/s, 10 with an
//!   API key) for every NCBI call; HTTP 429 is absorbed by backing off
//! - **Search**: ESearch + ESummary joined into article summaries with PMC detection
//! - **Abstracts**: batch EFetch parsed into abstract records
//! - **Similar articles**: queries synthesized from MeSH terms and title keywords
//! - **PMC Full Text**: JATS body sections plus the OA PDF link
//! - **Citation counts**: iCite lookups for up to 1000 PMIDs
//! - **RIS export**: compact records for citation managers
//!
//! ## Quick Start
//!
//! ### Searching for Articles
//!
//! ```no_run
//! use pubmed_gateway::{Client, ClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::with_config(&ClientConfig::new().with_email("me@example.org"))?;
//!
//!     let page = client.pubmed.search_summaries("covid-19 treatment", 10, 0, "relevance").await?;
//!     for article in &page.items {
//!         println!("Title: {}", article.title);
//!         println!("Authors: {}", article.authors.join(", "));
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Fetching Full Text from PMC
//!
//! ```no_run
//! use pubmed_gateway::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new()?;
//!
//!     let full_text = client.pmc.get_full_text("PMC7906746").await;
//!     println!("Sections: {}", full_text.sections.len());
//!     if let Some(pdf) = &full_text.pdf_url {
//!         println!("PDF: {pdf}");
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod citations;
pub mod common;
pub mod config;
pub mod error;
pub mod export;
pub mod gateway;
pub mod pmc;
pub mod pubmed;
pub mod rate_limit;

// Re-export main types for convenience
pub use citations::{CitationClient, CitationRecord};
pub use common::{PmcId, PubMedId};
pub use config::ClientConfig;
pub use error::{PubMedError, Result};
pub use export::{ExportFormat, articles_to_ris};
pub use gateway::{Gateway, HttpMethod};
pub use pmc::{ArticleSection, FullTextResult, FullTextStatus, PmcClient};
pub use pubmed::{
    ArticleAbstract, ArticleSummary, CountResult, PubMedClient, SearchResult, SimilarArticles,
    SortOrder,
};
pub use rate_limit::RateLimiter;

/// Convenience client bundling PubMed, PMC and iCite access
///
/// The PubMed and PMC clients share one [`Gateway`], and therefore one rate
/// limit budget. The citation client is independent of it.
#[derive(Clone, Debug)]
pub struct Client {
    /// PubMed client for search, abstracts and similar articles
    pub pubmed: PubMedClient,
    /// PMC client for full text
    pub pmc: PmcClient,
    /// iCite client for citation counts
    pub citations: CitationClient,
}

impl Client {
    /// Create a new combined client
    ///
    /// # Example
    ///
    /// ```
    /// use pubmed_gateway::Client;
    ///
    /// let client = Client::new().unwrap();
    /// ```
    pub fn new() -> Result<Self> {
        Self::with_config(&ClientConfig::new())
    }

    /// Create a new combined client with custom configuration
    pub fn with_config(config: &ClientConfig) -> Result<Self> {
        let gateway = Gateway::new(config)?;

        Ok(Self {
            pubmed: PubMedClient::with_gateway(gateway.clone(), config),
            pmc: PmcClient::with_gateway(gateway, config),
            citations: CitationClient::with_config(config)?,
        })
    }

    /// The rate limiter shared by every NCBI call of this client
    pub fn rate_limiter(&self) -> &RateLimiter {
        self.pubmed.rate_limiter()
    }
}
