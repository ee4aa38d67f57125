//! Similarity search driven by one article's MeSH descriptors and title keywords

use crate::common::PubMedId;
use crate::pubmed::models::{ArticleSummary, SimilarArticles};
use crate::pubmed::parser::parse_similarity_seed;
use crate::pubmed::query::{SimilarityQuery, SortOrder};
use tracing::{info, instrument, warn};

use super::PubMedClient;

/// Bounds applied to the requested number of similar articles
const MIN_SIMILAR: usize = 1;
const MAX_SIMILAR: usize = 100;

impl PubMedClient {
    /// Find articles similar to `pmid`
    ///
    /// Fetches the seed article, builds a query from up to three MeSH
    /// descriptors and two title keywords (excluding the seed itself), and
    /// resolves it like a relevance-sorted search. `limit` is clamped to
    /// `1..=100`.
    ///
    /// Never fails: problems are reported through [`SimilarArticles::error`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pubmed_gateway::PubMedClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = PubMedClient::new()?;
    ///     let similar = client.find_similar("31978945", 10).await;
    ///     match similar.error {
    ///         Some(reason) => println!("nothing found: {reason}"),
    ///         None => println!("{} similar articles", similar.count),
    ///     }
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip(self), fields(pmid = %pmid))]
    pub async fn find_similar(&self, pmid: &str, limit: usize) -> SimilarArticles {
        let reference = pmid.trim();

        match self.similar_items(reference, limit).await {
            Ok(items) => {
                info!(found = items.len(), "Similarity search completed");
                SimilarArticles::found(reference, items)
            }
            Err(reason) => {
                warn!(reason = %reason, "Similarity search produced no results");
                SimilarArticles::failed(reference, reason)
            }
        }
    }

    async fn similar_items(
        &self,
        pmid: &str,
        limit: usize,
    ) -> std::result::Result<Vec<ArticleSummary>, String> {
        if pmid.is_empty() {
            return Err("No PMID provided".to_string());
        }
        let seed = PubMedId::parse(pmid)
            .map_err(|_| "Invalid PMID format. PMID should be a numeric string.".to_string())?;
        let limit = limit.clamp(MIN_SIMILAR, MAX_SIMILAR);

        let document = self
            .efetch_pubmed(&[seed.to_string()])
            .await
            .map_err(|e| e.to_string())?;
        let metadata = parse_similarity_seed(&document).map_err(|e| e.to_string())?;

        let query = SimilarityQuery::new(seed, metadata.mesh_terms, &metadata.title)
            .ok_or_else(|| "Could not extract metadata for similarity search".to_string())?;
        info!(query = %query, "Built similarity query");

        let page = self
            .search_page(&query.build(), limit, 0, SortOrder::Relevance)
            .await
            .map_err(|e| e.to_string())?;

        if page.items.is_empty() {
            return Err("No similar articles found".to_string());
        }

        Ok(page.items)
    }
}
