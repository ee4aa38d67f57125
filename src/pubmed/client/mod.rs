mod abstracts;
mod similar;
mod summary;

use crate::config::ClientConfig;
use crate::error::{PubMedError, Result};
use crate::gateway::{Gateway, HttpMethod};
use crate::pubmed::models::{CountResult, SearchResult};
use crate::pubmed::query::SortOrder;
use crate::pubmed::responses::{ESearchData, ESearchResult};
use crate::rate_limit::RateLimiter;
use tracing::{debug, info, instrument};

/// Client for the PubMed E-utilities (ESearch, ESummary, EFetch)
#[derive(Clone, Debug)]
pub struct PubMedClient {
    gateway: Gateway,
    pub(crate) base_url: String,
}

impl PubMedClient {
    /// Create a new PubMed client with default configuration
    ///
    /// Uses default NCBI rate limiting (3 requests/second) and no API key.
    /// For production use, consider using `with_config()` to set an API key.
    ///
    /// # Example
    ///
    /// ```
    /// use pubmed_gateway::PubMedClient;
    ///
    /// let client = PubMedClient::new().unwrap();
    /// ```
    pub fn new() -> Result<Self> {
        Self::with_config(&ClientConfig::new())
    }

    /// Create a new PubMed client with custom configuration
    ///
    /// # Example
    ///
    /// ```
    /// use pubmed_gateway::{ClientConfig, PubMedClient};
    ///
    /// let config = ClientConfig::new()
    ///     .with_api_key("your_api_key_here")
    ///     .with_email("researcher@university.edu");
    ///
    /// let client = PubMedClient::with_config(&config).unwrap();
    /// ```
    pub fn with_config(config: &ClientConfig) -> Result<Self> {
        Ok(Self::with_gateway(Gateway::new(config)?, config))
    }

    /// Create a client that shares an existing gateway (and its rate limiter)
    pub fn with_gateway(gateway: Gateway, config: &ClientConfig) -> Self {
        Self {
            gateway,
            base_url: config.effective_base_url().to_string(),
        }
    }

    pub(crate) fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        self.gateway.rate_limiter()
    }

    /// Search PubMed and return one page of enriched article summaries
    ///
    /// Runs ESearch for the page of PMIDs, then a single ESummary call for their
    /// metadata. Summaries missing from the ESummary response are dropped.
    ///
    /// # Arguments
    ///
    /// * `query` - Search query string (PubMed syntax, MeSH tags allowed)
    /// * `limit` - Page size (`retmax`)
    /// * `offset` - Index of the first result (`retstart`)
    /// * `sort` - `"relevance"` or `"pub_date"`
    ///
    /// # Errors
    ///
    /// * `PubMedError::InvalidQuery` - unknown sort mode, raised before any request
    /// * `PubMedError::ApiError` - non-success status or an `ERROR` field from ESearch
    /// * `PubMedError::JsonError` - unexpected response shape
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pubmed_gateway::PubMedClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = PubMedClient::new()?;
    ///     let page = client.search_summaries("asthma[mh]", 20, 0, "pub_date").await?;
    ///     for item in &page.items {
    ///         println!("{}: {}", item.pmid, item.title);
    ///     }
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip(self), fields(query = %query, limit = limit))]
    pub async fn search_summaries(
        &self,
        query: &str,
        limit: usize,
        offset: usize,
        sort: &str,
    ) -> Result<SearchResult> {
        let sort: SortOrder = sort.parse()?;

        if query.trim().is_empty() {
            debug!("Empty query provided, returning empty results");
            return Ok(SearchResult {
                retmax: limit,
                retstart: offset,
                ..SearchResult::default()
            });
        }

        let page = self.search_page(query, limit, offset, sort).await?;
        info!(
            total = page.total_count,
            returned = page.items.len(),
            "Search completed"
        );
        Ok(page)
    }

    /// Count the matches of a query without retrieving any PMIDs
    ///
    /// Also reports how PubMed translated the query and any phrase warnings,
    /// which helps refine a query before running a full search.
    #[instrument(skip(self), fields(query = %query))]
    pub async fn count(&self, query: &str) -> Result<CountResult> {
        if query.trim().is_empty() {
            debug!("Empty query provided, returning zero count");
            return Ok(CountResult {
                query: query.to_string(),
                ..CountResult::default()
            });
        }

        let params = [
            ("db", "pubmed".to_string()),
            ("term", query.to_string()),
            ("retmode", "json".to_string()),
            ("retmax", "0".to_string()),
        ];
        let data = self.esearch(&params).await?;

        Ok(CountResult {
            query: query.to_string(),
            total_count: data.total_count(),
            query_translation: data.querytranslation.clone().unwrap_or_default(),
            warnings: data.warnings(),
        })
    }

    /// ESearch followed by ESummary for the returned id list
    pub(crate) async fn search_page(
        &self,
        term: &str,
        limit: usize,
        offset: usize,
        sort: SortOrder,
    ) -> Result<SearchResult> {
        let params = [
            ("db", "pubmed".to_string()),
            ("term", term.to_string()),
            ("retmode", "json".to_string()),
            ("retmax", limit.to_string()),
            ("retstart", offset.to_string()),
            ("usehistory", "y".to_string()),
            ("sort", sort.as_api_param().to_string()),
        ];

        debug!("Making ESearch API request");
        let data = self.esearch(&params).await?;
        let total_count = data.total_count();

        let items = if data.idlist.is_empty() {
            Vec::new()
        } else {
            self.fetch_summaries(&data.idlist).await?
        };

        Ok(SearchResult {
            total_count,
            items,
            retmax: limit,
            retstart: offset,
        })
    }

    async fn esearch(&self, params: &[(&str, String)]) -> Result<ESearchData> {
        let url = format!("{}/esearch.fcgi", self.base_url);
        let result: ESearchResult = self.gateway.call_json(&url, params, HttpMethod::Get).await?;

        // NCBI sometimes returns 200 OK with an ERROR field
        if let Some(error_msg) = &result.esearchresult.error {
            return Err(PubMedError::ApiError {
                status: 200,
                message: format!("NCBI ESearch API error: {}", error_msg),
            });
        }

        Ok(result.esearchresult)
    }
}
