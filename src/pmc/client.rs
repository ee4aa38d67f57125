use crate::common::PmcId;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::gateway::{Gateway, HttpMethod};
use crate::pmc::models::{FullTextResult, FullTextStatus};
use crate::pmc::oa_api::parse_pdf_link;
use crate::pmc::parser::parse_jats_body;
use crate::rate_limit::RateLimiter;
use tracing::{debug, error, info, instrument, warn};

/// Client for PMC full text (EFetch `db=pmc`) and the PMC OA web service
#[derive(Clone, Debug)]
pub struct PmcClient {
    gateway: Gateway,
    base_url: String,
    oa_url: String,
}

impl PmcClient {
    /// Create a new PMC client with default configuration
    ///
    /// # Example
    ///
    /// ```
    /// use pubmed_gateway::PmcClient;
    ///
    /// let client = PmcClient::new().unwrap();
    /// ```
    pub fn new() -> Result<Self> {
        Self::with_config(&ClientConfig::new())
    }

    /// Create a new PMC client with custom configuration
    pub fn with_config(config: &ClientConfig) -> Result<Self> {
        Ok(Self::with_gateway(Gateway::new(config)?, config))
    }

    /// Create a client that shares an existing gateway (and its rate limiter)
    pub fn with_gateway(gateway: Gateway, config: &ClientConfig) -> Self {
        Self {
            gateway,
            base_url: config.effective_base_url().to_string(),
            oa_url: config.effective_oa_url().to_string(),
        }
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        self.gateway.rate_limiter()
    }

    /// Fetch and extract the body sections of a PMC article
    ///
    /// Content problems (publisher restrictions, malformed JATS, no `body`) are
    /// reported in `parsing_error` with `status: success`. The PDF link lookup
    /// never affects the outcome.
    ///
    /// # Arguments
    ///
    /// * `pmcid` - PMC ID with or without the `PMC` prefix
    ///
    /// # Errors
    ///
    /// * `PubMedError::InvalidPmcid` - the id is malformed, raised before any request
    /// * `PubMedError::RequestError` / `PubMedError::ApiError` - EFetch failed
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pubmed_gateway::PmcClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = PmcClient::new()?;
    ///     let full_text = client.fetch_full_text("PMC7906746").await?;
    ///     for section in &full_text.sections {
    ///         println!("## {}\n{}", section.title, section.text);
    ///     }
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip(self), fields(pmcid = %pmcid))]
    pub async fn fetch_full_text(&self, pmcid: &str) -> Result<FullTextResult> {
        let pmc_id = PmcId::parse(pmcid)?;
        let normalized = pmc_id.to_string();

        info!(pmcid = %normalized, "Fetching full text");
        let jats_xml = self.fetch_jats_xml(&normalized).await?;
        let parsed = parse_jats_body(&jats_xml);
        if let Some(reason) = &parsed.error {
            warn!(pmcid = %normalized, reason = %reason, "No body sections extracted");
        }

        let pdf_url = self.fetch_pdf_link(&normalized).await;

        Ok(FullTextResult {
            pmcid: Some(normalized),
            sections: parsed.sections,
            parsing_error: parsed.error,
            pdf_url,
            status: FullTextStatus::Success,
            error: None,
        })
    }

    /// Like [`fetch_full_text`](Self::fetch_full_text), but failures become
    /// a result with `status: error`
    pub async fn get_full_text(&self, pmcid: &str) -> FullTextResult {
        if pmcid.trim().is_empty() {
            return FullTextResult::failed(None, "No PMCID provided");
        }

        match self.fetch_full_text(pmcid).await {
            Ok(result) => result,
            Err(e) => {
                error!(pmcid = %pmcid, error = %e, "Failed to fetch full text");
                let normalized = PmcId::parse(pmcid).ok().map(|id| id.to_string());
                FullTextResult::failed(normalized, e.to_string())
            }
        }
    }

    /// Raw JATS document from EFetch
    pub async fn fetch_jats_xml(&self, pmcid: &str) -> Result<String> {
        let params = [
            ("db", "pmc".to_string()),
            ("id", pmcid.to_string()),
            ("retmode", "xml".to_string()),
        ];
        let url = format!("{}/efetch.fcgi", self.base_url);

        debug!("Making PMC EFetch API request");
        self.gateway.call_text(&url, &params, HttpMethod::Post).await
    }

    /// First PDF link from the OA service; every failure is logged and swallowed
    async fn fetch_pdf_link(&self, pmcid: &str) -> Option<String> {
        let params = [("id", pmcid.to_string())];

        let xml = match self
            .gateway
            .call_text(&self.oa_url, &params, HttpMethod::Get)
            .await
        {
            Ok(xml) => xml,
            Err(e) => {
                warn!(pmcid = %pmcid, error = %e, "Could not fetch OA info");
                return None;
            }
        };

        match parse_pdf_link(&xml) {
            Ok(link) => link,
            Err(e) => {
                warn!(pmcid = %pmcid, error = %e, "Could not parse OA info");
                None
            }
        }
    }
}
