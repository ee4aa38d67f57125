//! Client configuration for NCBI, PMC OA and iCite endpoints

use std::time::Duration;

use crate::rate_limit::RateLimiter;

/// Default NCBI E-utilities base URL
pub const DEFAULT_EUTILS_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// Default PMC Open Access web service URL
pub const DEFAULT_OA_URL: &str = "https://www.ncbi.nlm.nih.gov/pmc/utils/oa/oa.fcgi";

/// Default NIH iCite publications endpoint
pub const DEFAULT_ICITE_URL: &str = "https://icite.od.nih.gov/api/pubs";

/// Tool name reported to NCBI when none is configured
pub const DEFAULT_TOOL: &str = "pubmed-gateway";

/// Contact address reported to NCBI when none is configured
pub const DEFAULT_EMAIL: &str = "pubmed.gateway@example.com";

/// Configuration shared by every client in the crate
///
/// # Example
///
/// ```
/// use pubmed_gateway::ClientConfig;
///
/// let config = ClientConfig::new()
///     .with_api_key("your_api_key_here")
///     .with_email("researcher@university.edu");
///
/// assert_eq!(config.effective_rate_limit(), 10);
/// ```
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// NCBI API key; raises the rate limit from 3 to 10 requests per second
    pub api_key: Option<String>,
    /// Contact address sent as the `email` parameter
    pub email: Option<String>,
    /// Tool name sent as the `tool` parameter
    pub tool: Option<String>,
    /// Explicit requests-per-second override
    pub rate_limit: Option<usize>,
    /// HTTP timeout for every request
    pub timeout: Duration,
    /// Wait applied on HTTP 429 when the response carries no `Retry-After`
    pub default_retry_after: Duration,
    /// E-utilities base URL (overridable for testing)
    pub base_url: Option<String>,
    /// PMC OA web service URL (overridable for testing)
    pub oa_url: Option<String>,
    /// iCite endpoint (overridable for testing)
    pub icite_url: Option<String>,
    /// User agent for outgoing requests
    pub user_agent: Option<String>,
}

impl ClientConfig {
    /// Create a configuration with NCBI defaults and no API key
    pub fn new() -> Self {
        Self {
            api_key: None,
            email: None,
            tool: None,
            rate_limit: None,
            timeout: Duration::from_secs(30),
            default_retry_after: Duration::from_secs(60),
            base_url: None,
            oa_url: None,
            icite_url: None,
            user_agent: None,
        }
    }

    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_email<S: Into<String>>(mut self, email: S) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_tool<S: Into<String>>(mut self, tool: S) -> Self {
        self.tool = Some(tool.into());
        self
    }

    /// Override the number of requests allowed per second
    pub fn with_rate_limit(mut self, requests_per_second: usize) -> Self {
        self.rate_limit = Some(requests_per_second);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the backoff used when a 429 response carries no `Retry-After` header
    pub fn with_default_retry_after(mut self, wait: Duration) -> Self {
        self.default_retry_after = wait;
        self
    }

    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_oa_url<S: Into<String>>(mut self, oa_url: S) -> Self {
        self.oa_url = Some(oa_url.into());
        self
    }

    pub fn with_icite_url<S: Into<String>>(mut self, icite_url: S) -> Self {
        self.icite_url = Some(icite_url.into());
        self
    }

    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Requests per second: the explicit override, else 10 with an API key, else 3
    pub fn effective_rate_limit(&self) -> usize {
        self.rate_limit
            .unwrap_or(if self.api_key.is_some() { 10 } else { 3 })
    }

    pub fn effective_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_EUTILS_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn effective_oa_url(&self) -> &str {
        self.oa_url.as_deref().unwrap_or(DEFAULT_OA_URL)
    }

    pub fn effective_icite_url(&self) -> &str {
        self.icite_url.as_deref().unwrap_or(DEFAULT_ICITE_URL)
    }

    pub fn effective_tool(&self) -> &str {
        self.tool.as_deref().unwrap_or(DEFAULT_TOOL)
    }

    pub fn effective_email(&self) -> &str {
        self.email.as_deref().unwrap_or(DEFAULT_EMAIL)
    }

    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("pubmed-gateway/{}", env!("CARGO_PKG_VERSION")))
    }

    /// Identification parameters appended to every E-utilities call
    pub fn build_api_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("tool".to_string(), self.effective_tool().to_string()),
            ("email".to_string(), self.effective_email().to_string()),
        ];

        if let Some(api_key) = &self.api_key {
            params.push(("api_key".to_string(), api_key.clone()));
        }

        params
    }

    pub fn create_rate_limiter(&self) -> RateLimiter {
        RateLimiter::new(self.effective_rate_limit())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}
