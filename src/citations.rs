//! Citation counts from the NIH iCite service
//!
//! iCite is operated separately from NCBI, so these calls use their own HTTP
//! client and do not draw from the E-utilities rate limit.

use std::collections::HashSet;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, instrument};

use crate::config::ClientConfig;
use crate::error::Result;

/// Maximum number of PMIDs iCite accepts per request
pub const ICITE_BATCH_LIMIT: usize = 1000;

pub const CITATION_UNAVAILABLE: &str = "Citation data not available";

/// Citation count for one PMID
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationRecord {
    pub pmid: String,
    pub citation_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CitationRecord {
    fn counted(pmid: String, count: u64) -> Self {
        Self {
            pmid,
            citation_count: Some(count),
            note: None,
            error: None,
        }
    }

    fn unavailable(pmid: String) -> Self {
        Self {
            pmid,
            citation_count: None,
            note: Some(CITATION_UNAVAILABLE.to_string()),
            error: None,
        }
    }

    fn failed(pmid: String, error: &str) -> Self {
        Self {
            pmid,
            citation_count: None,
            note: None,
            error: Some(error.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ICiteResponse {
    #[serde(default)]
    data: Vec<ICiteItem>,
}

#[derive(Debug, Deserialize)]
struct ICiteItem {
    /// iCite returns PMIDs as numbers; strings are accepted too
    #[serde(default)]
    pmid: Value,
    #[serde(default)]
    citation_count: Option<u64>,
}

impl ICiteItem {
    fn pmid_string(&self) -> String {
        match &self.pmid {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

/// Client for the iCite `/api/pubs` endpoint
#[derive(Clone, Debug)]
pub struct CitationClient {
    client: Client,
    url: String,
}

impl CitationClient {
    pub fn new() -> Result<Self> {
        Self::with_config(&ClientConfig::new())
    }

    pub fn with_config(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.effective_user_agent())
            .timeout(config.timeout)
            .build()?;

        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &ClientConfig) -> Self {
        Self {
            client,
            url: config.effective_icite_url().to_string(),
        }
    }

    /// Citation counts for up to 1000 PMIDs
    ///
    /// Only the first 1000 ids are sent. Records follow the order of the iCite
    /// response, so correlate them by `pmid`; sent ids missing from the response
    /// are appended with a `note`. When the request fails, every input id (not
    /// only the ones sent) comes back with an `error`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pubmed_gateway::CitationClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = CitationClient::new()?;
    ///     for record in client.get_citation_counts(&["31978945"]).await {
    ///         println!("{}: {:?}", record.pmid, record.citation_count);
    ///     }
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip(self, pmids), fields(pmids_count = pmids.len()))]
    pub async fn get_citation_counts<S: AsRef<str>>(&self, pmids: &[S]) -> Vec<CitationRecord> {
        if pmids.is_empty() {
            return Vec::new();
        }

        let batch: Vec<&str> = pmids
            .iter()
            .take(ICITE_BATCH_LIMIT)
            .map(|p| p.as_ref())
            .collect();
        info!(sent = batch.len(), "Fetching citation counts from iCite");

        match self.request(&batch.join(",")).await {
            Ok(response) => {
                let mut records: Vec<CitationRecord> = response
                    .data
                    .into_iter()
                    .map(|item| {
                        let pmid = item.pmid_string();
                        match item.citation_count {
                            Some(count) => CitationRecord::counted(pmid, count),
                            None => CitationRecord::unavailable(pmid),
                        }
                    })
                    .collect();

                // Ids iCite left out of its answer still get a record
                let returned: HashSet<String> = records.iter().map(|r| r.pmid.clone()).collect();
                let mut backfilled = HashSet::new();
                for pmid in batch {
                    let pmid = pmid.trim();
                    if !returned.contains(pmid) && backfilled.insert(pmid) {
                        records.push(CitationRecord::unavailable(pmid.to_string()));
                    }
                }
                records
            }
            Err(message) => {
                error!(error = %message, "Failed to fetch citation counts");
                pmids
                    .iter()
                    .map(|p| CitationRecord::failed(p.as_ref().to_string(), &message))
                    .collect()
            }
        }
    }

    async fn request(&self, pmids: &str) -> std::result::Result<ICiteResponse, String> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("pmids", pmids), ("format", "json")])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP error: {}", status.as_u16()));
        }

        let body = response.text().await.map_err(|e| e.to_string())?;
        serde_json::from_str(&body).map_err(|e| e.to_string())
    }
}
