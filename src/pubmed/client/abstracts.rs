//! EFetch operations returning abstract-level records

use std::collections::HashSet;

use crate::common::PubMedId;
use crate::error::{PubMedError, Result};
use crate::gateway::HttpMethod;
use crate::pubmed::models::ArticleAbstract;
use crate::pubmed::parser::parse_abstracts;
use tracing::{debug, info, instrument};

use super::PubMedClient;

impl PubMedClient {
    /// Fetch abstracts for several PMIDs with a single EFetch request
    ///
    /// The request is sent as a POST form so long id lists are not limited by
    /// URL length. Duplicate ids are sent once.
    ///
    /// # Errors
    ///
    /// * `PubMedError::InvalidPmid` - an id is not numeric, raised before any request
    /// * `PubMedError::XmlError` - the EFetch document is malformed
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pubmed_gateway::PubMedClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = PubMedClient::new()?;
    ///     let abstracts = client.fetch_abstracts(&["31978945", "33515491"]).await?;
    ///     for record in &abstracts {
    ///         println!("{} ({}): {}", record.title, record.year, record.abstract_text);
    ///     }
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip(self, pmids), fields(pmids_count = pmids.len()))]
    pub async fn fetch_abstracts<S: AsRef<str>>(&self, pmids: &[S]) -> Result<Vec<ArticleAbstract>> {
        if pmids.is_empty() {
            return Ok(Vec::new());
        }

        // Validate all PMIDs upfront
        let validated = pmids
            .iter()
            .map(|pmid| PubMedId::parse(pmid.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let mut seen = HashSet::new();
        let unique: Vec<String> = validated
            .into_iter()
            .filter(|id| seen.insert(*id))
            .map(|id| id.to_string())
            .collect();

        let xml = self.efetch_pubmed(&unique).await?;
        let records = parse_abstracts(&xml)?;

        info!(
            requested = unique.len(),
            parsed = records.len(),
            "Fetched abstracts"
        );
        Ok(records)
    }

    /// Fetch the abstract record of one article
    ///
    /// # Errors
    ///
    /// * `PubMedError::ArticleNotFound` - EFetch returned no record for `pmid`
    #[instrument(skip(self), fields(pmid = %pmid))]
    pub async fn fetch_abstract(&self, pmid: &str) -> Result<ArticleAbstract> {
        let wanted = PubMedId::parse(pmid)?.to_string();
        let records = self.fetch_abstracts(&[wanted.as_str()]).await?;

        records
            .into_iter()
            .find(|record| record.pmid == wanted)
            .ok_or(PubMedError::ArticleNotFound { pmid: wanted })
    }

    /// Raw EFetch (`rettype=abstract`) document for validated PMIDs
    pub(crate) async fn efetch_pubmed(&self, pmids: &[String]) -> Result<String> {
        let params = [
            ("db", "pubmed".to_string()),
            ("id", pmids.join(",")),
            ("retmode", "xml".to_string()),
            ("rettype", "abstract".to_string()),
        ];
        let url = format!("{}/efetch.fcgi", self.base_url);

        debug!(batch_size = pmids.len(), "Making EFetch API request");
        self.gateway()
            .call_text(&url, &params, HttpMethod::Post)
            .await
    }
}
