//! ESummary operations: lightweight metadata joined onto an ESearch id list

use crate::common::PubMedId;
use crate::error::Result;
use crate::gateway::HttpMethod;
use crate::pubmed::models::{ArticleSummary, NO_TITLE, UNKNOWN, UNKNOWN_JOURNAL};
use crate::pubmed::responses::{ESummaryDocSum, ESummaryResponse};
use tracing::{debug, instrument, warn};

use super::PubMedClient;

impl PubMedClient {
    /// Fetch article summaries for `pmids` with one ESummary call
    ///
    /// Output follows the order of `pmids`. Ids whose summary is missing from
    /// the response, or carries an `error`, are left out.
    ///
    /// # Errors
    ///
    /// * `PubMedError::InvalidPmid` - an id is not numeric, raised before any request
    #[instrument(skip(self, pmids), fields(pmids_count = pmids.len()))]
    pub async fn fetch_summaries<S: AsRef<str>>(&self, pmids: &[S]) -> Result<Vec<ArticleSummary>> {
        if pmids.is_empty() {
            return Ok(Vec::new());
        }

        let validated = pmids
            .iter()
            .map(|pmid| PubMedId::parse(pmid.as_ref()).map(|p| p.to_string()))
            .collect::<Result<Vec<_>>>()?;

        let params = [
            ("db", "pubmed".to_string()),
            ("id", validated.join(",")),
            ("retmode", "json".to_string()),
        ];
        let url = format!("{}/esummary.fcgi", self.base_url);

        debug!(batch_size = validated.len(), "Making ESummary API request");
        let json_text = self
            .gateway()
            .call_text(&url, &params, HttpMethod::Get)
            .await?;

        let summaries = Self::parse_esummary_response(&json_text, &validated)?;
        debug!(
            requested = validated.len(),
            parsed = summaries.len(),
            "ESummary completed"
        );
        Ok(summaries)
    }

    /// Parse an ESummary JSON document, correlating records with `pmids` in order
    pub(crate) fn parse_esummary_response(
        json_text: &str,
        pmids: &[String],
    ) -> Result<Vec<ArticleSummary>> {
        if json_text.trim().is_empty() {
            warn!("Empty ESummary response");
            return Ok(Vec::new());
        }

        let response: ESummaryResponse = serde_json::from_str(json_text)?;

        let mut summaries = Vec::with_capacity(pmids.len());
        for pmid in pmids {
            let Some(value) = response.result.get(pmid) else {
                warn!(pmid = %pmid, "Summary missing from ESummary response, skipping");
                continue;
            };

            let doc: ESummaryDocSum = match serde_json::from_value(value.clone()) {
                Ok(doc) => doc,
                Err(e) => {
                    warn!(pmid = %pmid, error = %e, "Unreadable summary record, skipping");
                    continue;
                }
            };

            if let Some(error) = &doc.error {
                warn!(pmid = %pmid, error = %error, "ESummary reported an error, skipping");
                continue;
            }

            summaries.push(summary_from_doc(pmid, doc));
        }

        Ok(summaries)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn summary_from_doc(pmid: &str, doc: ESummaryDocSum) -> ArticleSummary {
    let pmcid = doc
        .articleids
        .iter()
        .find(|id| id.idtype == "pmc")
        .map(|id| id.value.clone())
        .filter(|value| !value.is_empty());

    let journal = non_empty(doc.fulljournalname)
        .or_else(|| non_empty(doc.source))
        .unwrap_or_else(|| UNKNOWN_JOURNAL.to_string());

    ArticleSummary {
        pmid: pmid.to_string(),
        full_text_available: pmcid.is_some(),
        pmcid,
        title: non_empty(doc.title).unwrap_or_else(|| NO_TITLE.to_string()),
        pub_date: non_empty(doc.pubdate).unwrap_or_else(|| UNKNOWN.to_string()),
        journal,
        authors: doc
            .authors
            .into_iter()
            .map(|a| a.name)
            .filter(|name| !name.is_empty())
            .collect(),
    }
}
