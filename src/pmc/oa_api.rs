//! PMC Open Access web service response parsing
//!
//! The OA service lists download links (tgz package, pdf) for articles in the
//! OA subset. Only the PDF link is used.

use quick_xml::de::from_str;
use serde::Deserialize;
use tracing::debug;

use crate::error::{PubMedError, Result};

// ================================================================================================
// OA API Response Structs (for quick-xml deserialization)
// ================================================================================================

/// Root element of OA API response
#[derive(Debug, Deserialize)]
#[serde(rename = "OA")]
struct OaResponse {
    #[serde(rename = "error")]
    error: Option<OaError>,
    #[serde(rename = "records")]
    records: Option<OaRecords>,
}

/// Error element in OA API response
#[derive(Debug, Deserialize)]
struct OaError {
    #[serde(rename = "@code")]
    code: Option<String>,
    #[serde(rename = "$text", default)]
    message: String,
}

/// Records container in OA API response
#[derive(Debug, Deserialize)]
struct OaRecords {
    #[serde(rename = "record", default)]
    record: Vec<OaRecord>,
}

/// Individual record in OA API response
#[derive(Debug, Deserialize)]
struct OaRecord {
    #[serde(rename = "link", default)]
    links: Vec<OaLink>,
}

/// Link element in OA record
#[derive(Debug, Deserialize)]
struct OaLink {
    #[serde(rename = "@format")]
    format: Option<String>,
    #[serde(rename = "@href")]
    href: Option<String>,
}

/// Extract the first PDF link from an OA API response
///
/// Returns `Ok(None)` when the article is outside the OA subset (the service
/// answers with an `<error>` element) or lists no PDF.
///
/// # Errors
///
/// Returns `PubMedError::XmlError` when the response cannot be deserialized.
///
/// ```
/// use pubmed_gateway::pmc::oa_api::parse_pdf_link;
///
/// let xml = r#"<OA><records><record id="PMC1">
///   <link format="tgz" href="ftp://example.org/a.tar.gz"/>
///   <link format="pdf" href="ftp://example.org/a.pdf"/>
/// </record></records></OA>"#;
/// assert_eq!(parse_pdf_link(xml).unwrap().as_deref(), Some("ftp://example.org/a.pdf"));
/// ```
pub fn parse_pdf_link(xml: &str) -> Result<Option<String>> {
    let response: OaResponse = from_str(xml)
        .map_err(|e| PubMedError::XmlError(format!("Failed to parse OA API response: {e}")))?;

    if let Some(error) = response.error {
        debug!(
            code = error.code.as_deref().unwrap_or("unknown"),
            message = %error.message,
            "OA API reported an error"
        );
        return Ok(None);
    }

    let link = response
        .records
        .into_iter()
        .flat_map(|records| records.record)
        .flat_map(|record| record.links)
        .find(|link| link.format.as_deref() == Some("pdf"))
        .and_then(|link| link.href);

    Ok(link)
}
