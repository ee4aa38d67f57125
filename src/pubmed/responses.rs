use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ESearchResult {
    pub esearchresult: ESearchData,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct ESearchData {
    #[serde(default, rename = "ERROR")]
    pub error: Option<String>,
    #[serde(default)]
    pub count: Option<String>,
    #[serde(default)]
    pub idlist: Vec<String>,
    /// How PubMed interpreted and translated the search query
    #[serde(default)]
    pub querytranslation: Option<String>,
    #[serde(default)]
    pub warninglist: Option<ESearchWarnings>,
}

impl ESearchData {
    pub fn total_count(&self) -> u64 {
        self.count
            .as_deref()
            .and_then(|c| c.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Ignored phrases followed by quoted phrases that were not found
    pub fn warnings(&self) -> Vec<String> {
        self.warninglist
            .as_ref()
            .map(|w| {
                w.phrases_ignored
                    .iter()
                    .chain(w.quoted_phrases_not_found.iter())
                    .filter(|s| !s.trim().is_empty())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct ESearchWarnings {
    #[serde(default, rename = "phrasesignored", alias = "phraseignored")]
    pub phrases_ignored: Vec<String>,
    #[serde(
        default,
        rename = "quotedphrasesnotfound",
        alias = "quotedphrasenotfound"
    )]
    pub quoted_phrases_not_found: Vec<String>,
}

// ESummary API response structures

/// ESummary returns a JSON object with "result" containing "uids" array and per-UID objects.
/// We use serde_json::Value to handle the dynamic per-UID keys, then parse each record.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ESummaryResponse {
    #[serde(default)]
    pub result: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ESummaryAuthor {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ESummaryArticleId {
    #[serde(default)]
    pub idtype: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct ESummaryDocSum {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub pubdate: Option<String>,
    #[serde(default)]
    pub fulljournalname: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub authors: Vec<ESummaryAuthor>,
    #[serde(default)]
    pub articleids: Vec<ESummaryArticleId>,
    /// Set by ESummary for UIDs it could not resolve
    #[serde(default)]
    pub error: Option<String>,
}
