//! Compact RIS export for citation managers
//!
//! Only the fields needed to identify an article are written (first author,
//! title, journal, year, DOI, PMID). EndNote, Zotero and Mendeley complete the
//! record from PubMed using the `AN` field.

use crate::pubmed::models::ArticleAbstract;

/// Trait for exporting articles to citation formats
pub trait ExportFormat {
    /// Export the article metadata in compact RIS format
    fn to_ris(&self) -> String;
}

/// Remove line breaks and collapse runs of whitespace
fn escape_ris_field(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `"2024"` becomes `"2024///"`; anything non-numeric becomes `"////"`
fn format_year(year: &str) -> String {
    if !year.is_empty() && year.chars().all(|c| c.is_ascii_digit()) {
        format!("{year}///")
    } else {
        "////".to_string()
    }
}

impl ExportFormat for ArticleAbstract {
    fn to_ris(&self) -> String {
        let mut lines = vec!["TY  - JOUR".to_string()];

        if let Some(first_author) = self.authors.first() {
            lines.push(format!("AU  - {}", escape_ris_field(first_author)));
        }

        let title = escape_ris_field(&self.title);
        if !title.is_empty() {
            lines.push(format!("TI  - {title}"));
        }

        let journal = escape_ris_field(&self.journal);
        if !journal.is_empty() {
            lines.push(format!("JO  - {journal}"));
        }

        if !self.year.is_empty() {
            lines.push(format!("PY  - {}", format_year(&self.year)));
        }
        if let Some(doi) = self.doi.as_deref().filter(|d| !d.is_empty()) {
            lines.push(format!("DO  - {doi}"));
        }
        if !self.pmid.is_empty() {
            lines.push(format!("AN  - {}", self.pmid));
        }

        lines.push("DB  - PubMed".to_string());
        lines.push("ER  - ".to_string());
        lines.push(String::new());

        lines.join("\n")
    }
}

/// Export multiple articles as a single RIS string
pub fn articles_to_ris(articles: &[ArticleAbstract]) -> String {
    articles
        .iter()
        .map(|a| a.to_ris())
        .collect::<Vec<_>>()
        .join("\n")
}
