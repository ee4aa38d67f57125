//! EFetch (PubMed XML) parsing
//!
//! Works on the owned element tree from [`crate::common::xml`], so one parse
//! serves both the abstract records and the similarity seed metadata.

use tracing::{debug, warn};

use crate::common::xml::{parse_document, XmlElement};
use crate::error::Result;
use crate::pubmed::models::{ArticleAbstract, NO_ABSTRACT, NO_TITLE, UNKNOWN, UNKNOWN_JOURNAL};

/// Metadata of one article used to synthesize a similarity query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimilaritySeed {
    /// `MeshHeading/DescriptorName` values in document order
    pub mesh_terms: Vec<String>,
    /// Text of the first `ArticleTitle`, empty when absent
    pub title: String,
}

/// Parse a `PubmedArticleSet` document into abstract records
///
/// Articles without `MedlineCitation/PMID` are skipped. A blank body or a
/// document without articles yields an empty list.
///
/// # Errors
///
/// Returns `PubMedError::XmlError` if the document is not well-formed.
pub fn parse_abstracts(xml: &str) -> Result<Vec<ArticleAbstract>> {
    if xml.trim().is_empty() {
        return Ok(Vec::new());
    }

    let root = parse_document(xml)?;
    let articles = articles_of(&root);

    let mut records = Vec::with_capacity(articles.len());
    for article in articles {
        match parse_article(article) {
            Some(record) => records.push(record),
            None => warn!("Skipping PubmedArticle without MedlineCitation/PMID"),
        }
    }

    debug!(parsed = records.len(), "Parsed abstract records");
    Ok(records)
}

/// Extract MeSH descriptors and the title of the first article in an EFetch document
pub fn parse_similarity_seed(xml: &str) -> Result<SimilaritySeed> {
    if xml.trim().is_empty() {
        return Ok(SimilaritySeed::default());
    }

    let root = parse_document(xml)?;

    let mesh_terms = root
        .descendants_named("MeshHeading")
        .into_iter()
        .filter_map(|heading| heading.child("DescriptorName"))
        .map(XmlElement::normalized_text)
        .filter(|term| !term.is_empty())
        .collect();

    let title = first_text(&root, "ArticleTitle").unwrap_or_default();

    Ok(SimilaritySeed { mesh_terms, title })
}

fn articles_of(root: &XmlElement) -> Vec<&XmlElement> {
    if root.name == "PubmedArticle" {
        vec![root]
    } else {
        root.descendants_named("PubmedArticle")
    }
}

fn parse_article(article: &XmlElement) -> Option<ArticleAbstract> {
    let pmid = article
        .find_path("MedlineCitation/PMID")
        .map(XmlElement::normalized_text)
        .filter(|pmid| !pmid.is_empty())?;

    let title = article
        .find_descendant("Article")
        .and_then(|a| a.child("ArticleTitle"))
        .map(XmlElement::normalized_text)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string());

    let segments: Vec<String> = article
        .descendants_named("Abstract")
        .into_iter()
        .flat_map(|abstract_node| abstract_node.children_named("AbstractText"))
        .map(|segment| {
            let text = segment.normalized_text();
            match segment.attr("Label") {
                Some(label) if !label.is_empty() => format!("{label}: {text}"),
                _ => text,
            }
        })
        .collect();
    let abstract_text = if segments.is_empty() {
        NO_ABSTRACT.to_string()
    } else {
        segments.join("\n")
    };

    let journal = article
        .descendants_named("Journal")
        .into_iter()
        .find_map(|journal| journal.child("Title"))
        .map(XmlElement::normalized_text)
        .filter(|j| !j.is_empty())
        .unwrap_or_else(|| UNKNOWN_JOURNAL.to_string());

    let year = article
        .descendants_named("PubDate")
        .into_iter()
        .find_map(|date| date.child("Year"))
        .map(XmlElement::normalized_text)
        .filter(|y| !y.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string());

    let authors = article
        .descendants_named("AuthorList")
        .into_iter()
        .flat_map(|list| list.children_named("Author"))
        .filter_map(author_name)
        .collect();

    let doi = article
        .descendants_named("ArticleId")
        .into_iter()
        .find(|id| id.attr("IdType") == Some("doi"))
        .map(XmlElement::normalized_text)
        .filter(|doi| !doi.is_empty());

    Some(ArticleAbstract {
        pmid,
        title,
        abstract_text,
        journal,
        year,
        authors,
        doi,
    })
}

/// "ForeName LastName", or `None` when either part is missing
fn author_name(author: &XmlElement) -> Option<String> {
    let fore_name = author.child("ForeName")?.normalized_text();
    let last_name = author.child("LastName")?.normalized_text();
    if fore_name.is_empty() || last_name.is_empty() {
        return None;
    }
    Some(format!("{fore_name} {last_name}"))
}

fn first_text(root: &XmlElement, name: &str) -> Option<String> {
    root.find_descendant(name).map(XmlElement::normalized_text)
}
