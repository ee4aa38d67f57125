//! JATS body extraction
//!
//! Extraction runs in two passes. The walk pass decides what counts as body
//! content and produces [`SectionNode`]s; the flatten pass joins their text
//! into [`ArticleSection`]s. Front matter is never visited.

use tracing::debug;

use crate::common::xml::{parse_document, XmlElement};
use crate::pmc::models::ArticleSection;

pub const RESTRICTED_MARKER: &str = "does not allow downloading";
pub const RESTRICTED_ERROR: &str = "Full text not available due to publisher restrictions";
pub const NO_BODY_ERROR: &str = "No body element found in JATS XML";
pub const UNTITLED_SECTION: &str = "Untitled Section";

/// Sections extracted from one JATS document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedBody {
    pub sections: Vec<ArticleSection>,
    /// Why extraction produced nothing, if it did
    pub error: Option<String>,
}

impl ParsedBody {
    fn failed<S: Into<String>>(error: S) -> Self {
        Self {
            sections: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// A direct `sec` child of `body` as seen by the walk pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionNode {
    pub title: String,
    /// Text of each direct `p` child
    pub paragraphs: Vec<String>,
    /// Every nested `sec`, in document order
    pub subsections: Vec<SubsectionNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsectionNode {
    pub title: Option<String>,
    pub paragraphs: Vec<String>,
}

/// Extract body sections from a JATS (`pmc-articleset` or `article`) document
///
/// Never fails: publisher restrictions, malformed XML and a missing `body`
/// are reported through [`ParsedBody::error`].
///
/// ```
/// use pubmed_gateway::pmc::parse_jats_body;
///
/// let xml = "<article><front><title>Meta</title></front><body>\
///            <sec><title>Intro</title><p>A B</p></sec></body></article>";
/// let parsed = parse_jats_body(xml);
/// assert_eq!(parsed.sections[0].title, "Intro");
/// assert_eq!(parsed.sections[0].text, "A B");
/// ```
pub fn parse_jats_body(xml: &str) -> ParsedBody {
    if xml.trim().is_empty() || xml.contains(RESTRICTED_MARKER) {
        return ParsedBody::failed(RESTRICTED_ERROR);
    }

    let root = match parse_document(xml) {
        Ok(root) => root,
        Err(e) => return ParsedBody::failed(format!("XML parsing error: {e}")),
    };

    let Some(body) = find_body(&root) else {
        return ParsedBody::failed(NO_BODY_ERROR);
    };

    let nodes = walk_body(body);
    let sections = flatten_sections(nodes);
    debug!(sections = sections.len(), "Extracted JATS body sections");

    ParsedBody {
        sections,
        error: None,
    }
}

/// `article > body`, falling back to any `body` outside `front`
fn find_body(root: &XmlElement) -> Option<&XmlElement> {
    let article = if root.name == "article" {
        Some(root)
    } else {
        root.find_descendant("article")
    };

    match article {
        Some(article) => article
            .child("body")
            .or_else(|| find_outside_front(article, "body")),
        None => find_outside_front(root, "body"),
    }
}

fn find_outside_front<'a>(element: &'a XmlElement, name: &str) -> Option<&'a XmlElement> {
    for child in &element.children {
        if child.name == "front" {
            continue;
        }
        if child.name == name {
            return Some(child);
        }
        if let Some(found) = find_outside_front(child, name) {
            return Some(found);
        }
    }
    None
}

/// Walk pass: one node per direct `sec` child of `body`
pub fn walk_body(body: &XmlElement) -> Vec<SectionNode> {
    body.children_named("sec")
        .map(|sec| SectionNode {
            title: section_title(sec).unwrap_or_else(|| UNTITLED_SECTION.to_string()),
            paragraphs: paragraph_texts(sec),
            subsections: sec
                .descendants_named("sec")
                .into_iter()
                .map(|sub| SubsectionNode {
                    title: section_title(sub),
                    paragraphs: paragraph_texts(sub),
                })
                .collect(),
        })
        .collect()
}

/// Flatten pass: join paragraphs and sub-section blocks, dropping empty sections
pub fn flatten_sections(nodes: Vec<SectionNode>) -> Vec<ArticleSection> {
    nodes
        .into_iter()
        .filter_map(|node| {
            let mut parts = node.paragraphs;
            parts.extend(node.subsections.iter().filter_map(subsection_block));

            let text = parts.join("\n\n");
            if text.is_empty() {
                None
            } else {
                Some(ArticleSection::new(node.title, text))
            }
        })
        .collect()
}

/// `"Title:\n<paragraphs>"`, the bare paragraphs when untitled
fn subsection_block(sub: &SubsectionNode) -> Option<String> {
    let body = sub.paragraphs.join("\n\n");
    match (&sub.title, body.is_empty()) {
        (Some(title), false) => Some(format!("{title}:\n{body}")),
        (Some(title), true) => Some(format!("{title}:")),
        (None, false) => Some(body),
        (None, true) => None,
    }
}

fn section_title(sec: &XmlElement) -> Option<String> {
    sec.child("title")
        .map(XmlElement::text_content)
        .filter(|title| !title.is_empty())
}

fn paragraph_texts(sec: &XmlElement) -> Vec<String> {
    sec.children_named("p")
        .map(XmlElement::text_content)
        .filter(|text| !text.is_empty())
        .collect()
}
