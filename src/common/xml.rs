//! Owned XML element tree built from `quick-xml` reader events
//!
//! Each element keeps its leading `text` and the `tail` text that follows its
//! closing tag inside the parent, so mixed content such as
//! `<p>A <italic>B</italic> C</p>` can be reassembled in document order.

use std::borrow::Cow;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{PubMedError, Result};

/// A parsed XML element with ElementTree-style `text`/`tail` slots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    /// Text between the start tag and the first child
    pub text: String,
    /// Text between this element's end tag and the next sibling in the parent
    pub tail: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();

        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| PubMedError::XmlError(e.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = match attr.unescape_value() {
                Ok(value) => value.into_owned(),
                Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
            };
            attributes.push((key, value));
        }

        Ok(Self {
            name,
            attributes,
            ..Self::default()
        })
    }

    /// Value of the attribute named `key`
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First direct child named `name`
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Direct children named `name`, in document order
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Follow a `/`-separated path of direct-child names, taking the first match at each step
    ///
    /// ```
    /// use pubmed_gateway::common::xml::parse_document;
    ///
    /// let root = parse_document("<a><b><c>hit</c></b></a>").unwrap();
    /// assert_eq!(root.find_path("b/c").unwrap().text, "hit");
    /// assert!(root.find_path("b/missing").is_none());
    /// ```
    pub fn find_path(&self, path: &str) -> Option<&XmlElement> {
        path.split('/')
            .filter(|step| !step.is_empty())
            .try_fold(self, |node, step| node.child(step))
    }

    /// First descendant (excluding `self`) named `name`, in document order
    pub fn find_descendant(&self, name: &str) -> Option<&XmlElement> {
        for child in &self.children {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.find_descendant(name) {
                return Some(found);
            }
        }
        None
    }

    /// Every descendant (excluding `self`) named `name`, in document order
    pub fn descendants_named(&self, name: &str) -> Vec<&XmlElement> {
        let mut found = Vec::new();
        self.collect_named(name, &mut found);
        found
    }

    fn collect_named<'a>(&'a self, name: &str, found: &mut Vec<&'a XmlElement>) {
        for child in &self.children {
            if child.name == name {
                found.push(child);
            }
            child.collect_named(name, found);
        }
    }

    /// Trimmed, non-empty text fragments of this element in document order
    ///
    /// Own leading text first, then each child's fragments followed by that
    /// child's tail. The element's own tail is not included.
    pub fn text_fragments(&self) -> Vec<String> {
        let mut fragments = Vec::new();
        self.collect_text(&mut fragments);
        fragments
    }

    fn collect_text(&self, fragments: &mut Vec<String>) {
        push_trimmed(fragments, &self.text);
        for child in &self.children {
            child.collect_text(fragments);
            push_trimmed(fragments, &child.tail);
        }
    }

    /// All text under this element, fragments joined with a single space
    ///
    /// ```
    /// use pubmed_gateway::common::xml::parse_document;
    ///
    /// let p = parse_document("<p> Alpha <italic>beta</italic> gamma </p>").unwrap();
    /// assert_eq!(p.text_content(), "Alpha beta gamma");
    /// ```
    pub fn text_content(&self) -> String {
        self.text_fragments().join(" ")
    }

    /// All text under this element concatenated as written, whitespace collapsed
    ///
    /// Unlike [`text_content`](Self::text_content), no separator is inserted at
    /// inline markup boundaries, so punctuation stays attached.
    ///
    /// ```
    /// use pubmed_gateway::common::xml::parse_document;
    ///
    /// let t = parse_document("<t>Effect of <i>IL-6</i>, a\n  cytokine.</t>").unwrap();
    /// assert_eq!(t.normalized_text(), "Effect of IL-6, a cytokine.");
    /// ```
    pub fn normalized_text(&self) -> String {
        let mut raw = String::new();
        self.collect_raw(&mut raw);
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn collect_raw(&self, raw: &mut String) {
        raw.push_str(&self.text);
        for child in &self.children {
            child.collect_raw(raw);
            raw.push_str(&child.tail);
        }
    }
}

fn push_trimmed(fragments: &mut Vec<String>, text: &str) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        fragments.push(trimmed.to_string());
    }
}

fn append_text(stack: &mut [XmlElement], text: &str) {
    if let Some(parent) = stack.last_mut() {
        match parent.children.last_mut() {
            Some(previous) => previous.tail.push_str(text),
            None => parent.text.push_str(text),
        }
    }
}

fn lossy(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

/// Parse a complete XML document and return its root element
///
/// Unknown entities (e.g. HTML `&nbsp;` inside JATS) do not fail the parse:
/// the raw, unescaped text is kept instead.
///
/// # Errors
///
/// Returns `PubMedError::XmlError` for malformed markup, mismatched or unclosed
/// tags, and documents without a root element.
pub fn parse_document(xml: &str) -> Result<XmlElement> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().expand_empty_elements = true;

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                if root.is_some() {
                    return Err(PubMedError::XmlError(
                        "content after document root".to_string(),
                    ));
                }
                stack.push(XmlElement::from_start(&start)?);
            }
            Event::End(_) => {
                // Name matching is enforced by the reader
                let Some(element) = stack.pop() else {
                    return Err(PubMedError::XmlError("unexpected closing tag".to_string()));
                };
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
            Event::Text(text) => {
                let text = match text.unescape() {
                    Ok(value) => value,
                    Err(_) => lossy(&text),
                };
                append_text(&mut stack, &text);
            }
            Event::CData(cdata) => {
                let text = lossy(&cdata).into_owned();
                append_text(&mut stack, &text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(PubMedError::XmlError(format!(
            "unclosed element <{}>",
            stack.last().map(|e| e.name.as_str()).unwrap_or_default()
        )));
    }

    root.ok_or_else(|| PubMedError::XmlError("document has no root element".to_string()))
}
