//! Owned XML document model and the injectable parser seam.
//!
//! The parser is a collaborator passed into the request factory rather than
//! a global lookup, so response decoding stays pure and testable. A failed
//! parse surfaces as `None`, never as a panic or error value.

use quick_xml::events::Event;
use quick_xml::Reader;

/// One XML element: tag name, accumulated text content, child elements.
///
/// Attributes are not modeled; the envelope convention is tags-only.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    name: String,
    text: String,
    children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: String::new(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Direct text content of this element (child element text excluded).
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// First direct child with the given tag name.
    pub fn child(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == tag)
    }

    /// First element with the given tag name, checking this element and
    /// then descendants depth-first.
    pub fn find(&self, tag: &str) -> Option<&Element> {
        if self.name == tag {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(tag))
    }
}

/// A parsed XML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// See [`Element::find`], starting at the root.
    pub fn find(&self, tag: &str) -> Option<&Element> {
        self.root.find(tag)
    }
}

/// Parses response text into a [`Document`].
///
/// `None` models the "empty or unrecognizable document" failure surface;
/// the caller treats it the same as a missing body.
pub trait DocumentParser: Send + Sync {
    fn parse(&self, text: &str, content_type: &str) -> Option<Document>;
}

/// Default parser built on `quick-xml`.
///
/// Comments, processing instructions and the XML declaration are skipped;
/// entity references in text are unescaped. Unbalanced or duplicated root
/// elements parse to `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlDocumentParser;

impl DocumentParser for XmlDocumentParser {
    fn parse(&self, text: &str, _content_type: &str) -> Option<Document> {
        if text.trim().is_empty() {
            return None;
        }

        let mut reader = Reader::from_str(text);
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(start)) => {
                    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                    stack.push(Element::new(name));
                }
                Ok(Event::Empty(start)) => {
                    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                    place(Element::new(name), &mut stack, &mut root)?;
                }
                Ok(Event::End(_)) => {
                    let element = stack.pop()?;
                    place(element, &mut stack, &mut root)?;
                }
                Ok(Event::Text(escaped)) => {
                    let content = escaped.unescape().ok()?;
                    if let Some(open) = stack.last_mut() {
                        open.text.push_str(&content);
                    }
                }
                Ok(Event::CData(raw)) => {
                    let content = String::from_utf8_lossy(&raw.into_inner()).into_owned();
                    if let Some(open) = stack.last_mut() {
                        open.text.push_str(&content);
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(_) => return None,
            }
        }

        if !stack.is_empty() {
            return None;
        }
        root.map(Document::new)
    }
}

/// Attach a finished element to its parent, or install it as the root.
/// A second top-level element makes the document unrecognizable.
///
/// Text is trimmed once per element, so interior spacing in mixed content
/// survives while indentation around child elements does not.
fn place(mut element: Element, stack: &mut Vec<Element>, root: &mut Option<Element>) -> Option<()> {
    let trimmed = element.text.trim();
    if trimmed.len() != element.text.len() {
        element.text = trimmed.to_string();
    }
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_some() {
                return None;
            }
            *root = Some(element);
        }
    }
    Some(())
}
