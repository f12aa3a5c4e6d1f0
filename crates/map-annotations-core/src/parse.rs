// crates/map-annotations-core/src/parse.rs
//
// quick-xml 0.38 reader that turns an annotated map SVG into a small arena tree.
// - Elements are stored in document (pre-)order; an element's id is its index
// - Element names are local names (`svg:g` and `g` are the same element)
// - Attribute keys keep their prefix (`inkscape:label` stays as written)
// - Text, CDATA and entity references are concatenated per element
//
// Only markup that is not well-formed is an error here. Whether the tree holds
// usable annotations is decided later, element by element.

use quick_xml::Reader;
use quick_xml::events::{BytesRef, BytesStart, Event};
use std::collections::BTreeMap;
use std::str;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    #[error("utf8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("encoding error: {0}")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    #[error("unknown entity reference: &{0};")]
    UnknownEntity(String),

    #[error("unexpected structure: {0}")]
    Structure(String),
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Index of an element inside its [`SvgDocument`].
pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attrs: BTreeMap<String, String>,
    pub children: Vec<NodeId>,
    /// Direct character data of this element, descendants excluded.
    pub text: String,
}

impl Element {
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SvgDocument {
    elements: Vec<Element>,
    root: NodeId,
}

impl SvgDocument {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn element(&self, id: NodeId) -> &Element {
        &self.elements[id]
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// All element ids in document order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        0..self.elements.len()
    }

    pub fn attr(&self, id: NodeId, key: &str) -> Option<&str> {
        self.elements[id].attr(key)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.elements[id].children
    }

    pub fn children_named<'a>(
        &'a self,
        id: NodeId,
        name: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.children(id)
            .iter()
            .copied()
            .filter(move |&child| self.elements[child].is(name))
    }

    pub fn find_child(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.children_named(id, name).next()
    }

    /// Descendants of `id` in document order, `id` itself excluded.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    pub fn find_descendant(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.descendants(id)
            .into_iter()
            .find(|&d| self.elements[d].is(name))
    }

    /// Character data of `id` and all of its descendants, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = self.elements[id].text.clone();
        for d in self.descendants(id) {
            out.push_str(&self.elements[d].text);
        }
        out
    }

    /// Short human-readable handle for messages: the `id` attribute when
    /// present, otherwise the element name and its position in the document.
    pub fn describe(&self, id: NodeId) -> String {
        let el = &self.elements[id];
        match el.attr("id") {
            Some(attr_id) => format!("<{} id=\"{attr_id}\">", el.name),
            None => format!("<{}> #{id}", el.name),
        }
    }
}

/// Child → parent index, built once before the tree is walked.
#[derive(Debug, Clone, PartialEq)]
pub struct ParentMap {
    parents: Vec<Option<NodeId>>,
}

impl ParentMap {
    pub fn build(doc: &SvgDocument) -> Self {
        let mut parents = vec![None; doc.len()];
        for id in doc.ids() {
            for &child in doc.children(id) {
                parents[child] = Some(id);
            }
        }
        Self { parents }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents.get(id).copied().flatten()
    }
}

/// Parse an SVG document into an element tree.
///
/// The root element must be `<svg>`. Comments, processing instructions and
/// the doctype are skipped.
pub fn parse_svg(xml: &str) -> ParseResult<SvgDocument> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    let mut elements: Vec<Element> = Vec::new();
    let mut open: Vec<NodeId> = Vec::new();
    let mut root: Option<NodeId> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let id = push_element(&mut elements, &open, &mut root, &e)?;
                open.push(id);
            }

            Event::Empty(e) => {
                push_element(&mut elements, &open, &mut root, &e)?;
            }

            Event::End(_) => {
                open.pop().ok_or_else(|| {
                    ParseError::Structure("closing tag without an open element".into())
                })?;
            }

            Event::Text(t) => {
                let txt = t.decode()?;
                append_text(&mut elements, &open, &txt)?;
            }

            Event::CData(c) => {
                let txt = c.decode()?;
                append_text(&mut elements, &open, &txt)?;
            }

            Event::GeneralRef(r) => {
                let txt = resolve_reference(&r)?;
                append_text(&mut elements, &open, &txt)?;
            }

            Event::Eof => break,
            _ => {}
        }

        buf.clear();
    }

    if let Some(&unclosed) = open.last() {
        return Err(ParseError::Structure(format!(
            "unclosed element <{}>",
            elements[unclosed].name
        )));
    }

    let root = root.ok_or_else(|| ParseError::Structure("no root element found".into()))?;
    if !elements[root].is("svg") {
        return Err(ParseError::Structure(format!(
            "root element is <{}>, expected <svg>",
            elements[root].name
        )));
    }

    Ok(SvgDocument { elements, root })
}

fn push_element(
    elements: &mut Vec<Element>,
    open: &[NodeId],
    root: &mut Option<NodeId>,
    e: &BytesStart<'_>,
) -> ParseResult<NodeId> {
    let id = elements.len();
    match open.last() {
        Some(&parent) => elements[parent].children.push(id),
        None if root.is_some() => {
            return Err(ParseError::Structure("multiple root elements".into()));
        }
        None => *root = Some(id),
    }

    elements.push(Element {
        name: local_name(e)?,
        attrs: attrs_to_map(e)?,
        children: Vec::new(),
        text: String::new(),
    });
    Ok(id)
}

fn append_text(elements: &mut [Element], open: &[NodeId], txt: &str) -> ParseResult<()> {
    match open.last() {
        Some(&id) => {
            elements[id].text.push_str(txt);
            Ok(())
        }
        // Indentation around the root element is fine; content is not.
        None if txt.trim().is_empty() => Ok(()),
        None => Err(ParseError::Structure(
            "character data outside the root element".into(),
        )),
    }
}

fn resolve_reference(r: &BytesRef<'_>) -> ParseResult<String> {
    let char_ref = r
        .resolve_char_ref()
        .map_err(|err| ParseError::Structure(format!("invalid character reference: {err}")))?;
    if let Some(ch) = char_ref {
        return Ok(ch.to_string());
    }

    let name = r.decode()?;
    quick_xml::escape::resolve_xml_entity(&name)
        .map(str::to_string)
        .ok_or_else(|| ParseError::UnknownEntity(name.into_owned()))
}

fn attrs_to_map(e: &BytesStart<'_>) -> ParseResult<BTreeMap<String, String>> {
    let mut out = BTreeMap::new();
    for a in e.attributes() {
        let a = a?;
        let key = str::from_utf8(a.key.as_ref())?.to_string();
        let val = a.unescape_value()?.to_string();
        out.insert(key, val);
    }
    Ok(out)
}

fn local_name(e: &BytesStart<'_>) -> ParseResult<String> {
    Ok(str::from_utf8(e.local_name().as_ref())?.to_string())
}
