//! Annotation name lookup.

use crate::parse::{NodeId, ParentMap, SvgDocument};

/// Name of an editor-drawn annotation group.
///
/// Inkscape tucks label text into a `<tspan>`, so that is searched first; a
/// bare `<text>` anywhere below the group is the fallback.
pub fn resolve_label(doc: &SvgDocument, group: NodeId) -> Option<String> {
    let label = doc
        .find_descendant(group, "tspan")
        .or_else(|| doc.find_descendant(group, "text"))?;
    label_text(doc, label)
}

/// Name of a tool-tagged shape: the first `<text>` sitting next to it under
/// the same parent.
pub fn sibling_text(doc: &SvgDocument, parents: &ParentMap, shape: NodeId) -> Option<String> {
    let parent = parents.parent(shape)?;
    let text = doc.find_child(parent, "text")?;
    label_text(doc, text)
}

fn label_text(doc: &SvgDocument, id: NodeId) -> Option<String> {
    let text = doc.text_content(id);
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
