//! In-memory SVG element tree.
//!
//! Elements live in an arena indexed by [`NodeId`]; removed subtrees free their slots for reuse,
//! so repeated overlay redraws do not grow the arena. Attribute and text values are stored raw
//! and escaped on serialization.

use crate::svg::{escape_xml_into, fmt};
use crate::{Error, Result};
use indexmap::IndexMap;
use std::fmt::Write as _;

pub type NodeId = usize;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attrs: IndexMap<String, String>,
    pub text: Option<String>,
    pub children: Vec<NodeId>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: IndexMap::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }
}

/// One drawable surface: an `<svg>` root plus its descendants.
#[derive(Debug, Clone)]
pub struct Surface {
    id: String,
    nodes: Vec<Option<Element>>,
    free: Vec<NodeId>,
}

impl Surface {
    pub const ROOT: NodeId = 0;

    pub fn new(id: impl Into<String>) -> Self {
        let mut surface = Self {
            id: id.into(),
            nodes: Vec::new(),
            free: Vec::new(),
        };
        surface.clear();
        surface
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn root(&self) -> NodeId {
        Self::ROOT
    }

    /// Drops every element and attribute, leaving a bare `<svg id=…>` root.
    pub fn clear(&mut self) {
        let mut root = Element::new("svg");
        root.attrs.insert("id".to_string(), self.id.clone());
        root.attrs.insert("xmlns".to_string(), SVG_NS.to_string());
        self.nodes = vec![Some(root)];
        self.free.clear();
    }

    pub fn get(&self, id: NodeId) -> Option<&Element> {
        self.nodes.get(id)?.as_ref()
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(id)?.as_mut()
    }

    /// Appends a new `tag` element under `parent`.
    pub fn append(&mut self, parent: NodeId, tag: &str) -> NodeMut<'_> {
        let element = Element::new(tag);
        let id = match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(element);
                slot
            }
            None => {
                self.nodes.push(Some(element));
                self.nodes.len() - 1
            }
        };
        if let Some(p) = self.get_mut(parent) {
            p.children.push(id);
        }
        NodeMut { surface: self, id }
    }

    pub fn node_mut(&mut self, id: NodeId) -> NodeMut<'_> {
        NodeMut { surface: self, id }
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let Some(e) = self.get_mut(id) {
            e.attrs.insert(name.to_string(), value.into());
        }
    }

    /// Drops every attribute of `id` whose name is not in `keep`.
    pub fn retain_attrs(&mut self, id: NodeId, keep: &[&str]) {
        if let Some(e) = self.get_mut(id) {
            e.attrs.retain(|k, _| keep.contains(&k.as_str()));
        }
    }

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        if let Some(e) = self.get_mut(id) {
            e.text = Some(text.into());
        }
    }

    /// Removes all descendants of `id`, keeping the element itself.
    pub fn clear_children(&mut self, id: NodeId) {
        let Some(e) = self.get_mut(id) else {
            return;
        };
        let mut stack = std::mem::take(&mut e.children);
        while let Some(child) = stack.pop() {
            if let Some(removed) = self.nodes.get_mut(child).and_then(Option::take) {
                stack.extend(removed.children);
                self.free.push(child);
            }
        }
    }

    /// Pre-order walk below (and including) `from`.
    pub fn descendants(&self, from: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            let Some(e) = self.get(id) else {
                continue;
            };
            out.push(id);
            stack.extend(e.children.iter().rev());
        }
        out
    }

    /// The element whose `id` attribute equals `id`.
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(Self::ROOT)
            .into_iter()
            .find(|&n| self.get(n).and_then(|e| e.attr("id")) == Some(id))
    }

    /// All elements with tag `tag`, in document order.
    pub fn select_all(&self, tag: &str) -> Vec<NodeId> {
        self.descendants(Self::ROOT)
            .into_iter()
            .filter(|&n| self.get(n).is_some_and(|e| e.tag == tag))
            .collect()
    }

    /// Number of live elements, the root included.
    pub fn len(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.get(Self::ROOT).is_none_or(|r| r.children.is_empty())
    }

    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        self.render_node(&mut out, Self::ROOT);
        out
    }

    fn render_node(&self, out: &mut String, id: NodeId) {
        let Some(n) = self.get(id) else {
            return;
        };
        out.push('<');
        out.push_str(&n.tag);
        for (k, v) in &n.attrs {
            let _ = write!(out, r#" {k}=""#);
            escape_xml_into(out, v);
            out.push('"');
        }
        if n.children.is_empty() && n.text.as_deref().unwrap_or("").is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        if let Some(t) = n.text.as_deref() {
            escape_xml_into(out, t);
        }
        for c in &n.children {
            self.render_node(out, *c);
        }
        let _ = write!(out, "</{}>", n.tag);
    }
}

/// Builder handle returned by [`Surface::append`].
pub struct NodeMut<'a> {
    surface: &'a mut Surface,
    id: NodeId,
}

impl NodeMut<'_> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn attr(self, name: &str, value: impl Into<String>) -> Self {
        self.surface.set_attr(self.id, name, value);
        self
    }

    /// Numeric attribute, stringified with [`fmt`].
    pub fn num(self, name: &str, value: f64) -> Self {
        self.surface.set_attr(self.id, name, fmt(value));
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.surface.set_text(self.id, text);
        self
    }
}

/// Surfaces keyed by mount id.
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    surfaces: IndexMap<String, Surface>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty surface for `id`; an existing surface is kept as is.
    pub fn mount(&mut self, id: &str) -> &mut Surface {
        self.surfaces
            .entry(id.to_string())
            .or_insert_with(|| Surface::new(id))
    }

    pub fn unmount(&mut self, id: &str) -> Option<Surface> {
        self.surfaces.shift_remove(id)
    }

    pub fn surface(&self, id: &str) -> Result<&Surface> {
        self.surfaces.get(id).ok_or_else(|| Error::MountNotFound {
            id: id.to_string(),
        })
    }

    pub fn surface_mut(&mut self, id: &str) -> Result<&mut Surface> {
        self.surfaces
            .get_mut(id)
            .ok_or_else(|| Error::MountNotFound { id: id.to_string() })
    }

    pub fn mount_ids(&self) -> impl Iterator<Item = &str> {
        self.surfaces.keys().map(String::as_str)
    }

    pub fn to_svg(&self, id: &str) -> Result<String> {
        Ok(self.surface(id)?.to_svg())
    }
}
