//! Borrowed element-tree model used as the capture target.
//!
//! The capturer does not own or lay out the visual tree; it only needs the
//! target's natural offset dimensions and the ability to filter descendant
//! nodes. These types mirror that minimal surface so the node filter can be
//! exercised without a live DOM.

/// Kind of a node in the visual tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// An element with a tag name (e.g. `div`, `iframe`)
    Element { tag: String },
    /// A text node
    Text,
    /// A comment node
    Comment,
}

/// A node in the visual tree below the capture target
#[derive(Debug, Clone)]
pub struct DomNode {
    pub kind: NodeKind,
    pub children: Vec<DomNode>,
}

impl DomNode {
    /// Create an element node with no children
    pub fn element(tag: &str) -> Self {
        Self {
            kind: NodeKind::Element {
                tag: tag.to_string(),
            },
            children: Vec::new(),
        }
    }

    /// Create an element node with the given children
    pub fn element_with_children(tag: &str, children: Vec<DomNode>) -> Self {
        Self {
            kind: NodeKind::Element {
                tag: tag.to_string(),
            },
            children,
        }
    }

    /// Create a text node
    pub fn text() -> Self {
        Self {
            kind: NodeKind::Text,
            children: Vec::new(),
        }
    }

    /// Create a comment node
    pub fn comment() -> Self {
        Self {
            kind: NodeKind::Comment,
            children: Vec::new(),
        }
    }
}

/// A handle to the renderable element being captured.
///
/// Borrowed for the duration of a single capture call; the capturer reads its
/// offset dimensions and hands the descendant tree to the providers.
#[derive(Debug, Clone)]
pub struct ElementHandle {
    tag: String,
    offset_width: u32,
    offset_height: u32,
    children: Vec<DomNode>,
}

impl ElementHandle {
    pub fn new(tag: &str, offset_width: u32, offset_height: u32) -> Self {
        Self {
            tag: tag.to_string(),
            offset_width,
            offset_height,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<DomNode>) -> Self {
        self.children = children;
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Natural (unscaled) width of the element
    pub fn offset_width(&self) -> u32 {
        self.offset_width
    }

    /// Natural (unscaled) height of the element
    pub fn offset_height(&self) -> u32 {
        self.offset_height
    }

    pub fn children(&self) -> &[DomNode] {
        &self.children
    }

    /// All descendant nodes in depth-first order
    pub fn descendants(&self) -> Vec<&DomNode> {
        let mut out = Vec::new();
        for child in &self.children {
            collect(child, &mut out);
        }
        out
    }
}

fn collect<'a>(node: &'a DomNode, out: &mut Vec<&'a DomNode>) {
    out.push(node);
    for child in &node.children {
        collect(child, out);
    }
}

/// Predicate controlling which descendant nodes are included in a capture.
///
/// The filter is total over all node kinds: non-element nodes (text,
/// comments) are always retained, and elements are rejected only when their
/// tag matches one of the excluded tags. Tag comparison is case-insensitive,
/// matching DOM tag-name semantics.
#[derive(Debug, Clone)]
pub struct NodeFilter {
    excluded_tags: Vec<String>,
}

impl NodeFilter {
    /// Build a filter from an explicit excluded-tag set
    pub fn new<I, S>(excluded_tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            excluded_tags: excluded_tags.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the node should be included in the capture
    pub fn accepts(&self, node: &DomNode) -> bool {
        match &node.kind {
            NodeKind::Element { tag } => !self
                .excluded_tags
                .iter()
                .any(|excluded| excluded.eq_ignore_ascii_case(tag)),
            NodeKind::Text | NodeKind::Comment => true,
        }
    }

    pub fn excluded_tags(&self) -> &[String] {
        &self.excluded_tags
    }
}

impl Default for NodeFilter {
    /// Excludes embedded frames, the usual source of cross-origin failures
    fn default() -> Self {
        Self::new(["iframe"])
    }
}
