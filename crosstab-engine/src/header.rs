//! FILENAME: crosstab-engine/src/header.rs
//! Header nodes and their path identity.
//!
//! Headers are rebuilt from scratch on every query, so nothing may key off
//! object identity. Each node instead carries a `path_id`: a canonical string
//! derived from its ancestor chain plus its own `dimension.value` token.
//! Tokens of expandable nodes are wrapped in `<...>`; since every ancestor is
//! expandable, a path reads like `<brand.Leo><category.Lista1>group.bra`.
//!
//! Nodes of one axis live in an arena (`AxisHeaders`) in display order, each
//! pointing at its parent by index. Parents always precede their children.

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::definition::{Axis, Dimension, ScalarValue};
use crate::format::format_value;

// ============================================================================
// PSEUDO HEADERS
// ============================================================================

/// Sentinel name of the column that displays the row headers.
pub const ROW_LABELS_SENTINEL: &str = "rowHeaders";

/// Sentinel name of the grand-total column (sums across each row).
pub const ROW_SUM_SENTINEL: &str = "rowSum";

/// Sentinel name of the grand-total row (sums down each column).
pub const COLUMN_SUM_SENTINEL: &str = "columnSum";

/// What a header stands for in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeaderRole {
    /// One value of one chosen dimension.
    Dimension,
    /// The column that displays row headers.
    RowLabels,
    /// The grand-total column.
    RowSum,
    /// The grand-total row.
    ColumnSum,
}

impl HeaderRole {
    pub fn sentinel(self) -> Option<&'static str> {
        match self {
            HeaderRole::Dimension => None,
            HeaderRole::RowLabels => Some(ROW_LABELS_SENTINEL),
            HeaderRole::RowSum => Some(ROW_SUM_SENTINEL),
            HeaderRole::ColumnSum => Some(COLUMN_SUM_SENTINEL),
        }
    }

    /// Pseudo headers take part in grid construction but never filter records.
    pub fn is_pseudo(self) -> bool {
        !matches!(self, HeaderRole::Dimension)
    }
}

// ============================================================================
// HEADER NODE
// ============================================================================

/// One header of one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderNode {
    pub role: HeaderRole,

    pub axis: Axis,

    /// Dimension this node pins, or the sentinel name for pseudo headers.
    pub dimension_name: String,

    /// The value this node pins. Empty text for pseudo headers.
    pub value: ScalarValue,

    /// Stable identity, used for expansion state and as the cell key.
    pub path_id: String,

    /// Display label.
    pub label: String,

    /// Whether another chosen dimension follows this node's dimension.
    pub can_expand: bool,

    /// Whether this node is expanded AND produced at least one child.
    pub is_expanded: bool,

    /// Ancestor-chain length (0 = root level).
    pub depth: usize,

    /// Index of the parent node in the owning `AxisHeaders`.
    pub parent: Option<usize>,
}

impl HeaderNode {
    /// Creates a node for one dimension value. `parent` is the parent's index
    /// and the parent node itself, when building a nested tier.
    pub fn dimension(
        axis: Axis,
        dimension: &Dimension,
        value: ScalarValue,
        can_expand: bool,
        parent: Option<(usize, &HeaderNode)>,
    ) -> Self {
        let label = format_value(&value);
        let path_label = label.clone();
        Self::with_path_label(axis, dimension, value, &path_label, label, can_expand, parent)
    }

    /// Like `dimension`, but the path token uses `path_label` instead of the
    /// display label. Used when two sibling values display identically.
    pub(crate) fn with_path_label(
        axis: Axis,
        dimension: &Dimension,
        value: ScalarValue,
        path_label: &str,
        label: String,
        can_expand: bool,
        parent: Option<(usize, &HeaderNode)>,
    ) -> Self {
        let token = path_token(&dimension.name, path_label, can_expand);

        let (path_id, depth, parent) = match parent {
            Some((idx, node)) => (format!("{}{}", node.path_id, token), node.depth + 1, Some(idx)),
            None => (token, 0, None),
        };

        HeaderNode {
            role: HeaderRole::Dimension,
            axis,
            dimension_name: dimension.name.clone(),
            value,
            path_id,
            label,
            can_expand,
            is_expanded: false,
            depth,
            parent,
        }
    }

    /// Creates a pseudo header. Dimension roles are not pseudo; passing one
    /// yields a header named after nothing, so callers only pass pseudo roles.
    pub(crate) fn pseudo(axis: Axis, role: HeaderRole, label: &str) -> Self {
        let name = role.sentinel().unwrap_or_default().to_string();
        HeaderNode {
            role,
            axis,
            dimension_name: name.clone(),
            value: ScalarValue::Text(String::new()),
            path_id: name,
            label: label.to_string(),
            can_expand: false,
            is_expanded: false,
            depth: 0,
            parent: None,
        }
    }

    pub fn is_pseudo(&self) -> bool {
        self.role.is_pseudo()
    }

    pub fn is_row_header(&self) -> bool {
        self.axis == Axis::Row
    }

    pub fn is_column_header(&self) -> bool {
        self.axis == Axis::Column
    }

    /// Whether `path_id` names this node or one of its descendants.
    /// Leaves have no descendants, and their token is not `>`-terminated,
    /// so only an exact match counts for them.
    pub fn is_ancestor_or_self_of(&self, path_id: &str) -> bool {
        if self.can_expand {
            path_id.starts_with(&self.path_id)
        } else {
            self.path_id == path_id
        }
    }
}

/// Builds the path token of one node: `name.value`, wrapped in `<...>` when
/// the node can be expanded. Path delimiters inside names or values are
/// backslash-escaped. This escaping extends the plain `<name.value>` format
/// on purpose: ids of values without `\`, `<` or `>` are unchanged, while
/// values containing them get ids that can no longer alias a nested path.
pub fn path_token(dimension_name: &str, value_label: &str, can_expand: bool) -> String {
    let mut token = String::with_capacity(dimension_name.len() + value_label.len() + 3);
    if can_expand {
        token.push('<');
    }
    push_escaped(&mut token, dimension_name);
    token.push('.');
    push_escaped(&mut token, value_label);
    if can_expand {
        token.push('>');
    }
    token
}

fn push_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        if matches!(ch, '\\' | '<' | '>') {
            out.push('\\');
        }
        out.push(ch);
    }
}

// ============================================================================
// AXIS HEADERS (ARENA)
// ============================================================================

/// The flattened, pre-ordered header sequence of one axis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AxisHeaders {
    nodes: Vec<HeaderNode>,
}

impl AxisHeaders {
    pub fn new() -> Self {
        AxisHeaders::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&HeaderNode> {
        self.nodes.get(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HeaderNode> {
        self.nodes.iter()
    }

    pub fn as_slice(&self) -> &[HeaderNode] {
        &self.nodes
    }

    pub fn position(&self, path_id: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.path_id == path_id)
    }

    pub fn path_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.path_id.as_str())
    }

    /// Walks from the node at `idx` up to its root: self, parent, grandparent...
    pub fn ancestors(&self, idx: usize) -> Ancestors<'_> {
        Ancestors {
            headers: self,
            next: Some(idx),
        }
    }

    pub(crate) fn push(&mut self, node: HeaderNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub(crate) fn node_mut(&mut self, idx: usize) -> Option<&mut HeaderNode> {
        self.nodes.get_mut(idx)
    }

    /// Inserts a parentless node in front, shifting every parent index.
    pub(crate) fn prepend(&mut self, node: HeaderNode) {
        for existing in &mut self.nodes {
            if let Some(parent) = existing.parent.as_mut() {
                *parent += 1;
            }
        }
        self.nodes.insert(0, node);
    }
}

impl Index<usize> for AxisHeaders {
    type Output = HeaderNode;

    fn index(&self, idx: usize) -> &HeaderNode {
        &self.nodes[idx]
    }
}

impl<'a> IntoIterator for &'a AxisHeaders {
    type Item = &'a HeaderNode;
    type IntoIter = std::slice::Iter<'a, HeaderNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

/// Iterator over a node and its ancestors, innermost first.
pub struct Ancestors<'a> {
    headers: &'a AxisHeaders,
    next: Option<usize>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a HeaderNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.headers.get(self.next?)?;
        self.next = node.parent;
        Some(node)
    }
}
