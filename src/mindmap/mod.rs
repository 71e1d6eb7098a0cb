//! Tree model for a mind map.
//!
//! A [`MindMap`] owns exactly one root [`TreeNode`]. Every node carries a
//! typed `fold` flag, a dot-delimited `path` describing its position among
//! siblings at each level, its children, and an opaque [`NodeContent`] that
//! only renderers look at.
//!
//! Fold state is changed through [`visibility`], and keyboard commands are
//! mapped onto it by [`command`].

pub mod command;
pub mod visibility;

use serde::Serialize;

/// Kind of outline entry a node was built from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "level", rename_all = "camelCase")]
pub enum NodeKind {
    /// Synthetic root holding several top-level entries
    #[default]
    Root,
    /// ATX or setext heading with its level (1-6)
    Heading(u8),
    /// Bullet or ordered list item
    ListItem,
    /// Paragraph or block quote outside of a list
    Paragraph,
    /// Fenced or indented code block
    CodeBlock,
    /// Table, collapsed into a single entry
    Table,
}

/// Inline styling of a label span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InlineStyle {
    #[serde(skip_serializing_if = "is_false")]
    pub strong: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub emphasis: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub code: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub strikethrough: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub highlight: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub link: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A run of label text sharing one style.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InlineSpan {
    pub text: String,
    #[serde(skip_serializing_if = "InlineStyle::is_plain")]
    pub style: InlineStyle,
}

impl InlineStyle {
    pub fn is_plain(&self) -> bool {
        *self == InlineStyle::default()
    }
}

impl InlineSpan {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: InlineStyle::default(),
        }
    }

    pub fn styled(text: impl Into<String>, style: InlineStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// Render metadata of a node.
///
/// The visibility controller never reads this; it exists for renderers and
/// for the JSON output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NodeContent {
    pub kind: NodeKind,
    pub spans: Vec<InlineSpan>,
    /// 1-indexed source line of the entry (0 for synthetic nodes)
    pub line: usize,
}

impl NodeContent {
    pub fn new(kind: NodeKind, spans: Vec<InlineSpan>) -> Self {
        Self {
            kind,
            spans,
            line: 0,
        }
    }

    /// Plain text of the label with all styling dropped.
    pub fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }
}

/// One outline entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    /// Dot-delimited position, e.g. `"0.2.1"`. Empty means unknown (depth 0).
    pub path: String,
    /// Whether this node's descendants are hidden
    pub fold: bool,
    pub content: NodeContent,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(content: NodeContent) -> Self {
        Self {
            content,
            ..Self::default()
        }
    }

    /// Convenience constructor for a plain-text node.
    pub fn leaf(kind: NodeKind, text: &str) -> Self {
        Self::new(NodeContent::new(kind, vec![InlineSpan::plain(text)]))
    }

    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }

    /// Depth derived from the path: the number of path segments.
    ///
    /// A node without a path counts as depth 0.
    pub fn depth(&self) -> usize {
        if self.path.is_empty() {
            0
        } else {
            self.path.split('.').count()
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Pre-order iterator over this node and all descendants.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Pre-order iterator over the nodes a renderer paints: children of a
    /// folded node are skipped.
    pub fn visible(&self) -> Visible<'_> {
        Visible { stack: vec![self] }
    }
}

pub struct Descendants<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

pub struct Visible<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> Iterator for Visible<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if !node.fold {
            self.stack.extend(node.children.iter().rev());
        }
        Some(node)
    }
}

/// A parsed document: one root and its owned subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MindMap {
    root: TreeNode,
}

impl MindMap {
    /// Wrap a tree, assigning paths to every node (`"0"` for the root).
    pub fn new(mut root: TreeNode) -> Self {
        assign_paths(&mut root, "0".to_string());
        Self { root }
    }

    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut TreeNode {
        &mut self.root
    }

    pub fn node_count(&self) -> usize {
        self.root.descendants().count()
    }

    pub fn visible_count(&self) -> usize {
        self.root.visible().count()
    }

    /// Number of levels in the tree (1 for a lone root).
    pub fn max_depth(&self) -> usize {
        self.root
            .descendants()
            .map(TreeNode::depth)
            .max()
            .unwrap_or(0)
    }

    /// Look a node up by its path.
    pub fn find(&self, path: &str) -> Option<&TreeNode> {
        self.root.descendants().find(|node| node.path == path)
    }

    /// Render the visible part of the tree with box-drawing characters.
    ///
    /// Folded nodes that hide children are marked with `[+]`.
    pub fn render_box_tree(&self) -> String {
        let mut out = String::new();
        write_node_line(&mut out, &self.root, "");
        if !self.root.fold {
            write_children(&mut out, &self.root, "");
        }
        out
    }
}

fn assign_paths(node: &mut TreeNode, path: String) {
    for (i, child) in node.children.iter_mut().enumerate() {
        assign_paths(child, format!("{path}.{i}"));
    }
    node.path = path;
}

fn write_node_line(out: &mut String, node: &TreeNode, connector: &str) {
    out.push_str(connector);
    out.push_str(&node.content.text());
    if node.fold && node.has_children() {
        out.push_str(" [+]");
    }
    out.push('\n');
}

fn write_children(out: &mut String, node: &TreeNode, prefix: &str) {
    let count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        let is_last = i + 1 == count;
        let connector = if is_last { "└── " } else { "├── " };
        write_node_line(out, child, &format!("{prefix}{connector}"));
        if !child.fold {
            let extension = if is_last { "    " } else { "│   " };
            write_children(out, child, &format!("{prefix}{extension}"));
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// root
    /// ├── a
    /// │   ├── a1
    /// │   │   └── a1x
    /// │   └── a2
    /// └── b
    pub(crate) fn sample_map() -> MindMap {
        let a1 = TreeNode::leaf(NodeKind::Heading(3), "a1")
            .with_children(vec![TreeNode::leaf(NodeKind::ListItem, "a1x")]);
        let a = TreeNode::leaf(NodeKind::Heading(2), "a")
            .with_children(vec![a1, TreeNode::leaf(NodeKind::Heading(3), "a2")]);
        let root = TreeNode::leaf(NodeKind::Heading(1), "root")
            .with_children(vec![a, TreeNode::leaf(NodeKind::Heading(2), "b")]);
        MindMap::new(root)
    }

    #[test]
    fn test_paths_are_assigned() {
        let map = sample_map();
        assert_eq!(map.root().path, "0");
        assert_eq!(map.root().children[0].path, "0.0");
        assert_eq!(map.root().children[1].path, "0.1");
        assert_eq!(map.root().children[0].children[0].children[0].path, "0.0.0.0");
    }

    #[test]
    fn test_depth_from_path() {
        let map = sample_map();
        assert_eq!(map.root().depth(), 1);
        assert_eq!(map.find("0.0.1").map(TreeNode::depth), Some(3));
        assert_eq!(map.max_depth(), 4);

        let orphan = TreeNode::leaf(NodeKind::ListItem, "no path");
        assert_eq!(orphan.depth(), 0);
    }

    #[test]
    fn test_descendants_preorder() {
        let map = sample_map();
        let labels: Vec<_> = map.root().descendants().map(|n| n.content.text()).collect();
        assert_eq!(labels, ["root", "a", "a1", "a1x", "a2", "b"]);
        assert_eq!(map.node_count(), 6);
    }

    #[test]
    fn test_visible_skips_folded_children() {
        let mut map = sample_map();
        map.root_mut().children[0].fold = true;
        let labels: Vec<_> = map.root().visible().map(|n| n.content.text()).collect();
        assert_eq!(labels, ["root", "a", "b"]);
        assert_eq!(map.visible_count(), 3);
    }

    #[test]
    fn test_render_box_tree() {
        let mut map = sample_map();
        map.root_mut().children[0].children[0].fold = true;
        let rendered = map.render_box_tree();
        let expected = "root\n├── a\n│   ├── a1 [+]\n│   └── a2\n└── b\n";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_json_shape() {
        let map = MindMap::new(TreeNode::leaf(NodeKind::Heading(1), "Title"));
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json["root"]["path"], "0");
        assert_eq!(json["root"]["fold"], false);
        assert_eq!(json["root"]["content"]["kind"]["type"], "heading");
        assert_eq!(json["root"]["content"]["kind"]["level"], 1);
        assert_eq!(json["root"]["content"]["spans"][0]["text"], "Title");
    }
}
