//! World-space placement of the visible tree.
//!
//! A tidy left-to-right layout: one column per depth, as wide as the widest
//! label at that depth. Leaves take consecutive rows and every parent sits at
//! the midpoint of its first and last child. Coordinates are terminal cells
//! at zoom 1.

use crate::mindmap::{InlineSpan, MindMap, NodeKind, TreeNode};
use unicode_width::UnicodeWidthChar;

/// Blank columns between a label column and the next
pub const COLUMN_GAP: u16 = 4;
/// Width of every fold marker
pub const MARKER_WIDTH: u16 = 2;

const ELLIPSIS: char = '…';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Has children, currently hidden
    Folded,
    /// Has children, shown
    Expanded,
    Leaf,
}

impl Marker {
    fn of(node: &TreeNode) -> Self {
        match (node.has_children(), node.fold) {
            (true, true) => Marker::Folded,
            (true, false) => Marker::Expanded,
            (false, _) => Marker::Leaf,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Marker::Folded => "▶ ",
            Marker::Expanded => "▼ ",
            Marker::Leaf => "• ",
        }
    }
}

/// One painted node.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedNode {
    pub path: String,
    /// Levels below the root (root is 0)
    pub depth: usize,
    pub kind: NodeKind,
    pub marker: Marker,
    /// Label, truncated to the configured width
    pub spans: Vec<InlineSpan>,
    /// Marker plus label, in cells
    pub width: u16,
    pub x: u16,
    pub y: u16,
    /// Index of the parent in [`MapLayout::nodes`]
    pub parent: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapLayout {
    /// Pre-order, parents before children
    pub nodes: Vec<PlacedNode>,
    pub width: u16,
    pub height: u16,
}

impl MapLayout {
    pub fn compute(map: &MindMap, max_label_width: u16) -> Self {
        let mut builder = Builder {
            nodes: Vec::new(),
            next_row: 0,
            max_label_width: max_label_width.max(1),
        };
        builder.place(map.root(), 0, None);

        let mut column_widths: Vec<u16> = Vec::new();
        for node in &builder.nodes {
            if column_widths.len() <= node.depth {
                column_widths.resize(node.depth + 1, 0);
            }
            column_widths[node.depth] = column_widths[node.depth].max(node.width);
        }

        let mut column_x = Vec::with_capacity(column_widths.len());
        let mut x: u16 = 0;
        for width in &column_widths {
            column_x.push(x);
            x = x.saturating_add(*width).saturating_add(COLUMN_GAP);
        }
        for node in &mut builder.nodes {
            node.x = column_x[node.depth];
        }

        let width = match (column_x.last(), column_widths.last()) {
            (Some(x), Some(w)) => x.saturating_add(*w),
            _ => 0,
        };

        Self {
            nodes: builder.nodes,
            width,
            height: builder.next_row,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn find(&self, path: &str) -> Option<&PlacedNode> {
        self.nodes.iter().find(|node| node.path == path)
    }
}

struct Builder {
    nodes: Vec<PlacedNode>,
    next_row: u16,
    max_label_width: u16,
}

impl Builder {
    /// Place `node` and its visible subtree; returns the node's row.
    fn place(&mut self, node: &TreeNode, depth: usize, parent: Option<usize>) -> u16 {
        let (spans, label_width) = truncate_spans(&node.content.spans, self.max_label_width);
        let index = self.nodes.len();
        self.nodes.push(PlacedNode {
            path: node.path.clone(),
            depth,
            kind: node.content.kind,
            marker: Marker::of(node),
            spans,
            width: MARKER_WIDTH + label_width,
            x: 0,
            y: 0,
            parent,
        });

        let y = if node.fold || node.children.is_empty() {
            let row = self.next_row;
            self.next_row = self.next_row.saturating_add(1);
            row
        } else {
            let rows: Vec<u16> = node
                .children
                .iter()
                .map(|child| self.place(child, depth + 1, Some(index)))
                .collect();
            match (rows.first(), rows.last()) {
                (Some(first), Some(last)) => first + (last - first) / 2,
                _ => 0,
            }
        };
        self.nodes[index].y = y;
        y
    }
}

/// Cut spans down to `max_width` cells, ending in `…` when anything was
/// dropped. Returns the kept spans and their width.
pub fn truncate_spans(spans: &[InlineSpan], max_width: u16) -> (Vec<InlineSpan>, u16) {
    let total: usize = spans
        .iter()
        .flat_map(|span| span.text.chars())
        .map(|c| c.width().unwrap_or(0))
        .sum();
    if total <= max_width as usize {
        return (spans.to_vec(), total as u16);
    }

    let budget = (max_width as usize).saturating_sub(1);
    let mut used = 0;
    let mut out: Vec<InlineSpan> = Vec::new();
    'spans: for span in spans {
        let mut text = String::new();
        for c in span.text.chars() {
            let w = c.width().unwrap_or(0);
            if used + w > budget {
                if !text.is_empty() {
                    out.push(InlineSpan::styled(text, span.style));
                }
                break 'spans;
            }
            used += w;
            text.push(c);
        }
        if !text.is_empty() {
            out.push(InlineSpan::styled(text, span.style));
        }
    }

    match out.last_mut() {
        Some(last) => last.text.push(ELLIPSIS),
        None => out.push(InlineSpan::plain(ELLIPSIS.to_string())),
    }
    (out, used as u16 + 1)
}
