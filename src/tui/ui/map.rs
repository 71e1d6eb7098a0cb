//! Painting the laid-out tree: elbow connectors first, labels on top.

use crate::mindmap::NodeKind;
use crate::tui::map_layout::{Marker, PlacedNode};
use crate::tui::theme::Theme;
use crate::tui::view::TerminalView;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Widget;
use std::collections::HashMap;
use unicode_width::UnicodeWidthChar;

const UP: u8 = 1;
const DOWN: u8 = 2;
const LEFT: u8 = 4;
const RIGHT: u8 = 8;

/// Where a node landed on screen, relative to the map area.
#[derive(Debug, Clone, Copy)]
struct NodeBox {
    x: i32,
    y: i32,
    cells: u16,
}

pub struct MindMapWidget<'a> {
    view: &'a TerminalView,
    theme: &'a Theme,
}

impl<'a> MindMapWidget<'a> {
    pub fn new(view: &'a TerminalView, theme: &'a Theme) -> Self {
        Self { view, theme }
    }
}

impl Widget for MindMapWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let nodes = &self.view.layout().nodes;
        let boxes: Vec<NodeBox> = nodes
            .iter()
            .map(|node| {
                let (x, y) = self.view.project(node.x as f64, node.y as f64);
                NodeBox {
                    x,
                    y,
                    cells: self.view.label_cells(node.width),
                }
            })
            .collect();

        let mut canvas = Canvas::default();
        for (node, child) in nodes.iter().zip(&boxes) {
            if let Some(parent) = node.parent.and_then(|i| boxes.get(i)) {
                canvas.connect(parent, child);
            }
        }
        canvas.paint(area, buf, self.theme.connector_style());

        for (node, at) in nodes.iter().zip(&boxes) {
            paint_label(buf, area, node, at, self.theme);
        }
    }
}

/// Connector cells, each a set of directions a line leaves it in.
#[derive(Default)]
struct Canvas {
    cells: HashMap<(i32, i32), u8>,
}

impl Canvas {
    fn mark(&mut self, x: i32, y: i32, bits: u8) {
        *self.cells.entry((x, y)).or_default() |= bits;
    }

    /// Elbow from the end of the parent label to the start of the child.
    fn connect(&mut self, parent: &NodeBox, child: &NodeBox) {
        let start = parent.x + parent.cells as i32;
        let end = child.x - 1;
        if end < start {
            return;
        }
        let elbow = start + (end - start) / 2;

        for x in start..elbow {
            self.mark(x, parent.y, LEFT | RIGHT);
        }
        self.mark(elbow, parent.y, LEFT);

        if child.y != parent.y {
            let (toward_child, toward_parent) = if child.y > parent.y {
                (DOWN, UP)
            } else {
                (UP, DOWN)
            };
            self.mark(elbow, parent.y, toward_child);
            for y in parent.y.min(child.y) + 1..parent.y.max(child.y) {
                self.mark(elbow, y, UP | DOWN);
            }
            self.mark(elbow, child.y, toward_parent);
        }

        self.mark(elbow, child.y, RIGHT);
        for x in elbow + 1..=end {
            self.mark(x, child.y, LEFT | RIGHT);
        }
    }

    fn paint(&self, area: Rect, buf: &mut Buffer, style: Style) {
        for (&(x, y), &bits) in &self.cells {
            if let Some((ax, ay)) = to_area(area, x, y, 1)
                && let Some(cell) = buf.cell_mut((ax, ay))
            {
                cell.set_char(glyph(bits)).set_style(style);
            }
        }
    }
}

fn glyph(bits: u8) -> char {
    match bits {
        b if b == UP | DOWN | LEFT | RIGHT => '┼',
        b if b == UP | DOWN | RIGHT => '├',
        b if b == UP | DOWN | LEFT => '┤',
        b if b == LEFT | RIGHT | DOWN => '┬',
        b if b == LEFT | RIGHT | UP => '┴',
        b if b == DOWN | RIGHT => '┌',
        b if b == UP | RIGHT => '└',
        b if b == DOWN | LEFT => '┐',
        b if b == UP | LEFT => '┘',
        b if b & (UP | DOWN) != 0 && b & (LEFT | RIGHT) == 0 => '│',
        _ => '─',
    }
}

/// Absolute cell for an area-relative position, if `width` cells fit there.
fn to_area(area: Rect, x: i32, y: i32, width: i32) -> Option<(u16, u16)> {
    let inside = x >= 0 && y >= 0 && x + width <= area.width as i32 && y < area.height as i32;
    inside.then(|| (area.x + x as u16, area.y + y as u16))
}

fn label_style(node: &PlacedNode, theme: &Theme) -> Style {
    let style = Style::default().fg(theme.depth_color(node.depth));
    match node.kind {
        NodeKind::Root | NodeKind::Heading(_) => style.add_modifier(Modifier::BOLD),
        NodeKind::CodeBlock => style.fg(theme.inline_code_fg),
        NodeKind::Table => style.add_modifier(Modifier::ITALIC),
        NodeKind::ListItem | NodeKind::Paragraph => style,
    }
}

fn paint_label(buf: &mut Buffer, area: Rect, node: &PlacedNode, at: &NodeBox, theme: &Theme) {
    let mut budget = at.cells as i32;
    let marker_style = match node.marker {
        Marker::Folded => theme.fold_marker_style(),
        Marker::Expanded | Marker::Leaf => theme.connector_style(),
    };
    let mut x = put_str(buf, area, (at.x, at.y), node.marker.symbol(), marker_style, &mut budget);

    let base = label_style(node, theme);
    for span in &node.spans {
        let style = theme.span_style(span.style, base);
        x = put_str(buf, area, (x, at.y), &span.text, style, &mut budget);
    }
}

/// Write `text` from `(x, y)`, clipping to the area and to `budget` cells.
/// Returns the column after the text.
fn put_str(
    buf: &mut Buffer,
    area: Rect,
    (mut x, y): (i32, i32),
    text: &str,
    style: Style,
    budget: &mut i32,
) -> i32 {
    let mut encoded = [0u8; 4];
    for c in text.chars() {
        let width = c.width().unwrap_or(0) as i32;
        if width == 0 {
            continue;
        }
        if width > *budget {
            *budget = 0;
            break;
        }
        *budget -= width;
        if let Some((ax, ay)) = to_area(area, x, y, width) {
            buf.set_stringn(ax, ay, &*c.encode_utf8(&mut encoded), width as usize, style);
        }
        x += width;
    }
    x
}
