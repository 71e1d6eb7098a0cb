//! Markdown outline parsing.
//!
//! This module turns a markdown document into a [`MindMap`]: headings nest
//! by level, list items nest by indentation, and other blocks become leaves
//! of the entry they appear under. Fold directive comments
//! (`<!-- fold -->`, `<!-- fold recursively -->`) set the initial fold state.
//!
//! Logseq documents go through [`dialect::normalize`] first; see
//! [`build_mind_map`].

pub mod dialect;
pub mod utils;

use crate::mindmap::visibility::fold_recursive;
use crate::mindmap::{InlineSpan, InlineStyle, MindMap, NodeContent, NodeKind, TreeNode};
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use std::path::Path;
use utils::{
    FoldDirective, line_of, line_starts, parse_fold_directive, push_span, split_highlights,
    trim_spans,
};

const TASK_OPEN: &str = "☐ ";
const TASK_DONE: &str = "☑ ";

/// Read, normalize and parse a markdown file.
///
/// The display name used for a synthesized title is the file name.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn parse_file(path: &Path) -> std::io::Result<Option<MindMap>> {
    let content = std::fs::read_to_string(path)?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(build_mind_map(Some(&content), &name))
}

/// Normalize Logseq markdown and build its mind map.
///
/// Returns `None` when there is no text, or nothing but whitespace, to show.
/// A root without a label of its own is labelled with the document title.
///
/// # Examples
///
/// ```
/// use foldmap::parser::build_mind_map;
///
/// let map = build_mind_map(Some("- one\n- two"), "Inbox.md").unwrap();
/// assert_eq!(map.root().content.text(), "Inbox");
/// assert_eq!(map.root().children.len(), 2);
/// assert!(map.root().fold);
///
/// assert!(build_mind_map(None, "Inbox.md").is_none());
/// ```
pub fn build_mind_map(text: Option<&str>, display_name: &str) -> Option<MindMap> {
    let text = text.filter(|text| !text.trim().is_empty())?;
    let normalized = dialect::normalize(Some(text), display_name)?;

    let mut map = parse_markdown(&normalized);
    if map.root().content.spans.is_empty() {
        map.root_mut().content.spans =
            vec![InlineSpan::plain(dialect::display_title(display_name))];
    }
    Some(map)
}

/// Parse plain markdown into a mind map.
///
/// When the document has a single top-level heading, that heading is the
/// root. Otherwise a synthetic, unlabelled root holds the top-level entries.
/// Line numbers refer to `content`.
pub fn parse_markdown(content: &str) -> MindMap {
    let options =
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let mut builder = OutlineBuilder::new(content);
    for (event, range) in Parser::new_ext(content, options).into_offset_iter() {
        builder.event(event, range.start);
    }
    builder.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Root,
    Heading(u8),
    Item,
}

/// An entry that can still receive children.
#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    node: TreeNode,
    directive: Option<FoldDirective>,
}

impl Frame {
    fn new(kind: FrameKind, node_kind: NodeKind, line: usize) -> Self {
        let mut content = NodeContent::new(node_kind, Vec::new());
        content.line = line;
        Self {
            kind,
            node: TreeNode::new(content),
            directive: None,
        }
    }

    fn into_node(self) -> TreeNode {
        let mut node = self.node;
        apply_directive(&mut node, self.directive);
        node
    }
}

/// Where the label being collected ends up.
#[derive(Debug)]
enum LabelTarget {
    /// The innermost open frame
    Frame,
    /// A new leaf under the innermost open frame
    Leaf(NodeKind, usize),
}

#[derive(Debug)]
struct PendingLabel {
    target: LabelTarget,
    spans: Vec<InlineSpan>,
    directive: Option<FoldDirective>,
}

/// Event-driven builder over a stack of open entries.
struct OutlineBuilder {
    line_starts: Vec<usize>,
    stack: Vec<Frame>,
    label: Option<PendingLabel>,
    style: InlineStyle,
    style_stack: Vec<InlineStyle>,
    code: Option<(String, usize)>,
    table: Option<(usize, usize)>,
}

impl OutlineBuilder {
    fn new(content: &str) -> Self {
        Self {
            line_starts: line_starts(content),
            stack: vec![Frame::new(FrameKind::Root, NodeKind::Root, 0)],
            label: None,
            style: InlineStyle::default(),
            style_stack: Vec::new(),
            code: None,
            table: None,
        }
    }

    fn event(&mut self, event: Event<'_>, offset: usize) {
        let line = line_of(&self.line_starts, offset);

        // code and table bodies are summarized, not walked
        if let Some((body, _)) = &mut self.code {
            match event {
                Event::Text(text) => body.push_str(&text),
                Event::End(TagEnd::CodeBlock) => self.finish_code_block(),
                _ => {}
            }
            return;
        }
        if let Some((rows, _)) = &mut self.table {
            match event {
                Event::End(TagEnd::TableRow) => *rows += 1,
                Event::End(TagEnd::Table) => self.finish_table(),
                _ => {}
            }
            return;
        }

        match event {
            Event::Start(tag) => self.start(tag, line),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                let style = InlineStyle {
                    code: true,
                    ..self.style
                };
                let label = self.label_mut(line);
                push_span(&mut label.spans, InlineSpan::styled(code.to_string(), style));
            }
            Event::InlineMath(math) | Event::DisplayMath(math) => self.text(&math),
            Event::InlineHtml(html) => match parse_fold_directive(&html) {
                Some(directive) => self.label_mut(line).directive = Some(directive),
                None => self.text(&html),
            },
            Event::SoftBreak | Event::HardBreak => {
                if self.label.is_some() {
                    self.text(" ");
                }
            }
            Event::TaskListMarker(done) => {
                let marker = if done { TASK_DONE } else { TASK_OPEN };
                let label = self.label_mut(line);
                push_span(&mut label.spans, InlineSpan::plain(marker));
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>, line: usize) {
        match tag {
            Tag::Heading { level, .. } => {
                let level = level as u8;
                self.flush_label();
                match self.top_kind() {
                    FrameKind::Item if self.top().node.content.spans.is_empty() => {
                        self.label = Some(PendingLabel::new(LabelTarget::Frame));
                    }
                    FrameKind::Item => {
                        let target = LabelTarget::Leaf(NodeKind::Heading(level), line);
                        self.label = Some(PendingLabel::new(target));
                    }
                    _ => {
                        self.close_headings(level);
                        self.stack.push(Frame::new(
                            FrameKind::Heading(level),
                            NodeKind::Heading(level),
                            line,
                        ));
                        self.label = Some(PendingLabel::new(LabelTarget::Frame));
                    }
                }
            }
            Tag::Paragraph => {
                if self.top_kind() == FrameKind::Item {
                    // continuation paragraphs join the item's label
                    let label = self.label_mut(line);
                    if !label.spans.is_empty() {
                        push_span(&mut label.spans, InlineSpan::plain(" "));
                    }
                } else {
                    self.flush_label();
                    self.label =
                        Some(PendingLabel::new(LabelTarget::Leaf(NodeKind::Paragraph, line)));
                }
            }
            Tag::Item => {
                self.flush_label();
                self.stack.push(Frame::new(FrameKind::Item, NodeKind::ListItem, line));
            }
            Tag::List(_) | Tag::BlockQuote(_) | Tag::HtmlBlock => self.flush_label(),
            Tag::CodeBlock(_) => {
                self.flush_label();
                self.code = Some((String::new(), line));
            }
            Tag::Table(_) => {
                self.flush_label();
                self.table = Some((0, line));
            }
            Tag::Emphasis => self.push_style(|style| style.emphasis = true),
            Tag::Strong => self.push_style(|style| style.strong = true),
            Tag::Strikethrough => self.push_style(|style| style.strikethrough = true),
            Tag::Link { .. } => self.push_style(|style| style.link = true),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_) | TagEnd::Paragraph => {
                if self.top_kind() != FrameKind::Item || self.label_targets_leaf() {
                    self.flush_label();
                }
            }
            TagEnd::Item => {
                self.flush_label();
                self.close_top();
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link => {
                self.style = self.style_stack.pop().unwrap_or_default();
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        let style = self.style;
        let line = self.top().node.content.line;
        let label = self.label_mut(line);
        for span in split_highlights(text, style) {
            push_span(&mut label.spans, span);
        }
    }

    fn push_style(&mut self, apply: impl FnOnce(&mut InlineStyle)) {
        self.style_stack.push(self.style);
        apply(&mut self.style);
    }

    /// The label currently being collected, opening one if needed.
    fn label_mut(&mut self, line: usize) -> &mut PendingLabel {
        let target = if self.top_kind() == FrameKind::Item {
            LabelTarget::Frame
        } else {
            LabelTarget::Leaf(NodeKind::Paragraph, line)
        };
        self.label.get_or_insert_with(|| PendingLabel::new(target))
    }

    fn label_targets_leaf(&self) -> bool {
        matches!(
            self.label,
            Some(PendingLabel {
                target: LabelTarget::Leaf(..),
                ..
            })
        )
    }

    fn flush_label(&mut self) {
        let Some(mut label) = self.label.take() else {
            return;
        };
        trim_spans(&mut label.spans);
        self.style = InlineStyle::default();
        self.style_stack.clear();

        match label.target {
            LabelTarget::Frame => {
                let frame = self.top_mut();
                if !label.spans.is_empty() && !frame.node.content.spans.is_empty() {
                    frame.node.content.spans.push(InlineSpan::plain(" "));
                }
                frame.node.content.spans.extend(label.spans);
                if label.directive.is_some() {
                    frame.directive = label.directive;
                }
            }
            LabelTarget::Leaf(kind, line) => {
                if label.spans.is_empty() {
                    return;
                }
                let mut content = NodeContent::new(kind, label.spans);
                content.line = line;
                let mut node = TreeNode::new(content);
                apply_directive(&mut node, label.directive);
                self.top_mut().node.children.push(node);
            }
        }
    }

    fn finish_code_block(&mut self) {
        let Some((body, line)) = self.code.take() else {
            return;
        };
        let first = body.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("code");
        let style = InlineStyle {
            code: true,
            ..InlineStyle::default()
        };
        let mut content =
            NodeContent::new(NodeKind::CodeBlock, vec![InlineSpan::styled(first, style)]);
        content.line = line;
        self.top_mut().node.children.push(TreeNode::new(content));
    }

    fn finish_table(&mut self) {
        let Some((rows, line)) = self.table.take() else {
            return;
        };
        let noun = if rows == 1 { "row" } else { "rows" };
        let mut content = NodeContent::new(
            NodeKind::Table,
            vec![InlineSpan::plain(format!("table ({rows} {noun})"))],
        );
        content.line = line;
        self.top_mut().node.children.push(TreeNode::new(content));
    }

    /// Close open headings at or below `level`, plus anything nested in them.
    fn close_headings(&mut self, level: u8) {
        while let Some(open) = self.stack.last().map(|frame| frame.kind) {
            match open {
                FrameKind::Root => break,
                FrameKind::Heading(open_level) if open_level < level => break,
                _ => self.close_top(),
            }
        }
    }

    fn close_top(&mut self) {
        if self.stack.len() <= 1 {
            return;
        }
        if let Some(frame) = self.stack.pop() {
            let node = frame.into_node();
            self.top_mut().node.children.push(node);
        }
    }

    fn finish(mut self) -> MindMap {
        self.flush_label();
        while self.stack.len() > 1 {
            self.close_top();
        }

        let mut root = match self.stack.pop() {
            Some(frame) => frame.into_node(),
            None => TreeNode::new(NodeContent::default()),
        };
        let single_heading = root.children.len() == 1
            && matches!(root.children[0].content.kind, NodeKind::Heading(_));
        if single_heading && let Some(only) = root.children.pop() {
            root = only;
        }
        MindMap::new(root)
    }

    fn top(&self) -> &Frame {
        // the root frame is only popped by `finish`
        &self.stack[self.stack.len() - 1]
    }

    fn top_mut(&mut self) -> &mut Frame {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn top_kind(&self) -> FrameKind {
        self.top().kind
    }
}

impl PendingLabel {
    fn new(target: LabelTarget) -> Self {
        Self {
            target,
            spans: Vec::new(),
            directive: None,
        }
    }
}

fn apply_directive(node: &mut TreeNode, directive: Option<FoldDirective>) {
    match directive {
        Some(FoldDirective::Fold) => node.fold = true,
        Some(FoldDirective::Recursive) => fold_recursive(node),
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(map: &MindMap) -> Vec<String> {
        map.root().descendants().map(|n| n.content.text()).collect()
    }

    #[test]
    fn test_headings_nest_by_level() {
        let md = "# Title\n\n## One\n\n### One.A\n\n## Two\n";
        let map = parse_markdown(md);
        assert_eq!(map.root().content.text(), "Title");
        assert_eq!(map.root().content.kind, NodeKind::Heading(1));
        assert_eq!(map.render_box_tree(), "Title\n├── One\n│   └── One.A\n└── Two\n");
    }

    #[test]
    fn test_multiple_top_level_entries_get_synthetic_root() {
        let map = parse_markdown("# A\n\n# B\n");
        assert_eq!(map.root().content.kind, NodeKind::Root);
        assert!(map.root().content.spans.is_empty());
        assert_eq!(labels(&map), ["", "A", "B"]);
    }

    #[test]
    fn test_skipped_heading_levels() {
        let map = parse_markdown("# A\n\n### deep\n\n## mid\n");
        assert_eq!(map.render_box_tree(), "A\n├── deep\n└── mid\n");
    }

    #[test]
    fn test_nested_list_items() {
        let md = "# Root\n- a\n  - a1\n  - a2\n- b\n";
        let map = parse_markdown(md);
        assert_eq!(map.render_box_tree(), "Root\n├── a\n│   ├── a1\n│   └── a2\n└── b\n");
        assert_eq!(map.find("0.0").map(|n| n.content.kind), Some(NodeKind::ListItem));
    }

    #[test]
    fn test_loose_list_paragraphs_join_label() {
        let md = "# R\n\n- first line\n\n  more text\n\n- second\n";
        let map = parse_markdown(md);
        assert_eq!(labels(&map), ["R", "first line more text", "second"]);
    }

    #[test]
    fn test_soft_break_becomes_space() {
        let map = parse_markdown("# R\n- one\n  two\n");
        assert_eq!(labels(&map), ["R", "one two"]);
    }

    #[test]
    fn test_logseq_heading_bullets() {
        let md = "- ## Topic\n\t- detail\n- ### Other\n";
        let map = parse_markdown(md);
        assert_eq!(labels(&map), ["", "Topic", "detail", "Other"]);
        assert_eq!(map.find("0.0").map(|n| n.content.kind), Some(NodeKind::ListItem));
    }

    #[test]
    fn test_paragraph_under_heading() {
        let map = parse_markdown("# T\n\nSome *text* here.\n");
        let paragraph = &map.root().children[0];
        assert_eq!(paragraph.content.kind, NodeKind::Paragraph);
        assert_eq!(paragraph.content.text(), "Some text here.");
        assert!(paragraph.content.spans[1].style.emphasis);
        assert_eq!(paragraph.content.line, 3);
    }

    #[test]
    fn test_inline_styles() {
        let map = parse_markdown("# T\n- **bold** `code` ~~old~~ [link](x) ==hot==\n");
        let spans = &map.root().children[0].content.spans;
        let styled: Vec<_> = spans.iter().filter(|s| !s.style.is_plain()).collect();
        assert_eq!(styled.len(), 5);
        assert!(styled[0].style.strong);
        assert!(styled[1].style.code);
        assert!(styled[2].style.strikethrough);
        assert!(styled[3].style.link);
        assert!(styled[4].style.highlight);
        assert_eq!(styled[4].text, "hot");
    }

    #[test]
    fn test_code_block_and_table_become_leaves() {
        let md = "# T\n\n```rust\n\nfn main() {}\n```\n\n| a | b |\n|---|---|\n| 1 | 2 |\n| 3 | 4 |\n";
        let map = parse_markdown(md);
        let children = &map.root().children;
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].content.kind, NodeKind::CodeBlock);
        assert_eq!(children[0].content.text(), "fn main() {}");
        assert_eq!(children[1].content.kind, NodeKind::Table);
        assert_eq!(children[1].content.text(), "table (2 rows)");
    }

    #[test]
    fn test_task_markers() {
        let map = parse_markdown("# T\n- [ ] todo\n- [x] done\n");
        assert_eq!(labels(&map), ["T", "☐ todo", "☑ done"]);
    }

    #[test]
    fn test_fold_directive_folds_only_entry() {
        let md = "# T\n## A <!-- fold -->\n- x\n  - y\n";
        let map = parse_markdown(md);
        let a = map.find("0.0").unwrap();
        assert_eq!(a.content.text(), "A");
        assert!(a.fold);
        assert!(a.descendants().skip(1).all(|n| !n.fold));
        assert!(!map.root().fold);
    }

    #[test]
    fn test_recursive_directive_folds_subtree() {
        let md = "# T\n## A <!-- fold recursively -->\n- x\n  - y\n## B\n";
        let map = parse_markdown(md);
        assert!(map.find("0.0").unwrap().descendants().all(|n| n.fold));
        assert!(!map.find("0.1").unwrap().fold);
    }

    #[test]
    fn test_directive_on_list_item() {
        let map = parse_markdown("# T\n- item <!-- markmap: fold -->\n  - child\n");
        let item = map.find("0.0").unwrap();
        assert_eq!(item.content.text(), "item");
        assert!(item.fold);
    }

    #[test]
    fn test_other_inline_html_is_text() {
        let map = parse_markdown("# T\n- a <kbd>b</kbd>\n");
        assert_eq!(labels(&map), ["T", "a <kbd>b</kbd>"]);
    }

    #[test]
    fn test_build_mind_map_folds_everything_initially() {
        let md = "# Title\n## A\n- a1\n## B\n";
        let map = build_mind_map(Some(md), "doc.md").unwrap();
        assert!(map.root().descendants().all(|n| n.fold));
        assert_eq!(map.visible_count(), 1);
    }

    #[test]
    fn test_build_mind_map_synthesizes_title() {
        let map =
            build_mind_map(Some("- one\n  collapsed:: true\n- ^^two^^"), "My%20Page.md").unwrap();
        assert_eq!(map.root().content.text(), "My Page");
        assert_eq!(labels(&map), ["My Page", "one", "two"]);
        assert!(map.find("0.1").unwrap().content.spans[0].style.highlight);
    }

    #[test]
    fn test_build_mind_map_keeps_indented_code() {
        let map = build_mind_map(Some("Some intro\n\n    # shell comment\n"), "note.md").unwrap();
        assert_eq!(labels(&map), ["note", "Some intro", "# shell comment"]);
        assert_eq!(map.find("0.1").unwrap().content.kind, NodeKind::CodeBlock);
        assert!(map.root().fold);
    }

    #[test]
    fn test_build_mind_map_drops_closing_hashes() {
        let map = build_mind_map(Some("# Title ##\n- item\n"), "doc.md").unwrap();
        assert_eq!(labels(&map), ["Title", "item"]);
        assert!(map.root().fold);
    }

    #[test]
    fn test_build_mind_map_labels_synthetic_root() {
        let map = build_mind_map(Some("# A\n# B\n"), "pair.md").unwrap();
        assert_eq!(map.root().content.text(), "pair");
        assert_eq!(map.root().content.kind, NodeKind::Root);
    }

    #[test]
    fn test_build_mind_map_without_text() {
        assert!(build_mind_map(None, "x.md").is_none());
        assert!(build_mind_map(Some(""), "x.md").is_none());
        assert!(build_mind_map(Some(" \n\t\n"), "x.md").is_none());
    }

    #[test]
    fn test_parse_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Notes.md");
        std::fs::write(&path, "- alpha\n- beta\n").unwrap();

        let map = parse_file(&path).unwrap().unwrap();
        assert_eq!(map.root().content.text(), "Notes");
        assert_eq!(map.node_count(), 3);
    }
}
